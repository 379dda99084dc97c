//! Progress Reporter (C5): rate-limited stage progress, persisted via
//! [`StageRunRepository::set_progress`], plus a composed reporter that
//! maps an LLM sub-phase's `[0..100]` range into an outer window.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::mpsc::UnboundedSender;

use subflow_domain::entities::StageMetrics;
use subflow_domain::error::SubflowResult;
use subflow_domain::ports::ProgressReporter;
use subflow_domain::repositories::StageRunRepository;
use subflow_domain::value_objects::{ProjectId, StageName};

const DEFAULT_MIN_PERCENT_DELTA: u8 = 5;
const DEFAULT_MIN_INTERVAL: Duration = Duration::from_secs(1);

struct RateLimitState {
    last_progress: u8,
    last_emitted_at: Instant,
}

/// Persists to a single `(project, stage)` [`StageRun`] row, subject to a
/// minimum percent delta and minimum wall-clock interval between writes.
pub struct StageProgressReporter {
    repo: Arc<dyn StageRunRepository>,
    project_id: ProjectId,
    stage: StageName,
    min_percent_delta: u8,
    min_interval: Duration,
    state: Mutex<RateLimitState>,
    on_update: Option<UnboundedSender<ProjectId>>,
}

impl StageProgressReporter {
    pub fn new(repo: Arc<dyn StageRunRepository>, project_id: ProjectId, stage: StageName) -> Self {
        Self {
            repo,
            project_id,
            stage,
            min_percent_delta: DEFAULT_MIN_PERCENT_DELTA,
            min_interval: DEFAULT_MIN_INTERVAL,
            state: Mutex::new(RateLimitState {
                last_progress: 0,
                last_emitted_at: Instant::now() - DEFAULT_MIN_INTERVAL,
            }),
            on_update: None,
        }
    }

    pub fn with_update_notifier(mut self, sender: UnboundedSender<ProjectId>) -> Self {
        self.on_update = Some(sender);
        self
    }

    fn should_emit(&self, progress: u8) -> bool {
        let state = self.state.lock();
        if progress < state.last_progress {
            return false;
        }
        progress.saturating_sub(state.last_progress) >= self.min_percent_delta || state.last_emitted_at.elapsed() >= self.min_interval
    }

    fn record_emit(&self, progress: u8) {
        let mut state = self.state.lock();
        state.last_progress = state.last_progress.max(progress);
        state.last_emitted_at = Instant::now();
    }

    fn notify(&self) {
        if let Some(sender) = &self.on_update {
            let _ = sender.send(self.project_id);
        }
    }
}

#[async_trait]
impl ProgressReporter for StageProgressReporter {
    async fn report(&self, progress: u8, message: &str) -> SubflowResult<()> {
        let progress = progress.min(100);
        if !self.should_emit(progress) {
            return Ok(());
        }
        self.repo.set_progress(self.project_id, self.stage, progress, message.to_string(), None).await?;
        self.record_emit(progress);
        self.notify();
        Ok(())
    }

    async fn report_metrics(&self, metrics: StageMetrics) -> SubflowResult<()> {
        let progress = self.state.lock().last_progress;
        if !self.should_emit(progress) {
            return Ok(());
        }
        self.repo.set_progress(self.project_id, self.stage, progress, String::new(), Some(metrics)).await?;
        self.record_emit(progress);
        self.notify();
        Ok(())
    }

    async fn finish(&self, message: &str) -> SubflowResult<()> {
        self.repo.set_progress(self.project_id, self.stage, 100, message.to_string(), None).await?;
        self.record_emit(100);
        self.notify();
        Ok(())
    }
}

/// Maps an inner reporter's `[0..100]` range into `[outer_start..outer_end)`
/// of an outer [`StageProgressReporter`], used by the LLM stage to combine
/// Pass A (global understanding, `[0..20)`) and Pass B (semantic chunking,
/// `[20..100]`) into one progress bar.
pub struct WindowedProgressReporter {
    inner: Arc<dyn ProgressReporter>,
    outer_start: u8,
    outer_end: u8,
}

impl WindowedProgressReporter {
    pub fn new(inner: Arc<dyn ProgressReporter>, outer_start: u8, outer_end: u8) -> Self {
        Self { inner, outer_start, outer_end }
    }

    fn map(&self, progress: u8) -> u8 {
        let span = self.outer_end.saturating_sub(self.outer_start) as u32;
        let scaled = self.outer_start as u32 + (progress.min(100) as u32 * span) / 100;
        scaled.min(100) as u8
    }
}

#[async_trait]
impl ProgressReporter for WindowedProgressReporter {
    async fn report(&self, progress: u8, message: &str) -> SubflowResult<()> {
        self.inner.report(self.map(progress), message).await
    }

    async fn report_metrics(&self, metrics: StageMetrics) -> SubflowResult<()> {
        self.inner.report_metrics(metrics).await
    }

    async fn finish(&self, message: &str) -> SubflowResult<()> {
        self.inner.report(self.outer_end, message).await
    }
}
