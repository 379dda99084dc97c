//! Task Queue Consumer (C9): crash recovery on startup, then a dequeue
//! loop dispatching `run_all`/`run_stage`/`retry_stage` tasks to the
//! orchestrator (C7). Grounded on `pipeline/queue_consumer.py`'s
//! `recover_orphan_projects` and worker loop.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use subflow_domain::entities::Project;
use subflow_domain::error::{SubflowError, SubflowResult};
use subflow_domain::ports::TaskQueue;
use subflow_domain::repositories::ProjectRepository;
use subflow_domain::value_objects::{ProjectId, ProjectStatus, QueueTask, QueueTaskKind, StageName, StageRunStatus};

use crate::orchestrator::Orchestrator;

const DEFAULT_POP_TIMEOUT: Duration = Duration::from_secs(5);
const STALE_PROCESSING_MINUTES: i64 = 10;
const STALE_PAGE_SIZE: i64 = 100;

pub struct QueueConsumer {
    pub orchestrator: Arc<Orchestrator>,
    pub project_repo: Arc<dyn ProjectRepository>,
    pub queue: Arc<dyn TaskQueue>,
}

impl QueueConsumer {
    /// Reconciles every project stuck `processing` since before the crash.
    /// Never marks a project `failed` here — a crash is not a failure
    /// signal, only evidence the last known state may be stale.
    pub async fn recover_orphans(&self) -> SubflowResult<()> {
        let stale = self.project_repo.find_stale_processing(STALE_PROCESSING_MINUTES, STALE_PAGE_SIZE).await?;
        for mut project in stale {
            let inferred = inferred_stage_index(&project);
            let reconciled = project.current_stage.max(inferred);
            let all_completed = StageName::ORDER.iter().all(|s| reconciled >= s.index());

            project.current_stage = reconciled;
            if all_completed {
                project.status = ProjectStatus::Completed;
                info!(project_id = %project.id, "crash recovery: all stages completed, marking project completed");
            } else {
                info!(project_id = %project.id, current_stage = reconciled, "crash recovery: reconciled current_stage, leaving processing");
            }
            self.project_repo.update(&project).await?;
        }
        Ok(())
    }

    /// Runs until `cancel` fires, popping and dispatching one task per
    /// iteration with a bounded wait so the loop can observe cancellation.
    pub async fn run(&self, cancel: CancellationToken) {
        loop {
            if cancel.is_cancelled() {
                return;
            }
            let task = tokio::select! {
                popped = self.queue.pop(DEFAULT_POP_TIMEOUT) => popped,
                _ = cancel.cancelled() => return,
            };
            match task {
                Ok(Some(task)) => {
                    if let Err(err) = self.dispatch(task.clone(), &cancel).await {
                        warn!(project_id = %task.project_id, error = %err, "task failed, project marked failed and loop continues");
                    }
                }
                Ok(None) => continue,
                Err(err) => {
                    error!(error = %err, "failed to pop from task queue");
                }
            }
        }
    }

    async fn dispatch(&self, task: QueueTask, cancel: &CancellationToken) -> SubflowResult<()> {
        let project = self
            .project_repo
            .get(task.project_id)
            .await?
            .ok_or_else(|| SubflowError::repository(format!("no project {}", task.project_id)))?;

        let result = match task.kind {
            QueueTaskKind::RunAll => {
                let from = task.from_stage.or_else(|| StageName::from_index(project.current_stage + 1)).unwrap_or(StageName::AudioPreprocess);
                let target = StageName::ORDER.last().copied().expect("StageName::ORDER is non-empty");
                self.run_from(project, from, target, cancel).await
            }
            QueueTaskKind::RunStage => {
                let stage = task.stage.ok_or_else(|| SubflowError::configuration("run_stage task missing stage"))?;
                self.run_to_stage(project, stage, cancel).await
            }
            QueueTaskKind::RetryStage => {
                let stage = task.stage.ok_or_else(|| SubflowError::configuration("retry_stage task missing stage"))?;
                self.orchestrator.retry_stage(project, stage, cancel).await.map(|_| ())
            }
        };

        if let Err(err) = &result {
            self.mark_project_failed(task.project_id, err.to_string()).await?;
        }
        result
    }

    /// `run_all`: runs every stage from `from` through `to` in one sweep.
    async fn run_from(&self, project: Project, from: StageName, to: StageName, cancel: &CancellationToken) -> SubflowResult<()> {
        let _ = from;
        self.orchestrator.run_stage(project, to, cancel).await.map(|_| ())
    }

    /// `run_stage`: advance to `stage`'s prerequisites, run it, then either
    /// auto-continue through the remaining stages (when `auto_workflow` and
    /// `stage` isn't terminal) or pause.
    async fn run_to_stage(&self, project: Project, stage: StageName, cancel: &CancellationToken) -> SubflowResult<()> {
        let auto_workflow = project.auto_workflow;
        let last_stage = StageName::ORDER.last().copied().expect("StageName::ORDER is non-empty");
        let is_terminal = stage == last_stage;

        let (project, _ctx) = if auto_workflow && !is_terminal {
            self.orchestrator.run_stage(project, last_stage, cancel).await?
        } else {
            self.orchestrator.run_stage(project, stage, cancel).await?
        };

        if project.status == ProjectStatus::Processing {
            let mut paused = project;
            paused.status = ProjectStatus::Paused;
            self.project_repo.update(&paused).await?;
        }
        Ok(())
    }

    async fn mark_project_failed(&self, project_id: ProjectId, message: String) -> SubflowResult<()> {
        if let Some(mut project) = self.project_repo.get(project_id).await? {
            project.status = ProjectStatus::Failed;
            project.append_error(message);
            self.project_repo.update(&project).await?;
        }
        Ok(())
    }
}

/// Highest stage index whose `StageRun` is `completed`, or 0 if none.
fn inferred_stage_index(project: &Project) -> u32 {
    StageName::ORDER
        .iter()
        .filter(|stage| project.stage_run(**stage).map(|run| run.status == StageRunStatus::Completed).unwrap_or(false))
        .map(|stage| stage.index())
        .max()
        .unwrap_or(0)
}
