//! LLM Health Monitor (C10): an in-process sliding-window aggregator with
//! an optional Redis mirror for cross-process visibility (§4.11).

use std::collections::{BTreeMap, VecDeque};

use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use parking_lot::Mutex;
use tracing::debug;

use subflow_domain::ports::llm_health_monitor::{ConfiguredProviders, HealthResponse, HealthStatus, OverallStatus, ProfileHealth};
use subflow_domain::ports::LlmHealthMonitor;
use subflow_domain::value_objects::LlmProfile;

const WINDOW: ChronoDuration = ChronoDuration::hours(1);
const STALE_AFTER: ChronoDuration = ChronoDuration::seconds(600);
const REDIS_TTL_SECS: i64 = 24 * 60 * 60;

#[derive(Default, Clone)]
struct ProfileState {
    last_success_at: Option<DateTime<Utc>>,
    last_error_at: Option<DateTime<Utc>>,
    last_error: Option<String>,
    last_latency_ms: Option<u64>,
    successes: VecDeque<DateTime<Utc>>,
    errors: VecDeque<DateTime<Utc>>,
}

impl ProfileState {
    fn trim(&mut self, now: DateTime<Utc>) {
        let cutoff = now - WINDOW;
        while self.successes.front().is_some_and(|t| *t < cutoff) {
            self.successes.pop_front();
        }
        while self.errors.front().is_some_and(|t| *t < cutoff) {
            self.errors.pop_front();
        }
    }

    fn status(&self, now: DateTime<Utc>) -> HealthStatus {
        let newest = self.last_success_at.into_iter().chain(self.last_error_at).max();
        let Some(newest) = newest else { return HealthStatus::Unknown };
        if now - newest > STALE_AFTER {
            return HealthStatus::Unknown;
        }
        match (self.last_success_at, self.last_error_at) {
            (Some(s), Some(e)) if s >= e => HealthStatus::Ok,
            (Some(_), None) => HealthStatus::Ok,
            _ => HealthStatus::Error,
        }
    }
}

pub struct LlmHealthMonitorImpl {
    state: Mutex<BTreeMap<LlmProfile, ProfileState>>,
    redis: Option<redis::Client>,
}

impl LlmHealthMonitorImpl {
    pub fn new(redis_url: Option<&str>) -> Self {
        let redis = redis_url.and_then(|url| redis::Client::open(url).ok());
        Self { state: Mutex::new(BTreeMap::new()), redis }
    }

    async fn mirror(&self, profile: LlmProfile, kind: &str, latency_ms: u64, error: Option<&str>) {
        let Some(client) = &self.redis else { return };
        let Ok(mut conn) = client.get_multiplexed_async_connection().await else {
            debug!("redis unavailable for LLM health mirroring");
            return;
        };

        let now = Utc::now().timestamp();
        let state_key = format!("subflow:llm_health:{profile}:state");
        let event_key = format!("subflow:llm_health:{profile}:{kind}");
        let blob = serde_json::json!({ "latency_ms": latency_ms, "error": error, "at": now }).to_string();

        let mut pipe = redis::pipe();
        pipe.atomic()
            .set_ex(&state_key, blob, REDIS_TTL_SECS as u64)
            .zadd(&event_key, now, now)
            .zrembyscore(&event_key, 0, now - WINDOW.num_seconds())
            .expire(&event_key, REDIS_TTL_SECS);

        if let Err(e) = pipe.query_async::<()>(&mut conn).await {
            debug!(error = %e, "failed to mirror LLM health event into redis");
        }
    }
}

#[async_trait]
impl LlmHealthMonitor for LlmHealthMonitorImpl {
    async fn report_success(&self, profile: LlmProfile, _provider: &str, _model: &str, latency_ms: u64) {
        let now = Utc::now();
        {
            let mut state = self.state.lock();
            let entry = state.entry(profile).or_default();
            entry.last_success_at = Some(now);
            entry.last_latency_ms = Some(latency_ms);
            entry.successes.push_back(now);
            entry.trim(now);
        }
        self.mirror(profile, "success", latency_ms, None).await;
    }

    async fn report_error(&self, profile: LlmProfile, _provider: &str, _model: &str, latency_ms: u64, error: &str) {
        let now = Utc::now();
        let truncated: String = error.chars().take(500).collect();
        {
            let mut state = self.state.lock();
            let entry = state.entry(profile).or_default();
            entry.last_error_at = Some(now);
            entry.last_error = Some(truncated.clone());
            entry.last_latency_ms = Some(latency_ms);
            entry.errors.push_back(now);
            entry.trim(now);
        }
        self.mirror(profile, "error", latency_ms, Some(&truncated)).await;
    }

    async fn snapshot(&self, configured: ConfiguredProviders) -> HealthResponse {
        let now = Utc::now();
        let state = self.state.lock().clone();

        let mut profiles = BTreeMap::new();
        for (profile, (provider, model)) in configured {
            let entry = state.get(&profile).cloned().unwrap_or_default();
            profiles.insert(
                profile,
                ProfileHealth {
                    status: entry.status(now),
                    configured_provider: provider,
                    configured_model: model,
                    last_success_at: entry.last_success_at,
                    last_error_at: entry.last_error_at,
                    last_error: entry.last_error,
                    last_latency_ms: entry.last_latency_ms,
                    calls_last_hour: (entry.successes.len() + entry.errors.len()) as u64,
                    errors_last_hour: entry.errors.len() as u64,
                },
            );
        }

        let overall = aggregate(profiles.values().map(|p| p.status));
        HealthResponse { overall, profiles }
    }
}

fn aggregate(statuses: impl Iterator<Item = HealthStatus>) -> OverallStatus {
    let (mut ok, mut err, mut unknown, mut total) = (0, 0, 0, 0);
    for status in statuses {
        total += 1;
        match status {
            HealthStatus::Ok => ok += 1,
            HealthStatus::Error => err += 1,
            HealthStatus::Unknown => unknown += 1,
        }
    }
    if total == 0 || unknown == total {
        OverallStatus::Unknown
    } else if ok == total {
        OverallStatus::Healthy
    } else if err == total {
        OverallStatus::Unhealthy
    } else {
        OverallStatus::Degraded
    }
}
