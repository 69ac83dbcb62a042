//! Daily batch scheduling.
//!
//! One background task sleeps until the configured UTC hour and then runs the batch once a
//! day. The same [`ComplianceScheduler`] serves on-demand runs from the API, and its lock
//! keeps two passes from overlapping.

use std::sync::Arc;

use time::{Date, OffsetDateTime, Time, UtcOffset};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::Duration;

use crate::AppResources;
use crate::compliance::batch::{BatchReport, run_compliance_batch};
use crate::compliance::document::Actor;
use crate::config::AppConfig;
use crate::delivery::Delivery;
use crate::repository::ComplianceStore;

/// Delay before retrying to compute the next run if the clock misbehaves.
pub const FALLBACK_DELAY: Duration = Duration::from_secs(60 * 60);

/// Time from `now` until the next occurrence of `run_at_hour`:00 UTC.
pub fn duration_until_next_run(now: OffsetDateTime, run_at_hour: u8) -> Duration {
    let now = now.to_offset(UtcOffset::UTC);
    let run_time = Time::from_hms(run_at_hour.min(23), 0, 0).unwrap_or(Time::MIDNIGHT);
    let today_run = now.replace_time(run_time);
    let next_run = if today_run > now {
        today_run
    } else {
        today_run + time::Duration::days(1)
    };
    Duration::try_from(next_run - now).unwrap_or(FALLBACK_DELAY)
}

#[derive(Default)]
pub struct ComplianceScheduler {
    running: Mutex<()>,
}

impl ComplianceScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run a pass now unless one is already in progress, in which case `None` is returned.
    pub async fn run_now<D: Delivery>(
        &self,
        store: &ComplianceStore,
        delivery: &D,
        config: &AppConfig,
        actor: &Actor,
        as_of: Date,
    ) -> Option<BatchReport> {
        let Ok(_guard) = self.running.try_lock() else {
            tracing::warn!(
                name = "compliance.scheduler.already_running",
                target = concat!(env!("CARGO_PKG_NAME"), "::", module_path!()),
                message = "Compliance batch already in progress"
            );
            return None;
        };
        Some(run_compliance_batch(store, delivery, config, actor, as_of).await)
    }

    pub fn is_running(&self) -> bool {
        self.running.try_lock().is_err()
    }
}

/// Spawn the daily batch loop.
pub fn spawn_daily_batch(
    resources: Arc<AppResources>,
    scheduler: Arc<ComplianceScheduler>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let store = ComplianceStore::new(resources.db.clone());
        let actor = Actor::new(resources.config.compliance.service_account.clone());
        loop {
            let delay = duration_until_next_run(
                OffsetDateTime::now_utc(),
                resources.config.compliance.run_at_hour,
            );
            tracing::info!(
                name = "compliance.scheduler.sleeping",
                target = concat!(env!("CARGO_PKG_NAME"), "::", module_path!()),
                delay_seconds = delay.as_secs(),
                message = "Next compliance batch scheduled"
            );
            tokio::time::sleep(delay).await;

            let as_of = OffsetDateTime::now_utc().date();
            scheduler
                .run_now(
                    &store,
                    resources.mailer.as_ref(),
                    &resources.config,
                    &actor,
                    as_of,
                )
                .await;
        }
    })
}
