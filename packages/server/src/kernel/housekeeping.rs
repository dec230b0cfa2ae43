//! Scheduled reaping of expired verification challenges.
//!
//! Challenges are also deleted lazily when a verify or completion finds them
//! expired; this task removes the ones nobody came back for.

use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::kernel::{BaseChallengeStore, BaseClock};

/// Start the reaper. Returns `None` when `interval` is zero (disabled).
pub async fn start_challenge_reaper(
    challenges: Arc<dyn BaseChallengeStore>,
    clock: Arc<dyn BaseClock>,
    interval: Duration,
) -> Result<Option<JobScheduler>> {
    if interval.is_zero() {
        tracing::info!("Challenge reaper disabled");
        return Ok(None);
    }

    let scheduler = JobScheduler::new().await?;

    let reap_job = Job::new_repeated_async(interval, move |_uuid, _lock| {
        let challenges = challenges.clone();
        let clock = clock.clone();
        Box::pin(async move {
            if let Err(e) = reap_expired_challenges(challenges.as_ref(), clock.as_ref()).await {
                tracing::error!("Challenge reaper failed: {}", e);
            }
        })
    })?;

    scheduler.add(reap_job).await?;
    scheduler.start().await?;

    tracing::info!(interval_secs = interval.as_secs(), "Challenge reaper started");
    Ok(Some(scheduler))
}

/// Delete every challenge past its expiry; returns how many went.
pub async fn reap_expired_challenges(
    challenges: &dyn BaseChallengeStore,
    clock: &dyn BaseClock,
) -> Result<u64> {
    let removed = challenges.delete_expired(clock.now()).await?;
    if removed > 0 {
        tracing::info!(removed, "Reaped expired verification challenges");
    }
    Ok(removed)
}
