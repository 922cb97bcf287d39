//! Scheduled background tasks using tokio-cron-scheduler.
//!
//! Tasks run independently of request traffic:
//! - Expired cache sweep (default every 6 hours)

use std::sync::Arc;

use anyhow::Result;
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::domains::fetch::FetchEngine;

/// Start all scheduled tasks
pub async fn start_scheduler(engine: Arc<FetchEngine>, sweep_cron: &str) -> Result<JobScheduler> {
    let scheduler = JobScheduler::new().await?;

    let sweep_engine = engine.clone();
    let sweep_job = Job::new_async(sweep_cron, move |_uuid, _lock| {
        let engine = sweep_engine.clone();
        Box::pin(async move {
            let cleared = engine.clear_expired_cache();
            tracing::info!(cleared, "Periodic cache sweep complete");
        })
    })?;

    scheduler.add(sweep_job).await?;
    scheduler.start().await?;

    tracing::info!(schedule = sweep_cron, "Scheduled tasks started (cache sweep)");
    Ok(scheduler)
}
