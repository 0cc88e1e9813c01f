//! Background job scheduler.
//!
//! Initialises a [`JobScheduler`] at server startup and registers the
//! recurring facility refresh.

use std::sync::Arc;

use sedes_opendata::FacilityLoader;
use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};

use crate::cache::FacilityCache;

/// Builds and starts the background job scheduler.
///
/// Returns the running [`JobScheduler`] handle, which must be kept alive
/// for the lifetime of the process; dropping it shuts down all jobs.
///
/// # Errors
///
/// Returns [`JobSchedulerError`] if the scheduler cannot be initialised,
/// the cron expression is invalid, or the scheduler fails to start.
pub async fn build_scheduler(
    loader: Arc<FacilityLoader>,
    cache: FacilityCache,
    refresh_cron: &str,
) -> Result<JobScheduler, JobSchedulerError> {
    let scheduler = JobScheduler::new().await?;

    register_refresh_job(&scheduler, loader, cache, refresh_cron).await?;

    scheduler.start().await?;
    Ok(scheduler)
}

/// Register the facility refresh job (daily at 03:00 UTC by default).
async fn register_refresh_job(
    scheduler: &JobScheduler,
    loader: Arc<FacilityLoader>,
    cache: FacilityCache,
    refresh_cron: &str,
) -> Result<(), JobSchedulerError> {
    let job = Job::new_async(refresh_cron, move |_uuid, _lock| {
        let loader = Arc::clone(&loader);
        let cache = cache.clone();

        Box::pin(async move {
            tracing::info!("scheduler: refreshing facility snapshot");
            match cache.refresh(&loader).await {
                Ok(count) => tracing::info!(count, "scheduler: facility snapshot refreshed"),
                Err(e) => tracing::error!(
                    error = %e,
                    "scheduler: facility refresh failed; keeping previous snapshot"
                ),
            }
        })
    })?;

    scheduler.add(job).await?;
    Ok(())
}
