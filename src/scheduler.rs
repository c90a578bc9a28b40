use tokio_cron_scheduler::{Job, JobScheduler};

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info};

use crate::cache::HealthCheck;
use crate::error::AppResult;

pub struct Scheduler {
    scheduler: JobScheduler,
    health: Arc<dyn HealthCheck>, // capability checked by the jobs
}

pub enum JobProcess<'schedule> {
    InitialCacheCheck,
    WatchCacheHealth(&'schedule str),
}

impl Scheduler {
    pub async fn new(health: Arc<dyn HealthCheck>) -> AppResult<Self> {
        let scheduler = JobScheduler::new().await?;
        Ok(Scheduler { scheduler, health })
    }

    pub async fn add_job(&self, job_process: JobProcess<'_>) -> AppResult<uuid::Uuid> {
        let job = match job_process {
            JobProcess::InitialCacheCheck => initial_cache_check_job(self.health.clone())?,
            JobProcess::WatchCacheHealth(schedule) => {
                watch_cache_health_job(schedule, self.health.clone())?
            }
        };
        Ok(self.scheduler.add(job).await?)
    }

    pub async fn start(&self) -> AppResult<()> {
        Ok(self.scheduler.start().await?)
    }

    pub async fn shutdown(&mut self) -> AppResult<()> {
        Ok(self.scheduler.shutdown().await?)
    }
}

//////////////////
// Jobs definition
//////////////////

fn initial_cache_check_job(health: Arc<dyn HealthCheck>) -> AppResult<Job> {
    let job = Job::new_one_shot_async(Duration::from_secs(0), move |_uuid, _l| {
        let health = health.clone();
        Box::pin(async move {
            match health.check().await {
                true => info!("Leaderboard cache reachable at startup."),
                false => info!("Leaderboard cache not reachable at startup, serving uncached."),
            }
        })
    })?;
    Ok(job)
}

fn watch_cache_health_job(schedule: &str, health: Arc<dyn HealthCheck>) -> AppResult<Job> {
    let job = Job::new_async(schedule, move |uuid, mut l| {
        let health = health.clone();
        Box::pin(async move {
            let available = health.check().await;
            debug!(available, "Leaderboard cache health checked.");

            // Query the next execution time for this job
            let next_tick = l.next_tick_for_job(uuid).await;
            match next_tick {
                Ok(Some(ts)) => debug!("Next cache health check at {:?}", ts),
                _ => error!("Could not get next tick for cache health job"),
            }
        })
    })?;
    Ok(job)
}
