use std::sync::Arc;

use tokio::sync::Mutex;
use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};
use uuid::Uuid;

use crate::services::scoring_service::ScoringService;

/// Every minute
pub const DEFAULT_SCORING_CRON: &str = "0 * * * * *";

/// Runs the scoring cycle on a cron schedule
pub struct SchedulerService {
    scheduler: Arc<Mutex<JobScheduler>>,
    scoring: ScoringService,
    scoring_job: Mutex<Option<Uuid>>,
}

impl SchedulerService {
    pub async fn new(scoring: ScoringService) -> Result<Self, JobSchedulerError> {
        let scheduler = JobScheduler::new().await?;

        Ok(Self {
            scheduler: Arc::new(Mutex::new(scheduler)),
            scoring,
            scoring_job: Mutex::new(None),
        })
    }

    pub async fn start(&self) -> Result<(), JobSchedulerError> {
        let scheduler = self.scheduler.lock().await;
        scheduler.start().await?;

        tracing::info!("Scheduler service started");
        Ok(())
    }

    pub async fn stop(&self) -> Result<(), JobSchedulerError> {
        let mut scheduler = self.scheduler.lock().await;
        scheduler.shutdown().await?;

        tracing::info!("Scheduler service stopped");
        Ok(())
    }

    /// Replaces any previously scheduled scoring job
    pub async fn schedule_scoring(&self, cron_expr: &str) -> Result<Uuid, JobSchedulerError> {
        self.unschedule_scoring().await?;

        let scoring = self.scoring.clone();
        let job = Job::new_async(cron_expr, move |_uuid, _l| {
            let scoring = scoring.clone();

            Box::pin(async move {
                let result = scoring.run_scoring_cycle().await;
                if result.errors.is_empty() {
                    tracing::info!(
                        "Scoring cycle: {} games checked, {} matches scored",
                        result.games_checked,
                        result.matches_scored
                    );
                } else {
                    tracing::error!(
                        "Scoring cycle: {} games checked, {} matches scored, {} errors: {:?}",
                        result.games_checked,
                        result.matches_scored,
                        result.errors.len(),
                        result.errors
                    );
                }
            })
        })?;

        let job_id = job.guid();
        self.scheduler.lock().await.add(job).await?;
        *self.scoring_job.lock().await = Some(job_id);

        tracing::info!("Scheduled scoring cycle with cron '{}'", cron_expr);
        Ok(job_id)
    }

    pub async fn unschedule_scoring(&self) -> Result<(), JobSchedulerError> {
        let mut scoring_job = self.scoring_job.lock().await;

        if let Some(job_id) = scoring_job.take() {
            let scheduler = self.scheduler.lock().await;
            scheduler.remove(&job_id).await?;
            tracing::info!("Removed scoring job {}", job_id);
        }

        Ok(())
    }

    pub async fn scoring_job(&self) -> Option<Uuid> {
        *self.scoring_job.lock().await
    }
}
