//! Polling worker.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chatpilot_flow::ChatReply;
use tokio::sync::broadcast;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use crate::config::WorkerConfig;
use crate::job::{Job, JobStatus};
use crate::store::JobStore;

#[cfg(test)]
#[path = "worker_tests.rs"]
mod tests;

/// Executes one claimed job. The production executor drives a browser flow;
/// tests plug in stubs.
#[async_trait]
pub trait JobExecutor: Send + Sync {
    /// Run the job to a reply. The error string becomes the job's recorded
    /// failure.
    async fn execute(&self, job: &Job) -> Result<ChatReply, String>;
}

/// Pulls jobs from a [`JobStore`] until told to shut down.
///
/// One job per poll tick. Shutdown is only observed between jobs, so a
/// mid-flight execution always finishes and records its outcome. Store and
/// executor hiccups are logged and the loop keeps polling.
pub struct Worker {
    store: JobStore,
    executor: Arc<dyn JobExecutor>,
    config: WorkerConfig,
}

impl Worker {
    pub fn new(store: JobStore, executor: Arc<dyn JobExecutor>, config: WorkerConfig) -> Self {
        Self {
            store,
            executor,
            config,
        }
    }

    /// Poll until a shutdown signal arrives.
    pub async fn run(&self, mut shutdown: broadcast::Receiver<()>) {
        let poll = Duration::from_secs(self.config.poll_interval_secs);
        let cleanup_every = Duration::from_secs(self.config.cleanup_interval_secs.max(1));
        let mut last_cleanup = Instant::now();

        info!(
            poll_secs = self.config.poll_interval_secs,
            "Worker started"
        );

        loop {
            match self.store.claim_next().await {
                Ok(Some(job)) => self.process(job).await,
                Ok(None) => {}
                Err(e) => error!(error = %e, "Failed to claim next job"),
            }

            if last_cleanup.elapsed() >= cleanup_every {
                match self.store.cleanup(self.config.retain_days).await {
                    Ok(deleted) if deleted > 0 => {
                        info!(deleted, "Pruned old terminal jobs")
                    }
                    Ok(_) => {}
                    Err(e) => warn!(error = %e, "Retention sweep failed"),
                }
                last_cleanup = Instant::now();
            }

            tokio::select! {
                _ = shutdown.recv() => {
                    info!("Worker shutting down");
                    break;
                }
                _ = tokio::time::sleep(poll) => {}
            }
        }
    }

    async fn process(&self, job: Job) {
        info!(
            id = %job.id,
            provider = %job.provider,
            attempt = job.attempts,
            "Executing job"
        );

        match self.executor.execute(&job).await {
            Ok(reply) => self.record_success(&job, reply).await,
            Err(message) => self.record_failure(&job, &message).await,
        }
    }

    async fn record_success(&self, job: &Job, reply: ChatReply) {
        let result = match serde_json::to_string(&reply) {
            Ok(result) => result,
            Err(e) => {
                self.record_failure(job, &format!("Reply serialization failed: {e}"))
                    .await;
                return;
            }
        };

        if let Err(e) = self.store.complete(&job.id, &result).await {
            error!(id = %job.id, error = %e, "Failed to record job completion");
            return;
        }
        info!(id = %job.id, "Job completed");

        if self.config.remove_attachments {
            if let Some(path) = &job.attachment {
                match tokio::fs::remove_file(path).await {
                    Ok(()) => debug!(path = %path.display(), "Removed job attachment"),
                    Err(e) => {
                        warn!(path = %path.display(), error = %e, "Could not remove attachment")
                    }
                }
            }
        }
    }

    async fn record_failure(&self, job: &Job, message: &str) {
        match self.store.fail(&job.id, message).await {
            Ok(JobStatus::Pending) => {
                warn!(
                    id = %job.id,
                    attempt = job.attempts,
                    max_attempts = job.max_attempts,
                    error = message,
                    "Job failed, re-queued"
                );
            }
            Ok(_) => {
                warn!(id = %job.id, error = message, "Job failed permanently");
            }
            Err(e) => {
                error!(id = %job.id, error = %e, "Failed to record job failure");
            }
        }
    }
}
