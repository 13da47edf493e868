use tracing::warn;

use super::QueueClient;
use crate::error::WorkerError;
use crate::state_machine::{Job, JobUpdate};

/// Reads the current job set from the queue. Never retries; the loop does.
pub struct JobSource<Q> {
    queue: Q,
}

impl<Q: QueueClient> JobSource<Q> {
    pub fn new(queue: Q) -> Self {
        Self { queue }
    }

    /// Fetch every queued job. An empty queue is `Ok(vec![])`.
    pub async fn fetch_pending(&self) -> Result<Vec<Job>, WorkerError> {
        match self.queue.get_all_jobs().await {
            Ok(jobs) => {
                if jobs.is_empty() {
                    warn!("no jobs in queue");
                }
                Ok(jobs)
            }
            Err(err @ WorkerError::QueueUnavailable(_)) => Err(err),
            Err(other) => Err(WorkerError::QueueUnavailable(other.to_string())),
        }
    }

    pub async fn write_back(&self, job_id: &str, update: &JobUpdate) -> Result<(), WorkerError> {
        self.queue.update_job(job_id, update).await
    }
}
