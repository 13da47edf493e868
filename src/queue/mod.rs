pub mod client;
pub mod selector;
pub mod source;

pub use client::HttpQueueClient;
pub use selector::{is_eligible, select_eligible};
pub use source::JobSource;

use crate::error::WorkerError;
use crate::state_machine::{Job, JobUpdate};

/// Access to the shared job queue. The queue service owns persistence,
/// attempt counting and claim semantics.
pub trait QueueClient {
    /// Every job currently held by the queue, in queue order.
    async fn get_all_jobs(&self) -> Result<Vec<Job>, WorkerError>;

    async fn update_job(&self, id: &str, update: &JobUpdate) -> Result<(), WorkerError>;
}
