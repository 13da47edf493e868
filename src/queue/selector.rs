use crate::state_machine::{Job, JobStatus};

/// Whether a job may run in the current cycle.
///
/// `scheduled` jobs always qualify; `crashed` and `failover` jobs qualify
/// while `attempts` stays within `max_attempts`.
pub fn is_eligible(job: &Job, max_attempts: u32) -> bool {
    match job.status {
        JobStatus::Scheduled => true,
        JobStatus::Crashed | JobStatus::Failover => job.attempts <= max_attempts,
        _ => false,
    }
}

/// Stable filter over the fetched jobs, keeping queue order.
pub fn select_eligible(jobs: Vec<Job>, max_attempts: u32) -> Vec<Job> {
    jobs.into_iter()
        .filter(|job| is_eligible(job, max_attempts))
        .collect()
}
