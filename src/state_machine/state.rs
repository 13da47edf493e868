use std::fmt;

use super::job::{JobStatus, JobUpdate};

/// Which of a job's two actions is being run in this cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Primary,
    Failover,
}

impl Phase {
    /// Jobs picked up in `failover` status run their failover action,
    /// everything else runs the primary one.
    pub fn for_status(status: JobStatus) -> Self {
        match status {
            JobStatus::Failover => Phase::Failover,
            _ => Phase::Primary,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Primary => write!(f, "primary"),
            Phase::Failover => write!(f, "failover"),
        }
    }
}

/// What happened when a job's action was executed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The target name did not resolve to a client.
    Unresolved(String),
    /// The job is in failover but carries no failover action.
    MissingAction,
    /// The target accepted the call.
    Delivered,
    /// The call failed; carries the message used as trace.
    Rejected(String),
    /// Unrecognized method, nothing was sent.
    Skipped,
}

/// Maps an execution outcome to the status written back to the queue.
pub struct StateMachine;

impl StateMachine {
    /// Compute the write-back for a job after one execution attempt.
    ///
    /// - Resolution failures crash the job in either phase.
    /// - Primary success finishes the job, primary failure routes it to
    ///   failover.
    /// - Failover success marks it `error`, failover failure crashes it.
    /// - A skipped dispatch writes nothing.
    pub fn next(phase: Phase, outcome: &Outcome) -> Option<JobUpdate> {
        let update = match (phase, outcome) {
            (_, Outcome::Skipped) => return None,
            (_, Outcome::Unresolved(target)) => {
                JobUpdate::with_trace(JobStatus::Crashed, format!("can´t resolve {target}"))
            }
            (_, Outcome::MissingAction) => {
                JobUpdate::with_trace(JobStatus::Crashed, "no failover action for job")
            }
            (Phase::Primary, Outcome::Delivered) => JobUpdate::new(JobStatus::Finished),
            (Phase::Primary, Outcome::Rejected(msg)) => {
                JobUpdate::with_trace(JobStatus::Failover, msg.clone())
            }
            (Phase::Failover, Outcome::Delivered) => JobUpdate::new(JobStatus::Error),
            (Phase::Failover, Outcome::Rejected(msg)) => {
                JobUpdate::with_trace(JobStatus::Crashed, msg.clone())
            }
        };
        Some(update)
    }
}
