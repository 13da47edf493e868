mod job;
mod state;

pub use job::{Action, Job, JobStatus, JobUpdate, Method};
#[cfg(test)]
pub use job::Payload;
pub use state::{Outcome, Phase, StateMachine};
