//! The polling loop: fetch, select, process one job, back off when idle.
//!
//! Every job-level failure (unresolved target, rejected call) ends up as a
//! status write on the job. Only queue faults end an iteration early, and
//! those are retried after a fixed delay.

use std::future::Future;
use std::time::Duration;

use tokio::time::sleep;
use tracing::{error, info, warn};

use crate::config::WorkerConfig;
use crate::delay::IdleDelay;
use crate::dispatch::{ClientResolver, dispatch};
use crate::error::WorkerError;
use crate::queue::{JobSource, QueueClient, select_eligible};
use crate::state_machine::{Job, JobStatus, JobUpdate, Method, Outcome, Phase, StateMachine};

/// Timing and retry knobs for the loop.
#[derive(Debug, Clone)]
pub struct LoopPolicy {
    /// Upper bound on `attempts` for `crashed`/`failover` jobs.
    pub max_attempts: u32,
    /// Fixed wait after the queue could not be reached.
    pub queue_retry: Duration,
    /// Wait before a failover action is dispatched.
    pub failover_cooldown: Duration,
    /// Jittered wait when nothing is eligible.
    pub idle: IdleDelay,
}

impl Default for LoopPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            queue_retry: Duration::from_millis(1000),
            failover_cooldown: Duration::from_millis(1000),
            idle: IdleDelay::default(),
        }
    }
}

impl From<&WorkerConfig> for LoopPolicy {
    fn from(config: &WorkerConfig) -> Self {
        Self {
            max_attempts: config.max_attempts,
            queue_retry: Duration::from_millis(config.queue_retry_ms),
            failover_cooldown: Duration::from_millis(config.failover_cooldown_ms),
            idle: IdleDelay::from_millis(config.idle_delay_min_ms, config.idle_delay_max_ms),
        }
    }
}

/// What a single loop iteration did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tick {
    /// One job was processed; the loop goes again without waiting.
    Processed(String),
    /// Nothing eligible; slept for the drawn delay.
    Idle(Duration),
    /// The queue failed; slept for the fixed retry delay.
    QueueDown(Duration),
}

/// Single-consumer job loop over a queue and a target resolver.
pub struct JobWorker<Q, R> {
    source: JobSource<Q>,
    resolver: R,
    policy: LoopPolicy,
}

impl<Q: QueueClient, R: ClientResolver> JobWorker<Q, R> {
    pub fn new(queue: Q, resolver: R, policy: LoopPolicy) -> Self {
        Self {
            source: JobSource::new(queue),
            resolver,
            policy,
        }
    }

    pub fn policy(&self) -> &LoopPolicy {
        &self.policy
    }

    /// Loop until `shutdown` resolves. An in-flight sleep is interrupted;
    /// a job already marked `processing` stays that way.
    pub async fn run_until<F: Future<Output = ()>>(&self, shutdown: F) {
        tokio::pin!(shutdown);
        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("shutdown requested, stopping worker loop");
                    return;
                }
                _ = self.tick() => {}
            }
        }
    }

    /// One iteration: fetch, select, then process the first eligible job or
    /// back off.
    pub async fn tick(&self) -> Tick {
        info!("load jobs from queue");
        match self.poll().await {
            Ok(Some(job_id)) => {
                info!(job_id = %job_id, "get next job");
                Tick::Processed(job_id)
            }
            Ok(None) => {
                let delay = self.policy.idle.next();
                warn!(
                    delay_ms = delay.as_millis() as u64,
                    "no eligible jobs, checking again later"
                );
                sleep(delay).await;
                Tick::Idle(delay)
            }
            Err(err) => {
                let delay = self.policy.queue_retry;
                error!(error = %err, "queue call failed");
                warn!(
                    delay_ms = delay.as_millis() as u64,
                    "retry connection to queue service"
                );
                sleep(delay).await;
                Tick::QueueDown(delay)
            }
        }
    }

    async fn poll(&self) -> Result<Option<String>, WorkerError> {
        let jobs = self.source.fetch_pending().await?;
        let Some(job) = select_eligible(jobs, self.policy.max_attempts)
            .into_iter()
            .next()
        else {
            return Ok(None);
        };
        self.process(&job).await?;
        Ok(Some(job.id))
    }

    /// Mark the job `processing`, run the action its status calls for and
    /// write the resulting status back.
    pub async fn process(&self, job: &Job) -> Result<(), WorkerError> {
        self.write_status(&job.id, JobUpdate::new(JobStatus::Processing))
            .await?;

        let phase = Phase::for_status(job.status);
        info!(job_id = %job.id, %phase, attempts = job.attempts, "process job");

        let outcome = self.execute(job, phase).await;
        match StateMachine::next(phase, &outcome) {
            Some(update) => self.write_status(&job.id, update).await,
            None => Ok(()),
        }
    }

    async fn execute(&self, job: &Job, phase: Phase) -> Outcome {
        let action = match phase {
            Phase::Primary => &job.job,
            Phase::Failover => match &job.failover {
                Some(action) => action,
                None => {
                    error!(job_id = %job.id, "job is in failover but has no failover action");
                    return Outcome::MissingAction;
                }
            },
        };

        let Some(client) = self.resolve(&action.target).await else {
            error!(job_id = %job.id, service = %action.target, %phase, "can't resolve job target");
            return Outcome::Unresolved(action.target.clone());
        };

        if phase == Phase::Failover {
            info!(
                job_id = %job.id,
                cooldown_ms = self.policy.failover_cooldown.as_millis() as u64,
                "wait before failover dispatch"
            );
            sleep(self.policy.failover_cooldown).await;
        }

        let Some(method) = Method::parse(&action.method) else {
            warn!(
                job_id = %job.id,
                method = %action.method,
                "unrecognized method, leaving job as-is"
            );
            return Outcome::Skipped;
        };

        match dispatch(&client, method, action).await {
            Ok(()) => {
                info!(job_id = %job.id, %phase, %method, path = %action.path, "job successfully executed");
                Outcome::Delivered
            }
            Err(err) => {
                error!(
                    job_id = %job.id,
                    service = %action.target,
                    %phase,
                    %method,
                    path = %action.path,
                    error = %err,
                    "job failed"
                );
                Outcome::Rejected(err.to_string())
            }
        }
    }

    async fn resolve(&self, target: &str) -> Option<R::Client> {
        if target.trim().is_empty() {
            return None;
        }
        self.resolver.get_client(target).await
    }

    async fn write_status(&self, job_id: &str, update: JobUpdate) -> Result<(), WorkerError> {
        info!(job_id, status = %update.status, "update job");
        self.source.write_back(job_id, &update).await
    }
}
