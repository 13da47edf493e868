use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Lifecycle status of a queued job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Scheduled,
    Processing,
    Finished,
    Crashed,
    Failover,
    /// Delivered through the failover action. Kept apart from `Finished` so
    /// the queue still shows that the primary path failed.
    Error,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Scheduled => "scheduled",
            JobStatus::Processing => "processing",
            JobStatus::Finished => "finished",
            JobStatus::Crashed => "crashed",
            JobStatus::Failover => "failover",
            JobStatus::Error => "error",
        }
    }

    /// Statuses this worker never picks up again.
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Finished | JobStatus::Error)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// HTTP verbs the worker knows how to dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Post,
    Put,
    Delete,
}

impl Method {
    /// Parses the wire value. Anything else is left to the caller to skip.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "POST" => Some(Method::Post),
            "PUT" => Some(Method::Put),
            "DELETE" => Some(Method::Delete),
            _ => None,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Post => write!(f, "POST"),
            Method::Put => write!(f, "PUT"),
            Method::Delete => write!(f, "DELETE"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Payload {
    #[serde(default)]
    pub body: Value,
}

/// One outbound call: where it goes and what it carries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    /// Logical service name, resolved at dispatch time.
    #[serde(default)]
    pub target: String,
    /// Raw method string as stored in the queue.
    pub method: String,
    pub path: String,
    #[serde(default)]
    pub payload: Payload,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace: Option<String>,
}

impl Action {
    pub fn body(&self) -> &Value {
        &self.payload.body
    }
}

/// A queued unit of work as the queue service reports it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "JobRecord")]
pub struct Job {
    pub id: String,
    pub status: JobStatus,
    /// Owned by the queue service; only read here.
    pub attempts: u32,
    pub job: Action,
    pub failover: Option<Action>,
}

/// Wire shape of a job. Records may carry `id`, `_id`, or both.
#[derive(Deserialize)]
struct JobRecord {
    #[serde(default)]
    id: Option<String>,
    #[serde(default, rename = "_id")]
    legacy_id: Option<String>,
    status: JobStatus,
    #[serde(default)]
    attempts: u32,
    job: Action,
    #[serde(default)]
    failover: Option<Action>,
}

impl TryFrom<JobRecord> for Job {
    type Error = String;

    fn try_from(record: JobRecord) -> Result<Self, Self::Error> {
        let id = record
            .id
            .or(record.legacy_id)
            .ok_or_else(|| "job record has neither `id` nor `_id`".to_string())?;
        Ok(Self {
            id,
            status: record.status,
            attempts: record.attempts,
            job: record.job,
            failover: record.failover,
        })
    }
}

/// Status write-back sent to the queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobUpdate {
    pub status: JobStatus,
    pub trace: String,
}

impl JobUpdate {
    pub fn new(status: JobStatus) -> Self {
        Self {
            status,
            trace: String::new(),
        }
    }

    pub fn with_trace(status: JobStatus, trace: impl Into<String>) -> Self {
        Self {
            status,
            trace: trace.into(),
        }
    }
}
