use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use super::QueueClient;
use crate::error::WorkerError;
use crate::state_machine::{Job, JobUpdate};

#[derive(Debug, Deserialize)]
struct JobsResponse {
    #[serde(default)]
    data: Vec<Value>,
}

/// Decode each queue record on its own. A malformed record is logged and
/// skipped so the valid ones still reach the worker.
fn decode_jobs(entries: Vec<Value>) -> Vec<Job> {
    entries
        .into_iter()
        .filter_map(|entry| {
            let record_id = entry
                .get("id")
                .or_else(|| entry.get("_id"))
                .map(Value::to_string)
                .unwrap_or_else(|| "<missing>".to_string());
            match serde_json::from_value::<Job>(entry) {
                Ok(job) => Some(job),
                Err(err) => {
                    warn!(record_id = %record_id, error = %err, "skipping malformed job record");
                    None
                }
            }
        })
        .collect()
}

/// Queue service client speaking JSON over HTTP.
pub struct HttpQueueClient {
    client: Client,
    base_url: String,
}

impl HttpQueueClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, WorkerError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn jobs_url(&self) -> String {
        format!("{}/queue", self.base_url)
    }

    fn job_url(&self, id: &str) -> String {
        format!("{}/queue/{id}", self.base_url)
    }
}

async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, WorkerError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response
        .text()
        .await
        .unwrap_or_else(|_| "unknown error".to_string());
    Err(WorkerError::QueueUnavailable(format!(
        "queue returned status {}: {message}",
        status.as_u16()
    )))
}

impl QueueClient for HttpQueueClient {
    async fn get_all_jobs(&self) -> Result<Vec<Job>, WorkerError> {
        let response = self.client.get(self.jobs_url()).send().await?;
        let body = ensure_success(response).await?.json::<JobsResponse>().await?;
        Ok(decode_jobs(body.data))
    }

    async fn update_job(&self, id: &str, update: &JobUpdate) -> Result<(), WorkerError> {
        let response = self.client.put(self.job_url(id)).json(update).send().await?;
        ensure_success(response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state_machine::JobStatus;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> HttpQueueClient {
        HttpQueueClient::new(server.uri(), Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn get_all_jobs_reads_data_envelope() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/queue"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{
                    "id": "a1",
                    "status": "scheduled",
                    "attempts": 0,
                    "job": { "target": "svc", "method": "POST", "path": "/x", "payload": { "body": {} } }
                }]
            })))
            .mount(&server)
            .await;

        let jobs = client_for(&server).get_all_jobs().await.unwrap();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].id, "a1");
        assert_eq!(jobs[0].status, JobStatus::Scheduled);
    }

    #[tokio::test]
    async fn malformed_record_does_not_hide_valid_jobs() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/queue"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [
                    {
                        "id": "bad",
                        "status": "queued",
                        "job": { "target": "svc", "method": "POST", "path": "/x" }
                    },
                    { "id": "no-path", "status": "scheduled", "job": { "method": "POST" } },
                    {
                        "id": "good",
                        "status": "scheduled",
                        "job": { "target": "svc", "method": "POST", "path": "/x" }
                    }
                ]
            })))
            .mount(&server)
            .await;

        let jobs = client_for(&server).get_all_jobs().await.unwrap();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].id, "good");
    }

    #[tokio::test]
    async fn get_all_jobs_empty_queue() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/queue"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
            .mount(&server)
            .await;

        let jobs = client_for(&server).get_all_jobs().await.unwrap();
        assert!(jobs.is_empty());
    }

    #[tokio::test]
    async fn server_error_is_queue_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/queue"))
            .respond_with(ResponseTemplate::new(503).set_body_string("down for maintenance"))
            .mount(&server)
            .await;

        let err = client_for(&server).get_all_jobs().await.unwrap_err();
        match err {
            WorkerError::QueueUnavailable(msg) => {
                assert_eq!(msg, "queue returned status 503: down for maintenance");
            }
            other => panic!("expected QueueUnavailable, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn update_job_puts_status_and_trace() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/queue/a1"))
            .and(body_json(json!({ "status": "failover", "trace": "timeout" })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        client_for(&server)
            .update_job("a1", &JobUpdate::with_trace(JobStatus::Failover, "timeout"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn unreachable_queue_is_an_error() {
        let client = HttpQueueClient::new("http://127.0.0.1:1", Duration::from_secs(1)).unwrap();
        assert!(client.get_all_jobs().await.is_err());
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let client = HttpQueueClient::new("http://queue:8080/", Duration::from_secs(1)).unwrap();
        assert_eq!(client.jobs_url(), "http://queue:8080/queue");
        assert_eq!(client.job_url("j9"), "http://queue:8080/queue/j9");
    }
}
