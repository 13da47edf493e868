use reqwest::{Client, RequestBuilder};
use serde_json::Value;

use super::HttpClient;
use crate::error::DispatchError;

/// reqwest-backed client for one target's base URL.
#[derive(Debug, Clone)]
pub struct TargetClient {
    client: Client,
    base_url: String,
}

impl TargetClient {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    #[cfg(test)]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{path}", self.base_url)
        } else {
            format!("{}/{path}", self.base_url)
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<(), DispatchError> {
        let response = request.send().await.map_err(|err| {
            if err.is_timeout() {
                DispatchError::Rejected("timeout".to_string())
            } else {
                DispatchError::Network(err)
            }
        })?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "unknown error".to_string());
        Err(DispatchError::Status {
            status: status.as_u16(),
            message,
        })
    }
}

impl HttpClient for TargetClient {
    async fn post(&self, path: &str, body: &Value) -> Result<(), DispatchError> {
        self.send(self.client.post(self.url(path)).json(body)).await
    }

    async fn put(&self, path: &str, body: &Value) -> Result<(), DispatchError> {
        self.send(self.client.put(self.url(path)).json(body)).await
    }

    async fn delete(&self, path: &str) -> Result<(), DispatchError> {
        self.send(self.client.delete(self.url(path))).await
    }
}
