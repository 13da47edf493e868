use std::collections::HashMap;
use std::time::Duration;

use reqwest::Client;
use tracing::debug;

use super::{ClientResolver, TargetClient};
use crate::error::WorkerError;

/// Resolves target names against a fixed name → base URL table.
pub struct StaticResolver {
    client: Client,
    targets: HashMap<String, String>,
}

impl StaticResolver {
    pub fn new(targets: HashMap<String, String>, timeout: Duration) -> Result<Self, WorkerError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(timeout)
            .build()?;
        Ok(Self { client, targets })
    }

    pub fn target_count(&self) -> usize {
        self.targets.len()
    }
}

impl ClientResolver for StaticResolver {
    type Client = TargetClient;

    async fn get_client(&self, target: &str) -> Option<TargetClient> {
        let base_url = self.targets.get(target)?;
        if base_url.trim().is_empty() {
            return None;
        }
        debug!(service = target, base_url = %base_url, "resolved target");
        Some(TargetClient::new(self.client.clone(), base_url.clone()))
    }
}
