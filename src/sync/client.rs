//! HTTP metadata client.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::{json, Value};
use std::time::Duration;

use super::ProfileMetadataClient;
use crate::domain::{DomainError, DomainResult};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Talks to `{base_url}/users/{user_id}/metadata` with whole-object GET/PUT.
pub struct HttpMetadataClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpMetadataClient {
    pub fn new(base_url: impl Into<String>) -> DomainResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| DomainError::Internal(format!("Failed to build http client: {}", e)))?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn metadata_url(&self, user_id: &str) -> String {
        format!("{}/users/{}/metadata", self.base_url, user_id)
    }
}

#[async_trait]
impl ProfileMetadataClient for HttpMetadataClient {
    async fn fetch(&self, user_id: &str) -> DomainResult<Value> {
        let response = self
            .http
            .get(self.metadata_url(user_id))
            .send()
            .await
            .map_err(|e| DomainError::Internal(format!("Metadata fetch failed: {}", e)))?;

        // Users who never synced have no metadata yet.
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(json!({}));
        }
        let response = response
            .error_for_status()
            .map_err(|e| DomainError::Internal(format!("Metadata fetch failed: {}", e)))?;
        response
            .json::<Value>()
            .await
            .map_err(|e| DomainError::Internal(format!("Metadata body unreadable: {}", e)))
    }

    async fn store(&self, user_id: &str, metadata: Value) -> DomainResult<()> {
        self.http
            .put(self.metadata_url(user_id))
            .json(&metadata)
            .send()
            .await
            .map_err(|e| DomainError::Internal(format!("Metadata store failed: {}", e)))?
            .error_for_status()
            .map_err(|e| DomainError::Internal(format!("Metadata store rejected: {}", e)))?;
        Ok(())
    }
}
