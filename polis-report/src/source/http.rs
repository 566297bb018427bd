//! HTTP report source
//!
//! Plain `GET` against the backend API with the configured timeouts. No
//! retries: a failed request surfaces as a [`FetchError`] and fails the build.

use super::{Endpoint, FetchError, ReportSource};
use async_trait::async_trait;
use polis_common::config::ReportConfig;
use reqwest::Client;
use serde_json::Value;

/// Backend API client
pub struct HttpSource {
    client: Client,
    base_url: String,
}

impl HttpSource {
    pub fn new(config: &ReportConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.request_timeout())
            .connect_timeout(config.connect_timeout())
            .build()
            .map_err(|e| FetchError::Network(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl ReportSource for HttpSource {
    async fn fetch(
        &self,
        endpoint: Endpoint,
        params: &[(&'static str, String)],
    ) -> Result<Value, FetchError> {
        let url = format!("{}{}", self.base_url, endpoint.path());

        tracing::debug!(endpoint = %endpoint, url = %url, "Fetching report document");

        let response = self
            .client
            .get(&url)
            .query(params)
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound(url));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let document: Value = response
            .json()
            .await
            .map_err(|e| FetchError::Parse(e.to_string()))?;

        tracing::debug!(endpoint = %endpoint, "Fetched report document");

        Ok(document)
    }
}
