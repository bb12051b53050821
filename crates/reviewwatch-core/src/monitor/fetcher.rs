//! Review API client

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::{debug, error};
use url::Url;

use crate::config::ApiConfig;
use crate::error::{Error, Result};

/// Source of homework status payloads
#[async_trait]
pub trait StatusSource: Send + Sync {
    /// Fetch the raw payload of status changes since `cursor`
    async fn fetch(&self, cursor: i64) -> Result<Value>;
}

/// HTTP client for the homework status endpoint
pub struct ReviewApiClient {
    client: Client,
    endpoint: Url,
    token: String,
}

impl ReviewApiClient {
    /// Create a new client
    pub fn new(config: &ApiConfig, token: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| Error::config(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            token: token.into(),
        })
    }

    /// Endpoint this client queries
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl StatusSource for ReviewApiClient {
    async fn fetch(&self, cursor: i64) -> Result<Value> {
        debug!(endpoint = %self.endpoint, from_date = cursor, "Requesting homework statuses");

        let response = self
            .client
            .get(self.endpoint.clone())
            .header(AUTHORIZATION, format!("OAuth {}", self.token))
            .query(&[("from_date", cursor)])
            .send()
            .await
            .map_err(|e| {
                error!(endpoint = %self.endpoint, error = %e, "Request to status endpoint failed");
                Error::endpoint_transport(self.endpoint.as_str(), e)
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            error!(endpoint = %self.endpoint, status = status.as_u16(), "Status endpoint unavailable");
            return Err(Error::endpoint_status(self.endpoint.as_str(), status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| Error::endpoint_transport(self.endpoint.as_str(), e))?;

        serde_json::from_slice(&body).map_err(|e| {
            error!(error = %e, "Status endpoint returned invalid JSON");
            Error::MalformedResponse(e.to_string())
        })
    }
}
