use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

use crate::config::FeederConfig;
use crate::feeder::FeederError;
use crate::payload::{AlertCreate, ErrorCreate, HealthReportCreate, SensorDataCreate};

/// HTTP client for the ingestion endpoints.
pub struct BackendClient {
    http_client: Client,
    base_url: String,
}

impl BackendClient {
    /// # Errors
    ///
    /// Returns `FeederError::Client` if the HTTP client cannot be built.
    pub fn new(config: &FeederConfig) -> Result<Self, FeederError> {
        // A zero timeout would fail every request
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds.max(1)))
            .build()
            .map_err(FeederError::Client)?;

        Ok(Self {
            http_client,
            base_url: config.backend_url.clone(),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// # Errors
    ///
    /// Returns `FeederError` if the request fails or is not accepted.
    pub async fn send_data(&self, payload: &SensorDataCreate) -> Result<(), FeederError> {
        self.post("/api/data/", payload).await
    }

    /// # Errors
    ///
    /// Returns `FeederError` if the request fails or is not accepted.
    pub async fn send_health(&self, payload: &HealthReportCreate) -> Result<(), FeederError> {
        self.post("/api/health/", payload).await
    }

    /// # Errors
    ///
    /// Returns `FeederError` if the request fails or is not accepted.
    pub async fn send_alert(&self, payload: &AlertCreate) -> Result<(), FeederError> {
        self.post("/api/alerts/", payload).await
    }

    /// # Errors
    ///
    /// Returns `FeederError` if the request fails or is not accepted.
    pub async fn send_error(&self, payload: &ErrorCreate) -> Result<(), FeederError> {
        self.post("/api/errors/", payload).await
    }

    async fn post<T: Serialize>(&self, path: &'static str, payload: &T) -> Result<(), FeederError> {
        let url = format!("{}{path}", self.base_url);

        let response = self
            .http_client
            .post(&url)
            .json(payload)
            .send()
            .await
            .map_err(|source| FeederError::Request { path, source })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeederError::Rejected {
                path,
                status,
                body: response.text().await.unwrap_or_default(),
            });
        }

        Ok(())
    }
}
