//! Imagery reduction provider
//!
//! The provider reduces a satellite index over a parcel polygon and a date
//! range to one scalar. Raster access and authentication live on the
//! provider side; this module only defines the query contract and an HTTP
//! client for a reduction service.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use shared::{DateRange, ParcelGeometry};
use thiserror::Error;

use crate::config::ImageryConfig;
use crate::error::{AppError, AppResult};

/// Index reduced by the provider
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum IndexKind {
    /// Sentinel-2 normalized difference of B8 and B4
    Ndvi,
    /// Sentinel-1 VV polarisation backscatter in dB
    VvBackscatter,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Reducer {
    Mean,
}

/// One reduction request
#[derive(Debug, Clone, Serialize)]
pub struct ReducedScalarQuery {
    pub geometry: ParcelGeometry,
    pub range: DateRange,
    pub index: IndexKind,
    pub reducer: Reducer,
    pub scale_m: u32,
}

/// Provider failures; all of them are handled the same way by callers
#[derive(Debug, Error)]
pub enum ImageryError {
    #[error("network error: {0}")]
    Network(String),

    #[error("authentication failed: {0}")]
    Unauthorized(String),

    #[error("bad response: {0}")]
    BadResponse(String),

    #[error("parse error: {0}")]
    Parse(String),
}

#[async_trait]
pub trait ImageryProvider: Send + Sync {
    /// Reduce one index over the query window.
    ///
    /// `Ok(None)` means the window has no usable pixels.
    async fn query_reduced_scalar(
        &self,
        query: &ReducedScalarQuery,
    ) -> Result<Option<f64>, ImageryError>;
}

/// HTTP client for the imagery reduction service
#[derive(Clone)]
pub struct HttpImageryClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
}

/// Reduction service response
#[derive(Debug, Deserialize)]
struct ReduceResponse {
    value: Option<f64>,
}

impl HttpImageryClient {
    /// Create a new client against `base_url`
    pub fn new(base_url: String, api_key: Option<String>, timeout: Duration) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Create a client from configuration, `None` when no endpoint is set
    pub fn from_config(config: &ImageryConfig) -> AppResult<Option<Self>> {
        match config.endpoint.as_deref() {
            Some(endpoint) if !endpoint.trim().is_empty() => Self::new(
                endpoint.to_string(),
                config.api_key.clone(),
                Duration::from_secs(config.timeout_secs),
            )
            .map(Some),
            _ => Ok(None),
        }
    }
}

#[async_trait]
impl ImageryProvider for HttpImageryClient {
    async fn query_reduced_scalar(
        &self,
        query: &ReducedScalarQuery,
    ) -> Result<Option<f64>, ImageryError> {
        let url = format!("{}/reduce", self.base_url);

        let mut request = self.client.post(&url).json(query);
        if let Some(key) = &self.api_key {
            request = request.header("x-api-key", key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ImageryError::Network(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(ImageryError::Unauthorized(status.to_string()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ImageryError::BadResponse(format!("{} - {}", status, body)));
        }

        let data: ReduceResponse = response
            .json()
            .await
            .map_err(|e| ImageryError::Parse(e.to_string()))?;

        Ok(data.value)
    }
}
