//! National Weather Service API client
//!
//! Thin async wrapper over `api.weather.gov` (free, no API key, but the
//! usage policy requires an identifying `User-Agent`).
//!
//! # Usage
//!
//! ```rust,ignore
//! let client = NwsClient::new(NwsConfig::default())?;
//! if let Some(grid) = client.resolve_grid(40.7128, -74.0060).await? {
//!     let series = client.fetch_apparent_temperature(&grid).await?;
//! }
//! ```

pub mod types;

use reqwest::header::ACCEPT;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

pub use types::{
    AlertCollection, AlertFeature, AlertProperties, GridpointLayer, GridpointResponse,
    GridpointValue, PointResponse,
};

pub const DEFAULT_BASE_URL: &str = "https://api.weather.gov";
pub const DEFAULT_USER_AGENT: &str = "WeatherAlertSystem/1.0 (ops@example.com)";

#[derive(Error, Debug)]
pub enum NwsError {
    #[error("HTTP client setup failed: {0}")]
    Client(#[source] reqwest::Error),
    #[error("Request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("NWS returned {status} for {url}")]
    Status { url: String, status: StatusCode },
    #[error("Parse error for {url}: {source}")]
    Parse {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

pub type Result<T> = std::result::Result<T, NwsError>;

/// NWS client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NwsConfig {
    /// API root, without trailing slash
    pub base_url: String,
    /// Identification string sent as `User-Agent` on every call
    pub user_agent: String,
    /// Per-request timeout in seconds
    pub timeout_sec: u64,
}

impl Default for NwsConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_sec: 10,
        }
    }
}

/// api.weather.gov client with a pooled connection and fixed identification headers
#[derive(Debug, Clone)]
pub struct NwsClient {
    config: NwsConfig,
    client: reqwest::Client,
}

impl NwsClient {
    pub fn new(config: NwsConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.timeout_sec))
            .build()
            .map_err(NwsError::Client)?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &NwsConfig {
        &self.config
    }

    /// Build the `/points` URL for a coordinate (4 decimal places, as NWS
    /// redirects anything more precise)
    pub fn points_url(&self, lat: f64, lon: f64) -> String {
        format!(
            "{}/points/{:.4},{:.4}",
            self.config.base_url.trim_end_matches('/'),
            lat,
            lon
        )
    }

    pub fn active_alerts_url(&self) -> String {
        format!("{}/alerts/active", self.config.base_url.trim_end_matches('/'))
    }

    /// Resolve a coordinate to its forecast-grid dataset URL.
    ///
    /// `Ok(None)` means the point exists but has no grid (offshore, outside
    /// NWS coverage); that is not an error.
    pub async fn resolve_grid(&self, lat: f64, lon: f64) -> Result<Option<String>> {
        let url = self.points_url(lat, lon);
        let point: PointResponse = self.get_json(&url, "application/json").await?;
        Ok(point.properties.forecast_grid_data)
    }

    /// Fetch the apparent-temperature layer of a gridpoint dataset.
    /// A dataset without that layer yields an empty series.
    pub async fn fetch_apparent_temperature(&self, grid_url: &str) -> Result<Vec<GridpointValue>> {
        let grid: GridpointResponse = self.get_json(grid_url, "application/json").await?;

        let values = grid
            .properties
            .apparent_temperature
            .map(|layer| layer.values)
            .unwrap_or_default();

        debug!("Got {} apparent temperature values from {}", values.len(), grid_url);
        Ok(values)
    }

    /// Fetch every currently active alert
    pub async fn fetch_active_alerts(&self) -> Result<Vec<AlertFeature>> {
        let url = self.active_alerts_url();
        let collection: AlertCollection = self.get_json(&url, "application/geo+json").await?;
        debug!("Got {} active alerts", collection.features.len());
        Ok(collection.features)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str, accept: &str) -> Result<T> {
        debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .header(ACCEPT, accept)
            .send()
            .await
            .map_err(|source| NwsError::Request {
                url: url.to_string(),
                source,
            })?;

        if !response.status().is_success() {
            return Err(NwsError::Status {
                url: url.to_string(),
                status: response.status(),
            });
        }

        response.json().await.map_err(|source| NwsError::Parse {
            url: url.to_string(),
            source,
        })
    }
}
