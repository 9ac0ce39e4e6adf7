//! Response shapes for the api.weather.gov endpoints we read.
//!
//! Only the fields the gateway uses are modelled; everything else in the
//! GeoJSON payloads is ignored by serde.

use serde::{Deserialize, Serialize};

/// `/points/{lat},{lon}` response
#[derive(Debug, Deserialize)]
pub struct PointResponse {
    pub properties: PointProperties,
}

#[derive(Debug, Deserialize)]
pub struct PointProperties {
    /// Absolute URL of the raw gridpoint dataset for this point
    #[serde(rename = "forecastGridData", default)]
    pub forecast_grid_data: Option<String>,
    #[serde(rename = "gridId", default)]
    pub grid_id: Option<String>,
    #[serde(rename = "gridX", default)]
    pub grid_x: Option<u32>,
    #[serde(rename = "gridY", default)]
    pub grid_y: Option<u32>,
}

/// Raw gridpoint data from `/gridpoints/{wfo}/{x},{y}`
#[derive(Debug, Deserialize)]
pub struct GridpointResponse {
    pub properties: GridpointProperties,
}

#[derive(Debug, Deserialize)]
pub struct GridpointProperties {
    #[serde(rename = "apparentTemperature", default)]
    pub apparent_temperature: Option<GridpointLayer>,
    #[serde(rename = "heatIndex", default)]
    pub heat_index: Option<GridpointLayer>,
}

#[derive(Debug, Deserialize)]
pub struct GridpointLayer {
    #[serde(default)]
    pub uom: String,
    #[serde(default)]
    pub values: Vec<GridpointValue>,
}

/// One time-series entry. `valid_time` is an ISO-8601 interval such as
/// `2025-07-01T14:00:00+00:00/PT1H`.
#[derive(Debug, Clone, Deserialize)]
pub struct GridpointValue {
    #[serde(rename = "validTime")]
    pub valid_time: String,
    pub value: Option<f64>,
}

/// `/alerts/active` FeatureCollection
#[derive(Debug, Deserialize)]
pub struct AlertCollection {
    #[serde(default)]
    pub features: Vec<AlertFeature>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AlertFeature {
    pub id: String,
    pub properties: AlertProperties,
    /// GeoJSON geometry, kept raw so callers decide how to interpret it
    #[serde(default)]
    pub geometry: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AlertProperties {
    pub event: String,
    pub area_desc: String,
    pub severity: String,
    pub certainty: String,
    pub urgency: String,
    pub headline: Option<String>,
    pub description: String,
    pub instruction: Option<String>,
    pub sent: Option<String>,
    pub effective: Option<String>,
    pub expires: Option<String>,
    pub status: Option<String>,
    pub message_type: Option<String>,
    pub category: Option<String>,
}
