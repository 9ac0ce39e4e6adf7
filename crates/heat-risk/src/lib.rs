//! Heat Risk Sampling
//!
//! Estimates nationwide heat risk by sampling the NWS apparent-temperature
//! forecast at a fixed catalog of probe points:
//! - Probe catalog (built-in metro list or JSON file)
//! - Two-step grid lookup per point (`SeriesSource`)
//! - Batched, rate-limited, fault-isolated aggregation
//! - 0-4 level classification and map zones

use thiserror::Error;

pub mod aggregator;
pub mod catalog;
pub mod classifier;
pub mod series;
pub mod source;
pub mod zones;

pub use aggregator::{
    Aggregation, AggregationReport, AggregationResult, Aggregator, AggregatorConfig,
    ClassifiedPoint, PointOutcome,
};
pub use catalog::{load_catalog, major_cities, ProbePoint};
pub use classifier::{classify, LevelInfo, RiskLevel, LEVELS};
pub use series::{Sample, SampleSeries};
pub use source::{GridReference, SeriesSource};
pub use zones::{zones_from_points, HeatZone};

#[derive(Error, Debug)]
pub enum HeatRiskError {
    #[error("Upstream error: {0}")]
    Upstream(#[from] nws_client::NwsError),
    #[error("Lookup failed: {0}")]
    Lookup(String),
    #[error("Invalid aggregator configuration: {0}")]
    InvalidConfig(String),
    #[error("Probe catalog {0} has no usable points")]
    EmptyCatalog(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, HeatRiskError>;
