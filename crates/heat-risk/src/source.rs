//! Upstream grid lookups
//!
//! The aggregator only needs two remote reads per probe point, so the
//! upstream is modelled as a small trait. `NwsClient` is the production
//! implementation; tests plug in scripted sources.

use crate::catalog::ProbePoint;
use crate::series::{self, SampleSeries};
use crate::Result;
use nws_client::NwsClient;
use std::future::Future;

/// Opaque upstream locator for one point's forecast-grid dataset.
/// Resolved fresh on every pass, never cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridReference(pub String);

impl GridReference {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Two-step point → grid → series lookup
pub trait SeriesSource: Send + Sync {
    /// Resolve a probe point to its grid dataset. `Ok(None)` means the
    /// upstream has no grid for this point.
    fn resolve(
        &self,
        point: &ProbePoint,
    ) -> impl Future<Output = Result<Option<GridReference>>> + Send;

    /// Fetch the full sample series of a grid dataset
    fn fetch_series(&self, grid: &GridReference) -> impl Future<Output = Result<SampleSeries>> + Send;
}

impl SeriesSource for NwsClient {
    async fn resolve(&self, point: &ProbePoint) -> Result<Option<GridReference>> {
        let grid = self.resolve_grid(point.latitude, point.longitude).await?;
        Ok(grid.map(GridReference))
    }

    async fn fetch_series(&self, grid: &GridReference) -> Result<SampleSeries> {
        let values = self.fetch_apparent_temperature(grid.as_str()).await?;
        Ok(series::from_gridpoint_values(values))
    }
}
