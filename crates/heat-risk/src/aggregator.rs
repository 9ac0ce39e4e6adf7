//! Batched Heat Risk Aggregator
//!
//! Samples every probe point in fixed-size batches:
//!
//! ```text
//! catalog ──chunks(batch_size)──▶ [batch 0] ─join_all─▶ pause ─▶ [batch 1] ─▶ ...
//!                                     │
//!                                     ├─ resolve point → grid reference
//!                                     ├─ fetch series
//!                                     └─ filter by date → classify first → append
//! ```
//!
//! Points inside a batch run concurrently and are fault-isolated: a failed
//! lookup is logged and the point is left out. Batches run strictly one
//! after another with a fixed pause to stay under upstream rate limits.

use crate::catalog::{dedupe_by_name, ProbePoint};
use crate::classifier::{classify, RiskLevel};
use crate::series;
use crate::source::SeriesSource;
use crate::{HeatRiskError, Result};
use chrono::NaiveDate;
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

pub const DEFAULT_BATCH_SIZE: usize = 10;
pub const DEFAULT_BATCH_DELAY_MS: u64 = 150;

/// Batching policy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregatorConfig {
    /// Points dispatched concurrently per batch
    pub batch_size: usize,
    /// Pause between consecutive batches
    pub batch_delay: Duration,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            batch_delay: Duration::from_millis(DEFAULT_BATCH_DELAY_MS),
        }
    }
}

/// A probe point with its classified risk level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedPoint {
    pub latitude: f64,
    pub longitude: f64,
    pub value: RiskLevel,
    pub region: String,
}

/// Points gathered in one pass, in completion order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AggregationResult {
    pub points: Vec<ClassifiedPoint>,
}

/// What happened to a single probe point
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointOutcome {
    Classified,
    /// No grid for the point, or nothing left after date filtering
    NoData,
    Failed,
}

/// Per-pass counters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AggregationReport {
    pub catalog_size: usize,
    pub batches: usize,
    pub classified: usize,
    pub no_data: usize,
    pub failed: usize,
    pub elapsed_ms: u64,
}

impl AggregationReport {
    fn record(&mut self, outcome: PointOutcome) {
        match outcome {
            PointOutcome::Classified => self.classified += 1,
            PointOutcome::NoData => self.no_data += 1,
            PointOutcome::Failed => self.failed += 1,
        }
    }
}

/// Result plus its report
#[derive(Debug, Clone)]
pub struct Aggregation {
    pub result: AggregationResult,
    pub report: AggregationReport,
}

/// Runs aggregation passes against a series source
pub struct Aggregator<S> {
    source: S,
    config: AggregatorConfig,
}

impl<S: SeriesSource> Aggregator<S> {
    pub fn new(source: S, config: AggregatorConfig) -> Self {
        Self { source, config }
    }

    pub fn config(&self) -> &AggregatorConfig {
        &self.config
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Sample the whole catalog once. Per-point failures never fail the
    /// pass; only an unusable configuration does.
    pub async fn run(&self, catalog: &[ProbePoint], date: Option<NaiveDate>) -> Result<Aggregation> {
        if self.config.batch_size == 0 {
            return Err(HeatRiskError::InvalidConfig(
                "batch_size must be at least 1".to_string(),
            ));
        }

        let started = Instant::now();
        let target = date.map(|d| d.format("%Y-%m-%d").to_string());
        let points = dedupe_by_name(catalog.to_vec());

        let collected = Mutex::new(Vec::with_capacity(points.len()));
        let mut report = AggregationReport {
            catalog_size: points.len(),
            ..AggregationReport::default()
        };

        for (index, batch) in points.chunks(self.config.batch_size).enumerate() {
            if index > 0 && !self.config.batch_delay.is_zero() {
                tokio::time::sleep(self.config.batch_delay).await;
            }

            debug!("Dispatching heat risk batch {} ({} points)", index, batch.len());

            let outcomes = join_all(
                batch
                    .iter()
                    .map(|point| self.sample_point(point, target.as_deref(), &collected)),
            )
            .await;

            for outcome in outcomes {
                report.record(outcome);
            }
            report.batches += 1;
        }

        let points = collected.into_inner();
        report.elapsed_ms = started.elapsed().as_millis() as u64;

        if points.is_empty() {
            warn!(
                "No heat risk points collected ({} probes, {} failed, {} without data)",
                report.catalog_size, report.failed, report.no_data
            );
        } else {
            info!(
                "Collected {}/{} heat risk points in {} batches ({} failed, {} without data, {} ms)",
                points.len(),
                report.catalog_size,
                report.batches,
                report.failed,
                report.no_data,
                report.elapsed_ms
            );
        }

        Ok(Aggregation {
            result: AggregationResult { points },
            report,
        })
    }

    async fn sample_point(
        &self,
        point: &ProbePoint,
        date: Option<&str>,
        collected: &Mutex<Vec<ClassifiedPoint>>,
    ) -> PointOutcome {
        let grid = match self.source.resolve(point).await {
            Ok(Some(grid)) => grid,
            Ok(None) => {
                debug!("No forecast grid for {}", point.name);
                return PointOutcome::NoData;
            }
            Err(e) => {
                warn!("Error resolving grid for {}: {}", point.name, e);
                return PointOutcome::Failed;
            }
        };

        let samples = match self.source.fetch_series(&grid).await {
            Ok(samples) => samples,
            Err(e) => {
                warn!("Error fetching series for {} ({}): {}", point.name, grid.as_str(), e);
                return PointOutcome::Failed;
            }
        };

        let Some(sample) = series::first_for_date(&samples, date) else {
            debug!("No samples for {} on {:?}", point.name, date);
            return PointOutcome::NoData;
        };

        collected.lock().await.push(ClassifiedPoint {
            latitude: point.latitude,
            longitude: point.longitude,
            value: classify(sample.value),
            region: point.name.clone(),
        });

        PointOutcome::Classified
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::{Sample, SampleSeries};
    use crate::source::GridReference;
    use std::collections::{HashMap, HashSet};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Scripted upstream: per-name behaviour, tracks concurrency
    #[derive(Default)]
    struct ScriptedSource {
        failing_resolve: HashSet<String>,
        failing_fetch: HashSet<String>,
        no_grid: HashSet<String>,
        series: HashMap<String, SampleSeries>,
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
        resolve_calls: AtomicUsize,
    }

    impl ScriptedSource {
        fn with_value(mut self, name: &str, valid_time: &str, value: f64) -> Self {
            self.series.entry(name.to_string()).or_default().push(Sample {
                valid_time: valid_time.to_string(),
                value,
            });
            self
        }
    }

    impl SeriesSource for ScriptedSource {
        async fn resolve(&self, point: &ProbePoint) -> Result<Option<GridReference>> {
            self.resolve_calls.fetch_add(1, Ordering::SeqCst);
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(5)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            if self.failing_resolve.contains(&point.name) {
                return Err(HeatRiskError::Lookup(format!("resolve failed for {}", point.name)));
            }
            if self.no_grid.contains(&point.name) {
                return Ok(None);
            }
            Ok(Some(GridReference(point.name.clone())))
        }

        async fn fetch_series(&self, grid: &GridReference) -> Result<SampleSeries> {
            if self.failing_fetch.contains(grid.as_str()) {
                return Err(HeatRiskError::Lookup("503 Service Unavailable".to_string()));
            }
            Ok(self.series.get(grid.as_str()).cloned().unwrap_or_default())
        }
    }

    fn catalog(n: usize) -> Vec<ProbePoint> {
        (0..n)
            .map(|i| ProbePoint::new(&format!("City {}", i), "TX", 30.0 + i as f64 * 0.1, -97.0))
            .collect()
    }

    fn fast_config(batch_size: usize) -> AggregatorConfig {
        AggregatorConfig {
            batch_size,
            batch_delay: Duration::ZERO,
        }
    }

    fn source_for(points: &[ProbePoint], value: f64) -> ScriptedSource {
        points.iter().fold(ScriptedSource::default(), |s, p| {
            s.with_value(&p.name, "2025-07-01T18:00:00+00:00/PT1H", value)
        })
    }

    #[tokio::test]
    async fn test_batch_count_and_width() {
        let points = catalog(23);
        let aggregator = Aggregator::new(source_for(&points, 25.0), fast_config(10));

        let aggregation = aggregator.run(&points, None).await.unwrap();

        assert_eq!(aggregation.report.batches, 3);
        assert_eq!(aggregation.result.points.len(), 23);
        let max = aggregator.source().max_in_flight.load(Ordering::SeqCst);
        assert!(max <= 10, "at most one batch in flight, saw {}", max);
        assert!(max > 1, "batch members should overlap");
    }

    #[tokio::test]
    async fn test_single_point_failure_is_isolated() {
        let points = vec![
            ProbePoint::new("Phoenix, AZ", "AZ", 33.4484, -112.0740),
            ProbePoint::new("Tucson, AZ", "AZ", 32.2226, -110.9747),
            ProbePoint::new("Mesa, AZ", "AZ", 33.4152, -111.8315),
        ];
        let mut source = source_for(&points, 42.0);
        source.failing_resolve.insert("Tucson, AZ".to_string());

        let aggregator = Aggregator::new(source, fast_config(10));
        let aggregation = aggregator.run(&points, None).await.unwrap();

        let regions: HashSet<_> = aggregation
            .result
            .points
            .iter()
            .map(|p| p.region.as_str())
            .collect();
        assert_eq!(regions, HashSet::from(["Phoenix, AZ", "Mesa, AZ"]));
        assert!(aggregation.result.points.iter().all(|p| p.value.value() == 4));
        assert_eq!(aggregation.report.failed, 1);
    }

    #[tokio::test]
    async fn test_failure_does_not_affect_later_batches() {
        let points = catalog(6);
        let mut source = source_for(&points, 12.0);
        source.failing_fetch.insert("City 1".to_string());

        let aggregator = Aggregator::new(source, fast_config(2));
        let aggregation = aggregator.run(&points, None).await.unwrap();

        assert_eq!(aggregation.report.batches, 3);
        assert_eq!(aggregation.result.points.len(), 5);
        assert!(!aggregation.result.points.iter().any(|p| p.region == "City 1"));
    }

    #[tokio::test]
    async fn test_date_filter_selects_first_match() {
        let point = ProbePoint::new("Austin, TX", "TX", 30.2672, -97.7431);
        let source = ScriptedSource::default()
            .with_value("Austin, TX", "2025-07-01T22:00:00+00:00/PT2H", 8.0)
            .with_value("Austin, TX", "2025-07-02T00:00:00+00:00/PT1H", 36.0)
            .with_value("Austin, TX", "2025-07-02T01:00:00+00:00/PT1H", 44.0);
        let aggregator = Aggregator::new(source, fast_config(10));

        let date = NaiveDate::from_ymd_opt(2025, 7, 2);
        let aggregation = aggregator.run(&[point.clone()], date).await.unwrap();
        assert_eq!(aggregation.result.points.len(), 1);
        assert_eq!(aggregation.result.points[0].value.value(), 3);

        let aggregation = aggregator.run(&[point], None).await.unwrap();
        assert_eq!(aggregation.result.points[0].value.value(), 0);
    }

    #[tokio::test]
    async fn test_no_data_cases_are_omitted() {
        let points = catalog(3);
        let mut source = source_for(&points, 30.0);
        source.no_grid.insert("City 0".to_string());
        let aggregator = Aggregator::new(source, fast_config(10));

        // City 1 and 2 only have data for 2025-07-01
        let date = NaiveDate::from_ymd_opt(2025, 8, 1);
        let aggregation = aggregator.run(&points, date).await.unwrap();

        assert!(aggregation.result.points.is_empty());
        assert_eq!(aggregation.report.no_data, 3);
        assert_eq!(aggregation.report.failed, 0);
    }

    #[tokio::test]
    async fn test_empty_catalog() {
        let aggregator = Aggregator::new(ScriptedSource::default(), AggregatorConfig::default());
        let aggregation = aggregator.run(&[], None).await.unwrap();

        assert!(aggregation.result.points.is_empty());
        assert_eq!(aggregation.report.batches, 0);
    }

    #[tokio::test]
    async fn test_all_failing_catalog() {
        let points = catalog(4);
        let mut source = ScriptedSource::default();
        source.failing_resolve = points.iter().map(|p| p.name.clone()).collect();

        let aggregator = Aggregator::new(source, fast_config(3));
        let aggregation = aggregator.run(&points, None).await.unwrap();

        assert!(aggregation.result.points.is_empty());
        assert_eq!(aggregation.report.failed, 4);
    }

    #[tokio::test]
    async fn test_duplicate_names_sampled_once() {
        let mut points = catalog(3);
        points.push(points[0].clone());
        let aggregator = Aggregator::new(source_for(&points, 15.0), fast_config(10));

        let aggregation = aggregator.run(&points, None).await.unwrap();

        let names: HashSet<_> = aggregation.result.points.iter().map(|p| &p.region).collect();
        assert_eq!(names.len(), aggregation.result.points.len());
        assert_eq!(aggregator.source().resolve_calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_pause_between_batches() {
        let points = catalog(3);
        let aggregator = Aggregator::new(
            source_for(&points, 15.0),
            AggregatorConfig {
                batch_size: 1,
                batch_delay: Duration::from_millis(40),
            },
        );

        let started = Instant::now();
        aggregator.run(&points, None).await.unwrap();

        // two pauses for three batches
        assert!(started.elapsed() >= Duration::from_millis(80));
    }

    #[tokio::test]
    async fn test_zero_batch_size_rejected() {
        let aggregator = Aggregator::new(ScriptedSource::default(), fast_config(0));
        assert!(matches!(
            aggregator.run(&catalog(2), None).await,
            Err(HeatRiskError::InvalidConfig(_))
        ));
    }
}
