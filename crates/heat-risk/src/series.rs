//! Sample series and calendar-day filtering

use nws_client::GridpointValue;
use serde::{Deserialize, Serialize};

/// One time-series observation. `valid_time` keeps the provider's native
/// formatting (an ISO-8601 timestamp or interval).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub valid_time: String,
    pub value: f64,
}

pub type SampleSeries = Vec<Sample>;

/// Convert raw gridpoint values, dropping entries without a value
pub fn from_gridpoint_values(values: Vec<GridpointValue>) -> SampleSeries {
    values
        .into_iter()
        .filter_map(|v| {
            v.value.map(|value| Sample {
                valid_time: v.valid_time,
                value,
            })
        })
        .collect()
}

/// Portion of `valid_time` preceding the first `T`
pub fn date_component(valid_time: &str) -> &str {
    match valid_time.find('T') {
        Some(idx) => &valid_time[..idx],
        None => valid_time,
    }
}

/// Entries whose date component equals `date` (`YYYY-MM-DD`), in original
/// order. `None` keeps the full series.
pub fn filter_by_date<'a>(series: &'a [Sample], date: Option<&str>) -> Vec<&'a Sample> {
    match date {
        Some(date) => series
            .iter()
            .filter(|s| date_component(&s.valid_time) == date)
            .collect(),
        None => series.iter().collect(),
    }
}

/// First entry matching `date`, the value the aggregator classifies
pub fn first_for_date<'a>(series: &'a [Sample], date: Option<&str>) -> Option<&'a Sample> {
    match date {
        Some(date) => series
            .iter()
            .find(|s| date_component(&s.valid_time) == date),
        None => series.first(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(valid_time: &str, value: f64) -> Sample {
        Sample {
            valid_time: valid_time.to_string(),
            value,
        }
    }

    fn two_day_series() -> SampleSeries {
        vec![
            sample("2025-07-01T20:00:00+00:00/PT4H", 28.0),
            sample("2025-07-02T00:00:00+00:00/PT1H", 31.0),
            sample("2025-07-02T01:00:00+00:00/PT3H", 35.0),
            sample("2025-07-01T23:00:00+00:00/PT1H", 27.0),
            sample("2025-07-02T04:00:00+00:00/PT2H", 29.0),
        ]
    }

    #[test]
    fn test_date_component() {
        assert_eq!(date_component("2025-07-01T20:00:00+00:00/PT4H"), "2025-07-01");
        assert_eq!(date_component("2025-07-01"), "2025-07-01");
        assert_eq!(date_component(""), "");
    }

    #[test]
    fn test_filter_keeps_relative_order() {
        let series = two_day_series();
        let day2: Vec<f64> = filter_by_date(&series, Some("2025-07-02"))
            .iter()
            .map(|s| s.value)
            .collect();
        assert_eq!(day2, vec![31.0, 35.0, 29.0]);

        let day1: Vec<f64> = filter_by_date(&series, Some("2025-07-01"))
            .iter()
            .map(|s| s.value)
            .collect();
        assert_eq!(day1, vec![28.0, 27.0]);
    }

    #[test]
    fn test_first_for_date() {
        let series = two_day_series();
        assert_eq!(first_for_date(&series, Some("2025-07-02")).map(|s| s.value), Some(31.0));
        assert_eq!(first_for_date(&series, None).map(|s| s.value), Some(28.0));
        assert!(first_for_date(&series, Some("2025-07-03")).is_none());
        assert!(first_for_date(&[], None).is_none());
    }

    #[test]
    fn test_no_date_keeps_everything() {
        let series = two_day_series();
        assert_eq!(filter_by_date(&series, None).len(), series.len());
    }

    #[test]
    fn test_null_values_dropped() {
        let raw = vec![
            GridpointValue {
                valid_time: "2025-07-01T00:00:00+00:00/PT1H".to_string(),
                value: None,
            },
            GridpointValue {
                valid_time: "2025-07-01T01:00:00+00:00/PT1H".to_string(),
                value: Some(30.5),
            },
        ];
        let series = from_gridpoint_values(raw);
        assert_eq!(series, vec![sample("2025-07-01T01:00:00+00:00/PT1H", 30.5)]);
    }
}
