//! Heat-risk routes
//!
//! Every request runs a fresh sampling pass over the probe catalog.

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::NaiveDate;
use heat_risk::{zones_from_points, AggregationResult, HeatZone, LevelInfo, SeriesSource, LEVELS};
use serde::{Deserialize, Serialize};
use weather_alerts::AlertFeed;

use crate::error::ApiError;
use crate::state::AppState;

const BUILD_FAILED: &str = "Server failed to build heat zones";

// ========== Request/Response Types ==========

#[derive(Debug, Deserialize)]
pub struct HeatRiskQuery {
    pub date: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ZonesResponse {
    pub date: Option<NaiveDate>,
    pub zones: Vec<HeatZone>,
}

// ========== Handlers ==========

/// Optional `YYYY-MM-DD` filter; blank means no filter. Zero padding is
/// required since the date is matched against the upstream's text form.
fn parse_date(raw: Option<&str>) -> Result<Option<NaiveDate>, ApiError> {
    let Some(s) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };

    let invalid = || ApiError::BadRequest(format!("Invalid date '{}', expected YYYY-MM-DD", s));
    if s.len() != 10 {
        return Err(invalid());
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| invalid())
}

async fn sample<S: SeriesSource, F>(
    state: &AppState<S, F>,
    date: Option<NaiveDate>,
) -> Result<AggregationResult, ApiError> {
    match state.heat.run(&state.catalog, date).await {
        Ok(aggregation) => Ok(aggregation.result),
        Err(e) => {
            tracing::error!("Heat risk aggregation failed: {}", e);
            Err(ApiError::Internal(BUILD_FAILED.to_string()))
        }
    }
}

/// GET /heat-risk?date=YYYY-MM-DD
pub async fn get_heat_risk<S, F>(
    State(state): State<AppState<S, F>>,
    Query(query): Query<HeatRiskQuery>,
) -> Result<Json<AggregationResult>, ApiError>
where
    S: SeriesSource + 'static,
    F: AlertFeed + 'static,
{
    let date = parse_date(query.date.as_deref())?;
    Ok(Json(sample(&state, date).await?))
}

/// GET /heat-risk/zones?date=YYYY-MM-DD
pub async fn get_heat_zones<S, F>(
    State(state): State<AppState<S, F>>,
    Query(query): Query<HeatRiskQuery>,
) -> Result<Json<ZonesResponse>, ApiError>
where
    S: SeriesSource + 'static,
    F: AlertFeed + 'static,
{
    let date = parse_date(query.date.as_deref())?;
    let result = sample(&state, date).await?;

    Ok(Json(ZonesResponse {
        date,
        zones: zones_from_points(&result.points),
    }))
}

/// GET /heat-risk/levels
pub async fn get_levels() -> Json<&'static [LevelInfo]> {
    Json(&LEVELS[..])
}
