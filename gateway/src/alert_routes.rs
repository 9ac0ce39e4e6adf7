//! Active alert routes
//!
//! Listing alerts also hands the fresh feed to the dispatcher on a
//! background task so subscribers are notified without delaying the reply.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use heat_risk::SeriesSource;
use serde::Serialize;
use weather_alerts::{distinct_states, map_view, Alert, AlertFeed, AlertFilter, MapView};

use crate::error::ApiError;
use crate::state::AppState;

// ========== Response Types ==========

#[derive(Debug, Serialize)]
pub struct AlertsResponse {
    pub count: usize,
    pub alerts: Vec<Alert>,
}

#[derive(Debug, Serialize)]
pub struct StatesResponse {
    pub states: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct AlertCenterResponse {
    pub id: String,
    #[serde(flatten)]
    pub view: MapView,
}

// ========== Handlers ==========

/// GET /alerts?state=&severity=
pub async fn list_alerts<S, F>(
    State(state): State<AppState<S, F>>,
    Query(filter): Query<AlertFilter>,
) -> Result<Json<AlertsResponse>, ApiError>
where
    S: SeriesSource + 'static,
    F: AlertFeed + 'static,
{
    let alerts = state.feed.active_alerts().await?;

    let dispatcher = state.dispatcher.clone();
    let snapshot = alerts.clone();
    tokio::spawn(async move {
        dispatcher.dispatch(&snapshot).await;
    });

    let alerts: Vec<Alert> = filter.apply(&alerts).into_iter().cloned().collect();
    Ok(Json(AlertsResponse {
        count: alerts.len(),
        alerts,
    }))
}

/// GET /alerts/states
pub async fn list_states<S, F>(
    State(state): State<AppState<S, F>>,
) -> Result<Json<StatesResponse>, ApiError>
where
    S: SeriesSource + 'static,
    F: AlertFeed + 'static,
{
    let alerts = state.feed.active_alerts().await?;
    Ok(Json(StatesResponse {
        states: distinct_states(&alerts),
    }))
}

/// Feed ids are full URLs; accept either the URL or its trailing URN
fn id_matches(alert_id: &str, requested: &str) -> bool {
    alert_id == requested || alert_id.rsplit('/').next() == Some(requested)
}

/// GET /alerts/:id/center
pub async fn alert_center<S, F>(
    State(state): State<AppState<S, F>>,
    Path(id): Path<String>,
) -> Result<Json<AlertCenterResponse>, ApiError>
where
    S: SeriesSource + 'static,
    F: AlertFeed + 'static,
{
    let alerts = state.feed.active_alerts().await?;
    let alert = alerts
        .iter()
        .find(|a| id_matches(&a.id, &id))
        .ok_or_else(|| ApiError::NotFound(format!("Alert {} is not active", id)))?;

    Ok(Json(AlertCenterResponse {
        id: alert.id.clone(),
        view: map_view(alert.geometry.as_ref()),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_matches_urn_suffix() {
        let id = "https://api.weather.gov/alerts/urn:oid:2.49.0.1.840.0.abc";
        assert!(id_matches(id, id));
        assert!(id_matches(id, "urn:oid:2.49.0.1.840.0.abc"));
        assert!(!id_matches(id, "urn:oid:other"));
    }
}
