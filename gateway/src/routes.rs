use axum::{
    routing::{get, post},
    Json, Router,
};
use heat_risk::SeriesSource;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use weather_alerts::AlertFeed;

use crate::state::AppState;
use crate::{alert_routes, heat_routes, subscription_routes};

pub fn build_router<S, F>(state: AppState<S, F>) -> Router
where
    S: SeriesSource + 'static,
    F: AlertFeed + 'static,
{
    Router::new()
        .route("/health", get(health))
        .route("/heat-risk", get(heat_routes::get_heat_risk::<S, F>))
        .route("/heat-risk/zones", get(heat_routes::get_heat_zones::<S, F>))
        .route("/heat-risk/levels", get(heat_routes::get_levels))
        .route("/alerts", get(alert_routes::list_alerts::<S, F>))
        .route("/alerts/states", get(alert_routes::list_states::<S, F>))
        .route("/alerts/:id/center", get(alert_routes::alert_center::<S, F>))
        .route("/subscriptions", post(subscription_routes::subscribe::<S, F>))
        .route(
            "/subscriptions/:email",
            get(subscription_routes::get_subscription::<S, F>)
                .delete(subscription_routes::unsubscribe::<S, F>),
        )
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "alert-gateway",
        "version": env!("CARGO_PKG_VERSION")
    }))
}
