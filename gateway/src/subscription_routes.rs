use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use heat_risk::SeriesSource;
use weather_alerts::{welcome_email, AlertFeed, Subscription, SubscriptionRequest};

use crate::error::ApiError;
use crate::state::AppState;

/// POST /subscriptions
pub async fn subscribe<S, F>(
    State(state): State<AppState<S, F>>,
    Json(req): Json<SubscriptionRequest>,
) -> Result<(StatusCode, Json<Subscription>), ApiError>
where
    S: SeriesSource + 'static,
    F: AlertFeed + 'static,
{
    let valid = req.validate()?;
    let subscription = state.subscriptions.upsert(valid).await?;

    // Welcome mail is best effort
    let welcome = welcome_email(&subscription.email, &subscription.states);
    if let Err(e) = state.notifier.send(&welcome).await {
        tracing::warn!("Welcome email to {} failed: {}", subscription.email, e);
    }

    tracing::info!(
        "Subscription {} covers {} states",
        subscription.id,
        subscription.states.len()
    );
    Ok((StatusCode::CREATED, Json(subscription)))
}

/// GET /subscriptions/:email
pub async fn get_subscription<S, F>(
    State(state): State<AppState<S, F>>,
    Path(email): Path<String>,
) -> Result<Json<Subscription>, ApiError>
where
    S: SeriesSource + 'static,
    F: AlertFeed + 'static,
{
    state
        .subscriptions
        .get(&email)
        .await
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Subscription not found: {}", email)))
}

/// DELETE /subscriptions/:email
pub async fn unsubscribe<S, F>(
    State(state): State<AppState<S, F>>,
    Path(email): Path<String>,
) -> Result<StatusCode, ApiError>
where
    S: SeriesSource + 'static,
    F: AlertFeed + 'static,
{
    let removed = state.subscriptions.remove(&email).await?;
    tracing::info!("Subscription {} removed", removed.id);
    Ok(StatusCode::NO_CONTENT)
}
