use anyhow::Result;
use heat_risk::{load_catalog, major_cities};
use nws_client::NwsClient;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use weather_alerts::{LogNotifier, Notifier, SubscriptionStore};

mod alert_routes;
mod config;
mod error;
mod heat_routes;
mod routes;
mod state;
mod subscription_routes;

use config::GatewayConfig;
use state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "alert_gateway=debug,heat_risk=info,info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = GatewayConfig::from_env()?;

    let catalog = match &config.catalog_path {
        Some(path) => load_catalog(path)?,
        None => major_cities(),
    };
    tracing::info!("   Loaded {} probe points", catalog.len());

    let subscriptions = match &config.subscriptions_path {
        Some(path) => SubscriptionStore::open(path).await?,
        None => SubscriptionStore::in_memory(),
    };
    tracing::info!("   {} subscriptions on file", subscriptions.len().await);

    let client = NwsClient::new(config.nws.clone())?;
    let notifier: Arc<dyn Notifier> = Arc::new(LogNotifier);

    let state = AppState::new(
        client.clone(),
        config.aggregator.clone(),
        catalog,
        client,
        subscriptions,
        notifier,
    );

    let app = routes::build_router(state);
    let addr = config.socket_addr();

    tracing::info!("Alert Gateway starting on {}", addr);
    tracing::info!(
        "   Heat risk batches: {} points, {:?} apart",
        config.aggregator.batch_size,
        config.aggregator.batch_delay
    );
    tracing::info!("   Upstream: {}", config.nws.base_url);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
