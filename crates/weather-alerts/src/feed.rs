//! Source of active alerts

use crate::alert::Alert;
use crate::Result;
use nws_client::NwsClient;
use std::future::Future;

pub trait AlertFeed: Send + Sync {
    /// Current active alerts, in feed order
    fn active_alerts(&self) -> impl Future<Output = Result<Vec<Alert>>> + Send;
}

impl AlertFeed for NwsClient {
    async fn active_alerts(&self) -> Result<Vec<Alert>> {
        let features = self.fetch_active_alerts().await?;
        Ok(features.into_iter().map(Alert::from).collect())
    }
}

/// Fixed alert list
#[derive(Debug, Clone, Default)]
pub struct StaticFeed(pub Vec<Alert>);

impl AlertFeed for StaticFeed {
    async fn active_alerts(&self) -> Result<Vec<Alert>> {
        Ok(self.0.clone())
    }
}
