//! Alert fan-out to subscribers
//!
//! Each (alert id, email) pair is notified at most once. A pair is claimed
//! before sending and released again if the send fails, so concurrent
//! dispatches never double-send. Pairs for alerts that have left the active
//! feed are forgotten, bounding the set to the live feed.

use crate::alert::Alert;
use crate::notifier::{alert_email, Notifier};
use crate::subscriptions::SubscriptionStore;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DispatchSummary {
    pub sent: usize,
    pub skipped: usize,
    pub failed: usize,
}

pub struct AlertDispatcher {
    store: SubscriptionStore,
    notifier: Arc<dyn Notifier>,
    delivered: Mutex<HashSet<(String, String)>>,
}

impl AlertDispatcher {
    pub fn new(store: SubscriptionStore, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            store,
            notifier,
            delivered: Mutex::new(HashSet::new()),
        }
    }

    /// Number of (alert id, email) pairs currently marked as delivered
    pub async fn delivered_count(&self) -> usize {
        self.delivered.lock().await.len()
    }

    /// Notify subscribers about `alerts`, the current active feed
    pub async fn dispatch(&self, alerts: &[Alert]) -> DispatchSummary {
        let mut summary = DispatchSummary::default();

        for alert in alerts {
            for sub in self.store.subscribers_for_area(&alert.area_desc).await {
                let key = (alert.id.clone(), sub.email.clone());
                if !self.delivered.lock().await.insert(key.clone()) {
                    summary.skipped += 1;
                    continue;
                }

                match self.notifier.send(&alert_email(&sub.email, alert)).await {
                    Ok(()) => summary.sent += 1,
                    Err(e) => {
                        warn!("Failed to notify {} about {}: {}", sub.email, alert.id, e);
                        self.delivered.lock().await.remove(&key);
                        summary.failed += 1;
                    }
                }
            }
        }

        let live: HashSet<&str> = alerts.iter().map(|a| a.id.as_str()).collect();
        self.delivered
            .lock()
            .await
            .retain(|(id, _)| live.contains(id.as_str()));

        if summary.sent > 0 || summary.failed > 0 {
            debug!(
                "Dispatch: {} sent, {} skipped, {} failed",
                summary.sent, summary.skipped, summary.failed
            );
        }
        summary
    }
}
