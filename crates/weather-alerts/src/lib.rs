//! Weather Alerts
//!
//! Active NWS alerts, per-state email subscriptions and alert fan-out.

use thiserror::Error;

pub mod alert;
pub mod dispatch;
pub mod feed;
pub mod geometry;
pub mod notifier;
pub mod states;
pub mod subscriptions;

pub use alert::{area_matches_state, distinct_states, state_of, Alert, AlertFilter, EventKind, Severity};
pub use dispatch::{AlertDispatcher, DispatchSummary};
pub use feed::{AlertFeed, StaticFeed};
pub use geometry::{map_view, MapView};
pub use notifier::{alert_email, welcome_email, EmailMessage, LogNotifier, MockNotifier, Notifier};
pub use states::{state_code, US_STATES};
pub use subscriptions::{Subscription, SubscriptionRequest, SubscriptionStore, ValidSubscription};

#[derive(Error, Debug)]
pub enum AlertError {
    #[error("Alert feed error: {0}")]
    Upstream(#[from] nws_client::NwsError),
    #[error("{0}")]
    InvalidSubscription(String),
    #[error("Subscription not found: {0}")]
    NotFound(String),
    #[error("Notification failed: {0}")]
    Notify(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AlertError>;
