//! Email subscriptions keyed by address
//!
//! Last write wins: an upsert for an existing email replaces its states
//! but keeps the original id and creation time. When a snapshot path is
//! configured the whole table is rewritten as JSON after every change.

use crate::alert::area_matches_state;
use crate::{AlertError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscription {
    pub id: Uuid,
    pub email: String,
    pub states: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Incoming subscribe form
#[derive(Debug, Clone, Deserialize)]
pub struct SubscriptionRequest {
    pub email: String,
    #[serde(default)]
    pub states: Vec<String>,
}

/// Validated, normalised request
#[derive(Debug, Clone, PartialEq)]
pub struct ValidSubscription {
    pub email: String,
    pub states: Vec<String>,
}

/// Lower-cased, trimmed address if it looks like `local@domain.tld`
pub fn normalize_email(email: &str) -> Option<String> {
    let email = email.trim().to_lowercase();
    let (local, domain) = email.split_once('@')?;
    let domain_ok = !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.');
    if local.is_empty() || !domain_ok || email.contains(char::is_whitespace) {
        return None;
    }
    Some(email)
}

impl SubscriptionRequest {
    pub fn validate(&self) -> Result<ValidSubscription> {
        let states: BTreeSet<String> = self
            .states
            .iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        match normalize_email(&self.email) {
            Some(email) if !states.is_empty() => Ok(ValidSubscription {
                email,
                states: states.into_iter().collect(),
            }),
            _ => Err(AlertError::InvalidSubscription(
                "Please enter an email and select at least one state".to_string(),
            )),
        }
    }
}

/// In-memory subscription table with optional JSON snapshot
#[derive(Clone, Default)]
pub struct SubscriptionStore {
    records: Arc<RwLock<HashMap<String, Subscription>>>,
    snapshot: Option<PathBuf>,
}

impl SubscriptionStore {
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Open a store backed by `path`, loading it if the file exists
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let records = match tokio::fs::read(&path).await {
            Ok(bytes) => {
                let list: Vec<Subscription> = serde_json::from_slice(&bytes)?;
                list.into_iter().map(|s| (s.email.clone(), s)).collect()
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(e.into()),
        };

        info!("Loaded {} subscriptions from {:?}", records.len(), path);

        Ok(Self {
            records: Arc::new(RwLock::new(records)),
            snapshot: Some(path),
        })
    }

    pub async fn upsert(&self, request: ValidSubscription) -> Result<Subscription> {
        let now = Utc::now();
        let mut records = self.records.write().await;

        let subscription = match records.get(&request.email) {
            Some(existing) => Subscription {
                states: request.states,
                updated_at: now,
                ..existing.clone()
            },
            None => Subscription {
                id: Uuid::new_v4(),
                email: request.email.clone(),
                states: request.states,
                created_at: now,
                updated_at: now,
            },
        };

        records.insert(request.email, subscription.clone());
        self.persist(&records).await?;

        debug!("Upserted subscription {} for {:?}", subscription.id, subscription.states);
        Ok(subscription)
    }

    pub async fn get(&self, email: &str) -> Option<Subscription> {
        let email = normalize_email(email)?;
        self.records.read().await.get(&email).cloned()
    }

    pub async fn remove(&self, email: &str) -> Result<Subscription> {
        let key = normalize_email(email).unwrap_or_else(|| email.to_string());
        let mut records = self.records.write().await;

        let removed = records
            .remove(&key)
            .ok_or_else(|| AlertError::NotFound(email.to_string()))?;
        self.persist(&records).await?;
        Ok(removed)
    }

    /// All subscriptions, sorted by email
    pub async fn list(&self) -> Vec<Subscription> {
        let mut all: Vec<_> = self.records.read().await.values().cloned().collect();
        all.sort_by(|a, b| a.email.cmp(&b.email));
        all
    }

    /// Subscriptions with at least one state matching the area description
    pub async fn subscribers_for_area(&self, area_desc: &str) -> Vec<Subscription> {
        self.records
            .read()
            .await
            .values()
            .filter(|s| s.states.iter().any(|st| area_matches_state(area_desc, st)))
            .cloned()
            .collect()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    async fn persist(&self, records: &HashMap<String, Subscription>) -> Result<()> {
        let Some(path) = &self.snapshot else {
            return Ok(());
        };

        let mut list: Vec<&Subscription> = records.values().collect();
        list.sort_by(|a, b| a.email.cmp(&b.email));
        let bytes = serde_json::to_vec_pretty(&list)?;
        tokio::fs::write(path, bytes).await?;
        Ok(())
    }
}
