//! Active alert model and filtering
//!
//! Alerts come from the NWS `/alerts/active` feed. The state an alert
//! belongs to is taken from the last comma-separated segment of its area
//! description.

use crate::states;
use nws_client::AlertFeature;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// NWS severity scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    Extreme,
    Severe,
    Moderate,
    Minor,
    Unknown,
}

impl Severity {
    /// Case-insensitive parse; anything unrecognised is `Unknown`
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "extreme" => Self::Extreme,
            "severe" => Self::Severe,
            "moderate" => Self::Moderate,
            "minor" => Self::Minor,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Extreme => "Extreme",
            Self::Severe => "Severe",
            Self::Moderate => "Moderate",
            Self::Minor => "Minor",
            Self::Unknown => "Unknown",
        }
    }

    /// List-row colors for this severity
    pub fn style(&self) -> SeverityStyle {
        match self {
            Self::Extreme => SeverityStyle {
                background: "#fee2e2",
                border: "#ef4444",
                text: "#991b1b",
            },
            Self::Severe => SeverityStyle {
                background: "#ffedd5",
                border: "#f97316",
                text: "#9a3412",
            },
            _ => SeverityStyle {
                background: "#fef3c7",
                border: "#f59e0b",
                text: "#92400e",
            },
        }
    }

    /// Heading color used in alert emails
    pub fn heading_color(&self) -> &'static str {
        match self {
            Self::Extreme => "#d32f2f",
            Self::Severe => "#f57c00",
            _ => "#ffa000",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeverityStyle {
    pub background: &'static str,
    pub border: &'static str,
    pub text: &'static str,
}

/// Coarse event category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventKind {
    Hurricane,
    Tornado,
    Flood,
    Hail,
    Storm,
    Heat,
    Other,
}

impl EventKind {
    pub fn from_event(event: &str) -> Self {
        let event = event.to_ascii_lowercase();
        // First match wins
        if event.contains("hurricane") || event.contains("tropical") {
            Self::Hurricane
        } else if event.contains("tornado") {
            Self::Tornado
        } else if event.contains("flood") {
            Self::Flood
        } else if event.contains("hail") {
            Self::Hail
        } else if event.contains("storm") {
            Self::Storm
        } else if event.contains("heat") {
            Self::Heat
        } else {
            Self::Other
        }
    }
}

/// One active alert
#[derive(Debug, Clone, Serialize)]
pub struct Alert {
    pub id: String,
    pub event: String,
    pub kind: EventKind,
    pub area_desc: String,
    pub state: Option<String>,
    pub severity: Severity,
    pub certainty: String,
    pub urgency: String,
    pub headline: Option<String>,
    pub description: String,
    pub instruction: Option<String>,
    pub sent: Option<String>,
    pub effective: Option<String>,
    pub expires: Option<String>,
    /// Raw GeoJSON geometry for map drawing
    pub geometry: Option<serde_json::Value>,
}

impl From<AlertFeature> for Alert {
    fn from(feature: AlertFeature) -> Self {
        let p = feature.properties;
        Self {
            id: feature.id,
            kind: EventKind::from_event(&p.event),
            state: state_of(&p.area_desc),
            severity: Severity::parse(&p.severity),
            event: p.event,
            area_desc: p.area_desc,
            certainty: p.certainty,
            urgency: p.urgency,
            headline: p.headline,
            description: p.description,
            instruction: p.instruction,
            sent: p.sent,
            effective: p.effective,
            expires: p.expires,
            geometry: feature.geometry.filter(|g| !g.is_null()),
        }
    }
}

/// Trimmed text after the last comma of an area description
pub fn state_of(area_desc: &str) -> Option<String> {
    let state = area_desc.rsplit(',').next()?.trim();
    if state.is_empty() {
        None
    } else {
        Some(state.to_string())
    }
}

/// Sorted, de-duplicated states present in a set of alerts
pub fn distinct_states(alerts: &[Alert]) -> Vec<String> {
    alerts
        .iter()
        .filter_map(|a| a.state.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Whether an area description covers `state`, given as a name or postal
/// code. Each zone's state is compared whole, so "Kansas" never matches
/// "Arkansas".
pub fn area_matches_state(area_desc: &str, state: &str) -> bool {
    states::area_in_state(area_desc, state)
}

/// Optional list filters
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AlertFilter {
    pub state: Option<String>,
    pub severity: Option<String>,
}

impl AlertFilter {
    pub fn matches(&self, alert: &Alert) -> bool {
        let state_ok = match self.state.as_deref().map(str::trim) {
            Some(state) if !state.is_empty() => area_matches_state(&alert.area_desc, state),
            _ => true,
        };
        let severity_ok = match self.severity.as_deref().map(str::trim) {
            Some(sev) if !sev.is_empty() => alert.severity == Severity::parse(sev),
            _ => true,
        };
        state_ok && severity_ok
    }

    pub fn apply<'a>(&self, alerts: &'a [Alert]) -> Vec<&'a Alert> {
        alerts.iter().filter(|a| self.matches(a)).collect()
    }
}
