//! Email composition and delivery
//!
//! Delivery is behind `Notifier` so the gateway can log messages locally
//! and tests can capture them. Sending is async so a network transport
//! never blocks a runtime worker.

use crate::alert::Alert;
use crate::Result;
use chrono::DateTime;
use futures::future::BoxFuture;
use serde::Serialize;
use std::sync::Mutex;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub text: String,
    pub html: String,
}

/// Outbound email sink, shared as `Arc<dyn Notifier>`
pub trait Notifier: Send + Sync {
    fn send<'a>(&'a self, message: &'a EmailMessage) -> BoxFuture<'a, Result<()>>;
}

/// Writes messages to the log instead of an SMTP relay
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn send<'a>(&'a self, message: &'a EmailMessage) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            info!(to = %message.to, subject = %message.subject, "Email queued");
            Ok(())
        })
    }
}

/// Records every message; for tests and local runs
#[derive(Debug, Default)]
pub struct MockNotifier {
    sent: Mutex<Vec<EmailMessage>>,
}

impl MockNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<EmailMessage> {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

impl Notifier for MockNotifier {
    fn send<'a>(&'a self, message: &'a EmailMessage) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            if let Ok(mut sent) = self.sent.lock() {
                sent.push(message.clone());
            }
            Ok(())
        })
    }
}

pub fn welcome_email(to: &str, states: &[String]) -> EmailMessage {
    let list = states.join(", ");
    let items: String = states.iter().map(|s| format!("<li>{}</li>", s)).collect();

    EmailMessage {
        to: to.to_string(),
        subject: "Welcome to Weather Alert Subscriptions".to_string(),
        text: format!(
            "Thank you for subscribing to weather alerts.\n\n\
             You will receive notifications for these states: {}\n\n\
             Stay safe!",
            list
        ),
        html: format!(
            "<div style=\"font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;\">\
             <h2 style=\"color: #1976d2;\">Welcome to Weather Alerts</h2>\
             <p>Thank you for subscribing to weather alerts.</p>\
             <p>You will receive notifications for these states:</p>\
             <ul>{}</ul>\
             <p>Stay safe!</p></div>",
            items
        ),
    }
}

/// Human-readable timestamp, or the raw text if it is not RFC 3339
fn display_time(value: Option<&str>) -> String {
    match value {
        Some(raw) => DateTime::parse_from_rfc3339(raw)
            .map(|t| t.format("%b %-d, %Y %-I:%M %p (UTC%:z)").to_string())
            .unwrap_or_else(|_| raw.to_string()),
        None => "N/A".to_string(),
    }
}

pub fn alert_email(to: &str, alert: &Alert) -> EmailMessage {
    let effective = display_time(alert.effective.as_deref());
    let expires = display_time(alert.expires.as_deref());
    let instruction = alert.instruction.as_deref().unwrap_or("");

    let text = format!(
        "{event}\n\nArea: {area}\nSeverity: {severity}\nEffective: {effective}\nExpires: {expires}\n\n\
         {description}\n\n{instruction}",
        event = alert.event,
        area = alert.area_desc,
        severity = alert.severity,
        description = alert.description,
    );

    let instruction_html = if instruction.is_empty() {
        String::new()
    } else {
        format!("<h3>Instructions</h3><p>{}</p>", instruction)
    };

    let html = format!(
        "<div style=\"font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;\">\
         <h2 style=\"color: {color};\">{event}</h2>\
         <p><strong>Area:</strong> {area}</p>\
         <p><strong>Severity:</strong> {severity}</p>\
         <p><strong>Effective:</strong> {effective}</p>\
         <p><strong>Expires:</strong> {expires}</p>\
         <h3>Description</h3><p>{description}</p>{instruction_html}</div>",
        color = alert.severity.heading_color(),
        event = alert.event,
        area = alert.area_desc,
        severity = alert.severity,
        description = alert.description,
    );

    EmailMessage {
        to: to.to_string(),
        subject: format!("Weather Alert: {} - {} Severity", alert.event, alert.severity),
        text,
        html,
    }
}
