//! Notification records and webhook ingestion.
//!
//! A notification is created once, when the CRM webhook fires, and afterwards
//! only its `delivered` and `clicked` flags change. Everything else about it
//! is passthrough data carried for display.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

// ─── Notification ────────────────────────────────────────────────────────────

/// A single push-notification event as held by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
  pub id:        i64,
  pub title:     String,
  pub message:   String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub url:       Option<String>,
  /// Name of the upstream system that raised the event, if it said.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub source:    Option<String>,
  /// When the notification was created. Rows written by older clients may
  /// lack it; see [`crate::analytics`] for how that is resolved.
  #[serde(default)]
  pub timestamp: Option<DateTime<Utc>>,
  #[serde(default)]
  pub delivered: bool,
  #[serde(default)]
  pub clicked:   bool,
}

// ─── NewNotification ─────────────────────────────────────────────────────────

/// Input to [`crate::store::NotificationStore::create_notification`].
///
/// Only ever built from a validated [`WebhookPayload`]; `delivered` and
/// `clicked` always start out `false`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNotification {
  pub title:     String,
  pub message:   String,
  pub url:       Option<String>,
  pub source:    Option<String>,
  /// `None` means "stamp with the store's clock".
  pub timestamp: Option<DateTime<Utc>>,
}

impl NewNotification {
  pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
    Self {
      title:     title.into(),
      message:   message.into(),
      url:       None,
      source:    None,
      timestamp: None,
    }
  }
}

// ─── Webhook payload ─────────────────────────────────────────────────────────

/// The JSON body accepted by `POST /api/webhook`.
///
/// Every field is optional at the serde level so that a missing field is
/// reported by [`WebhookPayload::validate`] with a readable message instead of
/// a deserializer error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WebhookPayload {
  #[serde(default)]
  pub title:     Option<String>,
  #[serde(default)]
  pub message:   Option<String>,
  #[serde(default)]
  pub url:       Option<String>,
  #[serde(default)]
  pub source:    Option<String>,
  #[serde(default)]
  pub timestamp: Option<DateTime<Utc>>,
}

impl WebhookPayload {
  /// Check required fields and turn the payload into a [`NewNotification`].
  ///
  /// All problems are collected into one [`Error::Validation`] message.
  /// Accepted values are passed through untouched.
  pub fn validate(self) -> Result<NewNotification> {
    let mut issues = Vec::new();

    let title = required(self.title, "title", &mut issues);
    let message = required(self.message, "message", &mut issues);

    if !issues.is_empty() {
      return Err(Error::Validation(format!(
        "Validation error: {}",
        issues.join("; ")
      )));
    }

    Ok(NewNotification {
      title:     title.unwrap_or_default(),
      message:   message.unwrap_or_default(),
      url:       self.url,
      source:    self.source,
      timestamp: self.timestamp,
    })
  }
}

fn required(
  value: Option<String>,
  field: &str,
  issues: &mut Vec<String>,
) -> Option<String> {
  match value {
    None => {
      issues.push(format!("Required at \"{field}\""));
      None
    }
    Some(v) if v.trim().is_empty() => {
      issues.push(format!("String must not be empty at \"{field}\""));
      None
    }
    Some(v) => Some(v),
  }
}
