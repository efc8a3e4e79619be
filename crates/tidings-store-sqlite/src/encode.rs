//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings. Subscription payloads are
//! stored as compact JSON text.

use chrono::{DateTime, Utc};
use tidings_core::{notification::Notification, subscription::Subscription};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column list matching the field order of [`RawNotification::from_row`].
pub const NOTIFICATION_COLUMNS: &str =
  "id, title, message, url, source, timestamp, delivered, clicked";

/// Raw values read directly from a `notifications` row.
pub struct RawNotification {
  pub id:        i64,
  pub title:     String,
  pub message:   String,
  pub url:       Option<String>,
  pub source:    Option<String>,
  pub timestamp: Option<String>,
  pub delivered: bool,
  pub clicked:   bool,
}

impl RawNotification {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:        row.get(0)?,
      title:     row.get(1)?,
      message:   row.get(2)?,
      url:       row.get(3)?,
      source:    row.get(4)?,
      timestamp: row.get(5)?,
      delivered: row.get(6)?,
      clicked:   row.get(7)?,
    })
  }

  pub fn into_notification(self) -> Result<Notification> {
    Ok(Notification {
      id:        self.id,
      title:     self.title,
      message:   self.message,
      url:       self.url,
      source:    self.source,
      timestamp: self.timestamp.as_deref().map(decode_dt).transpose()?,
      delivered: self.delivered,
      clicked:   self.clicked,
    })
  }
}

/// Raw values read directly from a `subscriptions` row.
pub struct RawSubscription {
  pub id:           i64,
  pub subscription: String,
  pub created_at:   String,
}

impl RawSubscription {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:           row.get(0)?,
      subscription: row.get(1)?,
      created_at:   row.get(2)?,
    })
  }

  pub fn into_subscription(self) -> Result<Subscription> {
    Ok(Subscription {
      id:           self.id,
      subscription: serde_json::from_str(&self.subscription)?,
      created_at:   decode_dt(&self.created_at)?,
    })
  }
}
