//! Push subscriptions registered by dashboard visitors.
//!
//! The payload is whatever the browser's push manager (or the CLI `subscribe`
//! command) handed us. It is stored verbatim and never interpreted here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored push subscription.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscription {
  pub id:           i64,
  /// The opaque subscription object exactly as it was posted.
  pub subscription: serde_json::Value,
  pub created_at:   DateTime<Utc>,
}
