//! Error types for `tidings-core`.

use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// A webhook payload failed validation; the message is user-facing.
  #[error("{0}")]
  Validation(String),

  #[error("invalid date range: {from} is after {to}")]
  InvalidRange {
    from: DateTime<Utc>,
    to:   DateTime<Utc>,
  },

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
