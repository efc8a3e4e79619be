//! Headless subcommands: `export` and `subscribe`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde_json::{Value, json};
use tidings_core::{
  analytics::{Aggregator, DateRange},
  report,
};

use crate::{app::DEFAULT_RANGE_DAYS, client::ApiClient};

// ─── export ───────────────────────────────────────────────────────────────────

/// Resolve `--from`/`--to` calendar days in `tz` to a closed range covering
/// both days entirely. Missing ends default to the last
/// [`DEFAULT_RANGE_DAYS`] days ending `now`.
pub fn resolve_range<Tz: TimeZone>(
  from: Option<NaiveDate>,
  to: Option<NaiveDate>,
  now: DateTime<Utc>,
  tz: &Tz,
) -> Result<DateRange> {
  let default = DateRange::last_days(now, DEFAULT_RANGE_DAYS);
  let from = match from {
    Some(day) => local_instant(day.and_hms_milli_opt(0, 0, 0, 0), tz)?,
    None => default.from,
  };
  let to = match to {
    Some(day) => local_instant(day.and_hms_milli_opt(23, 59, 59, 999), tz)?,
    None => default.to,
  };
  Ok(DateRange::new(from, to)?)
}

fn local_instant<Tz: TimeZone>(
  local: Option<NaiveDateTime>,
  tz: &Tz,
) -> Result<DateTime<Utc>> {
  local
    .and_then(|local| tz.from_local_datetime(&local).earliest())
    .map(|dt| dt.with_timezone(&Utc))
    .ok_or_else(|| anyhow!("date does not exist in the local time zone"))
}

/// Fetch every notification, aggregate it over `range` and write the CSV
/// into `out`.
pub async fn export(client: &ApiClient, range: DateRange, out: &Path) -> Result<PathBuf> {
  let aggregator = Aggregator::local();
  let records = client
    .list_notifications()
    .await
    .with_context(|| format!("fetching notifications from {}", client.base_url()))?;

  let analytics = aggregator.aggregate(&records, &range);
  tracing::info!(
    total = analytics.summary.total,
    delivered = analytics.summary.delivered,
    clicked = analytics.summary.clicked,
    "aggregated {} records",
    records.len()
  );

  std::fs::create_dir_all(out).with_context(|| format!("creating {}", out.display()))?;
  let path = report::write_report(out, &range, aggregator.time_zone(), &analytics.buckets)?;
  Ok(path)
}

// ─── subscribe ────────────────────────────────────────────────────────────────

/// Where the subscription payload comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubscriptionSource {
  /// A JSON file as produced by `PushManager.subscribe()`.
  File(PathBuf),
  /// Individual fields of a Web Push subscription.
  Keys {
    endpoint: String,
    p256dh:   String,
    auth:     String,
  },
}

impl SubscriptionSource {
  pub fn payload(&self) -> Result<Value> {
    match self {
      Self::File(path) => {
        let raw = std::fs::read_to_string(path)
          .with_context(|| format!("reading subscription file {}", path.display()))?;
        let value: Value = serde_json::from_str(&raw).context("parsing subscription file")?;
        if !value.is_object() {
          return Err(anyhow!("subscription file must contain a JSON object"));
        }
        Ok(value)
      }
      Self::Keys { endpoint, p256dh, auth } => Ok(json!({
        "endpoint": endpoint,
        "expirationTime": null,
        "keys": { "p256dh": p256dh, "auth": auth },
      })),
    }
  }
}

/// Register a push subscription with the server.
pub async fn subscribe(client: &ApiClient, source: &SubscriptionSource) -> Result<()> {
  let payload = source.payload()?;
  let stored = client.subscribe(&payload).await.context("Subscription failed")?;
  tracing::info!(subscription = stored.id, "subscribed");
  Ok(())
}

#[cfg(test)]
mod tests {
  use std::io::Write as _;

  use chrono::FixedOffset;

  use super::*;

  fn at(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
  }

  fn day(s: &str) -> NaiveDate { s.parse().unwrap() }

  #[test]
  fn explicit_days_cover_whole_local_days() {
    let tz = FixedOffset::east_opt(2 * 3600).unwrap();
    let range = resolve_range(
      Some(day("2024-01-01")),
      Some(day("2024-01-07")),
      at("2024-06-01T00:00:00Z"),
      &tz,
    )
    .unwrap();

    assert_eq!(range.from, at("2023-12-31T22:00:00Z"));
    assert_eq!(range.to, at("2024-01-07T21:59:59.999Z"));
    assert_eq!(
      report::export_file_name(&range, &tz),
      "notification-analytics-2024-01-01-to-2024-01-07.csv"
    );
  }

  #[test]
  fn missing_bounds_default_to_last_week() {
    let now = at("2024-01-08T12:00:00Z");
    let range = resolve_range(None, None, now, &Utc).unwrap();
    assert_eq!(range, DateRange::last_days(now, 7));
  }

  #[test]
  fn inverted_days_are_rejected() {
    let err = resolve_range(
      Some(day("2024-01-07")),
      Some(day("2024-01-01")),
      at("2024-06-01T00:00:00Z"),
      &Utc,
    );
    assert!(err.is_err());
  }

  #[test]
  fn keys_build_push_subscription() {
    let source = SubscriptionSource::Keys {
      endpoint: "https://push.example.com/abc".into(),
      p256dh:   "BNc".into(),
      auth:     "tBH".into(),
    };
    let payload = source.payload().unwrap();
    assert_eq!(payload["endpoint"], "https://push.example.com/abc");
    assert_eq!(payload["keys"]["p256dh"], "BNc");
    assert_eq!(payload["keys"]["auth"], "tBH");
    assert!(payload["expirationTime"].is_null());
  }

  #[test]
  fn file_payload_is_passed_through() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{"endpoint":"https://push.example.com/x","extra":1}}"#).unwrap();

    let payload = SubscriptionSource::File(file.path().to_path_buf()).payload().unwrap();
    assert_eq!(payload, json!({ "endpoint": "https://push.example.com/x", "extra": 1 }));
  }

  #[test]
  fn file_payload_must_be_object() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "[1, 2]").unwrap();

    assert!(SubscriptionSource::File(file.path().to_path_buf()).payload().is_err());
  }
}
