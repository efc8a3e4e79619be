//! Per-day delivery and click analytics.
//!
//! [`Aggregator::aggregate`] filters notifications to a closed [`DateRange`],
//! groups the survivors by their `"Jan 01"`-style day label in a display
//! time zone and counts the `delivered` and `clicked` flags. The result is
//! rebuilt from scratch on every call; nothing is cached between calls.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Local, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  Error, Result,
  clock::{Clock, SystemClock},
  notification::Notification,
};

/// Display format of a bucket label, e.g. `"Jan 01"`.
pub const DAY_LABEL_FORMAT: &str = "%b %d";

// ─── Date range ──────────────────────────────────────────────────────────────

/// A closed interval `[from, to]`, compared at full timestamp precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
  pub from: DateTime<Utc>,
  pub to:   DateTime<Utc>,
}

impl DateRange {
  pub fn new(from: DateTime<Utc>, to: DateTime<Utc>) -> Result<Self> {
    if from > to {
      return Err(Error::InvalidRange { from, to });
    }
    Ok(Self { from, to })
  }

  /// The `days` days leading up to and including `now`.
  pub fn last_days(now: DateTime<Utc>, days: i64) -> Self {
    Self { from: now - Duration::days(days.max(0)), to: now }
  }

  pub fn contains(&self, at: DateTime<Utc>) -> bool {
    self.from <= at && at <= self.to
  }

  /// Move both ends by `days` (negative moves back in time).
  pub fn shift_days(&self, days: i64) -> Self {
    Self {
      from: self.from + Duration::days(days),
      to:   self.to + Duration::days(days),
    }
  }

  /// Move `from` back by `days` (or forward, for negative `days`). `from`
  /// never crosses `to`.
  pub fn extend_days(&self, days: i64) -> Self {
    let from = (self.from - Duration::days(days)).min(self.to);
    Self { from, to: self.to }
  }
}

// ─── Output types ────────────────────────────────────────────────────────────

/// Counters for one day label.
///
/// The label carries no year, so the same month and day in different years
/// share a bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyBucket {
  /// Day in the aggregator's time zone, formatted with [`DAY_LABEL_FORMAT`].
  pub date:      String,
  pub total:     u64,
  pub delivered: u64,
  pub clicked:   u64,
}

impl DailyBucket {
  fn new(date: String) -> Self {
    Self {
      date,
      total: 0,
      delivered: 0,
      clicked: 0,
    }
  }

  fn add(&mut self, n: &Notification) {
    self.total += 1;
    self.delivered += u64::from(n.delivered);
    self.clicked += u64::from(n.clicked);
  }
}

/// Totals over every notification in the range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
  pub total:     u64,
  pub delivered: u64,
  pub clicked:   u64,
}

impl Summary {
  /// Fraction of notifications delivered, `0.0` when there are none.
  pub fn delivery_rate(&self) -> f64 { ratio(self.delivered, self.total) }

  /// Fraction of notifications clicked, `0.0` when there are none.
  pub fn click_rate(&self) -> f64 { ratio(self.clicked, self.total) }
}

fn ratio(part: u64, whole: u64) -> f64 {
  if whole == 0 { 0.0 } else { part as f64 / whole as f64 }
}

/// Three-way split of [`Summary::total`] for proportional display.
///
/// The categories are only mutually exclusive when every clicked notification
/// was also delivered. Upstream data can break that; a clicked but undelivered
/// record then drives `delivered_not_clicked` below zero. The value is
/// reported as-is and [`is_consistent`](Self::is_consistent) flags it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngagementBreakdown {
  pub undelivered:           i64,
  pub delivered_not_clicked: i64,
  pub clicked:               i64,
}

impl EngagementBreakdown {
  pub const LABELS: [&'static str; 3] =
    ["Undelivered", "Delivered (No Click)", "Clicked"];

  pub fn from_summary(s: &Summary) -> Self {
    let (total, delivered, clicked) =
      (s.total as i64, s.delivered as i64, s.clicked as i64);
    Self {
      undelivered:           total - delivered,
      delivered_not_clicked: delivered - clicked,
      clicked,
    }
  }

  /// Always equal to the summary total it was built from.
  pub fn sum(&self) -> i64 {
    self.undelivered + self.delivered_not_clicked + self.clicked
  }

  /// `false` when some category went negative.
  pub fn is_consistent(&self) -> bool {
    self.values().iter().all(|v| *v >= 0)
  }

  pub fn values(&self) -> [i64; 3] {
    [self.undelivered, self.delivered_not_clicked, self.clicked]
  }

  /// Each category as a share of the total, in percent. All zero when the
  /// total is zero.
  pub fn percentages(&self) -> [f64; 3] {
    let sum = self.sum();
    if sum == 0 {
      return [0.0; 3];
    }
    self.values().map(|v| v as f64 * 100.0 / sum as f64)
  }
}

/// Everything the dashboard renders for one date range.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Analytics {
  pub buckets:    Vec<DailyBucket>,
  pub summary:    Summary,
  pub engagement: EngagementBreakdown,
}

// ─── Aggregator ──────────────────────────────────────────────────────────────

/// Filters and groups notifications.
///
/// `clock` supplies the timestamp of records that have none; `tz` decides
/// which day label a timestamp falls under.
#[derive(Debug, Clone)]
pub struct Aggregator<C = SystemClock, Tz: TimeZone = Local> {
  clock: C,
  tz:    Tz,
}

impl Aggregator {
  /// Wall clock, viewer's local time zone.
  pub fn local() -> Self { Self { clock: SystemClock, tz: Local } }
}

impl<C, Tz> Aggregator<C, Tz>
where
  C: Clock,
  Tz: TimeZone,
{
  pub fn new(clock: C, tz: Tz) -> Self { Self { clock, tz } }

  pub fn time_zone(&self) -> &Tz { &self.tz }

  pub fn clock(&self) -> &C { &self.clock }

  /// Records whose timestamp lies in `range`, in input order.
  pub fn filter<'a>(
    &self,
    records: &'a [Notification],
    range: &DateRange,
  ) -> Vec<&'a Notification> {
    let now = self.clock.now();
    records
      .iter()
      .filter(|n| range.contains(n.timestamp.unwrap_or(now)))
      .collect()
  }

  /// Build per-day buckets, summary totals and the engagement breakdown.
  ///
  /// Buckets appear in the order their label is first seen among the
  /// filtered records, so they come out chronological only if the input is.
  pub fn aggregate(&self, records: &[Notification], range: &DateRange) -> Analytics {
    let now = self.clock.now();

    let mut buckets: Vec<DailyBucket> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut summary = Summary::default();

    for n in records {
      let at = n.timestamp.unwrap_or(now);
      if !range.contains(at) {
        continue;
      }

      let label = at
        .with_timezone(&self.tz)
        .date_naive()
        .format(DAY_LABEL_FORMAT)
        .to_string();
      let slot = *index.entry(label).or_insert_with_key(|label| {
        buckets.push(DailyBucket::new(label.clone()));
        buckets.len() - 1
      });
      buckets[slot].add(n);

      summary.total += 1;
      summary.delivered += u64::from(n.delivered);
      summary.clicked += u64::from(n.clicked);
    }

    tracing::debug!(
      records = records.len(),
      matched = summary.total,
      days = buckets.len(),
      "aggregated notifications"
    );

    Analytics {
      engagement: EngagementBreakdown::from_summary(&summary),
      buckets,
      summary,
    }
  }
}

#[cfg(test)]
mod tests {
  use chrono::FixedOffset;
  use proptest::prelude::*;

  use super::*;
  use crate::clock::FixedClock;

  fn at(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
  }

  fn notif(id: i64, ts: Option<&str>, delivered: bool, clicked: bool) -> Notification {
    Notification {
      id,
      title: format!("n{id}"),
      message: String::new(),
      url: None,
      source: None,
      timestamp: ts.map(at),
      delivered,
      clicked,
    }
  }

  fn utc_aggregator() -> Aggregator<FixedClock, Utc> {
    Aggregator::new(FixedClock(at("2024-01-10T12:00:00Z")), Utc)
  }

  fn january() -> DateRange {
    DateRange::new(at("2024-01-01T00:00:00Z"), at("2024-01-31T23:59:59Z")).unwrap()
  }

  #[test]
  fn two_day_example() {
    let records = vec![
      notif(1, Some("2024-01-01T10:00:00Z"), true, false),
      notif(2, Some("2024-01-01T14:00:00Z"), true, true),
      notif(3, Some("2024-01-02T09:00:00Z"), false, false),
    ];

    let a = utc_aggregator().aggregate(&records, &january());

    let rows: Vec<_> = a
      .buckets
      .iter()
      .map(|b| (b.date.as_str(), b.total, b.delivered, b.clicked))
      .collect();
    assert_eq!(rows, vec![("Jan 01", 2, 2, 1), ("Jan 02", 1, 0, 0)]);
    assert_eq!(a.summary, Summary { total: 3, delivered: 2, clicked: 1 });
    assert_eq!(
      a.engagement,
      EngagementBreakdown { undelivered: 1, delivered_not_clicked: 1, clicked: 1 }
    );
  }

  #[test]
  fn empty_input_yields_zeroes() {
    let a = utc_aggregator().aggregate(&[], &january());
    assert!(a.buckets.is_empty());
    assert_eq!(a.summary, Summary::default());
    assert_eq!(a.engagement, EngagementBreakdown::default());
    assert_eq!(a.summary.delivery_rate(), 0.0);
    assert_eq!(a.summary.click_rate(), 0.0);
    assert_eq!(a.engagement.percentages(), [0.0; 3]);
  }

  #[test]
  fn range_bounds_are_inclusive() {
    let range = DateRange::new(at("2024-01-05T00:00:00Z"), at("2024-01-06T00:00:00Z")).unwrap();
    let records = vec![
      notif(1, Some("2024-01-04T23:59:59Z"), false, false),
      notif(2, Some("2024-01-05T00:00:00Z"), false, false),
      notif(3, Some("2024-01-06T00:00:00Z"), false, false),
      notif(4, Some("2024-01-06T00:00:01Z"), false, false),
    ];

    let kept: Vec<i64> = utc_aggregator()
      .filter(&records, &range)
      .into_iter()
      .map(|n| n.id)
      .collect();
    assert_eq!(kept, vec![2, 3]);
    assert_eq!(utc_aggregator().aggregate(&records, &range).summary.total, 2);
  }

  #[test]
  fn buckets_follow_first_appearance_not_date_order() {
    let records = vec![
      notif(1, Some("2024-01-03T08:00:00Z"), false, false),
      notif(2, Some("2024-01-01T08:00:00Z"), false, false),
      notif(3, Some("2024-01-03T18:00:00Z"), true, false),
    ];

    let a = utc_aggregator().aggregate(&records, &january());
    let labels: Vec<_> = a.buckets.iter().map(|b| b.date.as_str()).collect();
    assert_eq!(labels, vec!["Jan 03", "Jan 01"]);
    assert_eq!(a.buckets[0].total, 2);
    assert_eq!(a.buckets[0].delivered, 1);
  }

  #[test]
  fn same_label_in_different_years_shares_a_bucket() {
    let range = DateRange::new(at("2023-01-01T00:00:00Z"), at("2024-12-31T00:00:00Z")).unwrap();
    let records = vec![
      notif(1, Some("2023-01-01T08:00:00Z"), true, false),
      notif(2, Some("2024-01-01T08:00:00Z"), true, false),
    ];

    let a = utc_aggregator().aggregate(&records, &range);
    assert_eq!(a.buckets.len(), 1);
    assert_eq!(
      crate::report::to_csv(&a.buckets),
      "Date,Total,Delivered,Clicked\nJan 01,2,2,0"
    );
  }

  #[test]
  fn missing_timestamp_uses_the_clock() {
    let records = vec![notif(1, None, true, false)];

    // The clock reads Jan 10, inside January.
    let a = utc_aggregator().aggregate(&records, &january());
    assert_eq!(a.summary.total, 1);
    assert_eq!(a.buckets[0].date, "Jan 10");

    // A range that ends before the clock excludes it.
    let early = DateRange::new(at("2024-01-01T00:00:00Z"), at("2024-01-09T00:00:00Z")).unwrap();
    assert_eq!(utc_aggregator().aggregate(&records, &early).summary.total, 0);
  }

  #[test]
  fn days_are_cut_in_the_display_time_zone() {
    // 23:30 UTC on Jan 1 is already Jan 2 at UTC+02:00.
    let records = vec![notif(1, Some("2024-01-01T23:30:00Z"), false, false)];
    let tz = FixedOffset::east_opt(2 * 3600).unwrap();
    let agg = Aggregator::new(FixedClock(at("2024-01-10T00:00:00Z")), tz);

    let a = agg.aggregate(&records, &january());
    assert_eq!(a.buckets[0].date, "Jan 02");
  }

  #[test]
  fn clicked_without_delivered_goes_negative() {
    let records = vec![notif(1, Some("2024-01-02T00:00:00Z"), false, true)];
    let a = utc_aggregator().aggregate(&records, &january());

    assert_eq!(a.engagement.undelivered, 1);
    assert_eq!(a.engagement.delivered_not_clicked, -1);
    assert_eq!(a.engagement.clicked, 1);
    assert_eq!(a.engagement.sum(), 1);
    assert!(!a.engagement.is_consistent());
  }

  #[test]
  fn inverted_range_is_rejected() {
    let err = DateRange::new(at("2024-01-02T00:00:00Z"), at("2024-01-01T00:00:00Z"))
      .unwrap_err();
    assert!(matches!(err, Error::InvalidRange { .. }));
  }

  #[test]
  fn range_helpers() {
    let now = at("2024-01-10T12:00:00Z");
    let week = DateRange::last_days(now, 7);
    assert_eq!(week.from, at("2024-01-03T12:00:00Z"));
    assert_eq!(week.to, now);

    let earlier = week.shift_days(-7);
    assert_eq!(earlier.from, at("2023-12-27T12:00:00Z"));
    assert_eq!(earlier.to, at("2024-01-03T12:00:00Z"));

    assert_eq!(week.extend_days(3).from, at("2023-12-31T12:00:00Z"));
    assert_eq!(week.extend_days(-30).from, week.to);
  }

  // ── Properties ────────────────────────────────────────────────────────────

  fn arb_notification() -> impl Strategy<Value = Notification> {
    (
      any::<u16>(),
      proptest::option::weighted(0.9, 0i64..(60 * 24 * 3600)),
      any::<bool>(),
      any::<bool>(),
    )
      .prop_map(|(id, offset, delivered, clicked)| Notification {
        id: i64::from(id),
        title: String::new(),
        message: String::new(),
        url: None,
        source: None,
        timestamp: offset.map(|s| at("2023-12-15T00:00:00Z") + Duration::seconds(s)),
        delivered,
        clicked,
      })
  }

  proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_bucket_counters_are_bounded(records in proptest::collection::vec(arb_notification(), 0..64)) {
      let a = utc_aggregator().aggregate(&records, &january());
      for b in &a.buckets {
        prop_assert!(b.total > 0);
        prop_assert!(b.delivered <= b.total);
        prop_assert!(b.clicked <= b.total);
      }
      prop_assert_eq!(a.buckets.iter().map(|b| b.total).sum::<u64>(), a.summary.total);
    }

    #[test]
    fn prop_summary_matches_direct_count(records in proptest::collection::vec(arb_notification(), 0..64)) {
      let agg = utc_aggregator();
      let range = january();
      let now = at("2024-01-10T12:00:00Z");
      let inside: Vec<_> = records
        .iter()
        .filter(|n| range.contains(n.timestamp.unwrap_or(now)))
        .collect();

      let a = agg.aggregate(&records, &range);
      prop_assert_eq!(a.summary.total, inside.len() as u64);
      prop_assert_eq!(a.summary.delivered, inside.iter().filter(|n| n.delivered).count() as u64);
      prop_assert_eq!(a.summary.clicked, inside.iter().filter(|n| n.clicked).count() as u64);
    }

    #[test]
    fn prop_refiltering_is_idempotent(records in proptest::collection::vec(arb_notification(), 0..64)) {
      let agg = utc_aggregator();
      let range = january();
      let once: Vec<Notification> = agg.filter(&records, &range).into_iter().cloned().collect();

      prop_assert_eq!(agg.aggregate(&once, &range), agg.aggregate(&records, &range));
    }

    #[test]
    fn prop_engagement_sums_to_total(records in proptest::collection::vec(arb_notification(), 0..64)) {
      let a = utc_aggregator().aggregate(&records, &january());
      prop_assert_eq!(a.engagement.sum(), a.summary.total as i64);
    }
  }
}
