//! CSV export of daily analytics.

use std::path::{Path, PathBuf};

use chrono::TimeZone;

use crate::{
  Result,
  analytics::{DailyBucket, DateRange},
};

pub const CSV_HEADER: [&str; 4] = ["Date", "Total", "Delivered", "Clicked"];

/// Render buckets as CSV: a header row, then one row per bucket in order.
///
/// Rows are joined with `\n` and there is no trailing newline. Labels are
/// written unquoted; they never contain a comma.
pub fn to_csv(buckets: &[DailyBucket]) -> String {
  let mut lines = Vec::with_capacity(buckets.len() + 1);
  lines.push(CSV_HEADER.join(","));
  lines.extend(buckets.iter().map(|b| {
    format!("{},{},{},{}", b.date, b.total, b.delivered, b.clicked)
  }));
  lines.join("\n")
}

/// `notification-analytics-<from>-to-<to>.csv`, with both ends as
/// `yyyy-MM-dd` in `tz`.
pub fn export_file_name<Tz: TimeZone>(range: &DateRange, tz: &Tz) -> String {
  let from = range.from.with_timezone(tz).date_naive();
  let to = range.to.with_timezone(tz).date_naive();
  format!(
    "notification-analytics-{}-to-{}.csv",
    from.format("%Y-%m-%d"),
    to.format("%Y-%m-%d"),
  )
}

/// Write the CSV for `buckets` into `dir` under [`export_file_name`] and
/// return the full path. An existing file of the same name is replaced.
pub fn write_report<Tz: TimeZone>(
  dir: impl AsRef<Path>,
  range: &DateRange,
  tz: &Tz,
  buckets: &[DailyBucket],
) -> Result<PathBuf> {
  let path = dir.as_ref().join(export_file_name(range, tz));
  std::fs::write(&path, to_csv(buckets))?;
  tracing::info!(path = %path.display(), rows = buckets.len(), "wrote analytics report");
  Ok(path)
}
