//! Dashboard state and key dispatch.
//!
//! [`App`] owns the fetched notifications and the selected [`DateRange`] and
//! recomputes [`Analytics`] whenever either changes. Network I/O stays in
//! `main`; key handling only returns an [`Action`] for the event loop.

use std::path::PathBuf;

use chrono::{Local, TimeZone};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tidings_core::{
  analytics::{Aggregator, Analytics, DateRange},
  clock::{Clock, SystemClock},
  notification::Notification,
  report,
};

/// Length of the range shown on start and after a reset.
pub const DEFAULT_RANGE_DAYS: i64 = 7;

/// What the event loop should do after a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
  Continue,
  Reload,
  Quit,
}

// ─── App ──────────────────────────────────────────────────────────────────────

/// Top-level application state.
pub struct App<C = SystemClock, Tz: TimeZone = Local> {
  /// `None` until the first successful fetch.
  pub notifications: Option<Vec<Notification>>,

  /// Currently selected closed interval.
  pub range: DateRange,

  /// Derived from `notifications` and `range`.
  pub analytics: Analytics,

  /// Directory that `e` writes CSV reports into.
  pub export_dir: PathBuf,

  /// One-line status message shown in the status bar.
  pub status_msg: String,

  aggregator: Aggregator<C, Tz>,
}

impl<C: Clock, Tz: TimeZone> App<C, Tz> {
  /// Start in the loading state with the last [`DEFAULT_RANGE_DAYS`] days
  /// selected.
  pub fn new(aggregator: Aggregator<C, Tz>, export_dir: PathBuf) -> Self {
    let range = DateRange::last_days(aggregator.clock().now(), DEFAULT_RANGE_DAYS);
    Self {
      notifications: None,
      range,
      analytics: Analytics::default(),
      export_dir,
      status_msg: String::new(),
      aggregator,
    }
  }

  pub fn time_zone(&self) -> &Tz { self.aggregator.time_zone() }

  pub fn is_loading(&self) -> bool { self.notifications.is_none() }

  // ── Data ──────────────────────────────────────────────────────────────────

  /// Replace the notification list and leave the loading state.
  pub fn set_notifications(&mut self, notifications: Vec<Notification>) {
    self.notifications = Some(notifications);
    self.recompute();
  }

  fn set_range(&mut self, range: DateRange) {
    self.range = range;
    self.recompute();
  }

  fn recompute(&mut self) {
    if let Some(records) = &self.notifications {
      self.analytics = self.aggregator.aggregate(records, &self.range);
    }
  }

  /// Write the current buckets to `export_dir`. Does nothing while loading.
  pub fn export(&mut self) {
    if self.is_loading() {
      return;
    }
    match report::write_report(
      &self.export_dir,
      &self.range,
      self.aggregator.time_zone(),
      &self.analytics.buckets,
    ) {
      Ok(path) => self.status_msg = format!("Exported {}", path.display()),
      Err(e) => self.status_msg = format!("Export failed: {e}"),
    }
  }

  // ── Key handling ──────────────────────────────────────────────────────────

  pub fn handle_key(&mut self, key: KeyEvent) -> Action {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
      return Action::Quit;
    }

    match key.code {
      KeyCode::Char('q') | KeyCode::Esc => return Action::Quit,
      KeyCode::Char('r') => return Action::Reload,

      // Slide the window.
      KeyCode::Left | KeyCode::Char('h') => self.set_range(self.range.shift_days(-1)),
      KeyCode::Right | KeyCode::Char('l') => self.set_range(self.range.shift_days(1)),
      KeyCode::Char('[') | KeyCode::PageUp => self.set_range(self.range.shift_days(-7)),
      KeyCode::Char(']') | KeyCode::PageDown => self.set_range(self.range.shift_days(7)),

      // Resize from the start.
      KeyCode::Char('+') | KeyCode::Char('=') => {
        self.set_range(self.range.extend_days(1))
      }
      KeyCode::Char('-') => self.set_range(self.range.extend_days(-1)),

      KeyCode::Char('t') => {
        let now = self.aggregator.clock().now();
        self.set_range(DateRange::last_days(now, DEFAULT_RANGE_DAYS));
      }
      KeyCode::Char('e') => self.export(),

      _ => {}
    }
    Action::Continue
  }
}

#[cfg(test)]
mod tests {
  use chrono::{DateTime, Utc};
  use crossterm::event::KeyEvent;
  use tidings_core::clock::FixedClock;

  use super::*;

  fn at(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
  }

  fn app(export_dir: PathBuf) -> App<FixedClock, Utc> {
    App::new(Aggregator::new(FixedClock(at("2024-01-08T12:00:00Z")), Utc), export_dir)
  }

  fn notification(id: i64, ts: &str, delivered: bool, clicked: bool) -> Notification {
    Notification {
      id,
      title: format!("n{id}"),
      message: "m".into(),
      url: None,
      source: None,
      timestamp: Some(at(ts)),
      delivered,
      clicked,
    }
  }

  fn press(app: &mut App<FixedClock, Utc>, code: KeyCode) -> Action {
    app.handle_key(KeyEvent::from(code))
  }

  #[test]
  fn starts_loading_with_last_week_selected() {
    let app = app(PathBuf::from("."));
    assert!(app.is_loading());
    assert_eq!(app.range.to, at("2024-01-08T12:00:00Z"));
    assert_eq!(app.range.from, at("2024-01-01T12:00:00Z"));
    assert_eq!(app.analytics, Analytics::default());
  }

  #[test]
  fn loading_notifications_computes_analytics() {
    let mut app = app(PathBuf::from("."));
    app.set_notifications(vec![
      notification(1, "2024-01-02T10:00:00Z", true, true),
      notification(2, "2024-01-02T11:00:00Z", true, false),
      notification(3, "2023-12-01T11:00:00Z", true, false),
    ]);

    assert!(!app.is_loading());
    assert_eq!(app.analytics.summary.total, 2);
    assert_eq!(app.analytics.buckets.len(), 1);
    assert_eq!(app.analytics.buckets[0].date, "Jan 02");
  }

  #[test]
  fn range_keys_recompute() {
    let mut app = app(PathBuf::from("."));
    app.set_notifications(vec![notification(1, "2024-01-09T10:00:00Z", false, false)]);
    assert_eq!(app.analytics.summary.total, 0);

    assert_eq!(press(&mut app, KeyCode::Right), Action::Continue);
    assert_eq!(app.range.to, at("2024-01-09T12:00:00Z"));
    assert_eq!(app.analytics.summary.total, 1);

    press(&mut app, KeyCode::Char('t'));
    assert_eq!(app.range.to, at("2024-01-08T12:00:00Z"));
    assert_eq!(app.analytics.summary.total, 0);
  }

  #[test]
  fn narrowing_stops_at_a_single_instant() {
    let mut app = app(PathBuf::from("."));
    for _ in 0..10 {
      press(&mut app, KeyCode::Char('-'));
    }
    assert_eq!(app.range.from, app.range.to);

    press(&mut app, KeyCode::Char('+'));
    assert_eq!(app.range.from, at("2024-01-07T12:00:00Z"));
  }

  #[test]
  fn quit_and_reload_are_reported() {
    let mut app = app(PathBuf::from("."));
    assert_eq!(press(&mut app, KeyCode::Char('q')), Action::Quit);
    assert_eq!(press(&mut app, KeyCode::Char('r')), Action::Reload);
    assert_eq!(
      app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
      Action::Quit
    );
  }

  #[test]
  fn export_writes_csv_once_loaded() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = app(dir.path().to_path_buf());

    press(&mut app, KeyCode::Char('e'));
    assert!(app.status_msg.is_empty());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);

    app.set_notifications(vec![notification(1, "2024-01-03T10:00:00Z", true, false)]);
    press(&mut app, KeyCode::Char('e'));

    let path = dir
      .path()
      .join("notification-analytics-2024-01-01-to-2024-01-08.csv");
    assert_eq!(
      std::fs::read_to_string(&path).unwrap(),
      "Date,Total,Delivered,Clicked\nJan 03,1,1,0"
    );
    assert!(app.status_msg.starts_with("Exported"));
  }
}
