//! [`SqliteStore`], the SQLite implementation of [`NotificationStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use tidings_core::{
  notification::{NewNotification, Notification},
  store::NotificationStore,
  subscription::Subscription,
};

use crate::{
  Result,
  encode::{NOTIFICATION_COLUMNS, RawNotification, RawSubscription, encode_dt},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Tidings store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, mostly for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Set a boolean flag column on one row; `true` if the row exists.
  async fn set_flag(&self, id: i64, column: &'static str) -> Result<bool> {
    let changed = self
      .conn
      .call(move |conn| {
        let sql = format!("UPDATE notifications SET {column} = 1 WHERE id = ?1");
        Ok(conn.execute(&sql, rusqlite::params![id])?)
      })
      .await?;

    tracing::debug!(id, column, found = changed > 0, "set notification flag");
    Ok(changed > 0)
  }
}

// ─── NotificationStore impl ──────────────────────────────────────────────────

impl NotificationStore for SqliteStore {
  type Error = crate::Error;

  // ── Notifications ─────────────────────────────────────────────────────────

  async fn create_notification(&self, input: NewNotification) -> Result<Notification> {
    let timestamp = input.timestamp.unwrap_or_else(Utc::now);

    let title         = input.title.clone();
    let message       = input.message.clone();
    let url           = input.url.clone();
    let source        = input.source.clone();
    let timestamp_str = encode_dt(timestamp);

    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO notifications (title, message, url, source, timestamp)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![title, message, url, source, timestamp_str],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    Ok(Notification {
      id,
      title:     input.title,
      message:   input.message,
      url:       input.url,
      source:    input.source,
      timestamp: Some(timestamp),
      delivered: false,
      clicked:   false,
    })
  }

  async fn list_notifications(&self) -> Result<Vec<Notification>> {
    let raws: Vec<RawNotification> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {NOTIFICATION_COLUMNS} FROM notifications ORDER BY id"
        ))?;
        let rows = stmt
          .query_map([], RawNotification::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawNotification::into_notification).collect()
  }

  async fn get_notification(&self, id: i64) -> Result<Option<Notification>> {
    let raw: Option<RawNotification> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {NOTIFICATION_COLUMNS} FROM notifications WHERE id = ?1"),
            rusqlite::params![id],
            RawNotification::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawNotification::into_notification).transpose()
  }

  async fn mark_delivered(&self, id: i64) -> Result<bool> {
    self.set_flag(id, "delivered").await
  }

  async fn mark_clicked(&self, id: i64) -> Result<bool> {
    self.set_flag(id, "clicked").await
  }

  // ── Subscriptions ─────────────────────────────────────────────────────────

  async fn save_subscription(&self, payload: serde_json::Value) -> Result<Subscription> {
    let created_at = Utc::now();
    let payload_str = serde_json::to_string(&payload)?;
    let at_str = encode_dt(created_at);

    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO subscriptions (subscription, created_at) VALUES (?1, ?2)",
          rusqlite::params![payload_str, at_str],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    Ok(Subscription { id, subscription: payload, created_at })
  }

  async fn list_subscriptions(&self) -> Result<Vec<Subscription>> {
    let raws: Vec<RawSubscription> = self
      .conn
      .call(|conn| {
        let mut stmt = conn
          .prepare("SELECT id, subscription, created_at FROM subscriptions ORDER BY id")?;
        let rows = stmt
          .query_map([], RawSubscription::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawSubscription::into_subscription).collect()
  }
}
