//! The `NotificationStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `tidings-store-sqlite`).
//! `tidings-api` depends on this abstraction, not on any concrete backend.

use std::future::Future;

use crate::{
  notification::{NewNotification, Notification},
  subscription::Subscription,
};

/// Abstraction over a Tidings storage backend.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait NotificationStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Notifications ─────────────────────────────────────────────────────

  /// Persist a new notification and return it with its assigned id.
  /// A missing `timestamp` is stamped with the current time.
  fn create_notification(
    &self,
    input: NewNotification,
  ) -> impl Future<Output = Result<Notification, Self::Error>> + Send + '_;

  /// All notifications in insertion order. No pagination, no filtering.
  fn list_notifications(
    &self,
  ) -> impl Future<Output = Result<Vec<Notification>, Self::Error>> + Send + '_;

  /// Retrieve one notification. Returns `None` if not found.
  fn get_notification(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Notification>, Self::Error>> + Send + '_;

  /// Set `delivered = true`. Returns `false` if no such notification exists.
  fn mark_delivered(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Set `clicked = true`. Returns `false` if no such notification exists.
  fn mark_clicked(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Subscriptions ─────────────────────────────────────────────────────

  /// Store an opaque push-subscription payload.
  fn save_subscription(
    &self,
    payload: serde_json::Value,
  ) -> impl Future<Output = Result<Subscription, Self::Error>> + Send + '_;

  /// Every stored subscription, oldest first.
  fn list_subscriptions(
    &self,
  ) -> impl Future<Output = Result<Vec<Subscription>, Self::Error>> + Send + '_;
}
