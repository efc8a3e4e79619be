//! Handler for `POST /webhook`, the CRM ingestion point.
//!
//! The body is validated before anything touches the store, so a malformed
//! payload never becomes a notification.

use std::sync::Arc;

use axum::{
  Json,
  extract::{State, rejection::JsonRejection},
};
use tidings_core::{
  notification::{Notification, WebhookPayload},
  store::NotificationStore,
};

use crate::error::ApiError;

/// `POST /webhook`. Body: [`WebhookPayload`]; returns the stored
/// notification.
pub async fn ingest<S>(
  State(store): State<Arc<S>>,
  payload: Result<Json<WebhookPayload>, JsonRejection>,
) -> Result<Json<Notification>, ApiError>
where
  S: NotificationStore,
{
  let Json(payload) = payload?;
  let input = payload.validate()?;

  let created = store
    .create_notification(input)
    .await
    .map_err(|e| ApiError::store("Internal server error", e))?;

  let subscribers = store
    .list_subscriptions()
    .await
    .map_err(|e| ApiError::store("Internal server error", e))?
    .len();

  // No push transport yet; log the fan-out.
  tracing::info!(
    notification = created.id,
    subscribers,
    "Sending notification to {subscribers} subscribers"
  );

  Ok(Json(created))
}
