//! Handler for `POST /subscriptions`.

use std::sync::Arc;

use axum::{
  Json,
  extract::{State, rejection::JsonRejection},
};
use tidings_core::{store::NotificationStore, subscription::Subscription};

use crate::error::ApiError;

/// `POST /subscriptions`. Body: any JSON push-subscription object, stored
/// verbatim. Returns the stored subscription.
pub async fn create<S>(
  State(store): State<Arc<S>>,
  body: Result<Json<serde_json::Value>, JsonRejection>,
) -> Result<Json<Subscription>, ApiError>
where
  S: NotificationStore,
{
  let Json(payload) = body?;
  let subscription = store
    .save_subscription(payload)
    .await
    .map_err(|e| ApiError::store("Failed to save subscription", e))?;

  tracing::info!(subscription = subscription.id, "saved push subscription");
  Ok(Json(subscription))
}
