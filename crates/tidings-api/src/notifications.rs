//! Handlers for `/notifications` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/notifications` | Every notification; filtering happens client-side |
//! | `GET`  | `/notifications/{id}` | One notification; 404 if unknown |
//! | `POST` | `/notifications/{id}/click` | Marks clicked; 404 if unknown |
//! | `POST` | `/notifications/{id}/delivered` | Marks delivered; 404 if unknown |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State, rejection::PathRejection},
};
use serde_json::{Value, json};
use tidings_core::{notification::Notification, store::NotificationStore};

use crate::error::ApiError;

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /notifications`
pub async fn list<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<Notification>>, ApiError>
where
  S: NotificationStore,
{
  let notifications = store
    .list_notifications()
    .await
    .map_err(|e| ApiError::store("Failed to fetch notifications", e))?;
  Ok(Json(notifications))
}

/// `GET /notifications/{id}`
pub async fn get<S>(
  State(store): State<Arc<S>>,
  id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Notification>, ApiError>
where
  S: NotificationStore,
{
  let Path(id) = id?;
  store
    .get_notification(id)
    .await
    .map_err(|e| ApiError::store("Failed to fetch notification", e))?
    .map(Json)
    .ok_or_else(|| ApiError::NotFound(format!("notification {id} not found")))
}

// ─── Flags ────────────────────────────────────────────────────────────────────

/// `POST /notifications/{id}/click`
pub async fn click<S>(
  State(store): State<Arc<S>>,
  id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Value>, ApiError>
where
  S: NotificationStore,
{
  let Path(id) = id?;
  let found = store
    .mark_clicked(id)
    .await
    .map_err(|e| ApiError::store("Failed to track click", e))?;
  flag_response(id, found)
}

/// `POST /notifications/{id}/delivered`
pub async fn delivered<S>(
  State(store): State<Arc<S>>,
  id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Value>, ApiError>
where
  S: NotificationStore,
{
  let Path(id) = id?;
  let found = store
    .mark_delivered(id)
    .await
    .map_err(|e| ApiError::store("Failed to track delivery", e))?;
  flag_response(id, found)
}

fn flag_response(id: i64, found: bool) -> Result<Json<Value>, ApiError> {
  if !found {
    return Err(ApiError::NotFound(format!("notification {id} not found")));
  }
  Ok(Json(json!({ "success": true })))
}
