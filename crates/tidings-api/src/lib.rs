//! JSON REST API for Tidings.
//!
//! Exposes an axum [`Router`] backed by any
//! [`tidings_core::store::NotificationStore`]. TLS and transport concerns are
//! the caller's responsibility; there is no authentication.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", tidings_api::api_router(store.clone()))
//! ```

pub mod error;
pub mod notifications;
pub mod subscriptions;
pub mod webhook;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use tidings_core::store::NotificationStore;

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: NotificationStore + 'static,
{
  Router::new()
    // Ingestion
    .route("/webhook", post(webhook::ingest::<S>))
    .route("/subscriptions", post(subscriptions::create::<S>))
    // Notifications
    .route("/notifications", get(notifications::list::<S>))
    .route("/notifications/{id}", get(notifications::get::<S>))
    .route("/notifications/{id}/click", post(notifications::click::<S>))
    .route("/notifications/{id}/delivered", post(notifications::delivered::<S>))
    .with_state(store)
}
