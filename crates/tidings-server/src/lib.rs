//! HTTP server wiring for Tidings.
//!
//! Mounts the JSON API from `tidings-api` under `/api` and adds request
//! tracing. Configuration is read by the binary and handed in as
//! [`ServerConfig`].

use std::{path::PathBuf, sync::Arc};

use axum::Router;
use serde::Deserialize;
use tidings_core::store::NotificationStore;
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_STORE_PATH: &str = "~/.local/share/tidings/tidings.db";

/// Runtime server configuration, deserialised from `config.toml` and
/// `TIDINGS_*` environment variables.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  pub store_path: PathBuf,
}

impl ServerConfig {
  /// Layer an optional TOML file under `TIDINGS_`-prefixed environment
  /// variables, on top of the built-in defaults.
  pub fn load(file: impl Into<PathBuf>) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .set_default("host", DEFAULT_HOST)?
      .set_default("port", i64::from(DEFAULT_PORT))?
      .set_default("store_path", DEFAULT_STORE_PATH)?
      .add_source(config::File::from(file.into()).required(false))
      .add_source(config::Environment::with_prefix("TIDINGS"))
      .build()?
      .try_deserialize()
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full application router for `store`.
pub fn router<S>(store: Arc<S>) -> Router
where
  S: NotificationStore + 'static,
{
  Router::new()
    .nest("/api", tidings_api::api_router(store))
    .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
  use std::io::Write as _;

  use axum::{
    body::Body,
    http::{Request, StatusCode},
  };
  use tidings_store_sqlite::SqliteStore;
  use tower::ServiceExt as _;

  use super::*;

  #[tokio::test]
  async fn api_is_mounted_under_prefix() {
    let store = Arc::new(SqliteStore::open_in_memory().await.unwrap());

    let resp = router(store.clone())
      .oneshot(Request::get("/api/notifications").body(Body::empty()).unwrap())
      .await
      .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"[]");

    let resp = router(store)
      .oneshot(Request::get("/notifications").body(Body::empty()).unwrap())
      .await
      .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  #[test]
  fn missing_config_file_falls_back_to_defaults() {
    let cfg = ServerConfig::load("/nonexistent/tidings.toml").unwrap();
    assert_eq!(cfg.host, DEFAULT_HOST);
    assert_eq!(cfg.port, DEFAULT_PORT);
    assert_eq!(cfg.store_path, PathBuf::from(DEFAULT_STORE_PATH));
    assert_eq!(cfg.address(), "127.0.0.1:5000");
  }

  #[test]
  fn config_file_overrides_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    let mut f = std::fs::File::create(&path).unwrap();
    writeln!(f, "port = 8080\nstore_path = \"/tmp/t.db\"").unwrap();

    let cfg = ServerConfig::load(&path).unwrap();
    assert_eq!(cfg.host, DEFAULT_HOST);
    assert_eq!(cfg.port, 8080);
    assert_eq!(cfg.store_path, PathBuf::from("/tmp/t.db"));
  }
}
