//! Async HTTP client wrapping the Tidings JSON API.

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use reqwest::Client;
use tidings_core::{notification::Notification, subscription::Subscription};

/// Connection settings for the Tidings API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url: String,
}

/// Async HTTP client for the Tidings JSON REST API.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client: Client,
  config: ApiConfig,
}

impl ApiClient {
  pub fn new(config: ApiConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, config })
  }

  pub fn base_url(&self) -> &str { &self.config.base_url }

  fn url(&self, path: &str) -> String {
    format!(
      "{}/api{}",
      self.config.base_url.trim_end_matches('/'),
      path
    )
  }

  // ── Notifications ─────────────────────────────────────────────────────────

  /// `GET /api/notifications`
  pub async fn list_notifications(&self) -> Result<Vec<Notification>> {
    let resp = self
      .client
      .get(self.url("/notifications"))
      .send()
      .await
      .context("GET /notifications failed")?;

    if !resp.status().is_success() {
      return Err(anyhow!("GET /notifications → {}", resp.status()));
    }
    resp.json().await.context("deserialising notifications")
  }

  // ── Subscriptions ─────────────────────────────────────────────────────────

  /// `POST /api/subscriptions`
  pub async fn subscribe(&self, payload: &serde_json::Value) -> Result<Subscription> {
    let resp = self
      .client
      .post(self.url("/subscriptions"))
      .json(payload)
      .send()
      .await
      .context("POST /subscriptions failed")?;

    if !resp.status().is_success() {
      return Err(anyhow!("POST /subscriptions → {}", resp.status()));
    }
    resp.json().await.context("deserialising subscription")
  }
}
