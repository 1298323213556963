//! API client library.
//!
//! A small reqwest client for the bridge daemon's HTTP API, used by the CLI.

use anyhow::{Context, Result};
use serde_json::Value;

use crate::api::v1::{InfoResponse, NotificationRequest};
use crate::relay::NotificationKind;

/// Client for one bridge daemon.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl ApiClient {
    /// Create a client for the daemon at `base_url`, e.g.
    /// `http://127.0.0.1:7786`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/v1{}", self.base_url, path)
    }

    /// Post a dashboard notification.
    pub async fn notify(&self, notification: &str, payload: Value) -> Result<()> {
        let req = NotificationRequest {
            notification: notification.to_string(),
            payload,
        };
        self.http
            .post(self.url("/notification"))
            .json(&req)
            .send()
            .await
            .context("failed to reach bridge")?
            .error_for_status()?;
        Ok(())
    }

    /// Ask the device to switch to `state`.
    pub async fn set_state(&self, state: &str) -> Result<()> {
        self.notify(
            NotificationKind::StateChange.as_ref(),
            serde_json::json!({ "state": state }),
        )
        .await
    }

    /// Raise an alert, which puts the device into the alarm state.
    pub async fn alert(&self) -> Result<()> {
        self.notify(NotificationKind::Alert.as_ref(), Value::Null).await
    }

    /// Check that the daemon is up.
    pub async fn health(&self) -> Result<String> {
        let body = self
            .http
            .get(self.url("/health"))
            .send()
            .await
            .context("failed to reach bridge")?
            .error_for_status()?
            .text()
            .await?;
        Ok(body)
    }

    /// Fetch the daemon's label and device settings.
    pub async fn info(&self) -> Result<InfoResponse> {
        let info = self
            .http
            .get(self.url("/info"))
            .send()
            .await
            .context("failed to reach bridge")?
            .error_for_status()?
            .json()
            .await?;
        Ok(info)
    }
}
