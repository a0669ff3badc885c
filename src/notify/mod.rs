//! Notification relay
//!
//! Webhook handlers queue [`Notification`]s on a bounded channel; the
//! [`Relay`] drains it and posts each one to the configured chat webhook.

use std::time::Duration;

use reqwest::Client;
use serde::Serialize;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::config::NotifyConfig;

/// Queue depth before webhook handlers start waiting
pub const CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("notification request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("notification webhook returned {0}")]
    Status(reqwest::StatusCode),
}

/// A message bound for a chat channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub channel_id: u64,
    pub content: String,
}

#[derive(Serialize)]
struct WebhookMessage<'a> {
    content: &'a str,
}

pub fn channel() -> (mpsc::Sender<Notification>, mpsc::Receiver<Notification>) {
    mpsc::channel(CHANNEL_CAPACITY)
}

/// Delivers notifications to a chat webhook, or logs them when none is set
#[derive(Debug, Clone)]
pub struct Relay {
    client: Client,
    webhook_url: Option<String>,
}

impl Relay {
    pub fn new(config: &NotifyConfig) -> Result<Self, RelayError> {
        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;
        Ok(Self {
            client,
            webhook_url: config.webhook_url.clone(),
        })
    }

    /// Deliver one notification
    pub async fn deliver(&self, notification: &Notification) -> Result<(), RelayError> {
        let Some(url) = &self.webhook_url else {
            info!(
                "Notification for channel {}: {}",
                notification.channel_id, notification.content
            );
            return Ok(());
        };

        let response = self
            .client
            .post(url)
            .json(&WebhookMessage {
                content: &notification.content,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(RelayError::Status(response.status()));
        }

        debug!("Delivered notification to channel {}", notification.channel_id);
        Ok(())
    }

    /// Drain `rx` until every sender is dropped
    pub async fn run(self, mut rx: mpsc::Receiver<Notification>) {
        while let Some(notification) = rx.recv().await {
            if let Err(e) = self.deliver(&notification).await {
                warn!(
                    "Could not deliver notification to channel {}: {}",
                    notification.channel_id, e
                );
            }
        }
        debug!("Notification relay stopped");
    }
}
