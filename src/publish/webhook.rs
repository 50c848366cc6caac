//! Repository dispatch webhook

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use serde::Serialize;
use tracing::{error, info, instrument};

use crate::config::WebhookTarget;
use crate::constants::publish::{WEBHOOK_ACCEPT, WEBHOOK_EVENT_TYPE};
use crate::error::AppError;

/// Tells downstream consumers that published data changed.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, target: WebhookTarget<'_>) -> Result<(), AppError>;
}

#[derive(Debug, Serialize)]
struct DispatchPayload {
    event_type: &'static str,
}

/// Sends a single repository dispatch POST. Non-success responses are
/// returned as [`AppError::WebhookRejected`] and never retried.
pub struct WebhookNotifier {
    client: Client,
}

impl WebhookNotifier {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    #[instrument(skip(self, target), fields(url = target.url))]
    async fn notify(&self, target: WebhookTarget<'_>) -> Result<(), AppError> {
        let response = self
            .client
            .post(target.url)
            .header(ACCEPT, WEBHOOK_ACCEPT)
            .header(AUTHORIZATION, format!("token {}", target.auth))
            .json(&DispatchPayload {
                event_type: WEBHOOK_EVENT_TYPE,
            })
            .send()
            .await
            .map_err(|e| {
                error!("Webhook request failed: {e}");
                if e.is_timeout() {
                    AppError::network_timeout(target.url)
                } else if e.is_connect() {
                    AppError::network_connection(target.url, e.to_string())
                } else {
                    AppError::ApiFetch(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::webhook_rejected(status.as_u16(), body));
        }

        info!("Webhook accepted with status {status}");
        Ok(())
    }
}
