//! Outbound LINE push client.
//!
//! The channel access token is held as a [`SecretString`] and only exposed
//! when building the `Authorization` header. A client built without a token
//! fails every push with [`GatewayError::Config`] and never touches the
//! network.

use std::time::Duration;

use gymdesk_core::gateway::MessagingGateway;
use gymdesk_types::error::GatewayError;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, warn};

use super::types::{ApiErrorBody, OutgoingMessage, PushMessageRequest};

pub const DEFAULT_API_BASE_URL: &str = "https://api.line.me";

pub struct LineMessagingClient {
    client: reqwest::Client,
    access_token: Option<SecretString>,
    base_url: String,
}

impl LineMessagingClient {
    pub fn new(access_token: SecretString) -> Result<Self, GatewayError> {
        Self::build(Some(access_token))
    }

    /// Client for processes that never push (local CLI reads).
    pub fn unconfigured() -> Result<Self, GatewayError> {
        Self::build(None)
    }

    fn build(access_token: Option<SecretString>) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| GatewayError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            access_token,
            base_url: DEFAULT_API_BASE_URL.to_string(),
        })
    }

    /// Override the API base URL (tests, proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn is_configured(&self) -> bool {
        self.access_token.is_some()
    }
}

impl MessagingGateway for LineMessagingClient {
    async fn push_text(&self, recipient_id: &str, text: &str) -> Result<(), GatewayError> {
        let token = self.access_token.as_ref().ok_or_else(|| {
            GatewayError::Config(format!("{} is not set", super::ACCESS_TOKEN_ENV))
        })?;
        let url = format!("{}/v2/bot/message/push", self.base_url);
        let body = PushMessageRequest {
            to: recipient_id,
            messages: vec![OutgoingMessage::Text { text }],
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(token.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            debug!(recipient = %recipient_id, "push message accepted");
            return Ok(());
        }

        let raw = response.text().await.unwrap_or_default();
        let body = serde_json::from_str::<ApiErrorBody>(&raw)
            .map(|b| b.message)
            .unwrap_or(raw);
        warn!(recipient = %recipient_id, status = status.as_u16(), body = %body, "push message rejected");
        Err(GatewayError::Rejected {
            status: status.as_u16(),
            body,
        })
    }
}
