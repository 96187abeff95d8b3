//! Unread count fetched from a running gymdesk server.
//!
//! Lets a badge poller run in a separate process (CLI `unread watch --server`)
//! against `GET /api/v1/unread-count`.

use std::time::Duration;

use gymdesk_core::chat::poller::UnreadSource;
use gymdesk_types::error::{ChatError, GatewayError};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct Envelope {
    data: Option<UnreadCountBody>,
}

#[derive(Debug, Deserialize)]
struct UnreadCountBody {
    count: u64,
}

pub struct HttpUnreadSource {
    client: reqwest::Client,
    url: String,
    session_token: Option<SecretString>,
}

impl HttpUnreadSource {
    pub fn new(server_url: &str, session_token: Option<SecretString>) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(5))
            .build()
            .map_err(|e| GatewayError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            url: format!("{}/api/v1/unread-count", server_url.trim_end_matches('/')),
            session_token,
        })
    }
}

impl UnreadSource for HttpUnreadSource {
    async fn fetch_unread_count(&self) -> Result<u64, ChatError> {
        let mut request = self.client.get(&self.url);
        if let Some(token) = &self.session_token {
            request = request.bearer_auth(token.expose_secret());
        }

        let response = request
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::Rejected {
                status: status.as_u16(),
                body,
            }
            .into());
        }

        let envelope: Envelope = response
            .json()
            .await
            .map_err(|e| GatewayError::InvalidPayload(e.to_string()))?;
        envelope
            .data
            .map(|d| d.count)
            .ok_or_else(|| GatewayError::InvalidPayload("response has no data".to_string()).into())
    }
}
