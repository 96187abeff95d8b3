//! LINE Messaging API integration.
//!
//! [`client::LineMessagingClient`] implements the outbound
//! [`MessagingGateway`](gymdesk_core::gateway::MessagingGateway) port;
//! [`webhook`] verifies and parses inbound webhook deliveries.

pub mod client;
pub mod types;
pub mod webhook;

use gymdesk_types::error::GatewayError;
use secrecy::SecretString;

/// Environment variable holding the channel access token.
pub const ACCESS_TOKEN_ENV: &str = "LINE_CHANNEL_ACCESS_TOKEN";
/// Environment variable holding the channel secret.
pub const CHANNEL_SECRET_ENV: &str = "LINE_CHANNEL_SECRET";

/// Channel credentials. Neither value appears in `Debug` output.
#[derive(Debug, Clone)]
pub struct LineCredentials {
    pub channel_access_token: SecretString,
    pub channel_secret: SecretString,
}

impl LineCredentials {
    pub fn new(channel_access_token: impl Into<String>, channel_secret: impl Into<String>) -> Self {
        Self {
            channel_access_token: SecretString::from(channel_access_token.into()),
            channel_secret: SecretString::from(channel_secret.into()),
        }
    }

    /// Read credentials from the process environment.
    ///
    /// Only the binary's startup code calls this; services receive the
    /// resulting value.
    pub fn from_env() -> Result<Self, GatewayError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, GatewayError> {
        let read = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or_else(|| GatewayError::Config(format!("{key} is not set")))
        };
        Ok(Self::new(read(ACCESS_TOKEN_ENV)?, read(CHANNEL_SECRET_ENV)?))
    }
}
