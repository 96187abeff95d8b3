//! Configuration types for gymdesk.
//!
//! `AppConfig` represents the top-level `config.toml` in the data directory.
//! Every section and field has a default, so a partial (or empty) file is valid.
//! Channel credentials are never part of this file; they come from the
//! environment at the composition root.

use serde::{Deserialize, Serialize};

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub poller: PollerConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub line: LineConfig,
}

/// HTTP listener settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Unread badge poller timing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollerConfig {
    /// Delay between successful polls, in milliseconds.
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
    /// Upper bound for the failure backoff delay, in milliseconds.
    #[serde(default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,
}

fn default_interval_ms() -> u64 {
    3_000
}

fn default_max_backoff_ms() -> u64 {
    60_000
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            max_backoff_ms: default_max_backoff_ms(),
        }
    }
}

/// Route protection and session settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Path prefixes that require an authenticated staff session.
    #[serde(default = "default_protected_prefixes")]
    pub protected_prefixes: Vec<String>,
    /// Where unauthenticated page requests are redirected.
    #[serde(default = "default_login_path")]
    pub login_path: String,
    #[serde(default = "default_session_ttl_hours")]
    pub session_ttl_hours: u32,
}

fn default_protected_prefixes() -> Vec<String> {
    vec!["/dashboard".to_string(), "/settings".to_string()]
}

fn default_login_path() -> String {
    "/login".to_string()
}

fn default_session_ttl_hours() -> u32 {
    24 * 7
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            protected_prefixes: default_protected_prefixes(),
            login_path: default_login_path(),
            session_ttl_hours: default_session_ttl_hours(),
        }
    }
}

/// LINE Messaging API endpoint settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineConfig {
    #[serde(default = "default_line_api_base")]
    pub api_base_url: String,
}

fn default_line_api_base() -> String {
    "https://api.line.me".to_string()
}

impl Default for LineConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_line_api_base(),
        }
    }
}
