//! Configuration loading.
//!
//! Reads `config.toml` from the data directory (`~/.gymdesk/` by default) and
//! deserializes it into [`AppConfig`]. A missing or malformed file falls back
//! to defaults.

use std::path::{Path, PathBuf};

use gymdesk_types::config::AppConfig;

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "GYMDESK_DATA_DIR";

pub const CONFIG_FILE: &str = "config.toml";

/// Resolve the data directory.
///
/// Priority: `GYMDESK_DATA_DIR`, then `~/.gymdesk`, then `./.gymdesk`.
pub fn resolve_data_dir() -> PathBuf {
    resolve_data_dir_from(std::env::var(DATA_DIR_ENV).ok(), dirs::home_dir())
}

fn resolve_data_dir_from(env_dir: Option<String>, home: Option<PathBuf>) -> PathBuf {
    if let Some(dir) = env_dir.filter(|d| !d.trim().is_empty()) {
        return PathBuf::from(dir);
    }
    match home {
        Some(home) => home.join(".gymdesk"),
        None => PathBuf::from(".gymdesk"),
    }
}

/// Load `{data_dir}/config.toml`, falling back to defaults.
pub async fn load_config(data_dir: &Path) -> AppConfig {
    let config_path = data_dir.join(CONFIG_FILE);

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return AppConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return AppConfig::default();
        }
    };

    match toml::from_str::<AppConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!("Failed to parse {}: {err}, using defaults", config_path.display());
            AppConfig::default()
        }
    }
}
