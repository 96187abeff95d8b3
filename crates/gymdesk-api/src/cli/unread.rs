//! Unread count and live badge watching.

use anyhow::Result;
use clap::Subcommand;
use console::style;
use secrecy::SecretString;

use gymdesk_core::chat::badge::badge_label;
use gymdesk_core::chat::poller::{BadgeSnapshot, PollerSettings, UnreadPoller, UnreadSource};
use gymdesk_infra::remote::HttpUnreadSource;
use gymdesk_types::config::PollerConfig;

use crate::state::AppState;

#[derive(Subcommand)]
pub enum UnreadCommand {
    /// Print the current unread count and badge.
    Count,

    /// Poll the unread count until Ctrl+C.
    Watch {
        /// Poll a running server instead of the local database.
        #[arg(long, env = "GYMDESK_SERVER_URL")]
        server: Option<String>,

        /// Session token for --server (from `POST /api/v1/sessions`).
        #[arg(long, env = "GYMDESK_SESSION_TOKEN", hide_env_values = true)]
        token: Option<String>,

        /// Poll interval in milliseconds (defaults to config.toml).
        #[arg(long)]
        interval_ms: Option<u64>,
    },
}

/// Print the global unread count.
pub async fn unread_count(state: &AppState, json: bool) -> Result<()> {
    let count = state.read_state.global_unread_count().await?;
    let badge = badge_label(count);

    if json {
        let result = serde_json::json!({ "count": count, "badge": badge });
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!();
        match badge {
            Some(label) => println!(
                "  {} unread {}",
                style(label).red().bold(),
                if count == 1 { "message" } else { "messages" },
            ),
            None => println!("  {} No unread messages", style("ok").green()),
        }
        println!();
    }
    Ok(())
}

/// Poller settings from config, with an optional interval override.
pub fn watch_settings(config: &PollerConfig, interval_ms: Option<u64>) -> PollerSettings {
    let mut config = config.clone();
    if let Some(ms) = interval_ms {
        config.interval_ms = ms;
    }
    PollerSettings::from(&config)
}

/// Watch a running server's unread count.
pub async fn watch_remote(
    server: &str,
    token: Option<String>,
    settings: PollerSettings,
    json: bool,
) -> Result<()> {
    let source = HttpUnreadSource::new(server, token.map(SecretString::from))?;
    if !json {
        println!(
            "  {} Watching {}",
            style("~").cyan().bold(),
            style(server).cyan()
        );
    }
    watch(source, settings, json).await
}

/// Watch the local database's unread count.
pub async fn watch_local(state: &AppState, settings: PollerSettings, json: bool) -> Result<()> {
    if !json {
        println!(
            "  {} Watching {}",
            style("~").cyan().bold(),
            style(state.data_dir.display()).cyan()
        );
    }
    watch(state.read_state.clone(), settings, json).await
}

async fn watch<S: UnreadSource + 'static>(
    source: S,
    settings: PollerSettings,
    json: bool,
) -> Result<()> {
    if !json {
        println!("  {}", style("Press Ctrl+C to stop").dim());
        println!();
    }

    let poller = UnreadPoller::new(source, settings).spawn();
    let mut snapshots = poller.subscribe();
    let mut last_printed: Option<BadgeSnapshot> = None;

    loop {
        tokio::select! {
            changed = snapshots.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = snapshots.borrow_and_update().clone();
                if json {
                    println!("{}", serde_json::to_string(&snapshot_json(&snapshot))?);
                } else if is_visible_change(last_printed.as_ref(), &snapshot) {
                    println!("{}", render_snapshot(&snapshot));
                }
                last_printed = Some(snapshot);
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    poller.stop().await;
    Ok(())
}

/// Only reprint when the badge or the stale flag changes.
fn is_visible_change(previous: Option<&BadgeSnapshot>, current: &BadgeSnapshot) -> bool {
    previous.is_none_or(|p| p.label != current.label || p.stale != current.stale)
}

fn snapshot_json(snapshot: &BadgeSnapshot) -> serde_json::Value {
    serde_json::json!({
        "count": snapshot.count,
        "badge": snapshot.label,
        "stale": snapshot.stale,
        "consecutive_failures": snapshot.consecutive_failures,
        "last_error": snapshot.last_error,
        "at": chrono::Utc::now(),
    })
}

fn render_snapshot(snapshot: &BadgeSnapshot) -> String {
    let time = chrono::Local::now().format("%H:%M:%S");
    let badge = match &snapshot.label {
        Some(label) => format!("{}", style(label).red().bold()),
        None => format!("{}", style("-").dim()),
    };
    if snapshot.stale {
        let error = snapshot.last_error.as_deref().unwrap_or("unknown error");
        format!(
            "  {}  {}  {} {}",
            style(time).dim(),
            badge,
            style("stale").yellow(),
            style(error).dim(),
        )
    } else {
        format!("  {}  {}", style(time).dim(), badge)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn snapshot(count: u64, stale: bool) -> BadgeSnapshot {
        BadgeSnapshot {
            count,
            label: badge_label(count),
            stale,
            ..Default::default()
        }
    }

    #[test]
    fn interval_override_wins_over_config() {
        let config = PollerConfig {
            interval_ms: 3_000,
            max_backoff_ms: 60_000,
        };
        assert_eq!(watch_settings(&config, None).interval, Duration::from_secs(3));
        assert_eq!(
            watch_settings(&config, Some(500)).interval,
            Duration::from_millis(500)
        );
    }

    #[test]
    fn unchanged_badge_is_not_reprinted() {
        assert!(is_visible_change(None, &snapshot(0, false)));
        assert!(!is_visible_change(Some(&snapshot(2, false)), &snapshot(2, false)));
        assert!(is_visible_change(Some(&snapshot(2, false)), &snapshot(3, false)));
        assert!(is_visible_change(Some(&snapshot(2, false)), &snapshot(2, true)));
        // 150 and 200 render the same "99+" badge.
        assert!(!is_visible_change(Some(&snapshot(150, false)), &snapshot(200, false)));
    }

    #[test]
    fn snapshot_json_carries_badge() {
        let value = snapshot_json(&snapshot(150, false));
        assert_eq!(value["count"], 150);
        assert_eq!(value["badge"], "99+");
        assert_eq!(value["stale"], false);
    }
}
