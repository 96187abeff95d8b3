//! gymdesk CLI and HTTP server entry point.
//!
//! Binary name: `gymdesk`
//!
//! Loads `.env`, parses CLI arguments, resolves the data directory and
//! `config.toml`, wires services, then dispatches to a command handler or
//! starts the HTTP server. LINE channel credentials are read from the
//! environment here and nowhere else.

mod cli;
mod http;
mod state;

use anyhow::Context;
use clap::Parser;
use clap_complete::generate;
use tracing::{info, warn};

use gymdesk_infra::config::{load_config, resolve_data_dir};
use gymdesk_infra::line::LineCredentials;
use gymdesk_infra::sqlite::session::SqliteSessionRepository;
use gymdesk_observe::tracing_setup::{TracingOptions, init_tracing, shutdown_tracing};
use gymdesk_types::config::AppConfig;

use cli::unread::UnreadCommand;
use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is normal in production.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let options = TracingOptions {
        json: cli.log_json,
        otel: cli.otel,
        ..TracingOptions::for_verbosity(cli.verbose, cli.quiet)
    };
    init_tracing(&options).map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    // Shell completions don't need app state
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "gymdesk", &mut std::io::stdout());
        return Ok(());
    }

    let result = run(cli).await;
    shutdown_tracing();
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let data_dir = resolve_data_dir();
    let config = load_config(&data_dir).await;

    // Remote watching talks to another process; no local database needed.
    if let Commands::Unread {
        action:
            UnreadCommand::Watch {
                server: Some(server),
                token,
                interval_ms,
            },
    } = &cli.command
    {
        let settings = cli::unread::watch_settings(&config.poller, *interval_ms);
        return cli::unread::watch_remote(server, token.clone(), settings, cli.json).await;
    }

    let line = match &cli.command {
        Commands::Serve { .. } => Some(
            LineCredentials::from_env()
                .context("the server needs LINE_CHANNEL_ACCESS_TOKEN and LINE_CHANNEL_SECRET")?,
        ),
        _ => LineCredentials::from_env()
            .inspect_err(|e| warn!(error = %e, "LINE credentials not configured; sending is disabled"))
            .ok(),
    };

    let state = AppState::init(data_dir, config, line).await?;

    match cli.command {
        Commands::Serve { port, host } => serve(state, host, port).await?,

        Commands::Unread { action } => match action {
            UnreadCommand::Count => cli::unread::unread_count(&state, cli.json).await?,
            UnreadCommand::Watch { interval_ms, .. } => {
                let settings = cli::unread::watch_settings(&state.config.poller, interval_ms);
                cli::unread::watch_local(&state, settings, cli.json).await?;
            }
        },

        Commands::Chat { action } => {
            cli::chat::handle_chat_command(action, &state, cli.json).await?;
        }

        Commands::Stats { action } => {
            cli::stats::handle_stats_command(action, &state, cli.json).await?;
        }

        Commands::Training { action } => {
            cli::training::handle_training_command(action, &state, cli.json).await?;
        }

        Commands::Staff { action } => {
            cli::staff::handle_staff_command(action, &state, cli.json).await?;
        }

        Commands::Completions { .. } => unreachable!("handled in main"),
    }

    Ok(())
}

/// Bind and serve until Ctrl+C or SIGTERM.
async fn serve(state: AppState, host: Option<String>, port: Option<u16>) -> anyhow::Result<()> {
    let addr = listen_addr(&state.config, host, port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    let sessions = SqliteSessionRepository::new(state.db_pool.clone());
    match sessions.purge_expired().await {
        Ok(0) => {}
        Ok(purged) => info!(purged, "purged expired sessions"),
        Err(e) => warn!(error = %e, "failed to purge expired sessions"),
    }

    println!(
        "  {} gymdesk listening on {}",
        console::style("*").green().bold(),
        console::style(format!("http://{addr}")).cyan()
    );
    println!("  {}", console::style("Press Ctrl+C to stop").dim());
    info!(%addr, data_dir = %state.data_dir.display(), "server started");

    let pool = state.db_pool.clone();
    let router = http::router::build_router(state);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool.close().await;
    println!("\n  Server stopped.");
    Ok(())
}

/// CLI flags override `config.toml`.
fn listen_addr(config: &AppConfig, host: Option<String>, port: Option<u16>) -> String {
    let host = host.unwrap_or_else(|| config.server.host.clone());
    let port = port.unwrap_or(config.server.port);
    format!("{host}:{port}")
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
