//! CLI command definitions for the `gymdesk` binary.
//!
//! Uses clap derive macros. Subcommands follow a noun-verb pattern
//! (`gymdesk unread count`, `gymdesk chat send U123 "hi"`).

pub mod chat;
pub mod staff;
pub mod stats;
pub mod training;
pub mod unread;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Staff back office for a personal-training gym.
#[derive(Parser)]
#[command(name = "gymdesk", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Export spans to stdout through OpenTelemetry.
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server (API, staff pages, LINE webhook).
    Serve {
        /// Port to listen on (defaults to config.toml).
        #[arg(short, long, env = "GYMDESK_PORT")]
        port: Option<u16>,

        /// Host to bind to (defaults to config.toml).
        #[arg(long, env = "GYMDESK_HOST")]
        host: Option<String>,
    },

    /// Unread message count and badge.
    Unread {
        #[command(subcommand)]
        action: unread::UnreadCommand,
    },

    /// Member conversations (list, history, send, read).
    Chat {
        #[command(subcommand)]
        action: chat::ChatCommand,
    },

    /// Training statistics for a member.
    Stats {
        #[command(subcommand)]
        action: stats::StatsCommand,
    },

    /// Training log administration.
    Training {
        #[command(subcommand)]
        action: training::TrainingCommand,
    },

    /// Staff accounts.
    Staff {
        #[command(subcommand)]
        action: staff::StaffCommand,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}
