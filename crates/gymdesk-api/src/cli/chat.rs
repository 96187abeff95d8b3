//! Conversation CLI subcommands.
//!
//! `send` pushes through the LINE Messaging API and needs
//! `LINE_CHANNEL_ACCESS_TOKEN` in the environment.

use anyhow::Result;
use clap::Subcommand;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;

use gymdesk_types::chat::{ChatMessage, MessageSender};

use crate::state::AppState;

#[derive(Subcommand)]
pub enum ChatCommand {
    /// List conversations with unread messages.
    #[command(alias = "ls")]
    List,

    /// Show a member's conversation, oldest first.
    History {
        /// Member's LINE user id.
        user_id: String,

        /// Number of most recent messages to show.
        #[arg(short = 'n', long)]
        limit: Option<i64>,
    },

    /// Push a staff message to a member.
    Send {
        /// Member's LINE user id.
        user_id: String,

        /// Message text.
        text: String,
    },

    /// Mark a member's messages as read.
    Read {
        /// Member's LINE user id.
        user_id: String,
    },
}

pub async fn handle_chat_command(cmd: ChatCommand, state: &AppState, json: bool) -> Result<()> {
    match cmd {
        ChatCommand::List => list_conversations(state, json).await,
        ChatCommand::History { user_id, limit } => history(state, &user_id, limit, json).await,
        ChatCommand::Send { user_id, text } => send(state, &user_id, &text, json).await,
        ChatCommand::Read { user_id } => mark_read(state, &user_id, json).await,
    }
}

async fn list_conversations(state: &AppState, json: bool) -> Result<()> {
    let conversations = state.read_state.unread_by_conversation().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&conversations)?);
        return Ok(());
    }

    if conversations.is_empty() {
        println!();
        println!("  {} No unread conversations", style("ok").green());
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Member").fg(Color::White),
        Cell::new("User ID").fg(Color::White),
        Cell::new("Unread").fg(Color::White),
        Cell::new("Last message").fg(Color::White),
    ]);

    for c in &conversations {
        table.add_row(vec![
            Cell::new(c.display_name.as_deref().unwrap_or("-")),
            Cell::new(&c.user_id).fg(Color::Cyan),
            Cell::new(c.unread_count).fg(Color::Red),
            Cell::new(format_time(&c.last_message_at)),
        ]);
    }

    println!();
    println!("{table}");
    println!();
    Ok(())
}

async fn history(state: &AppState, user_id: &str, limit: Option<i64>, json: bool) -> Result<()> {
    let messages = state.conversations.history(user_id, limit).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&messages)?);
        return Ok(());
    }

    println!();
    if messages.is_empty() {
        println!(
            "  {} No messages with {}",
            style("i").blue().bold(),
            style(user_id).cyan()
        );
    }
    for message in &messages {
        println!("{}", render_message(message));
    }
    println!();
    Ok(())
}

fn render_message(message: &ChatMessage) -> String {
    let who = match message.sender {
        MessageSender::User => format!("{}", style("member").cyan()),
        MessageSender::Staff => format!("{}", style("staff ").magenta()),
    };
    let unread = if message.sender == MessageSender::User && !message.is_read {
        format!(" {}", style("*").red().bold())
    } else {
        String::new()
    };
    format!(
        "  {} {} {}{}",
        style(format_time(&message.created_at)).dim(),
        who,
        message.text,
        unread
    )
}

async fn send(state: &AppState, user_id: &str, text: &str, json: bool) -> Result<()> {
    let message = state.conversations.send_staff_message(user_id, text).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&message)?);
    } else {
        println!();
        println!(
            "  {} Sent to {}",
            style("ok").green(),
            style(user_id).cyan()
        );
        println!();
    }
    Ok(())
}

async fn mark_read(state: &AppState, user_id: &str, json: bool) -> Result<()> {
    let updated = state.read_state.mark_messages_as_read(user_id).await?;

    if json {
        let result = serde_json::json!({ "success": true, "updated": updated });
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!();
        println!(
            "  {} Marked {} message(s) from {} as read",
            style("ok").green(),
            updated,
            style(user_id).cyan()
        );
        println!();
    }
    Ok(())
}

fn format_time(at: &chrono::DateTime<chrono::Utc>) -> String {
    at.with_timezone(&chrono::Local)
        .format("%Y-%m-%d %H:%M")
        .to_string()
}
