//! Staff account CLI subcommands.

use anyhow::Result;
use clap::Subcommand;
use console::style;
use dialoguer::{Input, Password};

use gymdesk_types::user::CreateStaffRequest;

use crate::state::AppState;

#[derive(Subcommand)]
pub enum StaffCommand {
    /// Create a staff account that can log in to the dashboard.
    Create {
        /// Display name (prompted if omitted).
        #[arg(long)]
        name: Option<String>,

        /// Login email (prompted if omitted).
        #[arg(long)]
        email: Option<String>,

        /// Job title, e.g. "Head Trainer".
        #[arg(long)]
        title: Option<String>,

        /// Password (prompted if omitted).
        #[arg(long, env = "GYMDESK_STAFF_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
}

pub async fn handle_staff_command(cmd: StaffCommand, state: &AppState, json: bool) -> Result<()> {
    match cmd {
        StaffCommand::Create {
            name,
            email,
            title,
            password,
        } => create_staff(state, name, email, title, password, json).await,
    }
}

async fn create_staff(
    state: &AppState,
    name: Option<String>,
    email: Option<String>,
    title: Option<String>,
    password: Option<String>,
    json: bool,
) -> Result<()> {
    let name = match name {
        Some(n) => n,
        None => Input::new().with_prompt("Name").interact_text()?,
    };
    let email = match email {
        Some(e) => e,
        None => Input::new().with_prompt("Email").interact_text()?,
    };
    let password = match password {
        Some(p) => p,
        None => Password::new()
            .with_prompt("Password")
            .with_confirmation("Confirm password", "Passwords do not match")
            .interact()?,
    };

    let user = state
        .staff
        .create_staff(CreateStaffRequest {
            name,
            email,
            title,
            password,
        })
        .await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&user)?);
    } else {
        println!();
        println!(
            "  {} Created staff account {} <{}>",
            style("ok").green(),
            style(&user.name).cyan().bold(),
            user.email
        );
        println!(
            "  {}",
            style(format!("Log in at {}", state.config.auth.login_path)).dim()
        );
        println!();
    }
    Ok(())
}
