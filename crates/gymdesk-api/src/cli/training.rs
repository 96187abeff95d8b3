//! Training log CLI subcommands.

use anyhow::Result;
use clap::Subcommand;
use console::style;
use dialoguer::Confirm;

use gymdesk_types::training::NewTrainingSet;

use crate::state::AppState;

#[derive(Subcommand)]
pub enum TrainingCommand {
    /// Record a training session for a member.
    Record {
        /// Member id.
        member_id: String,

        /// One set as `EXERCISE:WEIGHTxREPS`, e.g. "Bench Press:60x10".
        #[arg(long = "set", value_parser = parse_set, required = true)]
        sets: Vec<NewTrainingSet>,
    },

    /// Delete every training log and set.
    Clear {
        /// Skip confirmation prompt.
        #[arg(long)]
        force: bool,
    },
}

pub async fn handle_training_command(
    cmd: TrainingCommand,
    state: &AppState,
    json: bool,
) -> Result<()> {
    match cmd {
        TrainingCommand::Record { member_id, sets } => record(state, &member_id, sets, json).await,
        TrainingCommand::Clear { force } => clear(state, force, json).await,
    }
}

/// Parse `EXERCISE:WEIGHTxREPS`. The exercise name may itself contain ':'.
fn parse_set(raw: &str) -> Result<NewTrainingSet, String> {
    let (name, load) = raw
        .rsplit_once(':')
        .ok_or_else(|| format!("expected EXERCISE:WEIGHTxREPS, got '{raw}'"))?;
    let (weight, reps) = load
        .trim()
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WEIGHTxREPS, got '{load}'"))?;
    let weight: f64 = weight
        .trim()
        .parse()
        .map_err(|_| format!("invalid weight '{weight}'"))?;
    let reps: u32 = reps
        .trim()
        .parse()
        .map_err(|_| format!("invalid reps '{reps}'"))?;
    Ok(NewTrainingSet {
        exercise_name: name.trim().to_string(),
        weight,
        reps,
    })
}

async fn record(
    state: &AppState,
    member_id: &str,
    sets: Vec<NewTrainingSet>,
    json: bool,
) -> Result<()> {
    let (log, sets) = state.training.record_session(member_id, sets).await?;

    if json {
        let result = serde_json::json!({ "log": log, "sets": sets });
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!();
        println!(
            "  {} Recorded {} set(s) for {}",
            style("ok").green(),
            sets.len(),
            style(member_id).cyan()
        );
        println!("  {} {}", style("Log:").dim(), style(log.id).dim());
        println!();
    }
    Ok(())
}

async fn clear(state: &AppState, force: bool, json: bool) -> Result<()> {
    if !force {
        let confirmed = Confirm::new()
            .with_prompt(format!(
                "{} Permanently delete ALL training logs and sets?",
                style("!").red().bold()
            ))
            .default(false)
            .interact()?;

        if !confirmed {
            println!("  Cancelled.");
            return Ok(());
        }
    }

    let cleared = state.training.clear_all().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&cleared)?);
    } else {
        println!();
        println!(
            "  {} Deleted {} set(s) in {} log(s)",
            style("ok").green(),
            cleared.sets,
            cleared.logs
        );
        println!();
    }
    Ok(())
}
