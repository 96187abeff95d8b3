//! Training statistics CLI subcommands.

use anyhow::Result;
use clap::Subcommand;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;

use crate::state::AppState;

#[derive(Subcommand)]
pub enum StatsCommand {
    /// Heaviest and lightest set for an exercise.
    Show {
        /// Member id.
        member_id: String,

        /// Exercise name, e.g. "Bench Press".
        exercise: String,
    },

    /// Exercises a member has logged.
    Exercises {
        /// Member id.
        member_id: String,
    },
}

pub async fn handle_stats_command(cmd: StatsCommand, state: &AppState, json: bool) -> Result<()> {
    match cmd {
        StatsCommand::Show {
            member_id,
            exercise,
        } => show(state, &member_id, &exercise, json).await,
        StatsCommand::Exercises { member_id } => exercises(state, &member_id, json).await,
    }
}

async fn show(state: &AppState, member_id: &str, exercise: &str, json: bool) -> Result<()> {
    let stats = state.training.exercise_stats(member_id, exercise).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!();
    let Some(stats) = stats else {
        println!(
            "  {} No {} sets logged for {}",
            style("i").blue().bold(),
            style(exercise).cyan(),
            style(member_id).cyan()
        );
        println!();
        return Ok(());
    };

    println!(
        "  {} for {}",
        style(exercise).cyan().bold(),
        style(member_id).cyan()
    );
    println!();

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("").fg(Color::White),
        Cell::new("Weight (kg)").fg(Color::White),
        Cell::new("Reps").fg(Color::White),
        Cell::new("Date").fg(Color::White),
    ]);
    for (label, color, point) in [
        ("Max", Color::Green, &stats.max),
        ("Min", Color::Yellow, &stats.min),
    ] {
        table.add_row(vec![
            Cell::new(label).fg(color),
            Cell::new(point.weight),
            Cell::new(point.reps),
            Cell::new(&point.date),
        ]);
    }
    println!("{table}");
    println!();
    Ok(())
}

async fn exercises(state: &AppState, member_id: &str, json: bool) -> Result<()> {
    let names = state.training.exercise_names(member_id).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&names)?);
        return Ok(());
    }

    println!();
    if names.is_empty() {
        println!(
            "  {} No training logged for {}",
            style("i").blue().bold(),
            style(member_id).cyan()
        );
    }
    for name in &names {
        println!("  - {name}");
    }
    println!();
    Ok(())
}
