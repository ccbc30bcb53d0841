use anyhow::{Context, Result};
use chrono::Utc;
use clap::Subcommand;
use lovelingo_core::{parse_date, parse_time_of_day, ScheduledAction};

use crate::app::App;

#[derive(Subcommand, Debug)]
pub enum ScheduleCommand {
    /// Commit to doing an action on a date
    Add {
        action_id: String,

        /// YYYY-MM-DD (default: today in your settings timezone)
        #[arg(long)]
        date: Option<String>,

        /// "19:30" or "7:30pm"; omit for a date-only entry
        #[arg(long)]
        time: Option<String>,
    },

    /// List scheduled actions
    List {
        /// Include completed entries
        #[arg(long, default_value_t = false)]
        all: bool,
    },

    /// Mark a scheduled action done
    Complete { id: String },

    /// Delete a scheduled action
    Remove { id: String },
}

pub fn run(app: &mut App, cmd: ScheduleCommand) -> Result<()> {
    match cmd {
        ScheduleCommand::Add { action_id, date, time } => add(app, &action_id, date, time),
        ScheduleCommand::List { all } => list(app, all),
        ScheduleCommand::Complete { id } => complete(app, &id),
        ScheduleCommand::Remove { id } => {
            let user = app.user().to_string();
            let removed = app.planner.delete_scheduled_action(&user, &id)?;
            println!("Removed {} ({})", removed.id, removed.action_id);
            Ok(())
        }
    }
}

fn add(app: &mut App, action_id: &str, date: Option<String>, time: Option<String>) -> Result<()> {
    let user = app.user().to_string();
    let now = Utc::now();
    let date = match date {
        Some(d) => parse_date(&d)?,
        None => {
            let tz = app.planner.settings(&user)?.tz()?;
            now.with_timezone(&tz).date_naive()
        }
    };
    let time = time.map(|t| parse_time_of_day(&t)).transpose()?;

    let entry = app
        .planner
        .schedule_action(&user, action_id, date, time, now)
        .with_context(|| format!("schedule {action_id}"))?;
    println!("Scheduled {} for {}", entry.id, describe_when(&entry));
    Ok(())
}

fn describe_when(e: &ScheduledAction) -> String {
    match e.time_of_day {
        Some(t) => format!("{} {}", e.scheduled_date, t.format("%H:%M")),
        None => e.scheduled_date.to_string(),
    }
}

fn list(app: &App, all: bool) -> Result<()> {
    let user = app.user();
    let catalog = app.planner.catalog_for(user)?;
    let entries: Vec<ScheduledAction> = app
        .planner
        .scheduled(user)?
        .into_iter()
        .filter(|e| all || !e.completed)
        .collect();

    if entries.is_empty() {
        println!("Nothing scheduled.");
        return Ok(());
    }
    for e in entries {
        let title = catalog.get(&e.action_id).map(|a| a.title.as_str()).unwrap_or("(unknown action)");
        let mark = if e.completed { "x" } else { " " };
        println!("[{mark}] {:<16} {:<17} {}", describe_when(&e), e.id, title);
    }
    Ok(())
}

fn complete(app: &mut App, id: &str) -> Result<()> {
    let user = app.user().to_string();
    let now = Utc::now();
    let (entry, notice) = app.planner.complete_scheduled_action(&user, id, now)?;
    println!("Completed {}", entry.id);
    if let Some(n) = notice {
        println!("{}", n.message);
    }

    if let Some(action) = app.planner.catalog_for(&user)?.get(&entry.action_id) {
        let tz = app.planner.settings(&user)?.tz()?;
        let (lo, hi) = app.planner.next_window(&user, action.tier, now.with_timezone(&tz).date_naive())?;
        println!("Next {} action: sometime between {lo} and {hi}", action.tier.effort_text());
    }
    Ok(())
}
