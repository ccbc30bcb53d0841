use anyhow::{bail, Result};
use chrono::{DateTime, Utc};
use clap::Subcommand;
use lovelingo_core::{unread_count, Reminder, ReminderPriority};
use std::time::Duration;
use tracing::{info, warn};

use crate::app::App;

#[derive(Subcommand, Debug)]
pub enum RemindersCommand {
    /// Check scheduled actions once and store any new reminders
    Scan,

    /// Show the reminder inbox, newest first
    List {
        #[arg(long, default_value_t = false)]
        unread: bool,

        #[arg(long, default_value_t = 20)]
        limit: usize,
    },

    /// Mark a reminder (or all of them) as read
    Read {
        id: Option<String>,

        #[arg(long, default_value_t = false)]
        all: bool,
    },

    /// Scan on a timer until Ctrl-C
    Watch {
        /// Minutes between scans (default from config [watch].interval_minutes)
        #[arg(long)]
        interval_minutes: Option<u64>,
    },
}

pub async fn run(app: &mut App, cmd: RemindersCommand) -> Result<()> {
    match cmd {
        RemindersCommand::Scan => {
            let fresh = scan_once(app, Utc::now())?;
            if fresh.is_empty() {
                println!("No new reminders.");
            }
            for r in &fresh {
                println!("{}", format_reminder(r));
            }
            Ok(())
        }
        RemindersCommand::List { unread, limit } => list(app, unread, limit),
        RemindersCommand::Read { id, all } => read(app, id, all),
        RemindersCommand::Watch { interval_minutes } => watch(app, interval_minutes).await,
    }
}

pub fn scan_once(app: &mut App, now: DateTime<Utc>) -> Result<Vec<Reminder>> {
    let user = app.user().to_string();
    Ok(app.planner.scan_reminders(&user, now)?)
}

pub fn format_reminder(r: &Reminder) -> String {
    let flag = match r.priority {
        ReminderPriority::High => "!!",
        ReminderPriority::Medium => "! ",
        ReminderPriority::Normal => "  ",
    };
    let read = if r.read { " " } else { "*" };
    format!(
        "{read}{flag} {} {:<22} [{}] {}\n      {}",
        r.created_at.format("%Y-%m-%d %H:%M"),
        r.id,
        r.kind,
        r.title,
        r.message
    )
}

pub fn inbox_summary(inbox: &[Reminder]) -> String {
    format!("{} reminder(s), {} unread", inbox.len(), unread_count(inbox))
}

fn list(app: &App, unread: bool, limit: usize) -> Result<()> {
    let inbox = app.planner.reminders(app.user())?;
    if inbox.is_empty() {
        println!("Inbox is empty.");
        return Ok(());
    }
    println!("{}\n", inbox_summary(&inbox));
    for r in inbox.iter().filter(|r| !unread || !r.read).take(limit) {
        println!("{}", format_reminder(r));
    }
    Ok(())
}

fn read(app: &mut App, id: Option<String>, all: bool) -> Result<()> {
    let user = app.user().to_string();
    match (id, all) {
        (_, true) => {
            let n = app.planner.mark_all_read(&user)?;
            println!("Marked {n} reminder(s) read.");
        }
        (Some(id), false) => {
            let r = app.planner.mark_reminder_read(&user, &id)?;
            println!("Read: {}", r.title);
        }
        (None, false) => bail!("pass a reminder id or --all"),
    }
    Ok(())
}

async fn watch(app: &mut App, interval_minutes: Option<u64>) -> Result<()> {
    let minutes = interval_minutes.unwrap_or(app.config.watch.interval_minutes).max(1);
    let mut tick = tokio::time::interval(Duration::from_secs(minutes * 60));
    info!(minutes, "reminder watch started");
    println!("Scanning every {minutes} minute(s). Ctrl-C to stop.");

    loop {
        tokio::select! {
            _ = tick.tick() => {
                match scan_once(app, Utc::now()) {
                    Ok(fresh) => {
                        for r in &fresh {
                            println!("{}", format_reminder(r));
                        }
                    }
                    // Keep watching; the next tick retries.
                    Err(e) => warn!(error = %e, "reminder scan failed"),
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("reminder watch stopped");
                break;
            }
        }
    }
    Ok(())
}
