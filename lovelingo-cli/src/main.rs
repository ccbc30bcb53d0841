use anyhow::Result;
use clap::{Parser, Subcommand};
use lovelingo_core::Verdict;
use std::path::Path;

mod actions_cmd;
mod app;
mod config;
mod history_cmd;
mod profile_cmd;
mod reminders_cmd;
mod schedule_cmd;
mod settings_cmd;
mod state;
mod store;

use app::App;

#[derive(Parser, Debug)]
#[command(
    name = "lovelingo",
    version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("LOVELINGO_BUILD_SHA"), ")"),
    about = "Love-language action planner"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create ~/.lovelingo with a default config
    Init,

    /// Partner profile and love-language quiz
    Profile {
        #[command(subcommand)]
        command: profile_cmd::ProfileCommand,
    },

    /// Browse or extend the action catalog
    Actions {
        #[command(subcommand)]
        command: actions_cmd::ActionsCommand,
    },

    /// Suggest actions for your partner
    Recommend {
        /// How many (default from config [recommend].count)
        #[arg(long, allow_negative_numbers = true)]
        count: Option<i64>,
    },

    /// Like or dislike an action
    Rate { action_id: String, verdict: Verdict },

    /// Scheduled actions
    Schedule {
        #[command(subcommand)]
        command: schedule_cmd::ScheduleCommand,
    },

    /// Notification settings
    Settings {
        #[command(subcommand)]
        command: settings_cmd::SettingsCommand,
    },

    /// Reminder scanning and inbox
    Reminders {
        #[command(subcommand)]
        command: reminders_cmd::RemindersCommand,
    },

    /// Completed-action history
    History {
        #[command(subcommand)]
        command: history_cmd::HistoryCommand,
    },
}

fn init_tracing(default_filter: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let home = state::ensure_lovelingo_home()?;
    let config = config::load_config(&home)?;
    init_tracing(&config.log_filter);
    let mut app = App::with_config(&home, config)?;

    match cli.command {
        Command::Init => init(&home)?,
        Command::Profile { command } => profile_cmd::run(&mut app, command)?,
        Command::Actions { command } => actions_cmd::run(&mut app, command)?,
        Command::Recommend { count } => recommend(&app, count)?,
        Command::Rate { action_id, verdict } => {
            let user = app.user().to_string();
            app.planner.record_feedback(&user, &action_id, verdict)?;
            println!("Recorded: {action_id} {verdict}");
        }
        Command::Schedule { command } => schedule_cmd::run(&mut app, command)?,
        Command::Settings { command } => settings_cmd::run(&mut app, command)?,
        Command::Reminders { command } => reminders_cmd::run(&mut app, command).await?,
        Command::History { command } => history_cmd::run(&app, command)?,
    }

    Ok(())
}

fn init(home: &Path) -> Result<()> {
    if config::init_config(home)? {
        println!("Wrote {}", config::config_path(home).display());
    } else {
        println!("Config already exists: {}", config::config_path(home).display());
    }
    println!("Data: {}", state::store_path(home).display());

    println!("\nNext steps:");
    println!("- lovelingo profile quiz");
    println!("- lovelingo recommend");
    println!("- lovelingo schedule add <action-id> --date YYYY-MM-DD");
    Ok(())
}

fn recommend(app: &App, count: Option<i64>) -> Result<()> {
    let profile = state::read_profile(&app.home)?;
    let core = profile.to_core()?;
    let count = count.unwrap_or(app.config.recommend.count);
    let recs = app.planner.recommend_for(app.user(), &core, count)?;

    let who = profile.partner_name.as_deref().unwrap_or("your partner");
    println!("Ideas for {who} ({}):\n", core.primary);
    if recs.is_empty() {
        println!("(nothing to suggest)");
    }
    for s in &recs {
        println!("{:>5.2}  {}", s.score, actions_cmd::format_action(&s.action));
    }
    Ok(())
}
