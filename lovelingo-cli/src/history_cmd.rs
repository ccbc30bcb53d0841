use anyhow::{Context, Result};
use clap::Subcommand;
use lovelingo_core::HistoryEntry;
use std::path::{Path, PathBuf};

use crate::app::App;

#[derive(Subcommand, Debug)]
pub enum HistoryCommand {
    /// Export completed actions
    Export {
        #[arg(long)]
        csv: PathBuf,
    },
}

pub fn run(app: &App, cmd: HistoryCommand) -> Result<()> {
    match cmd {
        HistoryCommand::Export { csv } => {
            let rows = app.planner.history(app.user())?;
            write_csv(&csv, &rows)?;
            println!("Wrote {} completed action(s) to {}", rows.len(), csv.display());
            Ok(())
        }
    }
}

pub fn write_csv(path: &Path, rows: &[HistoryEntry]) -> Result<()> {
    let mut w = csv::Writer::from_path(path).with_context(|| format!("create {}", path.display()))?;
    for row in rows {
        w.serialize(row).context("write csv row")?;
    }
    w.flush().with_context(|| format!("flush {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn exports_completed_rows_with_header() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = App::open(dir.path()).unwrap();
        let now = Utc.with_ymd_and_hms(2026, 5, 1, 18, 0, 0).unwrap();
        let e = app.planner.schedule_action("local", "as-2", now.date_naive(), None, now).unwrap();
        app.planner.schedule_action("local", "as-3", now.date_naive(), None, now).unwrap();
        app.planner.complete_scheduled_action("local", &e.id, now).unwrap();

        let out = dir.path().join("history.csv");
        run(&app, HistoryCommand::Export { csv: out.clone() }).unwrap();

        let text = std::fs::read_to_string(&out).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "scheduled_action_id,action_id,title,love_language,tier,scheduled_date,completed_at"
        );
        let row = lines.next().unwrap();
        assert!(row.contains("as-2"));
        assert!(row.contains("Prepare breakfast in bed"));
        assert!(row.contains("Acts of Service"));
        assert!(lines.next().is_none());
    }
}
