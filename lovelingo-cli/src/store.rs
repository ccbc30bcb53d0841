//! JSON-file repository for the CLI.
//!
//! Nothing is cached between calls. Reads load the document from disk, and
//! writes load it, apply the change and rewrite it (temp file + rename), so
//! several `lovelingo` processes (a long-running `reminders watch` and a
//! one-off `schedule add`) see each other's writes. A failed save leaves the
//! file as it was.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use lovelingo_core::{
    Action, Error as CoreError, FeedbackMap, MemoryRepository, NotificationSettings, Reminder, Repository,
    Result as CoreResult, ScheduledAction, ScheduledActionPatch, Verdict,
};
use std::fs;
use std::path::PathBuf;
use tracing::debug;

#[derive(Debug)]
pub struct FileRepository {
    path: PathBuf,
}

impl FileRepository {
    /// Open `path`, which may not exist yet. An existing file must parse.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let repo = Self { path: path.into() };
        repo.load().with_context(|| format!("open store {}", repo.path.display()))?;
        Ok(repo)
    }

    fn load(&self) -> CoreResult<MemoryRepository> {
        if !self.path.exists() {
            return Ok(MemoryRepository::new());
        }
        let s = fs::read_to_string(&self.path)
            .map_err(|e| CoreError::persistence(format!("read {}: {e}", self.path.display())))?;
        serde_json::from_str(&s).map_err(|e| CoreError::persistence(format!("parse {}: {e}", self.path.display())))
    }

    fn persist(&self, doc: &MemoryRepository) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(doc).map_err(std::io::Error::other)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)
    }

    fn read<T>(&self, op: impl FnOnce(&MemoryRepository) -> CoreResult<T>) -> CoreResult<T> {
        op(&self.load()?)
    }

    fn write<T>(&mut self, op: impl FnOnce(&mut MemoryRepository) -> CoreResult<T>) -> CoreResult<T> {
        let mut doc = self.load()?;
        let out = op(&mut doc)?;
        self.persist(&doc)
            .map_err(|e| CoreError::persistence(format!("write {}: {e}", self.path.display())))?;
        debug!(path = %self.path.display(), "store saved");
        Ok(out)
    }
}

impl Repository for FileRepository {
    fn get_actions(&self, user_id: &str) -> CoreResult<Vec<Action>> {
        self.read(|r| r.get_actions(user_id))
    }

    fn create_action(&mut self, action: Action) -> CoreResult<Action> {
        self.write(|r| r.create_action(action))
    }

    fn rate_action(&mut self, user_id: &str, action_id: &str, verdict: Verdict) -> CoreResult<FeedbackMap> {
        self.write(|r| r.rate_action(user_id, action_id, verdict))
    }

    fn get_feedback(&self, user_id: &str) -> CoreResult<FeedbackMap> {
        self.read(|r| r.get_feedback(user_id))
    }

    fn get_scheduled_actions(&self, user_id: &str) -> CoreResult<Vec<ScheduledAction>> {
        self.read(|r| r.get_scheduled_actions(user_id))
    }

    fn create_scheduled_action(&mut self, entry: ScheduledAction) -> CoreResult<ScheduledAction> {
        self.write(|r| r.create_scheduled_action(entry))
    }

    fn update_scheduled_action(
        &mut self,
        id: &str,
        patch: &ScheduledActionPatch,
        now: DateTime<Utc>,
    ) -> CoreResult<ScheduledAction> {
        self.write(|r| r.update_scheduled_action(id, patch, now))
    }

    fn delete_scheduled_action(&mut self, id: &str) -> CoreResult<ScheduledAction> {
        self.write(|r| r.delete_scheduled_action(id))
    }

    fn get_notification_settings(&self, user_id: &str) -> CoreResult<NotificationSettings> {
        self.read(|r| r.get_notification_settings(user_id))
    }

    fn upsert_notification_settings(
        &mut self,
        user_id: &str,
        settings: NotificationSettings,
    ) -> CoreResult<NotificationSettings> {
        self.write(|r| r.upsert_notification_settings(user_id, settings))
    }

    fn get_reminders(&self, user_id: &str) -> CoreResult<Vec<Reminder>> {
        self.read(|r| r.get_reminders(user_id))
    }

    fn append_reminders(&mut self, reminders: &[Reminder]) -> CoreResult<()> {
        self.write(|r| r.append_reminders(reminders))
    }

    fn mark_reminder_read(&mut self, user_id: &str, id: &str) -> CoreResult<Reminder> {
        self.write(|r| r.mark_reminder_read(user_id, id))
    }

    fn mark_all_reminders_read(&mut self, user_id: &str) -> CoreResult<usize> {
        self.write(|r| r.mark_all_reminders_read(user_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 14, 9, 0, 0).unwrap()
    }

    #[test]
    fn writes_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");

        let mut repo = FileRepository::open(&path).unwrap();
        repo.rate_action("u", "pt-2", Verdict::Liked).unwrap();
        let entry = ScheduledAction::new("u", "pt-2", NaiveDate::from_ymd_opt(2026, 2, 14).unwrap(), now());
        let id = repo.create_scheduled_action(entry).unwrap().id;
        repo.update_scheduled_action(&id, &ScheduledActionPatch::complete(), now()).unwrap();

        let reopened = FileRepository::open(&path).unwrap();
        assert_eq!(reopened.get_feedback("u").unwrap().get("pt-2"), Some(&Verdict::Liked));
        let entries = reopened.get_scheduled_actions("u").unwrap();
        assert_eq!(entries.len(), 1);
        assert!(entries[0].completed);
    }

    #[test]
    fn failed_save_leaves_the_file_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        let mut repo = FileRepository::open(&path).unwrap();
        repo.rate_action("u", "pt-2", Verdict::Liked).unwrap();

        // A directory where the temp file goes makes the save fail.
        fs::create_dir_all(path.with_extension("json.tmp")).unwrap();
        let err = repo.rate_action("u", "qt-1", Verdict::Disliked).unwrap_err();
        assert!(matches!(err, CoreError::Persistence(_)));

        let feedback = repo.get_feedback("u").unwrap();
        assert_eq!(feedback.len(), 1);
        assert_eq!(feedback.get("pt-2"), Some(&Verdict::Liked));
    }

    #[test]
    fn two_handles_see_each_others_writes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        let day = NaiveDate::from_ymd_opt(2026, 2, 14).unwrap();

        let mut watcher = FileRepository::open(&path).unwrap();
        let mut other = FileRepository::open(&path).unwrap();
        other.create_scheduled_action(ScheduledAction::new("u", "qt-5", day, now())).unwrap();
        assert_eq!(watcher.get_scheduled_actions("u").unwrap().len(), 1);

        // A write through the older handle keeps the other handle's entry.
        watcher.create_scheduled_action(ScheduledAction::new("u", "rg-6", day, now())).unwrap();
        let reopened = FileRepository::open(&path).unwrap();
        let ids: Vec<String> = reopened.get_scheduled_actions("u").unwrap().into_iter().map(|e| e.action_id).collect();
        assert_eq!(ids.len(), 2);
        assert!(ids.contains(&"qt-5".to_string()));
        assert!(ids.contains(&"rg-6".to_string()));
    }

    #[test]
    fn corrupt_file_fails_to_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(FileRepository::open(&path).is_err());
    }

    #[test]
    fn missing_file_opens_empty() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileRepository::open(dir.path().join("nope.json")).unwrap();
        assert!(repo.get_scheduled_actions("u").unwrap().is_empty());
    }
}
