//! Storage contract consumed by the planner, and an in-memory implementation.
//!
//! Read-your-writes is the only consistency requirement. Implementations
//! report storage failures as [`Error::Persistence`]; nothing here retries.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::action::Action;
use crate::catalog::ActionCatalog;
use crate::error::{Error, Result};
use crate::feedback::{FeedbackMap, FeedbackStore, Verdict};
use crate::reminders::Reminder;
use crate::schedule::{ScheduleStore, ScheduledAction, ScheduledActionPatch};
use crate::settings::NotificationSettings;

pub trait Repository {
    // --- Actions ---
    /// Custom actions authored by `user_id`.
    fn get_actions(&self, user_id: &str) -> Result<Vec<Action>>;
    fn create_action(&mut self, action: Action) -> Result<Action>;

    // --- Feedback ---
    fn rate_action(&mut self, user_id: &str, action_id: &str, verdict: Verdict) -> Result<FeedbackMap>;
    fn get_feedback(&self, user_id: &str) -> Result<FeedbackMap>;

    // --- Scheduled actions ---
    /// Ordered by scheduled date, then time of day.
    fn get_scheduled_actions(&self, user_id: &str) -> Result<Vec<ScheduledAction>>;
    fn create_scheduled_action(&mut self, entry: ScheduledAction) -> Result<ScheduledAction>;
    fn update_scheduled_action(
        &mut self,
        id: &str,
        patch: &ScheduledActionPatch,
        now: DateTime<Utc>,
    ) -> Result<ScheduledAction>;
    fn delete_scheduled_action(&mut self, id: &str) -> Result<ScheduledAction>;

    // --- Settings ---
    /// Stored settings, or the defaults when the user never saved any.
    fn get_notification_settings(&self, user_id: &str) -> Result<NotificationSettings>;
    fn upsert_notification_settings(
        &mut self,
        user_id: &str,
        settings: NotificationSettings,
    ) -> Result<NotificationSettings>;

    // --- Reminder inbox ---
    /// Newest first.
    fn get_reminders(&self, user_id: &str) -> Result<Vec<Reminder>>;
    fn append_reminders(&mut self, reminders: &[Reminder]) -> Result<()>;
    fn mark_reminder_read(&mut self, user_id: &str, id: &str) -> Result<Reminder>;
    /// Marks every unread reminder of `user_id` in one write. Returns how many changed.
    fn mark_all_reminders_read(&mut self, user_id: &str) -> Result<usize>;
}

/// Everything in memory. Serializable so a file-backed store can wrap it.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryRepository {
    actions: ActionCatalog,
    feedback: FeedbackStore,
    schedule: ScheduleStore,
    settings: HashMap<String, NotificationSettings>,
    reminders: Vec<Reminder>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Repository for MemoryRepository {
    fn get_actions(&self, user_id: &str) -> Result<Vec<Action>> {
        Ok(self.actions.owned_by(user_id).into_iter().cloned().collect())
    }

    fn create_action(&mut self, action: Action) -> Result<Action> {
        let stored = action.clone();
        self.actions.insert(action)?;
        Ok(stored)
    }

    fn rate_action(&mut self, user_id: &str, action_id: &str, verdict: Verdict) -> Result<FeedbackMap> {
        Ok(self.feedback.record_feedback(user_id, action_id, verdict))
    }

    fn get_feedback(&self, user_id: &str) -> Result<FeedbackMap> {
        Ok(self.feedback.feedback_for(user_id))
    }

    fn get_scheduled_actions(&self, user_id: &str) -> Result<Vec<ScheduledAction>> {
        let mut entries = self.schedule.list_for_user(user_id);
        entries.sort_by_key(|e| (e.scheduled_date, e.time_of_day));
        Ok(entries)
    }

    fn create_scheduled_action(&mut self, entry: ScheduledAction) -> Result<ScheduledAction> {
        self.schedule.create(entry).cloned()
    }

    fn update_scheduled_action(
        &mut self,
        id: &str,
        patch: &ScheduledActionPatch,
        now: DateTime<Utc>,
    ) -> Result<ScheduledAction> {
        self.schedule.update(id, patch, now)
    }

    fn delete_scheduled_action(&mut self, id: &str) -> Result<ScheduledAction> {
        self.schedule.delete(id)
    }

    fn get_notification_settings(&self, user_id: &str) -> Result<NotificationSettings> {
        Ok(self.settings.get(user_id).cloned().unwrap_or_default())
    }

    fn upsert_notification_settings(
        &mut self,
        user_id: &str,
        settings: NotificationSettings,
    ) -> Result<NotificationSettings> {
        self.settings.insert(user_id.to_string(), settings.clone());
        Ok(settings)
    }

    fn get_reminders(&self, user_id: &str) -> Result<Vec<Reminder>> {
        let mut out: Vec<Reminder> = self
            .reminders
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(out)
    }

    fn append_reminders(&mut self, reminders: &[Reminder]) -> Result<()> {
        self.reminders.extend_from_slice(reminders);
        Ok(())
    }

    fn mark_reminder_read(&mut self, user_id: &str, id: &str) -> Result<Reminder> {
        let r = self
            .reminders
            .iter_mut()
            .find(|r| r.id == id && r.user_id == user_id)
            .ok_or_else(|| Error::not_found("reminder", id))?;
        r.mark_read();
        Ok(r.clone())
    }

    fn mark_all_reminders_read(&mut self, user_id: &str) -> Result<usize> {
        let mut changed = 0;
        for r in self.reminders.iter_mut().filter(|r| r.user_id == user_id && !r.read) {
            r.mark_read();
            changed += 1;
        }
        Ok(changed)
    }
}
