//! Planner: the per-user service a front end talks to.
//!
//! Combines the built-in catalog with a [`Repository`] and runs the
//! recommendation engine and reminder scanner over repository snapshots.
//! Every write goes to the repository first; the planner itself keeps no
//! per-user state, so a failed write leaves nothing half-applied here.

use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::action::{Action, ActionDraft};
use crate::catalog::ActionCatalog;
use crate::error::{Error, Result};
use crate::feedback::{FeedbackMap, Verdict};
use crate::language::{LoveLanguage, Tier};
use crate::recommend::{recommend, validate_count, Profile, ScoredAction};
use crate::reminders::{completion_notice, scan, Reminder};
use crate::repository::Repository;
use crate::schedule::{ScheduledAction, ScheduledActionPatch};
use crate::settings::NotificationSettings;

/// One completed action, flattened for export.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryEntry {
    pub scheduled_action_id: String,
    pub action_id: String,
    pub title: String,
    pub love_language: Option<LoveLanguage>,
    pub tier: Option<Tier>,
    pub scheduled_date: NaiveDate,
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug)]
pub struct Planner<R: Repository> {
    repo: R,
    base: ActionCatalog,
}

impl<R: Repository> Planner<R> {
    /// Planner over the built-in seed actions.
    pub fn new(repo: R) -> Self {
        Self::with_catalog(repo, ActionCatalog::seeded())
    }

    pub fn with_catalog(repo: R, base: ActionCatalog) -> Self {
        Self { repo, base }
    }

    pub fn into_repository(self) -> R {
        self.repo
    }

    /// Base catalog plus the user's custom actions.
    pub fn catalog_for(&self, user_id: &str) -> Result<ActionCatalog> {
        let mut catalog = self.base.clone();
        for action in self.repo.get_actions(user_id)? {
            let id = action.id.clone();
            if catalog.insert(action).is_err() {
                warn!(id = %id, "custom action shadows a built-in id; ignoring");
            }
        }
        Ok(catalog)
    }

    fn require_action(&self, user_id: &str, action_id: &str) -> Result<Action> {
        self.catalog_for(user_id)?
            .get(action_id)
            .cloned()
            .ok_or_else(|| Error::not_found("action", action_id))
    }

    fn require_scheduled(&self, user_id: &str, id: &str) -> Result<ScheduledAction> {
        self.repo
            .get_scheduled_actions(user_id)?
            .into_iter()
            .find(|e| e.id == id)
            .ok_or_else(|| Error::not_found("scheduled action", id))
    }

    pub fn recommend_for(&self, user_id: &str, profile: &Profile, count: i64) -> Result<Vec<ScoredAction>> {
        let count = validate_count(count)?;
        let catalog = self.catalog_for(user_id)?;
        let feedback = self.repo.get_feedback(user_id)?;

        let mut exclude: HashSet<String> = self
            .repo
            .get_scheduled_actions(user_id)?
            .into_iter()
            .filter(|e| !e.completed)
            .map(|e| e.action_id)
            .collect();
        exclude.extend(catalog.owned_by(user_id).into_iter().map(|a| a.id.clone()));

        Ok(recommend(catalog.iter(), profile, &feedback, &exclude, count))
    }

    pub fn add_custom_action(&mut self, user_id: &str, draft: ActionDraft) -> Result<Action> {
        if draft.title.trim().is_empty() {
            return Err(Error::validation("custom action title is empty"));
        }
        let action = ActionCatalog::build_custom_action(draft, user_id);
        let stored = self.repo.create_action(action)?;
        info!(id = %stored.id, user = user_id, "custom action created");
        Ok(stored)
    }

    pub fn record_feedback(&mut self, user_id: &str, action_id: &str, verdict: Verdict) -> Result<FeedbackMap> {
        self.require_action(user_id, action_id)?;
        let map = self.repo.rate_action(user_id, action_id, verdict)?;
        debug!(user = user_id, action = action_id, %verdict, "feedback recorded");
        Ok(map)
    }

    pub fn schedule_action(
        &mut self,
        user_id: &str,
        action_id: &str,
        date: NaiveDate,
        time_of_day: Option<NaiveTime>,
        now: DateTime<Utc>,
    ) -> Result<ScheduledAction> {
        self.require_action(user_id, action_id)?;
        let mut entry = ScheduledAction::new(user_id, action_id, date, now);
        entry.time_of_day = time_of_day;
        let stored = self.repo.create_scheduled_action(entry)?;
        info!(id = %stored.id, action = action_id, %date, "action scheduled");
        Ok(stored)
    }

    pub fn update_scheduled_action(
        &mut self,
        user_id: &str,
        id: &str,
        patch: &ScheduledActionPatch,
        now: DateTime<Utc>,
    ) -> Result<ScheduledAction> {
        self.require_scheduled(user_id, id)?;
        self.repo.update_scheduled_action(id, patch, now)
    }

    /// Complete a scheduled action. The completion notice is only produced
    /// the first time, and only when settings ask for it.
    pub fn complete_scheduled_action(
        &mut self,
        user_id: &str,
        id: &str,
        now: DateTime<Utc>,
    ) -> Result<(ScheduledAction, Option<Reminder>)> {
        let before = self.require_scheduled(user_id, id)?;
        let updated = self.repo.update_scheduled_action(id, &ScheduledActionPatch::complete(), now)?;
        if before.completed {
            return Ok((updated, None));
        }

        let settings = self.repo.get_notification_settings(user_id)?;
        let notice = match self.catalog_for(user_id)?.get(&updated.action_id) {
            Some(action) => completion_notice(&updated, action, &settings, now),
            None => {
                warn!(id, action = %updated.action_id, "completed action is missing from the catalog");
                None
            }
        };
        if let Some(notice) = &notice {
            self.repo.append_reminders(std::slice::from_ref(notice))?;
        }
        Ok((updated, notice))
    }

    pub fn delete_scheduled_action(&mut self, user_id: &str, id: &str) -> Result<ScheduledAction> {
        self.require_scheduled(user_id, id)?;
        let removed = self.repo.delete_scheduled_action(id)?;
        info!(id, "scheduled action removed");
        Ok(removed)
    }

    pub fn scheduled(&self, user_id: &str) -> Result<Vec<ScheduledAction>> {
        self.repo.get_scheduled_actions(user_id)
    }

    pub fn settings(&self, user_id: &str) -> Result<NotificationSettings> {
        self.repo.get_notification_settings(user_id)
    }

    pub fn update_settings(&mut self, user_id: &str, settings: NotificationSettings) -> Result<NotificationSettings> {
        settings.validate()?;
        self.repo.upsert_notification_settings(user_id, settings)
    }

    /// Run the scanner for `user_id` and store whatever it emits.
    pub fn scan_reminders(&mut self, user_id: &str, now: DateTime<Utc>) -> Result<Vec<Reminder>> {
        let settings = self.repo.get_notification_settings(user_id)?;
        let scheduled = self.repo.get_scheduled_actions(user_id)?;
        let existing = self.repo.get_reminders(user_id)?;
        let catalog = self.catalog_for(user_id)?;

        let fresh = scan(now, &scheduled, &catalog, &settings, &existing)?;
        if !fresh.is_empty() {
            self.repo.append_reminders(&fresh)?;
        }
        Ok(fresh)
    }

    pub fn reminders(&self, user_id: &str) -> Result<Vec<Reminder>> {
        self.repo.get_reminders(user_id)
    }

    pub fn mark_reminder_read(&mut self, user_id: &str, id: &str) -> Result<Reminder> {
        self.repo.mark_reminder_read(user_id, id)
    }

    /// Returns how many reminders changed.
    pub fn mark_all_read(&mut self, user_id: &str) -> Result<usize> {
        let changed = self.repo.mark_all_reminders_read(user_id)?;
        debug!(user = user_id, changed, "reminders marked read");
        Ok(changed)
    }

    /// Suggested date range for the next action of `tier`.
    pub fn next_window(&self, user_id: &str, tier: Tier, from: NaiveDate) -> Result<(NaiveDate, NaiveDate)> {
        Ok(self.repo.get_notification_settings(user_id)?.next_window(tier, from))
    }

    /// Completed actions, oldest completion first.
    pub fn history(&self, user_id: &str) -> Result<Vec<HistoryEntry>> {
        let catalog = self.catalog_for(user_id)?;
        let mut out: Vec<HistoryEntry> = self
            .repo
            .get_scheduled_actions(user_id)?
            .into_iter()
            .filter(|e| e.completed)
            .map(|e| {
                let action = catalog.get(&e.action_id);
                HistoryEntry {
                    title: action.map(|a| a.title.clone()).unwrap_or_default(),
                    love_language: action.map(|a| a.love_language),
                    tier: action.map(|a| a.tier),
                    scheduled_action_id: e.id,
                    action_id: e.action_id,
                    scheduled_date: e.scheduled_date,
                    completed_at: e.completed_at,
                }
            })
            .collect();
        out.sort_by_key(|h| h.completed_at);
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::ForGender;
    use crate::reminders::ReminderKind;
    use crate::repository::MemoryRepository;
    use chrono::{Duration, TimeZone};

    const USER: &str = "u1";

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 6, 1, 12, 0, 0).unwrap()
    }

    fn planner() -> Planner<MemoryRepository> {
        Planner::new(MemoryRepository::new())
    }

    fn draft(title: &str) -> ActionDraft {
        ActionDraft {
            title: title.to_string(),
            description: String::new(),
            love_language: LoveLanguage::QualityTime,
            tier: Tier::Quick,
            tags: Vec::new(),
            for_gender: ForGender::Any,
            product_link: None,
        }
    }

    #[test]
    fn pending_and_own_custom_actions_are_not_recommended() {
        let mut p = planner();
        let custom = p.add_custom_action(USER, draft("Stargazing")).unwrap();
        p.schedule_action(USER, "qt-1", now().date_naive(), None, now()).unwrap();

        let profile = Profile::new(LoveLanguage::QualityTime);
        let ids: Vec<String> = p
            .recommend_for(USER, &profile, 30)
            .unwrap()
            .into_iter()
            .map(|s| s.action.id)
            .collect();
        assert!(!ids.contains(&"qt-1".to_string()));
        assert!(!ids.contains(&custom.id));
    }

    #[test]
    fn negative_count_is_rejected() {
        let p = planner();
        let profile = Profile::new(LoveLanguage::QualityTime);
        assert!(matches!(p.recommend_for(USER, &profile, -2), Err(Error::Validation(_))));
    }

    #[test]
    fn feedback_on_unknown_action_is_not_found() {
        let mut p = planner();
        assert!(matches!(
            p.record_feedback(USER, "zz-9", Verdict::Liked),
            Err(Error::NotFound { .. })
        ));
    }

    #[test]
    fn completing_twice_emits_one_notice() {
        let mut p = planner();
        let entry = p.schedule_action(USER, "pt-2", now().date_naive(), None, now()).unwrap();

        let (done, notice) = p.complete_scheduled_action(USER, &entry.id, now()).unwrap();
        assert!(done.completed);
        assert_eq!(notice.map(|n| n.kind), Some(ReminderKind::Completion));

        let later = now() + Duration::hours(1);
        let (again, notice) = p.complete_scheduled_action(USER, &entry.id, later).unwrap();
        assert_eq!(again.completed_at, Some(now()));
        assert!(notice.is_none());
        assert_eq!(p.reminders(USER).unwrap().len(), 1);
    }

    #[test]
    fn other_users_cannot_touch_an_entry() {
        let mut p = planner();
        let entry = p.schedule_action(USER, "pt-2", now().date_naive(), None, now()).unwrap();
        assert!(matches!(
            p.delete_scheduled_action("intruder", &entry.id),
            Err(Error::NotFound { .. })
        ));
        assert_eq!(p.scheduled(USER).unwrap().len(), 1);
    }

    #[test]
    fn scan_persists_and_then_dedupes() {
        let mut p = planner();
        p.schedule_action(USER, "qt-5", now().date_naive() + Duration::days(1), None, now()).unwrap();

        let first = p.scan_reminders(USER, now()).unwrap();
        assert!(!first.is_empty());
        assert_eq!(p.reminders(USER).unwrap().len(), first.len());

        let second = p.scan_reminders(USER, now() + Duration::hours(1)).unwrap();
        assert!(second.is_empty());

        assert_eq!(p.mark_all_read(USER).unwrap(), first.len());
        assert!(p.reminders(USER).unwrap().iter().all(|r| r.read));
    }

    #[test]
    fn invalid_settings_are_not_saved() {
        let mut p = planner();
        let bad = NotificationSettings { timezone: "Atlantis/Capital".into(), ..NotificationSettings::default() };
        assert!(p.update_settings(USER, bad).is_err());
        assert_eq!(p.settings(USER).unwrap(), NotificationSettings::default());
    }

    #[test]
    fn history_lists_completed_actions() {
        let mut p = planner();
        let a = p.schedule_action(USER, "wa-1", now().date_naive(), None, now()).unwrap();
        p.schedule_action(USER, "wa-2", now().date_naive(), None, now()).unwrap();
        p.complete_scheduled_action(USER, &a.id, now()).unwrap();

        let h = p.history(USER).unwrap();
        assert_eq!(h.len(), 1);
        assert_eq!(h[0].action_id, "wa-1");
        assert_eq!(h[0].title, "Send a thoughtful morning text");
    }

    /// Repository whose writes always fail.
    struct ReadOnly(MemoryRepository);

    impl Repository for ReadOnly {
        fn get_actions(&self, user_id: &str) -> Result<Vec<Action>> {
            self.0.get_actions(user_id)
        }
        fn create_action(&mut self, _: Action) -> Result<Action> {
            Err(Error::persistence("read-only"))
        }
        fn rate_action(&mut self, _: &str, _: &str, _: Verdict) -> Result<FeedbackMap> {
            Err(Error::persistence("read-only"))
        }
        fn get_feedback(&self, user_id: &str) -> Result<FeedbackMap> {
            self.0.get_feedback(user_id)
        }
        fn get_scheduled_actions(&self, user_id: &str) -> Result<Vec<ScheduledAction>> {
            self.0.get_scheduled_actions(user_id)
        }
        fn create_scheduled_action(&mut self, _: ScheduledAction) -> Result<ScheduledAction> {
            Err(Error::persistence("read-only"))
        }
        fn update_scheduled_action(
            &mut self,
            _: &str,
            _: &ScheduledActionPatch,
            _: DateTime<Utc>,
        ) -> Result<ScheduledAction> {
            Err(Error::persistence("read-only"))
        }
        fn delete_scheduled_action(&mut self, _: &str) -> Result<ScheduledAction> {
            Err(Error::persistence("read-only"))
        }
        fn get_notification_settings(&self, user_id: &str) -> Result<NotificationSettings> {
            self.0.get_notification_settings(user_id)
        }
        fn upsert_notification_settings(&mut self, _: &str, _: NotificationSettings) -> Result<NotificationSettings> {
            Err(Error::persistence("read-only"))
        }
        fn get_reminders(&self, user_id: &str) -> Result<Vec<Reminder>> {
            self.0.get_reminders(user_id)
        }
        fn append_reminders(&mut self, _: &[Reminder]) -> Result<()> {
            Err(Error::persistence("read-only"))
        }
        fn mark_reminder_read(&mut self, _: &str, _: &str) -> Result<Reminder> {
            Err(Error::persistence("read-only"))
        }
        fn mark_all_reminders_read(&mut self, _: &str) -> Result<usize> {
            Err(Error::persistence("read-only"))
        }
    }

    #[test]
    fn failed_writes_surface_as_persistence_errors() {
        let mut p = Planner::new(ReadOnly(MemoryRepository::new()));
        let err = p.schedule_action(USER, "qt-1", now().date_naive(), None, now()).unwrap_err();
        assert!(matches!(err, Error::Persistence(_)));
        assert!(p.scheduled(USER).unwrap().is_empty());
        assert!(p.add_custom_action(USER, draft("Picnic")).is_err());
        assert!(p.catalog_for(USER).unwrap().owned_by(USER).is_empty());
    }

    #[test]
    fn failed_mark_all_read_leaves_every_reminder_unread() {
        let mut p = planner();
        p.schedule_action(USER, "qt-1", now().date_naive(), None, now()).unwrap();
        let emitted = p.scan_reminders(USER, now() + Duration::hours(1)).unwrap();
        assert_eq!(emitted.len(), 2);

        let mut p = Planner::new(ReadOnly(p.into_repository()));
        assert!(matches!(p.mark_all_read(USER), Err(Error::Persistence(_))));
        let inbox = p.reminders(USER).unwrap();
        assert_eq!(inbox.len(), 2);
        assert!(inbox.iter().all(|r| !r.read));
    }
}
