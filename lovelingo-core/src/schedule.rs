//! Scheduled actions: a user's commitment to do an action on a date.
//!
//! The date never changes after creation; rescheduling is delete + create.
//! Completion happens at most once and repeating it is a no-op.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::time::local_to_utc;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledAction {
    pub id: String,
    pub user_id: String,
    pub action_id: String,
    pub scheduled_date: NaiveDate,
    #[serde(default)]
    pub time_of_day: Option<NaiveTime>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl ScheduledAction {
    pub fn new(
        user_id: impl Into<String>,
        action_id: impl Into<String>,
        scheduled_date: NaiveDate,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: format!("sa-{}", Uuid::new_v4().simple()),
            user_id: user_id.into(),
            action_id: action_id.into(),
            scheduled_date,
            time_of_day: None,
            completed: false,
            completed_at: None,
            created_at,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_time(mut self, time_of_day: NaiveTime) -> Self {
        self.time_of_day = Some(time_of_day);
        self
    }

    /// The instant this action is due, in UTC. Date-only entries are due at
    /// local midnight.
    pub fn scheduled_at(&self, tz: Tz) -> Result<DateTime<Utc>> {
        local_to_utc(self.scheduled_date, self.time_of_day.unwrap_or(NaiveTime::MIN), tz)
    }

    /// Mark complete. Returns false when it was already complete, in which
    /// case the original timestamp is kept.
    pub fn complete(&mut self, now: DateTime<Utc>) -> bool {
        if self.completed {
            return false;
        }
        self.completed = true;
        self.completed_at = Some(now);
        true
    }
}

/// Mutable fields of a scheduled action.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledActionPatch {
    pub completed: Option<bool>,
}

impl ScheduledActionPatch {
    pub fn complete() -> Self {
        Self { completed: Some(true) }
    }

    /// Apply to `entry`. Returns true when the entry changed.
    pub fn apply(&self, entry: &mut ScheduledAction, now: DateTime<Utc>) -> Result<bool> {
        match self.completed {
            Some(true) => Ok(entry.complete(now)),
            Some(false) if entry.completed => Err(Error::validation(format!(
                "scheduled action {} is already completed",
                entry.id
            ))),
            Some(false) | None => Ok(false),
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleStore {
    entries: Vec<ScheduledAction>,
}

impl ScheduleStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn create(&mut self, entry: ScheduledAction) -> Result<&ScheduledAction> {
        if self.entries.iter().any(|e| e.id == entry.id) {
            return Err(Error::validation(format!("duplicate scheduled action id: {}", entry.id)));
        }
        self.entries.push(entry);
        Ok(&self.entries[self.entries.len() - 1])
    }

    pub fn get(&self, id: &str) -> Option<&ScheduledAction> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// All entries for a user, in creation order.
    pub fn list_for_user(&self, user_id: &str) -> Vec<ScheduledAction> {
        self.entries.iter().filter(|e| e.user_id == user_id).cloned().collect()
    }

    pub fn pending_for_user(&self, user_id: &str) -> Vec<ScheduledAction> {
        self.entries
            .iter()
            .filter(|e| e.user_id == user_id && !e.completed)
            .cloned()
            .collect()
    }

    pub fn update(&mut self, id: &str, patch: &ScheduledActionPatch, now: DateTime<Utc>) -> Result<ScheduledAction> {
        let entry = self
            .entries
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| Error::not_found("scheduled action", id))?;
        if patch.apply(entry, now)? {
            info!(id, action = %entry.action_id, "scheduled action completed");
        }
        Ok(entry.clone())
    }

    pub fn complete(&mut self, id: &str, now: DateTime<Utc>) -> Result<ScheduledAction> {
        self.update(id, &ScheduledActionPatch::complete(), now)
    }

    pub fn delete(&mut self, id: &str) -> Result<ScheduledAction> {
        let pos = self
            .entries
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| Error::not_found("scheduled action", id))?;
        Ok(self.entries.remove(pos))
    }
}
