//! Reminder scanning for scheduled actions.
//!
//! Two independent paths feed the same output:
//! - lead-time: due `lead_time(tier)` before the scheduled time
//! - due-soon: the scheduled time is 0 or 1 whole days away (ceiling)
//!
//! Both can fire for the same scheduled action within one scan. After that,
//! any reminder for the scheduled action created in the trailing 24 hours,
//! read or not, blocks both paths. Delivery is somebody else's job.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::action::Action;
use crate::catalog::ActionCatalog;
use crate::error::Result;
use crate::language::Tier;
use crate::schedule::ScheduledAction;
use crate::settings::NotificationSettings;

pub const DEDUPE_WINDOW_HOURS: i64 = 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReminderKind {
    /// Lead-time reminder ahead of the scheduled time.
    Reminder,
    /// Scheduled for today or tomorrow.
    DueSoon,
    /// Sent right after the user completes an action.
    Completion,
}

impl fmt::Display for ReminderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ReminderKind::Reminder => "reminder",
            ReminderKind::DueSoon => "due_soon",
            ReminderKind::Completion => "completion",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReminderPriority {
    Normal,
    Medium,
    High,
}

impl ReminderPriority {
    pub fn for_tier(tier: Tier) -> Self {
        match tier {
            Tier::Grand => ReminderPriority::High,
            Tier::Special => ReminderPriority::Medium,
            Tier::Quick | Tier::Medium => ReminderPriority::Normal,
        }
    }
}

impl fmt::Display for ReminderPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ReminderPriority::Normal => "normal",
            ReminderPriority::Medium => "medium",
            ReminderPriority::High => "high",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reminder {
    pub id: String,
    pub user_id: String,
    pub kind: ReminderKind,
    pub title: String,
    pub message: String,
    pub action_id: String,
    pub scheduled_action_id: String,
    pub due_at: DateTime<Utc>,
    pub priority: ReminderPriority,
    #[serde(default)]
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

impl Reminder {
    fn new(
        kind: ReminderKind,
        entry: &ScheduledAction,
        action: &Action,
        title: String,
        message: String,
        due_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: format!("rem-{}", Uuid::new_v4().simple()),
            user_id: entry.user_id.clone(),
            kind,
            title,
            message,
            action_id: action.id.clone(),
            scheduled_action_id: entry.id.clone(),
            due_at,
            priority: ReminderPriority::for_tier(action.tier),
            read: false,
            created_at: now,
        }
    }

    pub fn mark_read(&mut self) {
        self.read = true;
    }
}

pub fn unread_count(reminders: &[Reminder]) -> usize {
    reminders.iter().filter(|r| !r.read).count()
}

/// A reminder for `scheduled_action_id` was created in (now - 24h, now].
pub fn recently_reminded(scheduled_action_id: &str, now: DateTime<Utc>, existing: &[Reminder]) -> bool {
    let window_start = now - Duration::hours(DEDUPE_WINDOW_HOURS);
    existing
        .iter()
        .any(|r| r.scheduled_action_id == scheduled_action_id && r.created_at > window_start && r.created_at <= now)
}

fn format_local(at: DateTime<Utc>, tz: Tz) -> String {
    at.with_timezone(&tz).format("%B %-d at %-I:%M %p").to_string()
}

/// Lead-time path: due `lead_time(tier)` before the scheduled time.
pub fn lead_time_reminder(
    entry: &ScheduledAction,
    action: &Action,
    settings: &NotificationSettings,
    scheduled_at: DateTime<Utc>,
    tz: Tz,
    now: DateTime<Utc>,
) -> Option<Reminder> {
    let due_at = scheduled_at - settings.lead_time(action.tier);
    if now < due_at {
        return None;
    }
    Some(Reminder::new(
        ReminderKind::Reminder,
        entry,
        action,
        format!("Reminder: {}", action.title),
        format!(
            "Don't forget your {} action \"{}\" scheduled for {}",
            action.tier.effort_text(),
            action.title,
            format_local(scheduled_at, tz)
        ),
        due_at,
        now,
    ))
}

/// Whole days from `now` until `scheduled_at`, rounded up.
pub fn days_until(scheduled_at: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let secs = (scheduled_at - now).num_seconds() as f64;
    (secs / 86_400.0).ceil() as i64
}

/// Due-soon path: scheduled today (0) or tomorrow (1).
pub fn due_soon_reminder(
    entry: &ScheduledAction,
    action: &Action,
    scheduled_at: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Option<Reminder> {
    let when = match days_until(scheduled_at, now) {
        0 => "today",
        1 => "tomorrow",
        _ => return None,
    };
    Some(Reminder::new(
        ReminderKind::DueSoon,
        entry,
        action,
        format!("Due {when}: {}", action.title),
        format!("Your action \"{}\" is scheduled for {when}.", action.title),
        now,
        now,
    ))
}

/// Completion notice, when the user asked for one.
pub fn completion_notice(
    entry: &ScheduledAction,
    action: &Action,
    settings: &NotificationSettings,
    now: DateTime<Utc>,
) -> Option<Reminder> {
    if !settings.enabled || !settings.notify_on_completion {
        return None;
    }
    let mut r = Reminder::new(
        ReminderKind::Completion,
        entry,
        action,
        "Action Completed".to_string(),
        format!(
            "You completed the {} action \"{}\"",
            action.tier.effort_text(),
            action.title
        ),
        now,
        now,
    );
    r.priority = ReminderPriority::Normal;
    Some(r)
}

/// Decide which reminders to emit at `now`.
///
/// Nothing is emitted while notifications are disabled, during quiet hours,
/// or on weekdays with weekend-only reminders. Held-back reminders are not
/// recorded anywhere; the next scan outside the window picks them up.
pub fn scan(
    now: DateTime<Utc>,
    scheduled: &[ScheduledAction],
    catalog: &ActionCatalog,
    settings: &NotificationSettings,
    existing: &[Reminder],
) -> Result<Vec<Reminder>> {
    if let Some(reason) = settings.suppression(now)? {
        debug!(?reason, %now, "reminders suppressed");
        return Ok(Vec::new());
    }
    let tz = settings.tz()?;

    let mut out: Vec<Reminder> = Vec::new();

    for entry in scheduled.iter().filter(|e| !e.completed) {
        let Some(action) = catalog.get(&entry.action_id) else {
            warn!(scheduled = %entry.id, action = %entry.action_id, "scheduled action references unknown action");
            continue;
        };
        let scheduled_at = entry.scheduled_at(tz)?;

        if recently_reminded(&entry.id, now, existing) {
            debug!(scheduled = %entry.id, "already reminded in the last 24h");
            continue;
        }

        out.extend(lead_time_reminder(entry, action, settings, scheduled_at, tz, now));
        out.extend(due_soon_reminder(entry, action, scheduled_at, now));
    }

    if !out.is_empty() {
        info!(count = out.len(), %now, "emitting reminders");
    }
    Ok(out)
}
