//! lovelingo-core: recommendation engine and reminder scheduler for LoveLingo.

pub mod action;
pub mod catalog;
pub mod error;
pub mod feedback;
pub mod language;
pub mod planner;
pub mod quiz;
pub mod recommend;
pub mod reminders;
pub mod repository;
pub mod schedule;
pub mod settings;
pub mod time;

pub use action::{Action, ActionDraft};
pub use catalog::ActionCatalog;
pub use error::{Error, Result};
pub use feedback::{FeedbackMap, FeedbackStore, Verdict};
pub use language::{ForGender, Gender, LoveLanguage, Tier};
pub use planner::{HistoryEntry, Planner};
pub use quiz::{answers_from_choices, score_quiz, Question, QuizResult, QUESTIONS};
pub use recommend::{recommend, score_action, tier_quota, validate_count, Profile, ScoredAction, DEFAULT_COUNT};
pub use reminders::{completion_notice, scan, unread_count, Reminder, ReminderKind, ReminderPriority};
pub use repository::{MemoryRepository, Repository};
pub use schedule::{ScheduleStore, ScheduledAction, ScheduledActionPatch};
pub use settings::{
    ChannelSettings, NotificationSettings, PerTier, QuietHours, ReminderInterval, Suppression,
};
pub use time::{local_to_utc, parse_date, parse_time_of_day, parse_timezone};
