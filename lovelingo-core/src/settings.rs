//! Per-user notification settings.
//!
//! Two per-tier tables live here:
//! - `lead_hours`: how many hours before the scheduled time a reminder is due
//!   (Quick 1, Medium 12, Special 24, Grand 48).
//! - `intervals`: the cadence window in days between actions of a tier
//!   (Quick 1-5, Medium 6-14, Special 15-30, Grand 31-90).
//!
//! Lead time comes from `lead_hours` unless `custom_time_ranges` is on, in
//! which case it is the tier interval's `min`, in days.

use chrono::{Datelike, DateTime, Duration, NaiveDate, NaiveTime, Utc, Weekday};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::language::Tier;
use crate::time::parse_timezone;

/// One value per tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerTier<T> {
    pub quick: T,
    pub medium: T,
    pub special: T,
    pub grand: T,
}

impl<T: Copy> PerTier<T> {
    pub fn get(&self, tier: Tier) -> T {
        match tier {
            Tier::Quick => self.quick,
            Tier::Medium => self.medium,
            Tier::Special => self.special,
            Tier::Grand => self.grand,
        }
    }

    pub fn set(&mut self, tier: Tier, value: T) {
        match tier {
            Tier::Quick => self.quick = value,
            Tier::Medium => self.medium = value,
            Tier::Special => self.special = value,
            Tier::Grand => self.grand = value,
        }
    }
}

/// Inclusive range of days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderInterval {
    pub min: u32,
    pub max: u32,
}

impl ReminderInterval {
    pub fn new(min: u32, max: u32) -> Result<Self> {
        if min > max {
            return Err(Error::validation(format!("interval min {min} exceeds max {max}")));
        }
        Ok(Self { min, max })
    }
}

pub const DEFAULT_INTERVALS: PerTier<ReminderInterval> = PerTier {
    quick: ReminderInterval { min: 1, max: 5 },
    medium: ReminderInterval { min: 6, max: 14 },
    special: ReminderInterval { min: 15, max: 30 },
    grand: ReminderInterval { min: 31, max: 90 },
};

pub const DEFAULT_LEAD_HOURS: PerTier<u32> = PerTier {
    quick: 1,
    medium: 12,
    special: 24,
    grand: 48,
};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelSettings {
    pub email_enabled: bool,
    pub email: Option<String>,
    pub push_enabled: bool,
    pub sms_enabled: bool,
    pub phone_number: Option<String>,
}

/// Local window during which reminders are held back. `start == end` is an
/// empty window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuietHours {
    pub enabled: bool,
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl Default for QuietHours {
    fn default() -> Self {
        Self {
            enabled: false,
            start: NaiveTime::from_hms_opt(22, 0, 0).unwrap_or(NaiveTime::MIN),
            end: NaiveTime::from_hms_opt(8, 0, 0).unwrap_or(NaiveTime::MIN),
        }
    }
}

impl QuietHours {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { enabled: true, start, end }
    }

    /// Whether `t` falls in [start, end), wrapping past midnight.
    pub fn contains(&self, t: NaiveTime) -> bool {
        if !self.enabled || self.start == self.end {
            return false;
        }
        if self.start < self.end {
            self.start <= t && t < self.end
        } else {
            t >= self.start || t < self.end
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationSettings {
    pub enabled: bool,
    pub channels: ChannelSettings,
    pub intervals: PerTier<ReminderInterval>,
    pub lead_hours: PerTier<u32>,
    pub custom_time_ranges: bool,
    pub quiet_hours: QuietHours,
    pub weekend_reminders_only: bool,
    pub notify_on_completion: bool,
    /// IANA timezone for quiet hours, weekends and local scheduled times.
    pub timezone: String,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            channels: ChannelSettings {
                email_enabled: true,
                push_enabled: true,
                ..ChannelSettings::default()
            },
            intervals: DEFAULT_INTERVALS,
            lead_hours: DEFAULT_LEAD_HOURS,
            custom_time_ranges: false,
            quiet_hours: QuietHours::default(),
            weekend_reminders_only: false,
            notify_on_completion: true,
            timezone: "UTC".to_string(),
        }
    }
}

impl NotificationSettings {
    pub fn tz(&self) -> Result<Tz> {
        parse_timezone(&self.timezone)
    }

    /// How long before the scheduled time the lead-time reminder is due.
    pub fn lead_time(&self, tier: Tier) -> Duration {
        if self.custom_time_ranges {
            Duration::days(self.intervals.get(tier).min as i64)
        } else {
            Duration::hours(self.lead_hours.get(tier) as i64)
        }
    }

    /// Whether reminders must be held back at `now`, and why.
    pub fn suppression(&self, now: DateTime<Utc>) -> Result<Option<Suppression>> {
        if !self.enabled {
            return Ok(Some(Suppression::Disabled));
        }
        let local = now.with_timezone(&self.tz()?);
        if self.quiet_hours.contains(local.time()) {
            return Ok(Some(Suppression::QuietHours));
        }
        if self.weekend_reminders_only && !matches!(local.weekday(), Weekday::Sat | Weekday::Sun) {
            return Ok(Some(Suppression::Weekday));
        }
        Ok(None)
    }

    /// Suggested day window for doing another action of `tier` after `from`.
    pub fn next_window(&self, tier: Tier, from: NaiveDate) -> (NaiveDate, NaiveDate) {
        let iv = self.intervals.get(tier);
        (
            from + Duration::days(iv.min as i64),
            from + Duration::days(iv.max as i64),
        )
    }

    pub fn validate(&self) -> Result<()> {
        self.tz()?;
        for tier in Tier::ALL {
            let iv = self.intervals.get(tier);
            if iv.min > iv.max {
                return Err(Error::validation(format!(
                    "{tier} interval min {} exceeds max {}",
                    iv.min, iv.max
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Suppression {
    Disabled,
    QuietHours,
    Weekday,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn hm(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn quiet_hours_wrap_midnight() {
        let q = QuietHours::new(hm(22, 0), hm(8, 0));
        assert!(q.contains(hm(23, 0)));
        assert!(q.contains(hm(2, 0)));
        assert!(q.contains(hm(22, 0)));
        assert!(!q.contains(hm(8, 0)));
        assert!(!q.contains(hm(12, 0)));
    }

    #[test]
    fn quiet_hours_same_day_and_empty() {
        let q = QuietHours::new(hm(13, 0), hm(14, 0));
        assert!(q.contains(hm(13, 30)));
        assert!(!q.contains(hm(14, 0)));
        assert!(!QuietHours::new(hm(9, 0), hm(9, 0)).contains(hm(9, 0)));
        let mut off = q;
        off.enabled = false;
        assert!(!off.contains(hm(13, 30)));
    }

    #[test]
    fn lead_time_uses_hours_unless_custom_ranges() {
        let mut s = NotificationSettings::default();
        assert_eq!(s.lead_time(Tier::Grand), Duration::hours(48));
        assert_eq!(s.lead_time(Tier::Quick), Duration::hours(1));
        s.custom_time_ranges = true;
        s.intervals.set(Tier::Grand, ReminderInterval::new(3, 10).unwrap());
        assert_eq!(s.lead_time(Tier::Grand), Duration::days(3));
    }

    #[test]
    fn weekend_only_suppresses_weekdays_in_local_time() {
        let s = NotificationSettings {
            weekend_reminders_only: true,
            timezone: "America/Los_Angeles".to_string(),
            ..NotificationSettings::default()
        };
        // Saturday 2026-03-14 03:00 UTC is still Friday evening in LA.
        let fri_la = Utc.with_ymd_and_hms(2026, 3, 14, 3, 0, 0).unwrap();
        assert_eq!(s.suppression(fri_la).unwrap(), Some(Suppression::Weekday));
        let sat_la = Utc.with_ymd_and_hms(2026, 3, 14, 18, 0, 0).unwrap();
        assert_eq!(s.suppression(sat_la).unwrap(), None);
    }

    #[test]
    fn disabled_wins_over_everything() {
        let s = NotificationSettings { enabled: false, ..NotificationSettings::default() };
        let t = Utc.with_ymd_and_hms(2026, 3, 14, 18, 0, 0).unwrap();
        assert_eq!(s.suppression(t).unwrap(), Some(Suppression::Disabled));
    }

    #[test]
    fn next_window_spans_interval() {
        let s = NotificationSettings::default();
        let from = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let (lo, hi) = s.next_window(Tier::Medium, from);
        assert_eq!(lo, NaiveDate::from_ymd_opt(2026, 1, 7).unwrap());
        assert_eq!(hi, NaiveDate::from_ymd_opt(2026, 1, 15).unwrap());
    }

    #[test]
    fn validate_rejects_bad_timezone_and_inverted_interval() {
        let s = NotificationSettings { timezone: "Nowhere/City".into(), ..NotificationSettings::default() };
        assert!(matches!(s.validate(), Err(Error::InvalidDate(_))));

        let mut s = NotificationSettings::default();
        s.intervals.set(Tier::Quick, ReminderInterval { min: 9, max: 2 });
        assert!(matches!(s.validate(), Err(Error::Validation(_))));
    }

    #[test]
    fn partial_settings_fill_defaults() {
        let s: NotificationSettings = serde_json::from_str(r#"{"weekend_reminders_only":true}"#).unwrap();
        assert!(s.weekend_reminders_only);
        assert!(s.enabled);
        assert_eq!(s.lead_hours, DEFAULT_LEAD_HOURS);
    }
}
