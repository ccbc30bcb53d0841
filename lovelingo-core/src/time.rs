//! Time utilities: local dates, loose time-of-day strings, timezone resolution.

use std::sync::LazyLock;

use chrono::{DateTime, LocalResult, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use regex::Regex;

use crate::error::{Error, Result};

// "19:30", "7:30 pm", "7pm", "07:05AM"
static TIME_OF_DAY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(\d{1,2})(?::(\d{2}))?\s*(am|pm)?\s*$").expect("static regex")
});

pub fn parse_timezone(tz: &str) -> Result<Tz> {
    tz.parse()
        .map_err(|_| Error::invalid_date(format!("invalid timezone: {tz}")))
}

/// Parse a calendar date like "2026-02-20".
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|e| Error::invalid_date(format!("invalid date '{s}': {e}")))
}

/// Parse a time of day in 24h ("19:30") or 12h ("7:30 pm", "7pm") form.
pub fn parse_time_of_day(s: &str) -> Result<NaiveTime> {
    let bad = || Error::invalid_date(format!("invalid time of day: '{s}'"));

    let caps = TIME_OF_DAY.captures(s).ok_or_else(bad)?;
    let mut hour: u32 = caps[1].parse().map_err(|_| bad())?;
    let minute: u32 = match caps.get(2) {
        Some(m) => m.as_str().parse().map_err(|_| bad())?,
        None => 0,
    };

    if let Some(meridiem) = caps.get(3) {
        if !(1..=12).contains(&hour) {
            return Err(bad());
        }
        let pm = meridiem.as_str().eq_ignore_ascii_case("pm");
        hour = match (hour, pm) {
            (12, false) => 0,
            (12, true) => 12,
            (h, true) => h + 12,
            (h, false) => h,
        };
    } else if caps.get(2).is_none() {
        // A bare number without am/pm is too ambiguous to accept.
        return Err(bad());
    }

    NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(bad)
}

/// Resolve a local date + time in `tz` to UTC.
///
/// Ambiguous local times (DST fall-back) take the earlier instant; times
/// that do not exist (DST spring-forward) are an error.
pub fn local_to_utc(date: NaiveDate, time: NaiveTime, tz: Tz) -> Result<DateTime<Utc>> {
    match tz.from_local_datetime(&date.and_time(time)) {
        LocalResult::Single(dt) => Ok(dt.with_timezone(&Utc)),
        LocalResult::Ambiguous(earliest, _) => Ok(earliest.with_timezone(&Utc)),
        LocalResult::None => Err(Error::invalid_date(format!(
            "local time does not exist (DST?): {date} {time} {tz}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_time_of_day_forms() {
        let t = |s| parse_time_of_day(s).unwrap();
        assert_eq!(t("19:30"), NaiveTime::from_hms_opt(19, 30, 0).unwrap());
        assert_eq!(t("7:30 pm"), NaiveTime::from_hms_opt(19, 30, 0).unwrap());
        assert_eq!(t("7PM"), NaiveTime::from_hms_opt(19, 0, 0).unwrap());
        assert_eq!(t("12am"), NaiveTime::from_hms_opt(0, 0, 0).unwrap());
        assert_eq!(t("12:15 pm"), NaiveTime::from_hms_opt(12, 15, 0).unwrap());
    }

    #[test]
    fn rejects_bad_times() {
        for s in ["25:00", "7", "13pm", "noon", "10:75"] {
            assert!(matches!(parse_time_of_day(s), Err(Error::InvalidDate(_))), "{s}");
        }
    }

    #[test]
    fn rejects_bad_dates_and_zones() {
        assert!(parse_date("2026-02-30").is_err());
        assert!(parse_timezone("Mars/Olympus").is_err());
    }

    #[test]
    fn chicago_evening_is_next_day_utc() {
        // Feb is CST (UTC-6)
        let tz = parse_timezone("America/Chicago").unwrap();
        let d = parse_date("2026-02-20").unwrap();
        let utc = local_to_utc(d, parse_time_of_day("23:59").unwrap(), tz).unwrap();
        assert_eq!(utc.to_rfc3339(), "2026-02-21T05:59:00+00:00");
    }
}
