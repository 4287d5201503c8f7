//! Day and week boundaries for the game.
//!
//! All "what day is it" questions are answered in a single fixed offset so
//! both characters roll over at the same local midnight.

use crate::models::Schedule;
use chrono::{DateTime, Datelike, Days, FixedOffset, NaiveDate, Offset, Utc, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Fixed clock for testing.
#[cfg(test)]
pub struct FixedClock(pub DateTime<Utc>);

#[cfg(test)]
impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

#[derive(Debug, Clone, Copy)]
pub struct GameCalendar {
    offset: FixedOffset,
}

impl GameCalendar {
    /// Returns `None` if the offset is not a valid UTC offset (more than a
    /// day either way).
    pub fn from_offset_hours(hours: i32) -> Option<Self> {
        FixedOffset::east_opt(hours.checked_mul(3600)?).map(|offset| Self { offset })
    }

    pub fn utc() -> Self {
        Self { offset: Utc.fix() }
    }

    pub fn date_of(&self, instant: DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.offset).date_naive()
    }

    pub fn today(&self, clock: &dyn Clock) -> NaiveDate {
        self.date_of(clock.now())
    }
}

/// Identifies one recurrence window: a calendar day for daily tasks or an
/// ISO week for weekly tasks.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum PeriodKey {
    Day(NaiveDate),
    Week { year: i32, week: u32 },
}

impl PeriodKey {
    pub fn day(date: NaiveDate) -> Self {
        PeriodKey::Day(date)
    }

    pub fn week_of(date: NaiveDate) -> Self {
        let iso = date.iso_week();
        PeriodKey::Week {
            year: iso.year(),
            week: iso.week(),
        }
    }
}

impl fmt::Display for PeriodKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeriodKey::Day(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            PeriodKey::Week { year, week } => write!(f, "{}-W{:02}", year, week),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Invalid period key: {0}")]
pub struct ParsePeriodKeyError(String);

impl FromStr for PeriodKey {
    type Err = ParsePeriodKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some((year, week)) = s.split_once("-W") {
            let year = year.parse::<i32>().map_err(|_| ParsePeriodKeyError(s.to_string()))?;
            let week = week.parse::<u32>().map_err(|_| ParsePeriodKeyError(s.to_string()))?;
            // Reject weeks the year doesn't have
            NaiveDate::from_isoywd_opt(year, week, Weekday::Mon)
                .ok_or_else(|| ParsePeriodKeyError(s.to_string()))?;
            return Ok(PeriodKey::Week { year, week });
        }

        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(PeriodKey::Day)
            .map_err(|_| ParsePeriodKeyError(s.to_string()))
    }
}

impl From<PeriodKey> for String {
    fn from(key: PeriodKey) -> Self {
        key.to_string()
    }
}

impl TryFrom<String> for PeriodKey {
    type Error = ParsePeriodKeyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Which slice of the catalog to list: the daily tasks falling on a date,
/// or the weekly tasks of the week containing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Day(NaiveDate),
    Week(NaiveDate),
}

impl Period {
    pub fn key(&self) -> PeriodKey {
        match self {
            Period::Day(date) => PeriodKey::day(*date),
            Period::Week(date) => PeriodKey::week_of(*date),
        }
    }
}

pub fn period_key_for(schedule: &Schedule, date: NaiveDate) -> PeriodKey {
    match schedule {
        Schedule::Daily { .. } => PeriodKey::day(date),
        Schedule::Weekly => PeriodKey::week_of(date),
    }
}

pub fn previous_day(date: NaiveDate) -> NaiveDate {
    date.pred_opt().unwrap_or(date)
}

/// A date in the ISO week before the one containing `date`.
pub fn previous_week(date: NaiveDate) -> NaiveDate {
    date.checked_sub_days(Days::new(7)).unwrap_or(date)
}

/// True when `today` is the first check of a new ISO week, so the week
/// before it is closed and its weekly tasks can be settled. A character
/// never checked before only settles on a Monday.
pub fn starts_new_week(last_daily_check: Option<NaiveDate>, today: NaiveDate) -> bool {
    match last_daily_check {
        Some(last) => PeriodKey::week_of(last) != PeriodKey::week_of(today),
        None => today.weekday() == Weekday::Mon,
    }
}

/// True when the decay rule has not yet been evaluated for `today` or any
/// later day. A `today` that moves backwards never re-opens a checked day.
pub fn needs_daily_check(last_daily_check: Option<NaiveDate>, today: NaiveDate) -> bool {
    last_daily_check.map_or(true, |last| last < today)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_today_uses_game_offset() {
        let calendar = GameCalendar::from_offset_hours(3).unwrap();
        // 22:30 UTC is already the next day at +03:00
        let clock = FixedClock(Utc.with_ymd_and_hms(2026, 10, 18, 22, 30, 0).unwrap());
        assert_eq!(calendar.today(&clock), date(2026, 10, 19));
        assert_eq!(GameCalendar::utc().today(&clock), date(2026, 10, 18));
    }

    #[test]
    fn test_invalid_offset_rejected() {
        assert!(GameCalendar::from_offset_hours(30).is_none());
        assert!(GameCalendar::from_offset_hours(-5).is_some());
    }

    #[test]
    fn test_period_key_display_and_parse() {
        let day = PeriodKey::day(date(2026, 10, 19));
        assert_eq!(day.to_string(), "2026-10-19");
        assert_eq!("2026-10-19".parse::<PeriodKey>().unwrap(), day);

        let week = PeriodKey::week_of(date(2026, 10, 19));
        assert_eq!(week.to_string(), "2026-W43");
        assert_eq!("2026-W43".parse::<PeriodKey>().unwrap(), week);

        assert!("2026-W60".parse::<PeriodKey>().is_err());
        assert!("yesterday".parse::<PeriodKey>().is_err());
    }

    #[test]
    fn test_week_key_uses_iso_year() {
        // 2027-01-01 is a Friday belonging to ISO week 53 of 2026
        let key = PeriodKey::week_of(date(2027, 1, 1));
        assert_eq!(key, PeriodKey::Week { year: 2026, week: 53 });
    }

    #[test]
    fn test_period_key_for_schedule() {
        let monday = date(2026, 10, 19);
        let daily = Schedule::Daily { day_of_week: Weekday::Mon };
        assert_eq!(period_key_for(&daily, monday), PeriodKey::Day(monday));
        assert_eq!(period_key_for(&Schedule::Weekly, monday), PeriodKey::week_of(monday));
    }

    #[test]
    fn test_needs_daily_check() {
        let today = date(2026, 10, 19);
        assert!(needs_daily_check(None, today));
        assert!(needs_daily_check(Some(previous_day(today)), today));
        assert!(!needs_daily_check(Some(today), today));
        assert!(!needs_daily_check(Some(today), previous_day(today)));
    }

    #[test]
    fn test_starts_new_week() {
        let monday = date(2026, 10, 19);
        let wednesday = date(2026, 10, 21);
        let last_saturday = date(2026, 10, 17);

        assert!(starts_new_week(None, monday));
        assert!(!starts_new_week(None, wednesday));
        assert!(starts_new_week(Some(last_saturday), wednesday));
        assert!(!starts_new_week(Some(monday), wednesday));
        assert_eq!(PeriodKey::week_of(previous_week(wednesday)), PeriodKey::week_of(last_saturday));
    }
}
