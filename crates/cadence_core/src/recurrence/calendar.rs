//! Structured calendar recurrence rule.
//!
//! Fields left unset match every value. All set fields must match for a
//! minute to be an occurrence (day-of-month and weekday are combined with
//! AND). Fields are evaluated as wall-clock values in the rule offset.
//! Searches that would step past chrono's date range report no occurrence.

use crate::recurrence::RecurrenceRule;
use crate::time::Instant;
use chrono::{
    Datelike, FixedOffset, NaiveDate, NaiveDateTime, Offset, TimeDelta, TimeZone, Timelike, Utc,
    Weekday,
};

/// Upper bound for the occurrence search, in days.
const SEARCH_HORIZON_DAYS: i64 = 8 * 366;

/// Minute-resolution rule over wall-clock calendar fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CalendarRule {
    minute: Option<u32>,
    hour: Option<u32>,
    day: Option<u32>,
    month: Option<u32>,
    weekday: Option<Weekday>,
    offset: FixedOffset,
}

impl Default for CalendarRule {
    fn default() -> Self {
        Self::every_minute()
    }
}

impl CalendarRule {
    /// Matches every minute, evaluated in UTC.
    pub fn every_minute() -> Self {
        Self {
            minute: None,
            hour: None,
            day: None,
            month: None,
            weekday: None,
            offset: Utc.fix(),
        }
    }

    pub fn hourly_at(minute: u32) -> Self {
        Self::every_minute().at_minute(minute)
    }

    pub fn daily_at(hour: u32, minute: u32) -> Self {
        Self::hourly_at(minute).at_hour(hour)
    }

    pub fn weekly_on(weekday: Weekday, hour: u32, minute: u32) -> Self {
        Self::daily_at(hour, minute).on_weekday(weekday)
    }

    pub fn monthly_on(day: u32, hour: u32, minute: u32) -> Self {
        Self::daily_at(hour, minute).on_day(day)
    }

    pub fn at_minute(mut self, minute: u32) -> Self {
        self.minute = Some(minute);
        self
    }

    pub fn at_hour(mut self, hour: u32) -> Self {
        self.hour = Some(hour);
        self
    }

    pub fn on_day(mut self, day: u32) -> Self {
        self.day = Some(day);
        self
    }

    pub fn in_month(mut self, month: u32) -> Self {
        self.month = Some(month);
        self
    }

    pub fn on_weekday(mut self, weekday: Weekday) -> Self {
        self.weekday = Some(weekday);
        self
    }

    /// Evaluates wall-clock fields in `offset` instead of UTC.
    pub fn in_offset(mut self, offset: FixedOffset) -> Self {
        self.offset = offset;
        self
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// Returns `false` when a field can never match (e.g. minute 75).
    pub fn is_satisfiable(&self) -> bool {
        self.minute.map_or(true, |m| m < 60)
            && self.hour.map_or(true, |h| h < 24)
            && self.day.map_or(true, |d| (1..=31).contains(&d))
            && self.month.map_or(true, |m| (1..=12).contains(&m))
    }

    fn matches_local(&self, local: &NaiveDateTime) -> bool {
        self.month_matches(local)
            && self.day_matches(local)
            && self.hour.map_or(true, |h| local.hour() == h)
            && self.minute.map_or(true, |m| local.minute() == m)
    }

    fn month_matches(&self, local: &NaiveDateTime) -> bool {
        self.month.map_or(true, |m| local.month() == m)
    }

    fn day_matches(&self, local: &NaiveDateTime) -> bool {
        self.day.map_or(true, |d| local.day() == d)
            && self.weekday.map_or(true, |w| local.weekday() == w)
    }

    fn local_minute(&self, instant: Instant) -> Option<NaiveDateTime> {
        instant
            .with_timezone(&self.offset)
            .naive_local()
            .with_second(0)?
            .with_nanosecond(0)
    }
}

impl RecurrenceRule for CalendarRule {
    fn expression(&self) -> String {
        fn field(value: Option<u32>) -> String {
            value.map_or_else(|| "*".to_string(), |v| v.to_string())
        }
        format!(
            "{} {} {} {} {} {}",
            field(self.minute),
            field(self.hour),
            field(self.day),
            field(self.month),
            field(self.weekday.map(|w| w.num_days_from_sunday())),
            self.offset
        )
    }

    fn is_due(&self, instant: Instant) -> bool {
        self.is_satisfiable()
            && self
                .local_minute(instant)
                .is_some_and(|local| self.matches_local(&local))
    }

    fn next_occurrence_at_or_after(&self, instant: Instant) -> Option<Instant> {
        if !self.is_satisfiable() {
            return None;
        }

        let mut cursor = self.local_minute(instant)?;
        let limit = cursor
            .checked_add_signed(TimeDelta::days(SEARCH_HORIZON_DAYS))
            .unwrap_or(NaiveDateTime::MAX);

        while cursor <= limit {
            if !self.month_matches(&cursor) {
                cursor = first_of_next_month(cursor.date())?;
                continue;
            }
            if !self.day_matches(&cursor) {
                cursor = cursor.date().succ_opt()?.and_hms_opt(0, 0, 0)?;
                continue;
            }
            if self.hour.is_some_and(|h| cursor.hour() != h) {
                cursor = cursor
                    .date()
                    .and_hms_opt(cursor.hour(), 0, 0)?
                    .checked_add_signed(TimeDelta::hours(1))?;
                continue;
            }
            if self.minute.is_some_and(|m| cursor.minute() != m) {
                cursor = cursor.checked_add_signed(TimeDelta::minutes(1))?;
                continue;
            }

            let occurrence = self.offset.from_local_datetime(&cursor).single()?;
            return Some(occurrence.with_timezone(instant.offset()));
        }

        None
    }
}

fn first_of_next_month(date: NaiveDate) -> Option<NaiveDateTime> {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)?.and_hms_opt(0, 0, 0)
}
