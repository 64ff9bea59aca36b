//! Schedule assigner
//!
//! Maps a declaration's `schedule` block to a concrete recurrence rule and
//! computes when that rule fires next. Everything here is UTC.

use chrono::{
    DateTime, Datelike, Days, Months, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc, Weekday,
};
use serde::Serialize;
use std::fmt;

use crate::config::UpdateConfig;
use crate::domain::Ecosystem;

/// Hour runs start at when no `time` is configured
pub const DEFAULT_HOUR: u32 = 5;

/// How often an ecosystem is checked for updates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Interval {
    /// Every day
    Daily,
    /// Every week, Monday unless `day` says otherwise
    Weekly,
    /// On the first day of every month
    Monthly,
}

impl Interval {
    /// Returns the identifier used in configuration files
    pub fn as_str(&self) -> &'static str {
        match self {
            Interval::Daily => "daily",
            Interval::Weekly => "weekly",
            Interval::Monthly => "monthly",
        }
    }

    /// Parses a configuration identifier
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "daily" => Some(Interval::Daily),
            "weekly" => Some(Interval::Weekly),
            "monthly" => Some(Interval::Monthly),
            _ => None,
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The `schedule` block of an update declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schedule {
    /// Recurrence interval
    pub interval: Interval,
    /// Day of week, weekly schedules only
    pub day: Option<Weekday>,
    /// Time of day (UTC)
    pub time: Option<NaiveTime>,
}

impl Schedule {
    /// A schedule with only an interval
    pub fn new(interval: Interval) -> Self {
        Self {
            interval,
            day: None,
            time: None,
        }
    }

    /// Sets the day of week (builder pattern)
    pub fn on(mut self, day: Weekday) -> Self {
        self.day = Some(day);
        self
    }

    /// Sets the time of day (builder pattern)
    pub fn at(mut self, time: NaiveTime) -> Self {
        self.time = Some(time);
        self
    }

    /// Concrete recurrence rule for this schedule
    pub fn recurrence(&self) -> RecurrenceRule {
        let time = self
            .time
            .or_else(|| NaiveTime::from_hms_opt(DEFAULT_HOUR, 0, 0))
            .unwrap_or_default();
        let weekday = match self.interval {
            Interval::Weekly => Some(self.day.unwrap_or(Weekday::Mon)),
            Interval::Daily | Interval::Monthly => None,
        };

        RecurrenceRule {
            interval: self.interval,
            weekday,
            time,
        }
    }
}

/// A recurrence rule understood by the update runner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecurrenceRule {
    /// Source interval
    pub interval: Interval,
    /// Weekday the rule fires on (weekly only)
    pub weekday: Option<Weekday>,
    /// Time of day the rule fires at (UTC)
    pub time: NaiveTime,
}

impl RecurrenceRule {
    /// Human-readable form, e.g. "once every 24 hours at 05:00 UTC"
    pub fn description(&self) -> String {
        let at = self.time.format("%H:%M");
        match self.interval {
            Interval::Daily => format!("once every 24 hours at {} UTC", at),
            Interval::Weekly => format!(
                "once every 7 days on {} at {} UTC",
                weekday_display(self.weekday.unwrap_or(Weekday::Mon)),
                at
            ),
            Interval::Monthly => format!("once a month on the 1st at {} UTC", at),
        }
    }

    /// Next time the rule fires strictly after `after`
    pub fn next_run_after(&self, after: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let after = after.naive_utc();
        let today = after.date();

        let next = match self.interval {
            Interval::Daily => self.first_after(after, today, 1)?,
            Interval::Weekly => {
                let target = self.weekday.unwrap_or(Weekday::Mon).num_days_from_monday();
                let current = today.weekday().num_days_from_monday();
                let offset = (target + 7 - current) % 7;
                let day = today.checked_add_days(Days::new(u64::from(offset)))?;
                self.first_after(after, day, 7)?
            }
            Interval::Monthly => {
                let first = NaiveDate::from_ymd_opt(today.year(), today.month(), 1)?;
                let candidate = first.and_time(self.time);
                if candidate > after {
                    candidate
                } else {
                    first.checked_add_months(Months::new(1))?.and_time(self.time)
                }
            }
        };

        Some(Utc.from_utc_datetime(&next))
    }

    fn first_after(
        &self,
        after: NaiveDateTime,
        day: NaiveDate,
        step: u64,
    ) -> Option<NaiveDateTime> {
        let candidate = day.and_time(self.time);
        if candidate > after {
            Some(candidate)
        } else {
            Some(day.checked_add_days(Days::new(step))?.and_time(self.time))
        }
    }
}

impl fmt::Display for RecurrenceRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.description())
    }
}

/// Recurrence of one declaration, for reporting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleEntry {
    /// Position in the `updates` list
    pub index: usize,
    /// Ecosystem of the declaration
    pub ecosystem: Ecosystem,
    /// Directory of the declaration
    pub directory: String,
    /// Target branch, if pinned
    pub target_branch: Option<String>,
    /// Resolved recurrence rule
    pub rule: RecurrenceRule,
    /// Next run after the reference instant
    pub next_run: Option<DateTime<Utc>>,
}

/// Resolve the recurrence of every declaration relative to `now`
pub fn schedule_entries(config: &UpdateConfig, now: DateTime<Utc>) -> Vec<ScheduleEntry> {
    config
        .updates
        .iter()
        .enumerate()
        .map(|(index, declaration)| {
            let rule = declaration.schedule.recurrence();
            ScheduleEntry {
                index,
                ecosystem: declaration.ecosystem,
                directory: declaration.directory.clone(),
                target_branch: declaration.target_branch.clone(),
                rule,
                next_run: rule.next_run_after(now),
            }
        })
        .collect()
}

/// Parses a lowercase weekday name as used in configuration files
pub fn parse_weekday(value: &str) -> Option<Weekday> {
    match value {
        "monday" => Some(Weekday::Mon),
        "tuesday" => Some(Weekday::Tue),
        "wednesday" => Some(Weekday::Wed),
        "thursday" => Some(Weekday::Thu),
        "friday" => Some(Weekday::Fri),
        "saturday" => Some(Weekday::Sat),
        "sunday" => Some(Weekday::Sun),
        _ => None,
    }
}

/// Lowercase weekday name as used in configuration files
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "monday",
        Weekday::Tue => "tuesday",
        Weekday::Wed => "wednesday",
        Weekday::Thu => "thursday",
        Weekday::Fri => "friday",
        Weekday::Sat => "saturday",
        Weekday::Sun => "sunday",
    }
}

fn weekday_display(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Parses a `HH:MM` time of day
pub fn parse_time(value: &str) -> Option<NaiveTime> {
    let digits_only = value
        .char_indices()
        .all(|(i, c)| if i == 2 { c == ':' } else { c.is_ascii_digit() });
    if value.len() != 5 || !digits_only {
        return None;
    }
    NaiveTime::parse_from_str(value, "%H:%M").ok()
}
