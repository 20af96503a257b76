//! Shift rules and maintenance windows.
//!
//! A work center's availability is the union of its weekly shift rules,
//! minus its maintenance windows.
//!
//! # Precedence
//! Maintenance overrides shifts. A timestamp is workable iff:
//! - It falls within at least one shift rule, AND
//! - It does NOT fall within any maintenance window.

use chrono::{Datelike, NaiveDate, NaiveDateTime, TimeDelta, Timelike};
use serde::{Deserialize, Serialize};

/// Weekday index of a timestamp, 0=Sunday..6=Saturday.
#[inline]
pub fn weekday_index(t: &NaiveDateTime) -> u8 {
    t.weekday().num_days_from_sunday() as u8
}

/// A recurring weekly availability rule.
///
/// Covers `[start_hour, end_hour)` on `day_of_week`. Hours are whole hours
/// of the day; `end_hour` may be 24.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shift {
    /// 0=Sunday..6=Saturday.
    pub day_of_week: u8,
    /// First hour of the shift (inclusive).
    pub start_hour: u32,
    /// Hour the shift ends (exclusive).
    pub end_hour: u32,
}

impl Shift {
    /// Creates a shift rule.
    pub fn new(day_of_week: u8, start_hour: u32, end_hour: u32) -> Self {
        Self {
            day_of_week,
            start_hour,
            end_hour,
        }
    }

    /// One rule per weekday (Mon..Fri) with the same hours.
    pub fn weekdays(start_hour: u32, end_hour: u32) -> Vec<Self> {
        (1..=5).map(|d| Self::new(d, start_hour, end_hour)).collect()
    }

    /// Whether this rule applies to the weekday of `t`.
    #[inline]
    pub fn applies_on(&self, t: &NaiveDateTime) -> bool {
        self.day_of_week == weekday_index(t)
    }

    /// Whether `t` falls inside this rule (hour granularity).
    #[inline]
    pub fn covers(&self, t: &NaiveDateTime) -> bool {
        self.applies_on(t) && t.hour() >= self.start_hour && t.hour() < self.end_hour
    }

    /// Start timestamp of this rule on `day`.
    pub fn start_on(&self, day: NaiveDate) -> NaiveDateTime {
        day.and_time(chrono::NaiveTime::MIN) + TimeDelta::hours(i64::from(self.start_hour))
    }

    /// `t` with its hour replaced by `end_hour`; minutes and seconds are kept.
    ///
    /// `end_hour == 24` rolls over to the next day.
    pub fn end_from(&self, t: &NaiveDateTime) -> NaiveDateTime {
        *t + TimeDelta::hours(i64::from(self.end_hour) - i64::from(t.hour()))
    }

    /// Day within 0..=6, `start_hour < end_hour <= 24`.
    pub fn is_well_formed(&self) -> bool {
        self.day_of_week <= 6 && self.start_hour < self.end_hour && self.end_hour <= 24
    }
}

/// A period during which a work center is unavailable: `[start, end)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceWindow {
    /// Window start (inclusive).
    #[serde(with = "super::timestamp")]
    pub start_date: NaiveDateTime,
    /// Window end (exclusive).
    #[serde(with = "super::timestamp")]
    pub end_date: NaiveDateTime,
    /// Why the work center is down.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl MaintenanceWindow {
    /// Creates a window without a reason.
    pub fn new(start_date: NaiveDateTime, end_date: NaiveDateTime) -> Self {
        Self {
            start_date,
            end_date,
            reason: None,
        }
    }

    /// Sets the reason.
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Length of the window.
    #[inline]
    pub fn duration(&self) -> TimeDelta {
        self.end_date - self.start_date
    }

    /// Whether a timestamp falls within this window.
    #[inline]
    pub fn contains(&self, t: &NaiveDateTime) -> bool {
        *t >= self.start_date && *t < self.end_date
    }

    /// Whether two windows overlap.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start_date < other.end_date && other.start_date < self.end_date
    }
}
