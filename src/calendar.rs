//! Calendar arithmetic over shift rules and maintenance windows.
//!
//! Pure functions: they never mutate their inputs and never consult a clock.
//!
//! Shift rules work at hour granularity: a rule covers `t` when the weekday
//! matches and `start_hour <= hour(t) < end_hour`. Maintenance windows are
//! half-open intervals `[start, end)`.

use chrono::{Datelike, Days, NaiveDateTime, Timelike};

use crate::error::{ReflowError, Result};
use crate::models::{MaintenanceWindow, Shift};

/// Whether `t` falls inside any shift rule.
pub fn is_within_shift(t: &NaiveDateTime, shifts: &[Shift]) -> bool {
    shifts.iter().any(|s| s.covers(t))
}

/// Earliest shift start strictly after `t`.
///
/// Scans day by day, starting with the day of `t`, for `horizon_days`
/// calendar days. Within a day the earliest qualifying rule wins.
///
/// # Errors
/// [`ReflowError::NoShiftFound`] if no rule starts within the horizon.
pub fn next_shift_start(
    t: &NaiveDateTime,
    shifts: &[Shift],
    horizon_days: u32,
) -> Result<NaiveDateTime> {
    for offset in 0..horizon_days {
        let Some(day) = t.date().checked_add_days(Days::new(u64::from(offset))) else {
            break;
        };
        let weekday = day.weekday().num_days_from_sunday() as u8;

        let candidate = shifts
            .iter()
            .filter(|s| s.day_of_week == weekday)
            .map(|s| s.start_on(day))
            .filter(|start| start > t)
            .min();

        if let Some(start) = candidate {
            return Ok(start);
        }
    }

    Err(ReflowError::NoShiftFound {
        from: *t,
        horizon_days,
    })
}

/// End of the shift `t` is in, by first match in declared order.
///
/// Picks the first rule on `t`'s weekday with `hour(t) >= start_hour` and
/// returns `t` with its hour replaced by that rule's `end_hour` (minutes and
/// seconds are kept). Returns `t` unchanged when no rule matches, meaning
/// "no boundary known here".
///
/// With several rules on one day the first declared rule wins even if it
/// is not the one containing `t`; see [`containing_shift_end`].
pub fn shift_end(t: &NaiveDateTime, shifts: &[Shift]) -> NaiveDateTime {
    shifts
        .iter()
        .find(|s| s.applies_on(t) && t.hour() >= s.start_hour)
        .map_or(*t, |s| s.end_from(t))
}

/// End of the first rule that actually covers `t`, if any.
pub fn containing_shift_end(t: &NaiveDateTime, shifts: &[Shift]) -> Option<NaiveDateTime> {
    shifts.iter().find(|s| s.covers(t)).map(|s| s.end_from(t))
}

/// The first maintenance window (declared order) containing `t`.
pub fn in_maintenance<'a>(
    t: &NaiveDateTime,
    windows: &'a [MaintenanceWindow],
) -> Option<&'a MaintenanceWindow> {
    windows.iter().find(|w| w.contains(t))
}

/// Earliest maintenance start strictly after `t`.
pub fn next_maintenance_start(
    t: &NaiveDateTime,
    windows: &[MaintenanceWindow],
) -> Option<NaiveDateTime> {
    windows
        .iter()
        .map(|w| w.start_date)
        .filter(|start| start > t)
        .min()
}

/// `max(0, b - a)` in minutes, fractional.
pub fn minutes_between(a: &NaiveDateTime, b: &NaiveDateTime) -> f64 {
    let ms = (*b - *a).num_milliseconds();
    (ms.max(0) as f64) / 60_000.0
}
