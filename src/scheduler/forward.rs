//! Finite-capacity forward scheduler.
//!
//! # Algorithm
//!
//! Orders are taken in sequencer order. For each one:
//! 1. Earliest start = max(declared start, recorded completion of each
//!    resolvable dependency, work center next-available time).
//! 2. Advance a cursor through the work center calendar until the required
//!    duration is consumed:
//!    - outside every shift: pause, jump to the next shift start;
//!    - inside a maintenance window: pause, jump to the window end;
//!    - otherwise work until the shift end or the next maintenance start,
//!      whichever comes first, emitting one segment.
//! 3. Record the final cursor as the order's completion and as the work
//!    center's next-available time.
//!
//! # Complexity
//! O(n · (s + m) · k) where n=orders, s=shift rules, m=maintenance windows,
//! k=calendar blocks crossed per order.

use std::collections::HashMap;

use chrono::{NaiveDateTime, TimeDelta};
use tracing::{debug, trace};

use crate::calendar;
use crate::config::ReflowConfig;
use crate::error::{ReflowError, Result};
use crate::models::{
    PauseReason, ReflowResult, ScheduleChange, ScheduleSegment, ScheduledWorkOrder, WorkCenter,
    WorkOrder,
};

/// Outcome of advancing one order through its work center calendar.
#[derive(Debug, Clone, PartialEq)]
pub struct Advance {
    /// Working intervals in time order.
    pub segments: Vec<ScheduleSegment>,
    /// Pauses hit on the way.
    pub reasons: Vec<PauseReason>,
    /// Final cursor (completion time).
    pub end: NaiveDateTime,
}

/// Walks sequenced work orders through shifts and maintenance windows.
///
/// # Example
///
/// ```
/// use u_reflow::models::{timestamp::parse_timestamp, Shift, WorkCenter, WorkOrder};
/// use u_reflow::scheduler::ForwardScheduler;
///
/// let wc = WorkCenter::new("WC1").with_shifts(Shift::weekdays(8, 17));
/// let wo = WorkOrder::new(
///     "WO1",
///     "WC1",
///     parse_timestamp("2024-05-06T16:00:00").unwrap(),
///     parse_timestamp("2024-05-06T18:00:00").unwrap(),
/// )
/// .with_duration_minutes(120);
///
/// let result = ForwardScheduler::new().schedule(&[&wo], &[wc]).unwrap();
/// assert_eq!(result.schedule[0].segments.len(), 2);
/// assert_eq!(result.changes.len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ForwardScheduler {
    config: ReflowConfig,
}

impl ForwardScheduler {
    /// Creates a scheduler with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the configuration.
    pub fn with_config(mut self, config: ReflowConfig) -> Self {
        self.config = config;
        self
    }

    /// Schedules `ordered` (dependencies first) on `work_centers`.
    ///
    /// Dependencies without a recorded completion (unknown ids, maintenance
    /// orders, orders not in `ordered`) do not delay anything. A work center
    /// that cannot be resolved aborts the whole call.
    ///
    /// # Errors
    /// - [`ReflowError::MissingWorkCenter`] for an unresolvable work center.
    /// - [`ReflowError::NoShiftFound`] when a calendar has no shift within
    ///   the search horizon.
    pub fn schedule(
        &self,
        ordered: &[&WorkOrder],
        work_centers: &[WorkCenter],
    ) -> Result<ReflowResult> {
        let centers: HashMap<&str, &WorkCenter> =
            work_centers.iter().map(|wc| (wc.id.as_str(), wc)).collect();
        let mut completion: HashMap<&str, NaiveDateTime> = HashMap::new();
        let mut available_from: HashMap<&str, NaiveDateTime> = HashMap::new();
        let mut result = ReflowResult::new();

        for &order in ordered {
            let center = centers
                .get(order.work_center_id.as_str())
                .copied()
                .ok_or_else(|| ReflowError::MissingWorkCenter {
                    work_order_id: order.id.clone(),
                    work_center_id: order.work_center_id.clone(),
                })?;

            let earliest = earliest_start(
                order,
                &completion,
                available_from.get(center.id.as_str()).copied(),
            );
            let run = self.advance(order, center, earliest)?;

            completion.insert(order.id.as_str(), run.end);
            available_from.insert(center.id.as_str(), run.end);

            let start = run.segments.first().map_or(run.end, |s| s.start);
            debug!(
                work_order = %order.id,
                work_center = %center.id,
                %start,
                end = %run.end,
                segments = run.segments.len(),
                pauses = run.reasons.len(),
                "work order scheduled"
            );

            if run.end != order.end_date {
                result.changes.push(ScheduleChange {
                    work_order_id: order.id.clone(),
                    old_start: order.start_date,
                    old_end: order.end_date,
                    new_start: start,
                    new_end: run.end,
                    delta_minutes: signed_minutes(order.end_date, run.end),
                    reasons: run.reasons,
                });
            }

            result.schedule.push(ScheduledWorkOrder {
                work_order_id: order.id.clone(),
                work_center_id: center.id.clone(),
                start,
                end: run.end,
                segments: run.segments,
            });
        }

        Ok(result)
    }

    /// Consumes `order`'s duration on `center`, starting no earlier than `from`.
    ///
    /// # Errors
    /// [`ReflowError::NoShiftFound`] when the cursor is outside every shift
    /// and none starts within the search horizon.
    pub fn advance(
        &self,
        order: &WorkOrder,
        center: &WorkCenter,
        from: NaiveDateTime,
    ) -> Result<Advance> {
        let mut cursor = from;
        let mut remaining = order.duration();
        let mut segments = Vec::new();
        let mut reasons = Vec::new();

        while remaining > TimeDelta::zero() {
            if !calendar::is_within_shift(&cursor, &center.shifts) {
                reasons.push(PauseReason::OutsideShift);
                let resume = calendar::next_shift_start(
                    &cursor,
                    &center.shifts,
                    self.config.shift_search_days,
                )?;
                trace!(work_order = %order.id, paused = %cursor, %resume, "outside shift hours");
                cursor = resume;
                continue;
            }

            if let Some(window) = calendar::in_maintenance(&cursor, &center.maintenance_windows) {
                reasons.push(PauseReason::Maintenance);
                trace!(
                    work_order = %order.id,
                    paused = %cursor,
                    resume = %window.end_date,
                    reason = window.reason.as_deref().unwrap_or(""),
                    "maintenance window"
                );
                cursor = window.end_date;
                continue;
            }

            let boundary = block_end(&cursor, center);
            let workable = remaining.min((boundary - cursor).max(TimeDelta::zero()));
            if workable <= TimeDelta::zero() {
                cursor = boundary;
                continue;
            }

            let end = cursor + workable;
            trace!(work_order = %order.id, start = %cursor, %end, "segment");
            segments.push(ScheduleSegment::new(cursor, end));
            cursor = end;
            remaining -= workable;
        }

        Ok(Advance {
            segments,
            reasons,
            end: cursor,
        })
    }
}

/// Declared start pushed past resolvable dependency completions and the
/// work center's next-available time.
fn earliest_start(
    order: &WorkOrder,
    completion: &HashMap<&str, NaiveDateTime>,
    center_free: Option<NaiveDateTime>,
) -> NaiveDateTime {
    let mut cursor = order.start_date;

    for dep in &order.depends_on_work_order_ids {
        match completion.get(dep.as_str()) {
            Some(&done) if done > cursor => cursor = done,
            Some(_) => {}
            None => debug!(
                work_order = %order.id,
                dependency = %dep,
                "dependency has no recorded completion; ignored"
            ),
        }
    }

    match center_free {
        Some(free) if free > cursor => free,
        _ => cursor,
    }
}

/// End of the workable block starting at `cursor` (which is inside a shift
/// and outside maintenance): the shift end or the next maintenance start,
/// whichever is earlier.
fn block_end(cursor: &NaiveDateTime, center: &WorkCenter) -> NaiveDateTime {
    let mut shift_end = calendar::shift_end(cursor, &center.shifts);
    if shift_end <= *cursor {
        // The first declared rule of the day ended before the cursor;
        // fall back to the rule that holds it.
        shift_end = calendar::containing_shift_end(cursor, &center.shifts).unwrap_or(shift_end);
    }

    match calendar::next_maintenance_start(cursor, &center.maintenance_windows) {
        Some(maintenance) if maintenance < shift_end => maintenance,
        _ => shift_end,
    }
}

/// `b - a` in minutes, signed and fractional.
fn signed_minutes(a: NaiveDateTime, b: NaiveDateTime) -> f64 {
    (b - a).num_milliseconds() as f64 / 60_000.0
}
