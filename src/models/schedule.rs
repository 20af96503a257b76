//! Reflow output model.
//!
//! A reflow produces one [`ScheduledWorkOrder`] per non-maintenance work
//! order, each split into contiguous [`ScheduleSegment`]s, plus a
//! [`ScheduleChange`] for every order whose end moved.

use std::collections::HashMap;
use std::fmt;

use chrono::{NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};

/// One contiguous slice of uninterrupted work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleSegment {
    /// Segment start (inclusive).
    #[serde(with = "super::timestamp")]
    pub start: NaiveDateTime,
    /// Segment end (exclusive).
    #[serde(with = "super::timestamp")]
    pub end: NaiveDateTime,
}

impl ScheduleSegment {
    /// Creates a segment.
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self { start, end }
    }

    /// Length of the segment.
    #[inline]
    pub fn duration(&self) -> TimeDelta {
        self.end - self.start
    }
}

/// A work order placed on its work center.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledWorkOrder {
    /// Scheduled work order.
    pub work_order_id: String,
    /// Work center it runs on.
    pub work_center_id: String,
    /// Start of the first segment.
    #[serde(with = "super::timestamp")]
    pub start: NaiveDateTime,
    /// Completion time (end of the last segment).
    #[serde(with = "super::timestamp")]
    pub end: NaiveDateTime,
    /// Working intervals in time order.
    pub segments: Vec<ScheduleSegment>,
}

impl ScheduledWorkOrder {
    /// Total working time across segments, in minutes.
    pub fn worked_minutes(&self) -> f64 {
        let total = self
            .segments
            .iter()
            .fold(TimeDelta::zero(), |acc, s| acc + s.duration());
        total.num_milliseconds() as f64 / 60_000.0
    }
}

/// Why an order was paused while being advanced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PauseReason {
    /// The cursor fell outside every shift rule.
    #[serde(rename = "Paused outside shift hours")]
    OutsideShift,
    /// The cursor fell inside a maintenance window.
    #[serde(rename = "Paused for maintenance window")]
    Maintenance,
}

impl fmt::Display for PauseReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutsideShift => f.write_str("Paused outside shift hours"),
            Self::Maintenance => f.write_str("Paused for maintenance window"),
        }
    }
}

/// Record of an order whose end moved away from its declared end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleChange {
    /// Moved work order.
    pub work_order_id: String,
    /// Declared start.
    #[serde(with = "super::timestamp")]
    pub old_start: NaiveDateTime,
    /// Declared end.
    #[serde(with = "super::timestamp")]
    pub old_end: NaiveDateTime,
    /// Reflowed start.
    #[serde(with = "super::timestamp")]
    pub new_start: NaiveDateTime,
    /// Reflowed end.
    #[serde(with = "super::timestamp")]
    pub new_end: NaiveDateTime,
    /// `new_end - old_end` in minutes (negative = finished earlier).
    pub delta_minutes: f64,
    /// Pauses hit while advancing, in order.
    pub reasons: Vec<PauseReason>,
}

/// Complete outcome of one reflow call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReflowResult {
    /// One entry per scheduled work order, in processing order.
    pub schedule: Vec<ScheduledWorkOrder>,
    /// One entry per work order whose end moved.
    pub changes: Vec<ScheduleChange>,
}

impl ReflowResult {
    /// Creates an empty result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Finds the schedule entry for a work order.
    pub fn entry(&self, work_order_id: &str) -> Option<&ScheduledWorkOrder> {
        self.schedule
            .iter()
            .find(|s| s.work_order_id == work_order_id)
    }

    /// Finds the change record for a work order.
    pub fn change(&self, work_order_id: &str) -> Option<&ScheduleChange> {
        self.changes.iter().find(|c| c.work_order_id == work_order_id)
    }

    /// Returns all entries on a work center.
    pub fn entries_for_work_center(&self, work_center_id: &str) -> Vec<&ScheduledWorkOrder> {
        self.schedule
            .iter()
            .filter(|s| s.work_center_id == work_center_id)
            .collect()
    }

    /// Latest completion time across all entries.
    pub fn makespan(&self) -> Option<NaiveDateTime> {
        self.schedule.iter().map(|s| s.end).max()
    }

    /// Worked minutes per work center.
    pub fn worked_minutes_by_work_center(&self) -> HashMap<String, f64> {
        let mut busy: HashMap<String, f64> = HashMap::new();
        for s in &self.schedule {
            *busy.entry(s.work_center_id.clone()).or_insert(0.0) += s.worked_minutes();
        }
        busy
    }

    /// Whether every order kept its declared end.
    pub fn is_unchanged(&self) -> bool {
        self.changes.is_empty()
    }
}
