//! Work center model.
//!
//! A work center processes work orders one at a time. Its calendar is a set
//! of weekly shift rules plus a list of maintenance windows.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::{MaintenanceWindow, Shift};

/// A resource that executes work orders serially.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkCenter {
    /// Unique work center identifier.
    #[serde(alias = "docId")]
    pub id: String,
    /// Human-readable name.
    #[serde(default)]
    pub name: String,
    /// Weekly shift rules, in declared order.
    #[serde(default)]
    pub shifts: Vec<Shift>,
    /// Downtime periods, in declared order.
    #[serde(default)]
    pub maintenance_windows: Vec<MaintenanceWindow>,
}

impl WorkCenter {
    /// Creates a work center with no shifts and no downtime.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            shifts: Vec::new(),
            maintenance_windows: Vec::new(),
        }
    }

    /// Sets the name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Adds a shift rule.
    pub fn with_shift(mut self, shift: Shift) -> Self {
        self.shifts.push(shift);
        self
    }

    /// Adds several shift rules.
    pub fn with_shifts(mut self, shifts: impl IntoIterator<Item = Shift>) -> Self {
        self.shifts.extend(shifts);
        self
    }

    /// Adds a maintenance window.
    pub fn with_maintenance(mut self, window: MaintenanceWindow) -> Self {
        self.maintenance_windows.push(window);
        self
    }

    /// Whether work can run at `t`: inside a shift and outside maintenance.
    pub fn is_workable_at(&self, t: &NaiveDateTime) -> bool {
        self.shifts.iter().any(|s| s.covers(t))
            && !self.maintenance_windows.iter().any(|w| w.contains(t))
    }
}
