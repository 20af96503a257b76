//! Work order and manufacturing order models.
//!
//! A work order is one unit of work on one work center, with a declared
//! (possibly infeasible) start/end and a required duration. Maintenance
//! work orders are not scheduled; they become downtime on their work center.

use chrono::{NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};

/// A work order to be reflowed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkOrder {
    /// Unique work order identifier.
    #[serde(alias = "docId")]
    pub id: String,
    /// Display number.
    #[serde(default)]
    pub work_order_number: String,
    /// Owning manufacturing order.
    #[serde(default)]
    pub manufacturing_order_id: String,
    /// Work center that executes this order.
    pub work_center_id: String,
    /// Originally planned start.
    #[serde(with = "super::timestamp")]
    pub start_date: NaiveDateTime,
    /// Originally planned end.
    #[serde(with = "super::timestamp")]
    pub end_date: NaiveDateTime,
    /// Required working time in minutes.
    pub duration_minutes: u32,
    /// Maintenance orders are locked and turned into downtime.
    #[serde(default)]
    pub is_maintenance: bool,
    /// Work orders that must complete first. Unknown ids are tolerated.
    #[serde(default)]
    pub depends_on_work_order_ids: Vec<String>,
}

impl WorkOrder {
    /// Creates a work order planned for `[start_date, end_date)`.
    pub fn new(
        id: impl Into<String>,
        work_center_id: impl Into<String>,
        start_date: NaiveDateTime,
        end_date: NaiveDateTime,
    ) -> Self {
        let id = id.into();
        Self {
            work_order_number: id.clone(),
            id,
            manufacturing_order_id: String::new(),
            work_center_id: work_center_id.into(),
            start_date,
            end_date,
            duration_minutes: 0,
            is_maintenance: false,
            depends_on_work_order_ids: Vec::new(),
        }
    }

    /// Sets the display number.
    pub fn with_number(mut self, number: impl Into<String>) -> Self {
        self.work_order_number = number.into();
        self
    }

    /// Sets the owning manufacturing order.
    pub fn with_manufacturing_order(mut self, id: impl Into<String>) -> Self {
        self.manufacturing_order_id = id.into();
        self
    }

    /// Sets the required duration.
    pub fn with_duration_minutes(mut self, minutes: u32) -> Self {
        self.duration_minutes = minutes;
        self
    }

    /// Marks this order as maintenance.
    pub fn as_maintenance(mut self) -> Self {
        self.is_maintenance = true;
        self
    }

    /// Adds a dependency.
    pub fn depends_on(mut self, id: impl Into<String>) -> Self {
        self.depends_on_work_order_ids.push(id.into());
        self
    }

    /// Required working time.
    #[inline]
    pub fn duration(&self) -> TimeDelta {
        TimeDelta::minutes(i64::from(self.duration_minutes))
    }
}

/// A manufacturing order. Accepted by the engine but not yet consulted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManufacturingOrder {
    /// Unique identifier.
    #[serde(alias = "docId")]
    pub id: String,
    /// Display number.
    #[serde(default)]
    pub manufacturing_order_number: String,
    /// Item being produced.
    #[serde(default)]
    pub item_id: String,
    /// Quantity to produce.
    #[serde(default)]
    pub quantity: f64,
    /// Due date.
    #[serde(with = "super::timestamp")]
    pub due_date: NaiveDateTime,
}
