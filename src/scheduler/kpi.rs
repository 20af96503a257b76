//! Reflow quality metrics (KPIs).
//!
//! Summarizes how far a reflow moved the declared plan.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Makespan | Latest completion time |
//! | Orders changed | Orders whose end moved |
//! | Total delay | Sum of positive end deltas (minutes) |
//! | Maximum delay | Largest single positive end delta (minutes) |
//! | Total pauses | Pauses recorded across all changes |
//! | Worked minutes | Segment time per work center |

use std::collections::HashMap;

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::models::ReflowResult;

/// Reflow performance indicators.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReflowKpi {
    /// Latest completion time, if anything was scheduled.
    #[serde(serialize_with = "serialize_makespan")]
    pub makespan: Option<NaiveDateTime>,
    /// Number of scheduled orders.
    pub orders_scheduled: usize,
    /// Number of orders whose end moved.
    pub orders_changed: usize,
    /// Sum of positive deltas (minutes).
    pub total_delay_minutes: f64,
    /// Largest positive delta (minutes).
    pub max_delay_minutes: f64,
    /// Pause reasons recorded across all changes.
    pub total_pauses: usize,
    /// Worked minutes per work center.
    pub worked_minutes_by_work_center: HashMap<String, f64>,
}

impl ReflowKpi {
    /// Computes KPIs from a reflow result.
    pub fn calculate(result: &ReflowResult) -> Self {
        let mut total_delay = 0.0_f64;
        let mut max_delay = 0.0_f64;
        let mut total_pauses = 0;

        for change in &result.changes {
            if change.delta_minutes > 0.0 {
                total_delay += change.delta_minutes;
                max_delay = max_delay.max(change.delta_minutes);
            }
            total_pauses += change.reasons.len();
        }

        Self {
            makespan: result.makespan(),
            orders_scheduled: result.schedule.len(),
            orders_changed: result.changes.len(),
            total_delay_minutes: total_delay,
            max_delay_minutes: max_delay,
            total_pauses,
            worked_minutes_by_work_center: result.worked_minutes_by_work_center(),
        }
    }

    /// Fraction of scheduled orders that kept their declared end (1.0 if none).
    pub fn on_plan_rate(&self) -> f64 {
        if self.orders_scheduled == 0 {
            1.0
        } else {
            (self.orders_scheduled - self.orders_changed) as f64 / self.orders_scheduled as f64
        }
    }
}

fn serialize_makespan<S>(value: &Option<NaiveDateTime>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    match value {
        Some(t) => crate::models::timestamp::serialize(t, serializer),
        None => serializer.serialize_none(),
    }
}
