//! Reflow entry point.
//!
//! Runs the full pipeline for one call:
//! input audit → dependency validation → maintenance materialization →
//! sequencing → forward scheduling.

use tracing::{info, warn};

use super::ForwardScheduler;
use crate::config::ReflowConfig;
use crate::error::Result;
use crate::models::{ManufacturingOrder, ReflowResult, WorkCenter, WorkOrder};
use crate::sequencer;
use crate::validation;

/// Recomputes a feasible schedule from declared work-order plans.
///
/// Stateless between calls: the per-order completion and per-work-center
/// availability maps live only for the duration of one [`reflow`](Self::reflow).
///
/// # Example
///
/// ```
/// use u_reflow::models::{timestamp::parse_timestamp, Shift, WorkCenter, WorkOrder};
/// use u_reflow::scheduler::ReflowEngine;
///
/// let centers = vec![WorkCenter::new("WC1").with_shifts(Shift::weekdays(8, 17))];
/// let orders = vec![WorkOrder::new(
///     "WO1",
///     "WC1",
///     parse_timestamp("2024-05-06T09:00:00").unwrap(),
///     parse_timestamp("2024-05-06T11:00:00").unwrap(),
/// )
/// .with_duration_minutes(120)];
///
/// let result = ReflowEngine::new().reflow(&orders, &centers, &[]).unwrap();
/// assert_eq!(result.schedule.len(), 1);
/// assert!(result.changes.is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ReflowEngine {
    config: ReflowConfig,
}

impl ReflowEngine {
    /// Creates an engine with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the configuration.
    pub fn with_config(mut self, config: ReflowConfig) -> Self {
        self.config = config;
        self
    }

    /// Current configuration.
    pub fn config(&self) -> &ReflowConfig {
        &self.config
    }

    /// Reflows `work_orders` on `work_centers`.
    ///
    /// `manufacturing_orders` is accepted for forward compatibility and not
    /// consulted. `work_centers` is not modified; maintenance work orders are
    /// applied to an internal copy.
    ///
    /// # Errors
    /// Any [`crate::ReflowError`] aborts the whole call; no partial schedule
    /// is returned.
    pub fn reflow(
        &self,
        work_orders: &[WorkOrder],
        work_centers: &[WorkCenter],
        manufacturing_orders: &[ManufacturingOrder],
    ) -> Result<ReflowResult> {
        info!(
            work_orders = work_orders.len(),
            work_centers = work_centers.len(),
            manufacturing_orders = manufacturing_orders.len(),
            "reflow started"
        );

        for issue in validation::audit_input(work_orders, work_centers) {
            warn!(kind = ?issue.kind, "{}", issue.message);
        }

        validation::validate_dependencies(work_orders)?;
        let centers = sequencer::materialize_maintenance(work_orders, work_centers)?;
        let ordered = sequencer::sequence_work_orders(work_orders);

        let result = ForwardScheduler::new()
            .with_config(self.config.clone())
            .schedule(&ordered, &centers)?;

        info!(
            scheduled = result.schedule.len(),
            changed = result.changes.len(),
            "reflow finished"
        );
        Ok(result)
    }
}

/// Reflows with the default configuration.
///
/// Shorthand for `ReflowEngine::new().reflow(..)`.
pub fn reflow(
    work_orders: &[WorkOrder],
    work_centers: &[WorkCenter],
    manufacturing_orders: &[ManufacturingOrder],
) -> Result<ReflowResult> {
    ReflowEngine::new().reflow(work_orders, work_centers, manufacturing_orders)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReflowError;
    use crate::models::timestamp::{format_timestamp, parse_timestamp};
    use crate::models::{MaintenanceWindow, Shift};
    use chrono::{Datelike, NaiveDateTime, TimeDelta, Weekday};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn ts(s: &str) -> NaiveDateTime {
        parse_timestamp(s).unwrap()
    }

    fn fmt(t: &NaiveDateTime) -> String {
        format_timestamp(t)
    }

    fn wc_base() -> WorkCenter {
        WorkCenter::new("WC1")
            .with_name("Assembly")
            .with_shifts(Shift::weekdays(8, 17))
            .with_maintenance(MaintenanceWindow::new(
                ts("2024-05-08T12:00:00"),
                ts("2024-05-08T13:00:00"),
            ))
    }

    fn wo(id: &str, start: &str, end: &str, minutes: u32) -> WorkOrder {
        WorkOrder::new(id, "WC1", ts(start), ts(end))
            .with_manufacturing_order("MO1")
            .with_duration_minutes(minutes)
    }

    fn wo_base() -> WorkOrder {
        wo("WO1", "2024-05-06T09:00:00", "2024-05-06T11:00:00", 120)
    }

    #[test]
    fn test_single_order_inside_shift() {
        let result = reflow(&[wo_base()], &[wc_base()], &[]).unwrap();
        assert_eq!(fmt(&result.schedule[0].end), "2024-05-06 11:00:00");
        assert!(result.changes.is_empty());
    }

    #[test]
    fn test_pauses_at_shift_end() {
        let order = wo("WO2", "2024-05-06T16:00:00", "2024-05-06T11:00:00", 120);
        let result = reflow(&[order], &[wc_base()], &[]).unwrap();
        assert_eq!(fmt(&result.schedule[0].end), "2024-05-07 09:00:00");
        assert_eq!(
            result.changes[0].reasons,
            vec![crate::models::PauseReason::OutsideShift]
        );
    }

    #[test]
    fn test_half_hour_start_carries_minutes_into_shift_end() {
        // Shift end keeps the cursor's minutes: 16:30 works until 17:30.
        let order = wo("WO3", "2024-05-06T16:30:00", "2024-05-06T18:30:00", 120);
        let result = reflow(&[order], &[wc_base()], &[]).unwrap();
        assert_eq!(fmt(&result.schedule[0].segments[0].end), "2024-05-06 17:30:00");
        assert_eq!(fmt(&result.schedule[0].end), "2024-05-07 09:00:00");
    }

    #[test]
    fn test_blocked_by_maintenance_window() {
        let order = wo("WO4", "2024-05-08T11:00:00", "2024-05-08T14:00:00", 120);
        let result = reflow(&[order], &[wc_base()], &[]).unwrap();
        assert_eq!(result.schedule[0].segments.len(), 2);
        assert_eq!(fmt(&result.schedule[0].end), "2024-05-08 14:00:00");
    }

    #[test]
    fn test_maintenance_order_is_locked() {
        let maintenance =
            wo("WO5", "2024-05-07T10:00:00", "2024-05-07T12:00:00", 120).as_maintenance();
        let result = reflow(&[maintenance], &[wc_base()], &[]).unwrap();
        assert!(result.schedule.is_empty());
        assert!(result.changes.is_empty());
    }

    #[test]
    fn test_maintenance_order_blocks_regular_order() {
        let maintenance = wo("M", "2024-05-07T10:00:00", "2024-05-07T12:00:00", 120)
            .with_number("M-1")
            .as_maintenance();
        let order = wo("A", "2024-05-07T09:00:00", "2024-05-07T11:00:00", 120);
        let centers = vec![wc_base()];

        let result = reflow(&[order, maintenance], &centers, &[]).unwrap();
        let entry = result.entry("A").unwrap();
        assert_eq!(entry.segments.len(), 2);
        assert_eq!(fmt(&entry.segments[0].end), "2024-05-07 10:00:00");
        assert_eq!(fmt(&entry.segments[1].start), "2024-05-07 12:00:00");
        assert_eq!(fmt(&entry.end), "2024-05-07 13:00:00");
        assert_eq!(
            result.change("A").unwrap().reasons,
            vec![crate::models::PauseReason::Maintenance]
        );

        // The caller's work centers are not modified.
        assert_eq!(centers[0].maintenance_windows.len(), 1);
    }

    #[test]
    fn test_same_work_center_no_overlap() {
        let a = wo("WO6A", "2024-05-06T08:00:00", "2024-05-06T10:00:00", 120);
        let b = wo("WO6B", "2024-05-06T08:00:00", "2024-05-06T10:00:00", 120);
        let result = reflow(&[a, b], &[wc_base()], &[]).unwrap();
        assert!(result.schedule[1].start >= result.schedule[0].end);
    }

    #[test]
    fn test_dependency_delays_child() {
        let parent = wo("WO7A", "2024-05-06T08:00:00", "2024-05-06T11:00:00", 240);
        let child = wo("WO7B", "2024-05-06T08:00:00", "2024-05-06T11:00:00", 60).depends_on("WO7A");
        let result = reflow(&[parent, child], &[wc_base()], &[]).unwrap();
        assert_eq!(result.schedule[0].work_order_id, "WO7A");
        assert_eq!(result.schedule[1].work_order_id, "WO7B");
        assert_eq!(result.schedule[1].start, result.schedule[0].end);
    }

    #[test]
    fn test_dependency_across_work_centers() {
        let wc2 = WorkCenter::new("WC2").with_shifts(Shift::weekdays(6, 20));
        let parent = wo("P", "2024-05-06T08:00:00", "2024-05-06T10:00:00", 120);
        let mut child = wo("C", "2024-05-06T06:00:00", "2024-05-06T07:00:00", 60).depends_on("P");
        child.work_center_id = "WC2".into();

        let result = reflow(&[child, parent], &[wc_base(), wc2], &[]).unwrap();
        assert_eq!(result.schedule[0].work_order_id, "P");
        assert_eq!(fmt(&result.entry("C").unwrap().start), "2024-05-06 10:00:00");
    }

    #[test]
    fn test_multiple_parents() {
        let a = wo("A", "2024-05-06T09:00:00", "2024-05-06T11:00:00", 120);
        let b = wo("B", "2024-05-06T09:00:00", "2024-05-06T11:00:00", 120);
        let c = wo("C", "2024-05-06T09:00:00", "2024-05-06T11:00:00", 120)
            .depends_on("A")
            .depends_on("B");
        let result = reflow(&[a, b, c], &[wc_base()], &[]).unwrap();
        assert!(result.schedule[2].start >= result.schedule[1].end);
        assert!(result.schedule[2].start >= result.schedule[0].end);
    }

    #[test]
    fn test_skips_weekend() {
        let order = wo("WO9", "2024-05-10T16:00:00", "2024-05-13T10:00:00", 240);
        let result = reflow(&[order], &[wc_base()], &[]).unwrap();
        assert_eq!(result.schedule[0].end.weekday(), Weekday::Mon);
        assert_eq!(fmt(&result.schedule[0].end), "2024-05-13 11:00:00");
    }

    #[test]
    fn test_chain_dependency() {
        let a = wo("A", "2024-05-06T09:00:00", "2024-05-06T11:00:00", 60);
        let b = a.clone().depends_on("A");
        let b = WorkOrder { id: "B".into(), ..b };
        let c = WorkOrder {
            id: "C".into(),
            depends_on_work_order_ids: vec!["B".into()],
            ..a.clone()
        };
        let result = reflow(&[a, b, c], &[wc_base()], &[]).unwrap();
        assert!(result.schedule[2].start >= result.schedule[1].end);
        assert!(result.schedule[1].start >= result.schedule[0].end);
    }

    #[test]
    fn test_cycle_aborts_whole_call() {
        // A → C, B → A, C → B
        let a = wo("A", "2024-05-06T08:00:00Z", "2024-05-06T09:00:00Z", 60).depends_on("C");
        let b = wo("B", "2024-05-06T09:00:00Z", "2024-05-06T10:00:00Z", 60).depends_on("A");
        let c = wo("C", "2024-05-06T10:00:00Z", "2024-05-06T11:00:00Z", 60).depends_on("B");
        let err = reflow(&[a, b, c], &[wc_base()], &[]).unwrap_err();
        assert!(matches!(err, ReflowError::CycleDetected { .. }));
        assert!(err.to_string().to_lowercase().contains("cycle"));
    }

    #[test]
    fn test_missing_work_center_aborts() {
        let mut order = wo_base();
        order.work_center_id = "NOPE".into();
        let ok = wo("OK", "2024-05-06T09:00:00", "2024-05-06T10:00:00", 60);
        let err = reflow(&[ok, order], &[wc_base()], &[]).unwrap_err();
        assert!(matches!(err, ReflowError::MissingWorkCenter { .. }));
    }

    #[test]
    fn test_missing_work_center_for_maintenance_aborts() {
        let mut m = wo("M", "2024-05-07T10:00:00", "2024-05-07T12:00:00", 120).as_maintenance();
        m.work_center_id = "NOPE".into();
        let err = reflow(&[wo_base(), m], &[wc_base()], &[]).unwrap_err();
        assert_eq!(
            err,
            ReflowError::MissingWorkCenter {
                work_order_id: "M".into(),
                work_center_id: "NOPE".into()
            }
        );
    }

    #[test]
    fn test_no_shift_aborts() {
        let bare = WorkCenter::new("WC1");
        let err = reflow(&[wo_base()], &[bare], &[]).unwrap_err();
        assert!(matches!(err, ReflowError::NoShiftFound { .. }));
    }

    #[test]
    fn test_config_horizon_is_used() {
        let weekend = WorkCenter::new("WC1").with_shift(Shift::new(6, 8, 12));
        let engine = ReflowEngine::new().with_config(ReflowConfig::new().with_shift_search_days(2));
        assert_eq!(engine.config().shift_search_days, 2);
        assert!(engine.reflow(&[wo_base()], &[weekend.clone()], &[]).is_err());
        assert!(reflow(&[wo_base()], &[weekend], &[]).is_ok());
    }

    #[test]
    fn test_empty_input() {
        let result = reflow(&[], &[], &[]).unwrap();
        assert!(result.schedule.is_empty());
        assert!(result.changes.is_empty());
    }

    /// Random acyclic inputs: dependencies only point to lower indices.
    /// Everything falls on whole hours, matching the hour-granular shifts.
    fn random_input(rng: &mut StdRng) -> (Vec<WorkOrder>, Vec<WorkCenter>) {
        let centers = vec![
            WorkCenter::new("WC1")
                .with_shifts(Shift::weekdays(8, 17))
                .with_maintenance(MaintenanceWindow::new(
                    ts("2024-05-07T12:00"),
                    ts("2024-05-07T14:00"),
                )),
            WorkCenter::new("WC2")
                .with_shifts(Shift::weekdays(6, 14))
                .with_shift(Shift::new(6, 8, 12)),
        ];

        let n = rng.random_range(1..12);
        let base = ts("2024-05-06T00:00");
        let mut orders = Vec::with_capacity(n);
        for i in 0..n {
            let start = base + TimeDelta::hours(rng.random_range(0..96));
            let minutes = rng.random_range(1..8) * 60;
            let mut order = WorkOrder::new(
                format!("O{i}"),
                if rng.random_bool(0.5) { "WC1" } else { "WC2" },
                start,
                start + TimeDelta::minutes(i64::from(minutes)),
            )
            .with_duration_minutes(minutes);
            for dep in 0..i {
                if rng.random_bool(0.25) {
                    order = order.depends_on(format!("O{dep}"));
                }
            }
            if rng.random_bool(0.15) {
                order = order.as_maintenance();
            }
            orders.push(order);
        }
        (orders, centers)
    }

    #[test]
    fn test_properties_on_random_inputs() {
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..200 {
            let (orders, centers) = random_input(&mut rng);
            let result = reflow(&orders, &centers, &[]).unwrap();
            let effective = sequencer::materialize_maintenance(&orders, &centers).unwrap();

            // One entry per non-maintenance order.
            let regular: Vec<&WorkOrder> = orders.iter().filter(|o| !o.is_maintenance).collect();
            assert_eq!(result.schedule.len(), regular.len());

            for entry in &result.schedule {
                let order = regular
                    .iter()
                    .find(|o| o.id == entry.work_order_id)
                    .unwrap();
                let center = effective
                    .iter()
                    .find(|c| c.id == entry.work_center_id)
                    .unwrap();

                // Duration conservation.
                let worked = entry
                    .segments
                    .iter()
                    .fold(TimeDelta::zero(), |acc, s| acc + s.duration());
                assert_eq!(worked, order.duration());

                // Ordered, non-overlapping, positive, inside shifts and outside maintenance.
                for s in &entry.segments {
                    assert!(s.end > s.start);
                    assert!(center.is_workable_at(&s.start));
                    assert!(center.is_workable_at(&(s.end - TimeDelta::seconds(1))));
                }
                for pair in entry.segments.windows(2) {
                    assert!(pair[0].end <= pair[1].start);
                }
                assert_eq!(entry.start, entry.segments[0].start);
                assert_eq!(entry.end, entry.segments[entry.segments.len() - 1].end);

                // Dependents start after their scheduled dependencies end.
                for dep in &order.depends_on_work_order_ids {
                    if let Some(parent) = result.entry(dep) {
                        assert!(entry.start >= parent.end);
                    }
                }
            }

            // Serialization on each work center, in processing order.
            for center in &centers {
                let on_center = result.entries_for_work_center(&center.id);
                for pair in on_center.windows(2) {
                    assert!(pair[1].start >= pair[0].end);
                }
            }
        }
    }
}
