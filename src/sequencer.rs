//! Order sequencing.
//!
//! Prepares a validated work-order set for forward scheduling:
//!
//! 1. [`materialize_maintenance`] turns maintenance work orders into
//!    maintenance windows on their work center. It returns an updated copy
//!    of the work centers; the caller's collection is left untouched.
//! 2. [`sequence_work_orders`] lists the remaining orders so that every
//!    order comes after the dependencies it can resolve.
//!
//! # Algorithm
//! Depth-first post-order: dependencies are emitted before their dependent.
//! Independent roots are taken in input order, and an order reached through
//! several paths (diamond) is emitted on its first visit. This differs from
//! a level-by-level (Kahn) order; see [`crate::graph`] for that variant.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::error::{ReflowError, Result};
use crate::models::{MaintenanceWindow, WorkCenter, WorkOrder};

/// Reason recorded on windows synthesized from a maintenance work order.
pub fn maintenance_reason(work_order: &WorkOrder) -> String {
    format!("Maintenance WO {}", work_order.work_order_number)
}

/// Returns `work_centers` with every maintenance work order appended as a
/// maintenance window spanning its declared start/end.
///
/// # Errors
/// [`ReflowError::MissingWorkCenter`] if a maintenance order names an
/// unknown work center.
pub fn materialize_maintenance(
    work_orders: &[WorkOrder],
    work_centers: &[WorkCenter],
) -> Result<Vec<WorkCenter>> {
    let mut centers = work_centers.to_vec();
    let index: HashMap<String, usize> = centers
        .iter()
        .enumerate()
        .map(|(i, wc)| (wc.id.clone(), i))
        .collect();

    for wo in work_orders.iter().filter(|w| w.is_maintenance) {
        let &idx = index.get(&wo.work_center_id).ok_or_else(|| {
            ReflowError::MissingWorkCenter {
                work_order_id: wo.id.clone(),
                work_center_id: wo.work_center_id.clone(),
            }
        })?;

        debug!(
            work_order = %wo.id,
            work_center = %wo.work_center_id,
            start = %wo.start_date,
            end = %wo.end_date,
            "locking maintenance work order as downtime"
        );

        centers[idx].maintenance_windows.push(
            MaintenanceWindow::new(wo.start_date, wo.end_date).with_reason(maintenance_reason(wo)),
        );
    }

    Ok(centers)
}

/// Dependency-respecting processing order of the non-maintenance orders.
///
/// Dependencies that name no non-maintenance order are skipped. Cycles are
/// not re-detected here; run [`crate::validation::validate_dependencies`]
/// first. On cyclic input this still terminates, because an order is
/// marked visited when first entered.
pub fn sequence_work_orders(work_orders: &[WorkOrder]) -> Vec<&WorkOrder> {
    let lookup: HashMap<&str, &WorkOrder> = work_orders
        .iter()
        .filter(|w| !w.is_maintenance)
        .map(|w| (w.id.as_str(), w))
        .collect();

    let mut visited: HashSet<&str> = HashSet::new();
    let mut ordered: Vec<&WorkOrder> = Vec::with_capacity(lookup.len());

    for root in work_orders.iter().filter(|w| !w.is_maintenance) {
        if !visited.insert(root.id.as_str()) {
            continue;
        }
        let Some(&root) = lookup.get(root.id.as_str()) else {
            continue;
        };

        let mut stack: Vec<(&WorkOrder, usize)> = vec![(root, 0)];
        while let Some(frame) = stack.last_mut() {
            let (order, next) = *frame;
            if let Some(dep) = order.depends_on_work_order_ids.get(next) {
                frame.1 += 1;
                if !visited.insert(dep.as_str()) {
                    continue;
                }
                if let Some(&dep_order) = lookup.get(dep.as_str()) {
                    stack.push((dep_order, 0));
                }
            } else {
                ordered.push(order);
                stack.pop();
            }
        }
    }

    ordered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::timestamp::parse_timestamp;
    use crate::models::Shift;

    fn wo(id: &str, deps: &[&str]) -> WorkOrder {
        let mut w = WorkOrder::new(
            id,
            "WC1",
            parse_timestamp("2024-05-06T08:00").unwrap(),
            parse_timestamp("2024-05-06T09:00").unwrap(),
        )
        .with_duration_minutes(60);
        for d in deps {
            w = w.depends_on(*d);
        }
        w
    }

    fn ids(ordered: &[&WorkOrder]) -> Vec<String> {
        ordered.iter().map(|w| w.id.clone()).collect()
    }

    #[test]
    fn test_materialize_appends_window() {
        let centers = vec![WorkCenter::new("WC1").with_shifts(Shift::weekdays(8, 17))];
        let orders = vec![
            wo("M1", &[]).with_number("77").as_maintenance(),
            wo("A", &[]),
        ];

        let updated = materialize_maintenance(&orders, &centers).unwrap();
        assert_eq!(updated[0].maintenance_windows.len(), 1);
        let w = &updated[0].maintenance_windows[0];
        assert_eq!(w.start_date, parse_timestamp("2024-05-06T08:00").unwrap());
        assert_eq!(w.end_date, parse_timestamp("2024-05-06T09:00").unwrap());
        assert_eq!(w.reason.as_deref(), Some("Maintenance WO 77"));

        // Caller's work centers are not touched.
        assert!(centers[0].maintenance_windows.is_empty());
    }

    #[test]
    fn test_materialize_missing_work_center() {
        let centers = vec![WorkCenter::new("WC1")];
        let mut m = wo("M1", &[]).as_maintenance();
        m.work_center_id = "WC9".into();

        let err = materialize_maintenance(&[m], &centers).unwrap_err();
        assert_eq!(
            err,
            ReflowError::MissingWorkCenter {
                work_order_id: "M1".into(),
                work_center_id: "WC9".into(),
            }
        );
    }

    #[test]
    fn test_materialize_ignores_regular_orders_on_unknown_center() {
        let centers = vec![WorkCenter::new("WC1")];
        let mut a = wo("A", &[]);
        a.work_center_id = "WC9".into();
        assert!(materialize_maintenance(&[a], &centers).is_ok());
    }

    #[test]
    fn test_sequence_dependencies_first() {
        let orders = vec![wo("C", &["B"]), wo("B", &["A"]), wo("A", &[])];
        assert_eq!(ids(&sequence_work_orders(&orders)), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_sequence_independent_roots_keep_input_order() {
        let orders = vec![wo("X", &[]), wo("Y", &[]), wo("Z", &[])];
        assert_eq!(ids(&sequence_work_orders(&orders)), vec!["X", "Y", "Z"]);
    }

    #[test]
    fn test_sequence_diamond_post_order() {
        let orders = vec![
            wo("D", &["B", "C"]),
            wo("B", &["A"]),
            wo("C", &["A"]),
            wo("A", &[]),
        ];
        assert_eq!(ids(&sequence_work_orders(&orders)), vec!["A", "B", "C", "D"]);
    }

    #[test]
    fn test_sequence_excludes_maintenance_and_unknowns() {
        let orders = vec![
            wo("A", &["M", "GHOST"]),
            wo("M", &[]).as_maintenance(),
            wo("B", &["A"]),
        ];
        assert_eq!(ids(&sequence_work_orders(&orders)), vec!["A", "B"]);
    }

    #[test]
    fn test_sequence_terminates_on_cycle() {
        let orders = vec![wo("A", &["B"]), wo("B", &["A"])];
        assert_eq!(sequence_work_orders(&orders).len(), 2);
    }
}
