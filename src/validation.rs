//! Input validation for reflow requests.
//!
//! Two layers:
//! - [`validate_dependencies`]: fatal. Rejects a dependency graph with a cycle.
//! - [`audit_input`]: advisory. Collects structural oddities (duplicate ids,
//!   dangling references, malformed shifts) without failing; the engine logs
//!   them and carries on.
//!
//! # Reference
//! Cormen et al. (2009), "Introduction to Algorithms", Ch. 22.3 (DFS, back edges)

use std::collections::{HashMap, HashSet};

use crate::error::{ReflowError, Result};
use crate::models::{WorkCenter, WorkOrder};

/// Rejects dependency cycles among work orders.
///
/// Depth-first traversal from every order (maintenance orders included),
/// tracking which ids are on the current path. Reaching an id that is
/// already on the path closes a cycle. Dependencies naming no known order
/// end that branch silently.
///
/// The traversal keeps its own stack, so deep chains cannot overflow the
/// call stack.
///
/// # Errors
/// [`ReflowError::CycleDetected`] naming the id where the cycle closed.
pub fn validate_dependencies(work_orders: &[WorkOrder]) -> Result<()> {
    let lookup: HashMap<&str, &WorkOrder> =
        work_orders.iter().map(|w| (w.id.as_str(), w)).collect();

    let mut visited: HashSet<&str> = HashSet::new();
    let mut on_path: HashSet<&str> = HashSet::new();

    for root in work_orders {
        let root_id = root.id.as_str();
        if visited.contains(root_id) {
            continue;
        }

        // (node, index of next dependency to explore)
        let mut stack: Vec<(&str, usize)> = vec![(root_id, 0)];
        on_path.insert(root_id);

        while let Some(frame) = stack.last_mut() {
            let (node, next) = *frame;
            let deps = lookup
                .get(node)
                .map_or(&[][..], |w| w.depends_on_work_order_ids.as_slice());

            if let Some(dep) = deps.get(next) {
                frame.1 += 1;
                let dep = dep.as_str();

                if on_path.contains(dep) {
                    return Err(ReflowError::CycleDetected { id: dep.to_string() });
                }
                if visited.contains(dep) || !lookup.contains_key(dep) {
                    continue;
                }

                on_path.insert(dep);
                stack.push((dep, 0));
            } else {
                on_path.remove(node);
                visited.insert(node);
                stack.pop();
            }
        }
    }

    Ok(())
}

/// Categories of advisory findings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputIssueKind {
    /// Two work orders or two work centers share an id.
    DuplicateId,
    /// A dependency names no work order.
    UnknownDependency,
    /// A work order names no work center.
    UnknownWorkCenter,
    /// A shift rule is out of range or empty.
    MalformedShift,
}

/// An advisory finding about the input.
#[derive(Debug, Clone, PartialEq)]
pub struct InputIssue {
    /// Finding category.
    pub kind: InputIssueKind,
    /// Human-readable description.
    pub message: String,
}

impl InputIssue {
    fn new(kind: InputIssueKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Collects advisory findings about a reflow input.
///
/// Checks:
/// 1. No duplicate work center IDs
/// 2. No duplicate work order IDs
/// 3. Shift rules have a day in 0..=6 and `start < end <= 24`
/// 4. Every work center reference resolves
/// 5. Every dependency reference resolves
///
/// Never fails. Unknown work centers still abort the reflow later; unknown
/// dependencies are ignored by it.
pub fn audit_input(work_orders: &[WorkOrder], work_centers: &[WorkCenter]) -> Vec<InputIssue> {
    let mut issues = Vec::new();

    let mut center_ids = HashSet::new();
    for wc in work_centers {
        if !center_ids.insert(wc.id.as_str()) {
            issues.push(InputIssue::new(
                InputIssueKind::DuplicateId,
                format!("Duplicate work center ID: {}", wc.id),
            ));
        }

        for shift in wc.shifts.iter().filter(|s| !s.is_well_formed()) {
            issues.push(InputIssue::new(
                InputIssueKind::MalformedShift,
                format!(
                    "Work center '{}' has malformed shift: day {} {}-{}",
                    wc.id, shift.day_of_week, shift.start_hour, shift.end_hour
                ),
            ));
        }
    }

    let mut order_ids = HashSet::new();
    for wo in work_orders {
        if !order_ids.insert(wo.id.as_str()) {
            issues.push(InputIssue::new(
                InputIssueKind::DuplicateId,
                format!("Duplicate work order ID: {}", wo.id),
            ));
        }
    }

    for wo in work_orders {
        if !center_ids.contains(wo.work_center_id.as_str()) {
            issues.push(InputIssue::new(
                InputIssueKind::UnknownWorkCenter,
                format!(
                    "Work order '{}' references unknown work center '{}'",
                    wo.id, wo.work_center_id
                ),
            ));
        }

        for dep in &wo.depends_on_work_order_ids {
            if !order_ids.contains(dep.as_str()) {
                issues.push(InputIssue::new(
                    InputIssueKind::UnknownDependency,
                    format!("Work order '{}' depends on unknown work order '{}'", wo.id, dep),
                ));
            }
        }
    }

    issues
}
