//! Reflow error taxonomy.
//!
//! Every variant is fatal for the call that raised it: the engine never
//! returns a partial schedule. The boundary layer (`api`) turns these into
//! a failure payload.

use chrono::NaiveDateTime;
use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ReflowError>;

/// Errors raised while validating, sequencing, or scheduling work orders.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReflowError {
    /// The dependency graph contains a cycle; `id` is where it closed.
    #[error("Dependency cycle detected at {id}")]
    CycleDetected {
        /// Work order id found on the traversal stack a second time.
        id: String,
    },

    /// A work order references a work center that was not supplied.
    #[error("Work order '{work_order_id}' references missing work center '{work_center_id}'")]
    MissingWorkCenter {
        /// Offending work order.
        work_order_id: String,
        /// Unresolved work center id.
        work_center_id: String,
    },

    /// No shift starts within the search horizon.
    #[error("No shift found within {horizon_days} days after {from}")]
    NoShiftFound {
        /// Timestamp the search started from.
        from: NaiveDateTime,
        /// Number of calendar days searched.
        horizon_days: u32,
    },

    /// A textual timestamp could not be parsed.
    #[error("Invalid timestamp: '{0}'")]
    InvalidTimestamp(String),

    /// A cycle reported by [`crate::graph::DependencyGraph`], as a closed path.
    #[error("Dependency cycle detected: {}", path.join(" → "))]
    CyclePath {
        /// Node ids along the cycle; first and last are equal.
        path: Vec<String>,
    },
}
