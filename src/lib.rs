//! Production schedule reflow for manufacturing work centers.
//!
//! Given work orders whose planned dates may have become infeasible (a
//! predecessor ran long, a machine is down, a shift ends early), computes a
//! valid schedule that respects dependencies, work center capacity, shift
//! hours, and maintenance windows, and reports every order that moved.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `WorkOrder`, `WorkCenter`, `Shift`,
//!   `MaintenanceWindow`, `ReflowResult`, `ScheduleChange`
//! - **`calendar`**: Shift and maintenance lookups on a point in time
//! - **`validation`**: Dependency cycle detection and non-fatal input audit
//! - **`sequencer`**: Maintenance materialization and dependency ordering
//! - **`scheduler`**: `ReflowEngine`, the forward scheduler, and KPIs
//! - **`graph`**: Standalone DAG with level-order topological sort
//! - **`api`**: JSON request/response wrapper that never fails
//!
//! # Example
//!
//! ```
//! use u_reflow::models::timestamp::parse_timestamp;
//! use u_reflow::models::{Shift, WorkCenter, WorkOrder};
//!
//! let wc = WorkCenter::new("WC1").with_shifts(Shift::weekdays(8, 17));
//! // Monday 16:00, two hours of work: one hour today, one tomorrow morning.
//! let wo = WorkOrder::new(
//!     "A",
//!     "WC1",
//!     parse_timestamp("2024-05-06T16:00:00").unwrap(),
//!     parse_timestamp("2024-05-06T18:00:00").unwrap(),
//! )
//! .with_duration_minutes(120);
//!
//! let result = u_reflow::reflow(&[wo], &[wc], &[]).unwrap();
//! assert_eq!(result.schedule[0].segments.len(), 2);
//! assert_eq!(
//!     result.schedule[0].end,
//!     parse_timestamp("2024-05-07T09:00:00").unwrap()
//! );
//! ```
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems"
//! - Cormen et al. (2009), "Introduction to Algorithms", §22.3-22.4

pub mod api;
pub mod calendar;
pub mod config;
pub mod error;
pub mod graph;
pub mod models;
pub mod scheduler;
pub mod sequencer;
pub mod validation;

pub use config::ReflowConfig;
pub use error::{ReflowError, Result};
pub use scheduler::{reflow, ReflowEngine};
