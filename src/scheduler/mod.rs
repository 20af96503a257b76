//! Forward reflow scheduling and KPI evaluation.
//!
//! # Algorithm
//!
//! `ReflowEngine` validates and sequences the input, then hands the ordered
//! work orders to `ForwardScheduler`, a greedy finite-capacity forward pass:
//! each order starts as early as its declared start, its dependencies, and
//! its work center allow, and is split into segments around shift ends and
//! maintenance windows. It does not re-optimize for due dates or priority.
//!
//! # KPI
//!
//! `ReflowKpi` summarizes how far the reflow moved the declared plan.

mod engine;
mod forward;
mod kpi;

pub use engine::{reflow, ReflowEngine};
pub use forward::{Advance, ForwardScheduler};
pub use kpi::ReflowKpi;
