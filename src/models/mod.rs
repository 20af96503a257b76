//! Reflow domain models.
//!
//! Input types ([`WorkOrder`], [`WorkCenter`], [`ManufacturingOrder`]) and
//! output types ([`ReflowResult`] and its parts). All of them round-trip
//! through serde using camelCase field names.
//!
//! # Domain Mappings
//!
//! | u-reflow | Manufacturing | Maintenance planning |
//! |----------|---------------|----------------------|
//! | WorkOrder | Operation | Job card |
//! | WorkCenter | Machine/Line | Asset |
//! | Shift | Crew shift | Service hours |
//! | MaintenanceWindow | Planned downtime | Outage |

mod calendar;
mod schedule;
pub mod timestamp;
mod work_center;
mod work_order;

pub use calendar::{weekday_index, MaintenanceWindow, Shift};
pub use schedule::{PauseReason, ReflowResult, ScheduleChange, ScheduleSegment, ScheduledWorkOrder};
pub use work_center::WorkCenter;
pub use work_order::{ManufacturingOrder, WorkOrder};
