//! Engine configuration.

use serde::{Deserialize, Serialize};

/// Default number of calendar days searched for the next shift start.
pub const DEFAULT_SHIFT_SEARCH_DAYS: u32 = 14;

/// Tunables for a [`crate::scheduler::ReflowEngine`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReflowConfig {
    /// How many calendar days ahead to look for the next shift start
    /// before giving up with `NoShiftFound`.
    pub shift_search_days: u32,
}

impl ReflowConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the shift search horizon.
    pub fn with_shift_search_days(mut self, days: u32) -> Self {
        self.shift_search_days = days;
        self
    }
}

impl Default for ReflowConfig {
    fn default() -> Self {
        Self {
            shift_search_days: DEFAULT_SHIFT_SEARCH_DAYS,
        }
    }
}
