//! Scheduler tunables, deserializable from the service configuration.

use serde::{Deserialize, Serialize};

/// Sweep cadence and reminder offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Seconds between sweeps.
    #[serde(default = "default_tick_interval_secs")]
    pub tick_interval_secs: u64,
    /// Minutes before the scheduled date for the first reminder.
    #[serde(default = "default_one_hour_offset")]
    pub one_hour_offset_minutes: i64,
    /// Minutes before the scheduled date for the final reminder.
    #[serde(default = "default_thirty_min_offset")]
    pub thirty_min_offset_minutes: i64,
}

fn default_tick_interval_secs() -> u64 {
    5
}

fn default_one_hour_offset() -> i64 {
    60
}

fn default_thirty_min_offset() -> i64 {
    30
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            tick_interval_secs: default_tick_interval_secs(),
            one_hour_offset_minutes: default_one_hour_offset(),
            thirty_min_offset_minutes: default_thirty_min_offset(),
        }
    }
}
