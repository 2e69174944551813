use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const ARTWORK_SCAN_PIPELINE: &str = "artworkscan";
pub const DEFAULT_MAX_THREADS: i64 = 1;
pub const DEFAULT_MAX_RESULTS: i64 = 30;

/// Worker count for `pipeline`; zero or less disables it.
pub fn max_threads_key(pipeline: &str) -> String {
    format!("scheduler.{pipeline}.max_threads")
}

/// Batch size for `pipeline`.
pub fn max_results_key(pipeline: &str) -> String {
    format!("scheduler.{pipeline}.max_results")
}

/// Timer cadence in milliseconds.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleTimings {
    pub trigger_initial_delay_ms: u64,
    pub trigger_period_ms: u64,
    pub run_initial_delay_ms: u64,
    pub run_period_ms: u64,
}

impl Default for ScheduleTimings {
    fn default() -> Self {
        Self {
            trigger_initial_delay_ms: 5_000,
            trigger_period_ms: 300_000,
            run_initial_delay_ms: 6_000,
            run_period_ms: 1_000,
        }
    }
}

impl ScheduleTimings {
    pub fn trigger_initial_delay(&self) -> Duration {
        Duration::from_millis(self.trigger_initial_delay_ms)
    }

    pub fn trigger_period(&self) -> Duration {
        Duration::from_millis(self.trigger_period_ms.max(1))
    }

    pub fn run_initial_delay(&self) -> Duration {
        Duration::from_millis(self.run_initial_delay_ms)
    }

    pub fn run_period(&self) -> Duration {
        Duration::from_millis(self.run_period_ms.max(1))
    }
}
