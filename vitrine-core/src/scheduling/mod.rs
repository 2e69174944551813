//! Trigger/run scheduling for queue-draining pipelines.
//!
//! A [`QueueScheduler`] owns the pending flag and the run gate of one
//! pipeline. Timers only call [`QueueScheduler::trigger`] and
//! [`QueueScheduler::run`]; they never touch scheduler state directly.

mod pool;
mod scheduler;
mod timings;

use async_trait::async_trait;
use vitrine_model::{ArtworkId, QueueItem, QueueKind};

use crate::Result;

pub use pool::{BatchReport, run_batch};
pub use scheduler::{QueueScheduler, RunOutcome, SchedulerPhase};
pub use timings::{
    ARTWORK_SCAN_PIPELINE, DEFAULT_MAX_RESULTS, DEFAULT_MAX_THREADS, ScheduleTimings,
    max_results_key, max_threads_key,
};

/// Where a pipeline pulls its work from.
#[async_trait]
pub trait QueueSource: Send + Sync {
    /// Up to `max_results` eligible items, oldest first.
    async fn fetch_queue(&self, kind: QueueKind, max_results: usize) -> Result<Vec<QueueItem>>;
}

/// Handles one queue item end to end.
#[async_trait]
pub trait QueueProcessor: Send + Sync {
    async fn process(&self, item: &QueueItem) -> Result<()>;

    /// Called for every item whose processing failed or panicked.
    async fn processing_error(&self, item: &QueueItem) -> Result<()>;
}

/// State transitions published by a scheduler.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SchedulerEvent {
    Enabled {
        pipeline: String,
    },
    Disabled {
        pipeline: String,
    },
    BatchStarted {
        pipeline: String,
        items: usize,
    },
    BatchFinished {
        pipeline: String,
        processed: usize,
        failed: usize,
    },
    ItemFailed {
        pipeline: String,
        item: ArtworkId,
        error: String,
    },
}
