use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, trace};
use vitrine_model::QueueKind;

use super::pool::{BatchReport, run_batch};
use super::timings::{
    ARTWORK_SCAN_PIPELINE, DEFAULT_MAX_RESULTS, DEFAULT_MAX_THREADS, ScheduleTimings,
    max_results_key, max_threads_key,
};
use super::{QueueProcessor, QueueSource, SchedulerEvent};
use crate::config::ConfigService;

const EVENT_CAPACITY: usize = 64;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SchedulerPhase {
    Idle,
    Triggered,
    Running,
}

/// What a single run tick did.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RunOutcome {
    /// No trigger pending.
    NotTriggered,
    /// Another run holds the gate; the tick was dropped.
    Busy,
    /// Disabled by configuration; the pending trigger was cleared.
    Disabled,
    /// The queue was empty.
    Drained,
    /// The queue could not be read; the trigger stays pending.
    FetchFailed,
    Completed(BatchReport),
}

#[derive(Debug)]
struct SchedulerState {
    phase: SchedulerPhase,
    /// Trigger seen while a batch was running.
    retrigger: bool,
    /// Whether the disabled transition has been announced.
    disabled_announced: bool,
}

/// Trigger/run scheduler for one queue-draining pipeline.
///
/// `trigger` only marks work as pending. `run` executes at most one batch
/// at a time; a run attempt that finds another one in flight returns
/// [`RunOutcome::Busy`] without waiting.
pub struct QueueScheduler {
    pipeline: String,
    kind: QueueKind,
    source: Arc<dyn QueueSource>,
    processor: Arc<dyn QueueProcessor>,
    config: Arc<dyn ConfigService>,
    state: Mutex<SchedulerState>,
    run_gate: tokio::sync::Mutex<()>,
    events: broadcast::Sender<SchedulerEvent>,
}

impl QueueScheduler {
    pub fn new(
        pipeline: impl Into<String>,
        kind: QueueKind,
        source: Arc<dyn QueueSource>,
        processor: Arc<dyn QueueProcessor>,
        config: Arc<dyn ConfigService>,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            pipeline: pipeline.into(),
            kind,
            source,
            processor,
            config,
            state: Mutex::new(SchedulerState {
                phase: SchedulerPhase::Idle,
                retrigger: false,
                disabled_announced: false,
            }),
            run_gate: tokio::sync::Mutex::new(()),
            events,
        }
    }

    /// Scheduler for the artwork scan queue.
    pub fn artwork(
        source: Arc<dyn QueueSource>,
        processor: Arc<dyn QueueProcessor>,
        config: Arc<dyn ConfigService>,
    ) -> Self {
        Self::new(
            ARTWORK_SCAN_PIPELINE,
            QueueKind::ArtworkScan,
            source,
            processor,
            config,
        )
    }

    pub fn pipeline(&self) -> &str {
        &self.pipeline
    }

    pub fn phase(&self) -> SchedulerPhase {
        self.state.lock().phase
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SchedulerEvent> {
        self.events.subscribe()
    }

    /// Marks work as pending. Never runs anything itself.
    pub fn trigger(&self) {
        trace!(target: "scheduler", pipeline = %self.pipeline, "Trigger queue processing");
        let mut state = self.state.lock();
        match state.phase {
            SchedulerPhase::Idle => state.phase = SchedulerPhase::Triggered,
            SchedulerPhase::Triggered => {}
            SchedulerPhase::Running => state.retrigger = true,
        }
    }

    /// One run tick: processes a batch if work is pending and no other run
    /// is in flight.
    pub async fn run(&self) -> RunOutcome {
        let Ok(_gate) = self.run_gate.try_lock() else {
            trace!(target: "scheduler", pipeline = %self.pipeline, "Previous run still executing");
            return RunOutcome::Busy;
        };

        if self.state.lock().phase != SchedulerPhase::Triggered {
            return RunOutcome::NotTriggered;
        }

        let max_threads = self
            .config
            .get_int(&max_threads_key(&self.pipeline), DEFAULT_MAX_THREADS);
        if max_threads <= 0 {
            self.disable();
            return RunOutcome::Disabled;
        }
        self.enable();

        let max_results = self
            .config
            .get_int(&max_results_key(&self.pipeline), DEFAULT_MAX_RESULTS)
            .max(1);
        let max_results = usize::try_from(max_results).unwrap_or(usize::MAX);
        let workers = usize::try_from(max_threads).unwrap_or(usize::MAX);

        let items = match self.source.fetch_queue(self.kind, max_results).await {
            Ok(items) => items,
            Err(err) => {
                error!(
                    target: "scheduler",
                    pipeline = %self.pipeline,
                    error = %err,
                    "Failed to fetch queue"
                );
                self.finish(true);
                return RunOutcome::FetchFailed;
            }
        };

        if items.is_empty() {
            trace!(target: "scheduler", pipeline = %self.pipeline, "No queue items found to process");
            self.finish(false);
            return RunOutcome::Drained;
        }

        info!(
            target: "scheduler",
            pipeline = %self.pipeline,
            items = items.len(),
            threads = workers,
            "Found queue items to process"
        );
        let _ = self.events.send(SchedulerEvent::BatchStarted {
            pipeline: self.pipeline.clone(),
            items: items.len(),
        });

        let report = run_batch(
            &self.pipeline,
            items,
            workers,
            Arc::clone(&self.processor),
            &self.events,
        )
        .await;

        debug!(
            target: "scheduler",
            pipeline = %self.pipeline,
            processed = report.processed,
            failed = report.failed,
            "Finished queue processing"
        );
        let _ = self.events.send(SchedulerEvent::BatchFinished {
            pipeline: self.pipeline.clone(),
            processed: report.processed,
            failed: report.failed,
        });

        self.finish(true);
        RunOutcome::Completed(report)
    }

    /// Starts the trigger and run timers. Cancelling `shutdown` stops both
    /// once the current tick is done; a running batch is never interrupted.
    pub fn spawn(self: &Arc<Self>, timings: ScheduleTimings, shutdown: CancellationToken) -> JoinHandle<()> {
        let scheduler = Arc::clone(self);

        tokio::spawn(async move {
            let start = Instant::now();

            let trigger_loop = {
                let scheduler = Arc::clone(&scheduler);
                let shutdown = shutdown.clone();
                let mut ticks = interval_at(
                    start + timings.trigger_initial_delay(),
                    timings.trigger_period(),
                );
                ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);

                tokio::spawn(async move {
                    loop {
                        tokio::select! {
                            _ = shutdown.cancelled() => break,
                            _ = ticks.tick() => scheduler.trigger(),
                        }
                    }
                })
            };

            let mut ticks = interval_at(start + timings.run_initial_delay(), timings.run_period());
            ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = shutdown.cancelled() => break,
                    _ = ticks.tick() => {
                        scheduler.run().await;
                    }
                }
            }

            if let Err(err) = trigger_loop.await {
                error!(
                    target: "scheduler",
                    pipeline = %scheduler.pipeline,
                    error = %err,
                    "Trigger timer ended abnormally"
                );
            }
            debug!(target: "scheduler", pipeline = %scheduler.pipeline, "Scheduler stopped");
        })
    }

    fn disable(&self) {
        let announce = {
            let mut state = self.state.lock();
            state.phase = SchedulerPhase::Idle;
            state.retrigger = false;
            !std::mem::replace(&mut state.disabled_announced, true)
        };
        if announce {
            info!(target: "scheduler", pipeline = %self.pipeline, "Queue processing is disabled");
            let _ = self.events.send(SchedulerEvent::Disabled {
                pipeline: self.pipeline.clone(),
            });
        }
    }

    fn enable(&self) {
        let announce = {
            let mut state = self.state.lock();
            state.phase = SchedulerPhase::Running;
            state.retrigger = false;
            std::mem::replace(&mut state.disabled_announced, false)
        };
        if announce {
            info!(target: "scheduler", pipeline = %self.pipeline, "Queue processing is enabled");
            let _ = self.events.send(SchedulerEvent::Enabled {
                pipeline: self.pipeline.clone(),
            });
        }
    }

    /// Leaves the running phase. `more_work` keeps the trigger pending; a
    /// trigger received while running does the same.
    fn finish(&self, more_work: bool) {
        let mut state = self.state.lock();
        state.phase = if more_work || state.retrigger {
            SchedulerPhase::Triggered
        } else {
            SchedulerPhase::Idle
        };
        state.retrigger = false;
    }
}

impl fmt::Debug for QueueScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueueScheduler")
            .field("pipeline", &self.pipeline)
            .field("kind", &self.kind)
            .field("state", &*self.state.lock())
            .finish_non_exhaustive()
    }
}
