use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use tokio::sync::{Semaphore, broadcast};
use tokio::task::JoinSet;
use tracing::{error, warn};
use vitrine_model::QueueItem;

use super::{QueueProcessor, SchedulerEvent};

/// Per-batch tally.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct BatchReport {
    pub processed: usize,
    pub failed: usize,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.processed + self.failed
    }
}

/// Runs `items` on at most `workers` concurrent tasks and waits for all of
/// them. Items start in the order given; a failing or panicking item is
/// reported through [`QueueProcessor::processing_error`] and never affects
/// its siblings.
pub async fn run_batch(
    pipeline: &str,
    items: Vec<QueueItem>,
    workers: usize,
    processor: Arc<dyn QueueProcessor>,
    events: &broadcast::Sender<SchedulerEvent>,
) -> BatchReport {
    let permits = Arc::new(Semaphore::new(workers.max(1)));
    let mut tasks = JoinSet::new();

    for item in items {
        let permit = match Arc::clone(&permits).acquire_owned().await {
            Ok(permit) => permit,
            Err(_) => break,
        };
        let processor = Arc::clone(&processor);
        let events = events.clone();
        let pipeline = pipeline.to_string();

        tasks.spawn(async move {
            let _permit = permit;
            process_item(&pipeline, processor.as_ref(), &item, &events).await
        });
    }

    let mut report = BatchReport::default();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(true) => report.processed += 1,
            Ok(false) => report.failed += 1,
            Err(err) => {
                error!(target: "scheduler", pipeline, error = %err, "Worker task aborted");
                report.failed += 1;
            }
        }
    }
    report
}

async fn process_item(
    pipeline: &str,
    processor: &dyn QueueProcessor,
    item: &QueueItem,
    events: &broadcast::Sender<SchedulerEvent>,
) -> bool {
    let outcome = AssertUnwindSafe(processor.process(item))
        .catch_unwind()
        .await;

    let message = match outcome {
        Ok(Ok(())) => return true,
        Ok(Err(err)) => err.to_string(),
        Err(panic) => format!("worker panicked: {}", panic_message(panic.as_ref())),
    };

    error!(
        target: "scheduler",
        pipeline,
        item = %item.id,
        error = %message,
        "Failed processing queue item"
    );

    if let Err(err) = processor.processing_error(item).await {
        warn!(
            target: "scheduler",
            pipeline,
            item = %item.id,
            error = %err,
            "Failed recording processing error"
        );
    }

    let _ = events.send(SchedulerEvent::ItemFailed {
        pipeline: pipeline.to_string(),
        item: item.id,
        error: message,
    });
    false
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
