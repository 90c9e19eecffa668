//! Parallel drive loop
//!
//! Every task is spawned before any completion is processed; completion
//! order is determined by each task's own latency. Success values are
//! collected into a buffer indexed by input position. The first failure to
//! arrive is terminal for the run: tasks still in flight are detached, not
//! cancelled, and run to completion without affecting the outcome.

use futures::stream::{FuturesUnordered, StreamExt};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::core::config::RunConfig;

use super::events::{self, EventSink, RunEvent};
use super::report::TaskOutcome;
use super::task::{Task, TaskFuture};

/// Drives all tasks at once, reporting results in input order.
///
/// Returns the run outcome together with the per-task outcomes processed
/// before the terminal transition.
pub(crate) async fn drive_parallel<T, E>(
    run_id: &str,
    tasks: Vec<Task<T, E>>,
    config: &RunConfig,
    sink: Option<&Arc<dyn EventSink>>,
) -> (Result<Vec<T>, E>, Vec<TaskOutcome>)
where
    T: Send + 'static,
    E: Send + 'static,
{
    let total = tasks.len();
    if total == 0 {
        return (Ok(Vec::new()), Vec::new());
    }

    let semaphore = config.max_parallel.map(|limit| Arc::new(Semaphore::new(limit)));
    // Set on the run's first terminal transition; workers finishing after
    // this can be observed (logged/evented) but never change the outcome
    let terminal = Arc::new(AtomicBool::new(false));

    // Launch every task before awaiting any completion
    let mut in_flight = FuturesUnordered::new();
    for (position, task) in tasks.into_iter().enumerate() {
        let (task_id, future) = task.into_parts();

        debug!(run_id, position, task_id = %task_id, "launching task");
        events::emit(
            sink,
            RunEvent::TaskStarted {
                run_id: run_id.to_string(),
                position,
                task_id: task_id.clone(),
            },
        );

        in_flight.push(tokio::spawn(run_worker(
            run_id.to_string(),
            position,
            task_id,
            future,
            semaphore.clone(),
            terminal.clone(),
            config.log_late_outcomes,
            sink.cloned(),
        )));
    }

    let mut buffer: Vec<Option<T>> = (0..total).map(|_| None).collect();
    let mut outcomes = Vec::with_capacity(total);

    while let Some(joined) = in_flight.next().await {
        match joined {
            Ok((position, task_id, result, duration_ms)) => {
                outcomes.push(TaskOutcome {
                    position,
                    task_id: task_id.clone(),
                    success: result.is_ok(),
                    duration_ms,
                });

                match result {
                    Ok(value) => {
                        buffer[position] = Some(value);
                    }
                    Err(reason) => {
                        // First failure wins; dropping the remaining join
                        // handles detaches the workers without cancelling them
                        terminal.store(true, Ordering::SeqCst);
                        info!(
                            run_id,
                            position,
                            task_id = %task_id,
                            in_flight = total - outcomes.len(),
                            "task failed, run failed"
                        );
                        return (Err(reason), outcomes);
                    }
                }
            }
            Err(join_error) => {
                // Workers are never aborted, so a join error is a panic
                terminal.store(true, Ordering::SeqCst);
                std::panic::resume_unwind(join_error.into_panic());
            }
        }
    }

    // Every worker reported success
    terminal.store(true, Ordering::SeqCst);
    let values: Vec<T> = buffer.into_iter().flatten().collect();
    debug_assert_eq!(values.len(), total);
    (Ok(values), outcomes)
}

/// Awaits one task and reports its completion.
///
/// When the run is bounded, execution waits for a semaphore permit; the
/// task still counts as started from the run's point of view.
async fn run_worker<T, E>(
    run_id: String,
    position: usize,
    task_id: String,
    future: TaskFuture<T, E>,
    semaphore: Option<Arc<Semaphore>>,
    terminal: Arc<AtomicBool>,
    log_late_outcomes: bool,
    sink: Option<Arc<dyn EventSink>>,
) -> (usize, String, Result<T, E>, u64) {
    let _permit = match &semaphore {
        // The semaphore is never closed, so acquisition only ever waits
        Some(semaphore) => semaphore.clone().acquire_owned().await.ok(),
        None => None,
    };

    let started = Instant::now();
    let result = future.await;
    let duration_ms = started.elapsed().as_millis() as u64;
    let success = result.is_ok();

    let late = terminal.load(Ordering::SeqCst);
    if !late || log_late_outcomes {
        if late {
            warn!(
                run_id = %run_id,
                position,
                task_id = %task_id,
                success,
                duration_ms,
                "task outcome arrived after run completion"
            );
        } else {
            debug!(
                run_id = %run_id,
                position,
                task_id = %task_id,
                success,
                duration_ms,
                "task completed"
            );
        }
        events::emit(
            sink.as_ref(),
            RunEvent::TaskCompleted {
                run_id,
                position,
                task_id: task_id.clone(),
                success,
                duration_ms,
                late,
            },
        );
    }

    (position, task_id, result, duration_ms)
}
