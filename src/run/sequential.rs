//! Sequential drive loop
//!
//! Tasks execute strictly one after another: the next task is only started
//! from the completion of the previous one, so at most one task is ever in
//! flight. The first failure halts the run and later tasks never start.

use std::sync::Arc;
use tokio::time::Instant;
use tracing::{debug, info};

use super::events::{self, EventSink, RunEvent};
use super::report::TaskOutcome;
use super::task::Task;

/// Drives tasks one at a time, accumulating success values in input order.
///
/// Returns the run outcome together with the per-task outcomes observed.
pub(crate) async fn drive_sequential<T, E>(
    run_id: &str,
    tasks: Vec<Task<T, E>>,
    sink: Option<&Arc<dyn EventSink>>,
) -> (Result<Vec<T>, E>, Vec<TaskOutcome>) {
    let total = tasks.len();
    let mut values = Vec::with_capacity(total);
    let mut outcomes = Vec::with_capacity(total);

    for (position, task) in tasks.into_iter().enumerate() {
        let (task_id, future) = task.into_parts();

        debug!(run_id, position, task_id = %task_id, "starting task");
        events::emit(
            sink,
            RunEvent::TaskStarted {
                run_id: run_id.to_string(),
                position,
                task_id: task_id.clone(),
            },
        );

        let started = Instant::now();
        let result = future.await;
        let duration_ms = started.elapsed().as_millis() as u64;
        let success = result.is_ok();

        debug!(run_id, position, task_id = %task_id, success, duration_ms, "task completed");
        events::emit(
            sink,
            RunEvent::TaskCompleted {
                run_id: run_id.to_string(),
                position,
                task_id: task_id.clone(),
                success,
                duration_ms,
                late: false,
            },
        );
        outcomes.push(TaskOutcome {
            position,
            task_id: task_id.clone(),
            success,
            duration_ms,
        });

        match result {
            Ok(value) => values.push(value),
            Err(reason) => {
                // Remaining tasks are never started
                info!(
                    run_id,
                    position,
                    task_id = %task_id,
                    remaining = total - position - 1,
                    "task failed, halting run"
                );
                return (Err(reason), outcomes);
            }
        }
    }

    (Ok(values), outcomes)
}
