//! Sequential and parallel orchestration of asynchronous tasks
//!
//! A run takes an ordered sequence of [`Task`]s and drives them in one of
//! two modes: [`RunMode::Sequential`] awaits each task in turn, starting
//! the next only from the completion of the previous; [`RunMode::Parallel`]
//! launches every task before processing any completion. Both modes report
//! exactly one aggregated outcome: all values in input order, or the first
//! failure reason verbatim.

pub mod events;
pub mod parallel;
pub mod report;
pub mod runner;
pub mod sequential;
pub mod task;

pub use runner::Runner;
pub use task::{Task, TaskFuture};

use serde::{Deserialize, Serialize};

/// Execution mode for a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    /// Tasks execute one at a time, in input order
    Sequential,
    /// All tasks start together; completion order is latency-driven
    Parallel,
}

impl RunMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunMode::Sequential => "sequential",
            RunMode::Parallel => "parallel",
        }
    }
}

/// Run tasks one after another with default configuration.
///
/// On the first failure the remaining tasks are never started and the
/// failing task's reason is returned verbatim. An empty input completes
/// immediately with `Ok(vec![])`.
pub async fn run_sequential<T, E>(tasks: Vec<Task<T, E>>) -> std::result::Result<Vec<T>, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    Runner::new().run_sequential(tasks).await
}

/// Run all tasks at once with default configuration.
///
/// Success values come back in input order regardless of completion order.
/// The first failure to arrive ends the run; tasks still in flight run to
/// completion detached but can no longer affect the outcome.
pub async fn run_parallel<T, E>(tasks: Vec<Task<T, E>>) -> std::result::Result<Vec<T>, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    Runner::new().run_parallel(tasks).await
}
