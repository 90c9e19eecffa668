//! Aggregated reports for completed runs

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::RunMode;

/// The outcome of a single task as observed by its run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskOutcome {
    /// Position of the task in the input sequence
    pub position: usize,
    pub task_id: String,
    /// Whether the task's execution succeeded
    pub success: bool,
    pub duration_ms: u64,
}

/// Aggregated report for one run
///
/// Reports carry only observability data: task payloads stay opaque and
/// never appear here. `outcomes` holds what the run observed before it
/// reached a terminal state; in parallel mode, tasks still in flight at
/// the first failure are absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub run_id: String,
    pub mode: RunMode,
    /// Number of tasks in the input sequence
    pub total_tasks: usize,
    /// The outcome for each task processed before the terminal transition
    pub outcomes: Vec<TaskOutcome>,
    /// Indicates the overall run status (false if any task failed)
    pub overall_success: bool,
    /// Id of the task whose failure ended the run (if any)
    pub failed_task: Option<String>,
    pub started_at: NaiveDateTime,
    pub duration_ms: u64,
}

/// Assembles a report from the outcomes a run observed
pub(crate) fn create_run_report(
    run_id: String,
    mode: RunMode,
    total_tasks: usize,
    outcomes: Vec<TaskOutcome>,
    overall_success: bool,
    started_at: NaiveDateTime,
    duration_ms: u64,
) -> RunReport {
    let failed_task = outcomes
        .iter()
        .find(|outcome| !outcome.success)
        .map(|outcome| outcome.task_id.clone());

    RunReport {
        run_id,
        mode,
        total_tasks,
        outcomes,
        overall_success,
        failed_task,
        started_at,
        duration_ms,
    }
}
