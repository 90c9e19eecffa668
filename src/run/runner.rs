//! Runner - the configured orchestrator entry point
//!
//! A `Runner` holds a validated [`RunConfig`] and an optional event sink,
//! and drives runs in either mode. The free functions in [`crate::run`]
//! are thin wrappers over a default-configured runner.

use std::sync::Arc;
use tokio::time::Instant;
use tracing::info;

use crate::core::config::RunConfig;
use crate::core::errors::Result;

use super::events::{self, EventSink, RunEvent};
use super::parallel::drive_parallel;
use super::report::{create_run_report, RunReport};
use super::sequential::drive_sequential;
use super::task::Task;
use super::RunMode;

/// Orchestrates runs of independent asynchronous tasks
pub struct Runner {
    config: RunConfig,
    event_sink: Option<Arc<dyn EventSink>>,
}

impl Runner {
    /// Create a runner with default configuration
    pub fn new() -> Self {
        Self {
            config: RunConfig::default(),
            event_sink: None,
        }
    }

    /// Create a runner from a configuration, validating it first
    pub fn with_config(config: RunConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            event_sink: None,
        })
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Attach a sink receiving run lifecycle events
    pub fn set_event_sink(&mut self, sink: Arc<dyn EventSink>) {
        self.event_sink = Some(sink);
    }

    /// Run tasks in the given mode, returning the aggregated outcome:
    /// every success value in input order, or the first failure reason
    /// verbatim. The outcome is produced exactly once per run.
    pub async fn run<T, E>(
        &self,
        mode: RunMode,
        tasks: Vec<Task<T, E>>,
    ) -> std::result::Result<Vec<T>, E>
    where
        T: Send + 'static,
        E: Send + 'static,
    {
        self.run_with_report(mode, tasks).await.0
    }

    /// Run tasks and also return the run's report
    pub async fn run_with_report<T, E>(
        &self,
        mode: RunMode,
        tasks: Vec<Task<T, E>>,
    ) -> (std::result::Result<Vec<T>, E>, RunReport)
    where
        T: Send + 'static,
        E: Send + 'static,
    {
        let run_id = generate_run_id();
        let total = tasks.len();
        let started_at = chrono::Utc::now().naive_utc();
        let started = Instant::now();

        info!(run_id = %run_id, mode = mode.as_str(), total, "run started");
        events::emit(
            self.event_sink.as_ref(),
            RunEvent::RunStarted {
                run_id: run_id.clone(),
                mode,
                task_count: total,
            },
        );

        let (result, outcomes) = match mode {
            RunMode::Sequential => {
                drive_sequential(&run_id, tasks, self.event_sink.as_ref()).await
            }
            RunMode::Parallel => {
                drive_parallel(&run_id, tasks, &self.config, self.event_sink.as_ref()).await
            }
        };

        let duration_ms = started.elapsed().as_millis() as u64;
        let success = result.is_ok();

        info!(run_id = %run_id, success, duration_ms, "run finished");
        events::emit(
            self.event_sink.as_ref(),
            RunEvent::RunCompleted {
                run_id: run_id.clone(),
                success,
                duration_ms,
            },
        );

        let report = create_run_report(
            run_id,
            mode,
            total,
            outcomes,
            success,
            started_at,
            duration_ms,
        );
        (result, report)
    }

    /// Run tasks one at a time in input order
    pub async fn run_sequential<T, E>(
        &self,
        tasks: Vec<Task<T, E>>,
    ) -> std::result::Result<Vec<T>, E>
    where
        T: Send + 'static,
        E: Send + 'static,
    {
        self.run(RunMode::Sequential, tasks).await
    }

    /// Run all tasks at once
    pub async fn run_parallel<T, E>(
        &self,
        tasks: Vec<Task<T, E>>,
    ) -> std::result::Result<Vec<T>, E>
    where
        T: Send + 'static,
        E: Send + 'static,
    {
        self.run(RunMode::Parallel, tasks).await
    }
}

impl Default for Runner {
    fn default() -> Self {
        Self::new()
    }
}

/// Generate a unique run id
pub fn generate_run_id() -> String {
    format!("run_{}", cuid2::create_id())
}
