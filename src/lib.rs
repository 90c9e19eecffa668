// Core infrastructure modules
pub mod core;

// Two layers: opaque task runs, and named-action plans on top of them
pub mod plan;
pub mod run;

// Re-exports for convenience
pub use crate::core::config::RunConfig;
pub use crate::core::errors::{Result, TandemError};
pub use crate::plan::{execute_plan, Action, ActionRegistry, RunPlan, StepSpec};
pub use crate::run::events::{
    BufferingEventSink, EventSink, LoggingEventSink, RunEvent, RunEventEnvelope,
};
pub use crate::run::report::{RunReport, TaskOutcome};
pub use crate::run::{run_parallel, run_sequential, RunMode, Runner, Task};
