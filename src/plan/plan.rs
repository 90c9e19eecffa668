//! Declarative run plans
//!
//! A plan names a run mode and an ordered list of steps, each bound to a
//! registered action. Plans are described in YAML:
//!
//! ```yaml
//! name: nightly_sync
//! mode: parallel
//! steps:
//!   - id: fetch_users
//!     action: fetch
//!     input: { source: "users" }
//!   - id: fetch_orders
//!     action: fetch
//!     input: { source: "orders" }
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, warn};

use crate::core::errors::{Result, TandemError};
use crate::run::task::Task;
use crate::run::{RunMode, Runner};

use super::registry::{Action, ActionRegistry};

/// One step of a plan, bound to a registered action
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepSpec {
    /// Step id; derived from the action name and position when omitted
    #[serde(default)]
    pub id: Option<String>,
    /// Registered action to execute
    pub action: String,
    /// Input payload handed to the action
    #[serde(default = "default_input")]
    pub input: Value,
}

fn default_input() -> Value {
    Value::Object(Map::new())
}

impl StepSpec {
    /// Effective id used in logs, events, and errors
    pub fn effective_id(&self, position: usize) -> String {
        self.id
            .clone()
            .unwrap_or_else(|| format!("{}_{}", self.action, position))
    }
}

/// A declarative run over registered actions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunPlan {
    pub name: String,
    pub mode: RunMode,
    pub steps: Vec<StepSpec>,
}

impl RunPlan {
    /// Parse a plan from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let plan: RunPlan = serde_yaml::from_str(yaml)?;
        plan.validate()?;
        Ok(plan)
    }

    /// Load a plan from a YAML file
    pub fn load_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| TandemError::io(format!("read plan file {}", path.display()), e))?;
        Self::from_yaml(&contents)
    }

    /// Validates plan shape
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(TandemError::validation_field(
                "plan name must not be empty",
                "name",
            ));
        }

        let mut seen = HashSet::new();
        for (position, step) in self.steps.iter().enumerate() {
            if step.action.is_empty() {
                return Err(TandemError::validation_field(
                    format!("step {position} has an empty action name"),
                    "action",
                ));
            }
            // Duplicate ids would make step failures ambiguous
            if let Some(id) = &step.id {
                if !seen.insert(id.clone()) {
                    return Err(TandemError::validation_field(
                        format!("duplicate step id '{id}'"),
                        "id",
                    ));
                }
            }
        }
        Ok(())
    }
}

/// Executes a plan's steps through the runner in the plan's mode.
///
/// Every step is resolved against the registry and its input validated
/// before anything starts, so an unknown action or a rejected input fails
/// the plan without running a single step. A step failure during the run
/// surfaces as [`TandemError::Step`] carrying the failing step's id.
pub async fn execute_plan(
    runner: &Runner,
    registry: &ActionRegistry,
    plan: &RunPlan,
) -> Result<Vec<Value>> {
    plan.validate()?;

    let mut tasks = Vec::with_capacity(plan.steps.len());
    for (position, step) in plan.steps.iter().enumerate() {
        let step_id = step.effective_id(position);
        let action = registry.get(&step.action)?;
        validate_input(action.as_ref(), &step.input, &step_id)?;

        debug!(plan = %plan.name, step_id = %step_id, action = %step.action, "step bound");

        let input = step.input.clone();
        let failing_id = step_id.clone();
        tasks.push(Task::named(step_id, async move {
            action
                .execute(input)
                .await
                .map_err(|reason| (failing_id, reason))
        }));
    }

    runner
        .run(plan.mode, tasks)
        .await
        .map_err(|(step_id, reason)| TandemError::step(step_id, reason))
}

/// Validates a step input against the action's input schema
fn validate_input(action: &dyn Action, input: &Value, step_id: &str) -> Result<()> {
    let schema = action.input_schema();
    let validator = jsonschema::validator_for(&schema).map_err(|e| {
        TandemError::validation(format!(
            "failed to compile input schema for step '{step_id}': {e}"
        ))
    })?;

    if let Err(error) = validator.validate(input) {
        warn!(step_id, %error, "input validation failed");
        return Err(TandemError::validation_field(
            format!("invalid input for step '{step_id}': {error}"),
            "input",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_from_yaml() {
        let plan = RunPlan::from_yaml(
            r#"
name: demo
mode: sequential
steps:
  - id: first
    action: echo
    input: { message: "hello" }
  - action: echo
"#,
        )
        .unwrap();

        assert_eq!(plan.name, "demo");
        assert_eq!(plan.mode, RunMode::Sequential);
        assert_eq!(plan.steps.len(), 2);
        assert_eq!(plan.steps[0].effective_id(0), "first");
        assert_eq!(plan.steps[1].effective_id(1), "echo_1");
        // omitted input defaults to an empty object
        assert!(plan.steps[1].input.as_object().is_some());
    }

    #[test]
    fn test_duplicate_step_ids_rejected() {
        let err = RunPlan::from_yaml(
            r#"
name: demo
mode: parallel
steps:
  - id: same
    action: echo
  - id: same
    action: echo
"#,
        )
        .unwrap_err();
        assert!(matches!(err, TandemError::Validation { .. }));
    }

    #[test]
    fn test_unknown_mode_rejected() {
        let err = RunPlan::from_yaml(
            r#"
name: demo
mode: sideways
steps: []
"#,
        )
        .unwrap_err();
        assert!(matches!(err, TandemError::Serialization { .. }));
    }
}
