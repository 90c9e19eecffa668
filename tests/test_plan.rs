//! Integration tests for the action registry and plan execution

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tandem::{execute_plan, Action, ActionRegistry, RunPlan, Runner, TandemError};
use tokio::time::sleep;

/// Sleeps for `delay_ms`, then echoes back `value`
struct SleepyAction;

#[async_trait]
impl Action for SleepyAction {
    fn name(&self) -> String {
        "sleepy".to_string()
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "delay_ms": {"type": "integer"},
                "value": {"type": "string"}
            },
            "required": ["value"]
        })
    }

    async fn execute(&self, input: Value) -> Result<Value> {
        let delay_ms = input["delay_ms"].as_u64().unwrap_or(0);
        sleep(Duration::from_millis(delay_ms)).await;
        Ok(json!({ "value": input["value"] }))
    }
}

/// Fails with the reason given in its input
struct FailAction;

#[async_trait]
impl Action for FailAction {
    fn name(&self) -> String {
        "fail".to_string()
    }

    async fn execute(&self, input: Value) -> Result<Value> {
        let reason = input["reason"].as_str().unwrap_or("unspecified");
        Err(anyhow!("{reason}"))
    }
}

/// Records the order steps actually executed in
struct RecordAction {
    seen: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl Action for RecordAction {
    fn name(&self) -> String {
        "record".to_string()
    }

    async fn execute(&self, input: Value) -> Result<Value> {
        let label = input["label"].as_str().unwrap_or("?").to_string();
        self.seen.lock().unwrap().push(label.clone());
        Ok(json!({ "label": label }))
    }
}

fn registry_with_defaults() -> ActionRegistry {
    let registry = ActionRegistry::new();
    registry.register(Arc::new(SleepyAction)).unwrap();
    registry.register(Arc::new(FailAction)).unwrap();
    registry
}

#[tokio::test]
async fn test_parallel_plan_reports_step_order() {
    let registry = registry_with_defaults();
    let plan = RunPlan::from_yaml(
        r#"
name: fanout
mode: parallel
steps:
  - id: slow
    action: sleepy
    input: { delay_ms: 40, value: "first" }
  - id: quick
    action: sleepy
    input: { delay_ms: 5, value: "second" }
"#,
    )
    .unwrap();

    let runner = Runner::new();
    let values = execute_plan(&runner, &registry, &plan).await.unwrap();

    // step order, not completion order
    assert_eq!(values[0]["value"], "first");
    assert_eq!(values[1]["value"], "second");
}

#[tokio::test]
async fn test_sequential_plan_executes_in_step_order() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let registry = ActionRegistry::new();
    registry
        .register(Arc::new(RecordAction { seen: seen.clone() }))
        .unwrap();

    let plan = RunPlan::from_yaml(
        r#"
name: ordered
mode: sequential
steps:
  - action: record
    input: { label: "one" }
  - action: record
    input: { label: "two" }
  - action: record
    input: { label: "three" }
"#,
    )
    .unwrap();

    let runner = Runner::new();
    execute_plan(&runner, &registry, &plan).await.unwrap();

    assert_eq!(*seen.lock().unwrap(), vec!["one", "two", "three"]);
}

#[tokio::test]
async fn test_unknown_action_fails_before_any_step_runs() {
    let executed = Arc::new(AtomicUsize::new(0));
    let probe = executed.clone();

    struct CountingAction {
        executed: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl Action for CountingAction {
        fn name(&self) -> String {
            "counting".to_string()
        }

        async fn execute(&self, _input: Value) -> Result<Value> {
            self.executed.fetch_add(1, Ordering::SeqCst);
            Ok(json!({}))
        }
    }

    let registry = ActionRegistry::new();
    registry
        .register(Arc::new(CountingAction { executed: probe }))
        .unwrap();

    let plan = RunPlan::from_yaml(
        r#"
name: broken
mode: sequential
steps:
  - action: counting
  - action: missing
"#,
    )
    .unwrap();

    let runner = Runner::new();
    let err = execute_plan(&runner, &registry, &plan).await.unwrap_err();

    assert!(matches!(err, TandemError::ActionNotFound { .. }));
    assert_eq!(executed.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_step_failure_carries_step_id() {
    let registry = registry_with_defaults();
    let plan = RunPlan::from_yaml(
        r#"
name: doomed
mode: sequential
steps:
  - id: good
    action: sleepy
    input: { value: "fine" }
  - id: bad
    action: fail
    input: { reason: "boom" }
"#,
    )
    .unwrap();

    let runner = Runner::new();
    let err = execute_plan(&runner, &registry, &plan).await.unwrap_err();

    match err {
        TandemError::Step { step_id, reason } => {
            assert_eq!(step_id, "bad");
            assert_eq!(reason.to_string(), "boom");
        }
        other => panic!("expected step error, got: {other}"),
    }
}

#[tokio::test]
async fn test_schema_rejects_input_before_run() {
    let registry = registry_with_defaults();
    let plan = RunPlan::from_yaml(
        r#"
name: invalid
mode: sequential
steps:
  - id: missing_value
    action: sleepy
    input: { delay_ms: 5 }
"#,
    )
    .unwrap();

    let runner = Runner::new();
    let err = execute_plan(&runner, &registry, &plan).await.unwrap_err();
    assert!(matches!(err, TandemError::Validation { .. }));
}

#[tokio::test]
async fn test_plan_loads_from_file() {
    let path = std::env::temp_dir().join("tandem_test_plan.yaml");
    std::fs::write(
        &path,
        r#"
name: from_file
mode: parallel
steps:
  - id: only
    action: sleepy
    input: { value: "hello" }
"#,
    )
    .unwrap();

    let plan = RunPlan::load_file(&path).unwrap();
    assert_eq!(plan.name, "from_file");
    assert_eq!(plan.steps.len(), 1);

    let registry = registry_with_defaults();
    let runner = Runner::new();
    let values = execute_plan(&runner, &registry, &plan).await.unwrap();
    assert_eq!(values[0]["value"], "hello");

    let _ = std::fs::remove_file(&path);
}

#[tokio::test]
async fn test_missing_plan_file_is_io_error() {
    let err = RunPlan::load_file("/nonexistent/tandem_plan.yaml").unwrap_err();
    assert!(matches!(err, TandemError::Io { .. }));
}
