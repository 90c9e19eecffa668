use anyhow::Result;
use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::core::errors::TandemError;

/// A named, reusable unit of work executable through a plan
#[async_trait]
pub trait Action: Send + Sync {
    /// Registry name of the action
    fn name(&self) -> String;

    /// JSON Schema the action's input must satisfy (permissive by default)
    fn input_schema(&self) -> Value {
        json!(true)
    }

    /// Execute the action with the given input
    async fn execute(&self, input: Value) -> Result<Value>;
}

/// Registry of named actions
pub struct ActionRegistry {
    actions: DashMap<String, Arc<dyn Action>>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self {
            actions: DashMap::new(),
        }
    }

    /// Register an action under its name
    pub fn register(&self, action: Arc<dyn Action>) -> crate::core::errors::Result<()> {
        let name = action.name();
        match self.actions.entry(name.clone()) {
            Entry::Occupied(_) => Err(TandemError::duplicate_action(name)),
            Entry::Vacant(entry) => {
                entry.insert(action);
                Ok(())
            }
        }
    }

    /// Look up an action by name
    pub fn get(&self, name: &str) -> crate::core::errors::Result<Arc<dyn Action>> {
        self.actions
            .get(name)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| TandemError::action_not_found(name))
    }

    /// Names of all registered actions
    pub fn list(&self) -> Vec<String> {
        self.actions.iter().map(|entry| entry.key().clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

impl Default for ActionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
