use thiserror::Error;

/// Unified error type for the entire tandem library
///
/// Task failures are deliberately absent: a failing task's reason is
/// forwarded to the caller verbatim and is never wrapped in this type.
/// `TandemError` covers the crate's own fallible surfaces: configuration,
/// plan parsing, the action registry, and input validation.
#[derive(Debug, Error)]
pub enum TandemError {
    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration {
        message: String,
        field: Option<String>,
    },

    /// Validation errors (plan shape, action input schemas)
    #[error("Validation failed: {message}")]
    Validation {
        message: String,
        field: Option<String>,
    },

    /// Registry errors: a name registered twice
    #[error("Action '{action}' is already registered")]
    DuplicateAction { action: String },

    /// Registry errors: a plan step naming an unknown action
    #[error("Action '{action}' not found in registry")]
    ActionNotFound { action: String },

    /// A plan step's action failed; carries the action's own error
    #[error("Step '{step_id}' failed: {reason}")]
    Step {
        step_id: String,
        reason: anyhow::Error,
    },

    /// IO errors (plan files)
    #[error("IO operation failed: {operation}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    /// Serialization errors
    #[error("Serialization failed: {format}")]
    Serialization {
        format: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl TandemError {
    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
            field: None,
        }
    }

    /// Create a configuration error with field
    pub fn configuration_field<S: Into<String>, F: Into<String>>(message: S, field: F) -> Self {
        Self::Configuration {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Create a validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
            field: None,
        }
    }

    /// Create a validation error with field
    pub fn validation_field<S: Into<String>, F: Into<String>>(message: S, field: F) -> Self {
        Self::Validation {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Create a duplicate-action error
    pub fn duplicate_action<S: Into<String>>(action: S) -> Self {
        Self::DuplicateAction {
            action: action.into(),
        }
    }

    /// Create an unknown-action error
    pub fn action_not_found<S: Into<String>>(action: S) -> Self {
        Self::ActionNotFound {
            action: action.into(),
        }
    }

    /// Create a step error
    pub fn step<S: Into<String>>(step_id: S, reason: anyhow::Error) -> Self {
        Self::Step {
            step_id: step_id.into(),
            reason,
        }
    }

    /// Create an IO error
    pub fn io<S: Into<String>>(operation: S, source: std::io::Error) -> Self {
        Self::Io {
            operation: operation.into(),
            source,
        }
    }

    /// Create a serialization error
    pub fn serialization<S: Into<String>, E: std::error::Error + Send + Sync + 'static>(
        format: S,
        source: E,
    ) -> Self {
        Self::Serialization {
            format: format.into(),
            source: Box::new(source),
        }
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            Self::Configuration { .. } => "configuration",
            Self::Validation { .. } => "validation",
            Self::DuplicateAction { .. } | Self::ActionNotFound { .. } => "registry",
            Self::Step { .. } => "step",
            Self::Io { .. } => "io",
            Self::Serialization { .. } => "serialization",
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, TandemError>;

/// Convert from common error types
impl From<std::io::Error> for TandemError {
    fn from(err: std::io::Error) -> Self {
        Self::io("io_operation", err)
    }
}

impl From<serde_json::Error> for TandemError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization("json", err)
    }
}

impl From<serde_yaml::Error> for TandemError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::serialization("yaml", err)
    }
}
