use serde::{Deserialize, Serialize};

use super::errors::{Result, TandemError};

/// Configuration for run execution behavior
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Maximum number of tasks executing at once in parallel mode.
    /// `None` means unlimited. Every task is still launched up front;
    /// only execution is gated.
    #[serde(default)]
    pub max_parallel: Option<usize>,
    /// Whether outcomes arriving after a run has already reached a
    /// terminal state are logged and evented
    #[serde(default = "default_log_late_outcomes")]
    pub log_late_outcomes: bool,
}

fn default_log_late_outcomes() -> bool {
    true
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            max_parallel: None,
            log_late_outcomes: true,
        }
    }
}

impl RunConfig {
    /// Validates configuration values
    pub fn validate(&self) -> Result<()> {
        if let Some(limit) = self.max_parallel {
            if limit == 0 {
                return Err(TandemError::configuration_field(
                    "max_parallel must be greater than 0",
                    "max_parallel",
                ));
            }
        }
        Ok(())
    }

    /// Merges two configurations, with override_with taking precedence
    pub fn merge(base: &Self, override_with: &Self) -> Result<Self> {
        let merged = Self {
            max_parallel: override_with.max_parallel.or(base.max_parallel),
            log_late_outcomes: override_with.log_late_outcomes,
        };

        merged.validate()?;
        Ok(merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(RunConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_max_parallel_rejected() {
        let config = RunConfig {
            max_parallel: Some(0),
            ..RunConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_merge_prefers_override() {
        let base = RunConfig {
            max_parallel: Some(4),
            ..RunConfig::default()
        };
        let override_with = RunConfig {
            max_parallel: Some(8),
            ..RunConfig::default()
        };
        let merged = RunConfig::merge(&base, &override_with).unwrap();
        assert_eq!(merged.max_parallel, Some(8));

        let unset = RunConfig::default();
        let merged = RunConfig::merge(&base, &unset).unwrap();
        assert_eq!(merged.max_parallel, Some(4));
    }
}
