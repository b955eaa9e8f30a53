//! Configuration file parsing for `dynpred.toml`.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{SchemaError, SchemaResult};

/// Main configuration structure for `dynpred.toml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FilterConfig {
    /// Evaluation settings.
    #[serde(default)]
    pub evaluation: EvaluationConfig,

    /// Property path settings.
    #[serde(default)]
    pub paths: PathConfig,
}

impl FilterConfig {
    /// Load configuration from a file path.
    pub fn from_file(path: impl AsRef<Path>) -> SchemaResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| SchemaError::IoError {
            path: path.display().to_string(),
            source: e,
        })?;

        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> SchemaResult<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| SchemaError::TomlError { source: e })?;
        config.validate()?;
        Ok(config)
    }

    /// Set the policy for absent intermediate properties.
    pub fn with_null_policy(mut self, policy: NullPolicy) -> Self {
        self.evaluation.null_policy = policy;
        self
    }

    /// Set the maximum number of segments in a property path.
    pub fn with_max_path_depth(mut self, depth: usize) -> Self {
        self.paths.max_depth = depth;
        self
    }

    /// Check value ranges that serde cannot express.
    pub fn validate(&self) -> SchemaResult<()> {
        if self.paths.max_depth == 0 {
            return Err(SchemaError::config("paths.max_depth must be at least 1"));
        }
        Ok(())
    }
}

/// Evaluation configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct EvaluationConfig {
    /// What happens when an intermediate property of a path is absent.
    #[serde(default)]
    pub null_policy: NullPolicy,
}

/// Handling of an absent intermediate property, such as `Address` being
/// `None` while evaluating `Address.City`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NullPolicy {
    /// Fail the evaluation with a null reference error.
    #[default]
    Propagate,
    /// Treat the whole path as null: getters return null, comparisons do
    /// not match and `DoesntEqual` matches.
    #[serde(alias = "short-circuit")]
    ShortCircuit,
}

impl NullPolicy {
    /// Get the policy name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Propagate => "propagate",
            Self::ShortCircuit => "short_circuit",
        }
    }
}

/// Property path configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PathConfig {
    /// Maximum number of dot-separated segments.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
        }
    }
}

fn default_max_depth() -> usize {
    16
}
