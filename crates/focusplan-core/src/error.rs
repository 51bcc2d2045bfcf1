//! Core error types for focusplan-core.
//!
//! Contract violations (bad transitions, malformed config) are errors.
//! Capacity shortfalls never are: the planner absorbs them into the plan's
//! confidence and reasoning. Schema violations are reported as data by
//! [`crate::validate`], not through this hierarchy.

use std::path::PathBuf;
use thiserror::Error;

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown dot-path key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),

    /// Home/config directory could not be prepared
    #[error("Configuration directory unavailable: {0}")]
    DirectoryUnavailable(String),
}

impl ConfigError {
    pub(crate) fn invalid(key: &str, message: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            key: key.to_string(),
            message: message.into(),
        }
    }
}

/// Raised when a lifecycle status change is not in the entity's adjacency
/// table. Callers must change the request before trying again.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransitionError {
    #[error("Invalid {entity} transition: {from} → {to} ({reason})")]
    InvalidTransition {
        entity: &'static str,
        from: String,
        to: String,
        reason: String,
    },
}

impl TransitionError {
    /// Status the entity was in when the change was rejected.
    pub fn from_status(&self) -> &str {
        match self {
            TransitionError::InvalidTransition { from, .. } => from,
        }
    }

    /// Status that was requested.
    pub fn to_status(&self) -> &str {
        match self {
            TransitionError::InvalidTransition { to, .. } => to,
        }
    }
}

/// Record-level invariant violations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Duration bounds out of range or inverted
    #[error("Invalid duration for task '{task_id}': {message}")]
    InvalidDuration { task_id: String, message: String },

    /// Status and timestamps/back-references disagree
    #[error("Task '{task_id}' violates status invariant: {message}")]
    StatusInvariant { task_id: String, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transition_error_message_names_both_states() {
        let err = TransitionError::InvalidTransition {
            entity: "task",
            from: "done".into(),
            to: "open".into(),
            reason: "done is terminal".into(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid task transition: done → open (done is terminal)"
        );
        assert_eq!(err.from_status(), "done");
        assert_eq!(err.to_status(), "open");
    }

    #[test]
    fn invalid_config_value_names_the_key() {
        let err = ConfigError::invalid("scheduling.timezone", "'Mars' is not an IANA timezone");
        assert_eq!(
            err.to_string(),
            "Invalid configuration value for 'scheduling.timezone': 'Mars' is not an IANA timezone"
        );
    }
}
