//! Error types for venvflow operations.
//!
//! Operations never log and recover; they return a [`FlowError`] and the
//! binary reports it once before exiting non-zero.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::command::CommandParseError;

/// Invalid input paths or unusable configuration values.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("path is empty")]
    EmptyPath,

    #[error("not exists: '{}'", .0.display())]
    MissingPath(PathBuf),

    #[error("is not a directory: '{}'", .0.display())]
    NotADirectory(PathBuf),

    #[error("failed to read '{}': {source}", .path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse '{}': {source}", .path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid value for {name}: {message}")]
    InvalidValue { name: String, message: String },
}

/// Core error type for venvflow operations.
#[derive(Debug, Error)]
pub enum FlowError {
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("command not found: '{0}'")]
    CommandNotFound(String),

    #[error("precondition failed for '{}': {reason}", .path.display())]
    Precondition { path: PathBuf, reason: String },

    #[error("command failed with exit code {code:?}: {command}")]
    ExternalProcess { command: String, code: Option<i32> },

    #[error("failed to start '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("command timed out after {}s: {command}", .timeout.as_secs())]
    ProcessTimeout { command: String, timeout: Duration },

    #[error("no python interpreter found in '{}'", .0.display())]
    InterpreterNotFound(PathBuf),

    #[error("discovery failed: {0}")]
    Discovery(String),

    #[error("io error on '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl FlowError {
    /// Wraps an `io::Error` with the path it concerns.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<CommandParseError> for FlowError {
    fn from(err: CommandParseError) -> Self {
        match err {
            CommandParseError::Unknown(name) => Self::CommandNotFound(name),
        }
    }
}

/// Result type alias for venvflow operations.
pub type Result<T> = std::result::Result<T, FlowError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_command_maps_to_command_not_found() {
        let err: FlowError = CommandParseError::Unknown("nope".to_string()).into();
        assert!(matches!(err, FlowError::CommandNotFound(ref name) if name == "nope"));
    }

    #[test]
    fn precondition_displays_path() {
        let err = FlowError::Precondition {
            path: PathBuf::from("build/test/env"),
            reason: "test environment is not initialized".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "precondition failed for 'build/test/env': test environment is not initialized"
        );
    }

    #[test]
    fn configuration_error_is_wrapped() {
        let err: FlowError = ConfigurationError::EmptyPath.into();
        assert_eq!(err.to_string(), "configuration error: path is empty");
    }
}
