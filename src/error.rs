// src/error.rs

use crate::constants::{EXIT_FAILURE, EXIT_RESOLUTION_FAILED, EXIT_SIGNAL_BASE};
use thiserror::Error;

/// Everything that can stop the launcher from reporting a child exit code.
///
/// A child that runs and exits non-zero is not an error; see
/// [`ExecutionResult`](crate::models::ExecutionResult).
#[derive(Error, Debug)]
pub enum LaunchError {
    #[error("Could not locate a way to run {tool}. Try install {tool} manually and try again.")]
    ResolutionFailed { tool: String },
    #[error("Command '{command}' could not be started: {source}")]
    SpawnFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed while waiting for command '{command}': {source}")]
    Wait {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Interrupted by signal {signal}.")]
    Interrupted { signal: i32 },
    #[error("Could not install signal handlers: {0}")]
    Signals(#[source] std::io::Error),
    #[error("Could not start the async runtime: {0}")]
    Runtime(#[source] std::io::Error),
    #[error("Failed to parse launcher config: {0}")]
    Config(#[from] toml::de::Error),
}

impl LaunchError {
    /// The process exit code the launcher reports for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ResolutionFailed { .. } => EXIT_RESOLUTION_FAILED,
            Self::Interrupted { signal } => EXIT_SIGNAL_BASE + signal,
            Self::SpawnFailed { .. }
            | Self::Wait { .. }
            | Self::Signals(_)
            | Self::Runtime(_)
            | Self::Config(_) => EXIT_FAILURE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_are_distinct_per_category() {
        let unresolved = LaunchError::ResolutionFailed {
            tool: "jbang".to_string(),
        };
        assert_eq!(unresolved.exit_code(), 2);
        assert_eq!(LaunchError::Interrupted { signal: 2 }.exit_code(), 130);
        assert_eq!(LaunchError::Interrupted { signal: 15 }.exit_code(), 143);
        let spawn = LaunchError::SpawnFailed {
            command: "jbang".to_string(),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        };
        assert_eq!(spawn.exit_code(), 1);
    }

    #[test]
    fn test_spawn_failure_keeps_its_cause() {
        use std::error::Error as _;
        let spawn = LaunchError::SpawnFailed {
            command: "jbang".to_string(),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        assert!(spawn.source().is_some());
        assert!(spawn.to_string().contains("jbang"));
    }
}
