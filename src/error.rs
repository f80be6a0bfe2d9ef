//! Failure taxonomy for a launcher invocation.

use crate::report::ErrorReport;

/// Message reported when no script path was given.
pub const MISSING_SCRIPT_MESSAGE: &str = "Please specify a script to execute";

/// Everything that can end an invocation with a `<Prtg>` error document.
#[derive(Debug, thiserror::Error)]
pub enum LaunchError {
    /// No script path on the command line.
    #[error("{}", MISSING_SCRIPT_MESSAGE)]
    MissingScript,

    /// The launcher's own options could not be parsed.
    #[error("{message}")]
    Usage { message: String },

    /// The interpreter process could not be created.
    #[error("Could not start {interpreter} with arguments {arguments}")]
    Spawn {
        interpreter: String,
        arguments: String,
        source: std::io::Error,
    },

    /// Reading one of the child's pipes failed.
    #[error("Could not read output of {interpreter}: {source}")]
    Drain {
        interpreter: String,
        source: std::io::Error,
    },

    /// The child was still running when the timeout expired and has been killed.
    #[error("{interpreter} did not finish within {seconds} seconds (arguments {arguments})")]
    TimedOut {
        interpreter: String,
        arguments: String,
        seconds: u64,
    },

    /// The script wrote to its error stream.
    #[error("{stderr}")]
    Script { stderr: String },
}

impl From<&LaunchError> for ErrorReport {
    fn from(error: &LaunchError) -> Self {
        match error {
            // Raw stderr is the message, untouched by Display formatting.
            LaunchError::Script { stderr } => ErrorReport::new(stderr.clone()),
            other => ErrorReport::new(other.to_string()),
        }
    }
}
