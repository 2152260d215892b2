//! Error types for S/MIME operations

use crate::process::TerminalStatus;
use std::path::PathBuf;
use std::time::Duration;

/// Errors raised while driving the CMS tool
#[derive(Debug, thiserror::Error)]
pub enum SmimeError {
    /// The context already owns a child process that has not terminated
    #[error("Process already running")]
    AlreadyRunning,

    /// Input, wait or output was requested before any process was started
    #[error("No process has been started")]
    NotStarted,

    /// The tool could not be launched
    #[error("Failed to start {}: {source}", program.display())]
    Spawn {
        /// Program that failed to launch
        program: PathBuf,
        /// Underlying launch error
        #[source]
        source: std::io::Error,
    },

    /// Pipe or temporary file I/O failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The tool terminated unsuccessfully
    #[error("Tool failed ({status}): {}", diagnostic.trim_end())]
    ToolFailure {
        /// Terminal status of the tool
        status: TerminalStatus,
        /// Verbatim standard-error content of the tool
        diagnostic: String,
    },

    /// The tool did not terminate before the deadline and was killed
    #[error("Operation timed out after {0:?}")]
    Timeout(Duration),

    /// Caller supplied unusable parameters
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration could not be loaded or is inconsistent
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Configuration file is not valid JSON
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SmimeError {
    /// Tool diagnostic for a failed run, if this error carries one
    pub fn diagnostic(&self) -> Option<&str> {
        match self {
            SmimeError::ToolFailure { diagnostic, .. } => Some(diagnostic),
            _ => None,
        }
    }

    /// Whether the error originates from the tool itself rather than from
    /// orchestration
    pub fn is_tool_failure(&self) -> bool {
        matches!(self, SmimeError::ToolFailure { .. })
    }
}

/// Result alias used throughout the crate
pub type SmimeResult<T> = Result<T, SmimeError>;
