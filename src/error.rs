use std::time::Duration;

use thiserror::Error;

/// Unified error type for docs-sync operations
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Repository error: {0}")]
    Repository(String),

    #[error("Discovery error: {0}")]
    Discovery(String),

    #[error("Extraction error: {0}")]
    Extraction(String),

    #[error("Publish error: {0}")]
    Publish(String),

    #[error("Process '{program}' failed: {message}")]
    Process { program: String, message: String },

    #[error("Process '{program}' timed out after {}s", timeout.as_secs())]
    Timeout { program: String, timeout: Duration },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience type alias for Results in docs-sync
pub type Result<T> = std::result::Result<T, SyncError>;

impl SyncError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        SyncError::Config(msg.into())
    }

    /// Create a repository error with context
    pub fn repository(msg: impl Into<String>) -> Self {
        SyncError::Repository(msg.into())
    }

    /// Create a discovery error (no tags, no usable versions)
    pub fn discovery(msg: impl Into<String>) -> Self {
        SyncError::Discovery(msg.into())
    }

    /// Create an extraction error with context
    pub fn extraction(msg: impl Into<String>) -> Self {
        SyncError::Extraction(msg.into())
    }

    /// Create a publish error with context
    pub fn publish(msg: impl Into<String>) -> Self {
        SyncError::Publish(msg.into())
    }

    /// Create a process error for an external tool invocation
    pub fn process(program: impl Into<String>, msg: impl Into<String>) -> Self {
        SyncError::Process {
            program: program.into(),
            message: msg.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SyncError::config("test config issue");
        assert_eq!(err.to_string(), "Configuration error: test config issue");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: SyncError = io_err.into();
        assert!(err.to_string().contains("I/O error"));
    }

    #[test]
    fn test_timeout_display() {
        let err = SyncError::Timeout {
            program: "git".to_string(),
            timeout: Duration::from_secs(30),
        };
        assert_eq!(err.to_string(), "Process 'git' timed out after 30s");
    }

    #[test]
    fn test_error_messages_are_descriptive() {
        let error_pairs = vec![
            (SyncError::config("x"), "Configuration error"),
            (SyncError::repository("x"), "Repository error"),
            (SyncError::discovery("x"), "Discovery error"),
            (SyncError::extraction("x"), "Extraction error"),
            (SyncError::publish("x"), "Publish error"),
            (SyncError::process("git", "x"), "Process 'git' failed"),
        ];

        for (err, expected_prefix) in error_pairs {
            let msg = err.to_string();
            assert!(
                msg.starts_with(expected_prefix),
                "Error message should start with '{}', but got '{}'",
                expected_prefix,
                msg
            );
        }
    }
}
