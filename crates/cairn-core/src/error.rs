//! Error types and exit codes for cairn
//!
//! Exit codes:
//! - 0: Success
//! - 1: Generic failure (IO, summarizer, serialization)
//! - 2: Usage error (bad flags/args, invalid values)
//! - 3: Data error (unknown node, invalid compression, unreadable snapshot)

use std::path::PathBuf;
use thiserror::Error;

use crate::tree::CompressionLevel;

/// Exit codes for the cairn CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Success (0)
    Success = 0,
    /// Generic failure (1)
    Failure = 1,
    /// Usage error - bad flags/args (2)
    Usage = 2,
    /// Data error - missing node, invalid transition, corrupt snapshot (3)
    Data = 3,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

/// Errors that can occur during cairn operations
#[derive(Error, Debug)]
pub enum CairnError {
    // Contract violations (exit code 3)
    #[error("node not found: {id}")]
    NotFound { id: String },

    #[error("invalid compression for {id}: {from} -> {to} (levels only move forward)")]
    InvalidTransition {
        id: String,
        from: CompressionLevel,
        to: CompressionLevel,
    },

    #[error("cannot decode {path:?}: {reason}")]
    Decode { path: PathBuf, reason: String },

    #[error("tree failed validation with {count} problem(s)")]
    InvalidTree { count: usize },

    // Steady-state failures (exit code 1)
    #[error("summarization failed for {id}: {reason}")]
    Summarization { id: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to {operation} {target}: {reason}")]
    IoOperation {
        operation: String,
        target: String,
        reason: String,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    // Usage errors (exit code 2)
    #[error("invalid {context}: {value}")]
    InvalidValue { context: String, value: String },

    #[error("{0}")]
    UsageError(String),

    #[error("{0}")]
    Other(String),
}

impl CairnError {
    /// Create an error for a missing node
    pub fn not_found(id: impl std::fmt::Display) -> Self {
        CairnError::NotFound { id: id.to_string() }
    }

    /// Create an error for a failed IO operation with context
    pub fn io_operation(
        operation: &str,
        target: impl std::fmt::Display,
        error: impl std::fmt::Display,
    ) -> Self {
        CairnError::IoOperation {
            operation: operation.to_string(),
            target: target.to_string(),
            reason: error.to_string(),
        }
    }

    /// Create an error for an unreadable file
    pub fn decode(path: impl Into<PathBuf>, reason: impl std::fmt::Display) -> Self {
        CairnError::Decode {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Create an error for a failed summarizer call
    pub fn summarization(id: impl std::fmt::Display, reason: impl std::fmt::Display) -> Self {
        CairnError::Summarization {
            id: id.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Create an error for an invalid value or configuration
    pub fn invalid_value(context: &str, value: impl std::fmt::Display) -> Self {
        CairnError::InvalidValue {
            context: context.to_string(),
            value: value.to_string(),
        }
    }

    /// Conditions expected in steady state: log them and retry on the next pass
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            CairnError::Summarization { .. } | CairnError::Io(_) | CairnError::IoOperation { .. }
        )
    }

    /// Get the appropriate exit code for this error
    pub fn exit_code(&self) -> ExitCode {
        match self {
            CairnError::InvalidValue { .. } | CairnError::UsageError(_) => ExitCode::Usage,

            CairnError::NotFound { .. }
            | CairnError::InvalidTransition { .. }
            | CairnError::Decode { .. }
            | CairnError::InvalidTree { .. } => ExitCode::Data,

            CairnError::Summarization { .. }
            | CairnError::Io(_)
            | CairnError::IoOperation { .. }
            | CairnError::Json(_)
            | CairnError::Toml(_)
            | CairnError::Other(_) => ExitCode::Failure,
        }
    }

    /// Get the error type identifier
    fn error_type(&self) -> &'static str {
        match self {
            CairnError::NotFound { .. } => "not_found",
            CairnError::InvalidTransition { .. } => "invalid_transition",
            CairnError::Decode { .. } => "decode_error",
            CairnError::InvalidTree { .. } => "invalid_tree",
            CairnError::Summarization { .. } => "summarization_failure",
            CairnError::Io(_) | CairnError::IoOperation { .. } => "io_failure",
            CairnError::Json(_) => "json_error",
            CairnError::Toml(_) => "toml_error",
            CairnError::InvalidValue { .. } => "invalid_value",
            CairnError::UsageError(_) => "usage_error",
            CairnError::Other(_) => "other",
        }
    }

    /// Convert error to JSON representation for structured error output.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "error": {
                "code": self.exit_code() as i32,
                "type": self.error_type(),
                "message": self.to_string(),
            }
        })
    }
}

/// Result type alias for cairn operations
pub type Result<T> = std::result::Result<T, CairnError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contract_violations_are_data_errors() {
        assert_eq!(CairnError::not_found("cn-1").exit_code(), ExitCode::Data);
        let err = CairnError::InvalidTransition {
            id: "cn-1".to_string(),
            from: CompressionLevel::Summary,
            to: CompressionLevel::Full,
        };
        assert_eq!(err.exit_code(), ExitCode::Data);
        assert!(!err.is_transient());
    }

    #[test]
    fn test_steady_state_errors_are_transient() {
        assert!(CairnError::summarization("cn-1", "timeout").is_transient());
        assert!(CairnError::io_operation("rename", "tree.json", "denied").is_transient());
        assert!(!CairnError::decode("tree.json", "eof").is_transient());
    }

    #[test]
    fn test_to_json_envelope() {
        let json = CairnError::not_found("cn-abc").to_json();
        assert_eq!(json["error"]["code"], 3);
        assert_eq!(json["error"]["type"], "not_found");
        assert_eq!(json["error"]["message"], "node not found: cn-abc");
    }

    #[test]
    fn test_invalid_transition_message() {
        let err = CairnError::InvalidTransition {
            id: "cn-1".to_string(),
            from: CompressionLevel::Tag,
            to: CompressionLevel::Summary,
        };
        assert_eq!(
            err.to_string(),
            "invalid compression for cn-1: tag -> summary (levels only move forward)"
        );
    }
}
