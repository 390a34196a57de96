// src/error.rs

//! Unified error handling for the tracker.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Result type alias for tracker operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Machine-readable error codes surfaced to API clients.
///
/// Values are part of the wire format; new codes get new numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum ErrorCode {
    UndefinedError = -1,
    TaskNotFound = 10,
}

impl ErrorCode {
    /// Numeric value sent to clients.
    pub fn code(self) -> i32 {
        self as i32
    }

    /// Symbolic name sent to clients.
    pub fn name(self) -> &'static str {
        match self {
            ErrorCode::UndefinedError => "UndefinedError",
            ErrorCode::TaskNotFound => "TaskNotFound",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for ErrorCode {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_i32(self.code())
    }
}

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// A requested resource does not exist
    #[error("{message}")]
    NotFound { code: ErrorCode, message: String },

    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Upstream feed returned something we cannot use
    #[error("Feed error for {context}: {message}")]
    Feed { context: String, message: String },

    /// Stored data could not be read back
    #[error("Storage error in {location}: {message}")]
    Storage { location: String, message: String },
}

impl AppError {
    /// Create the structured "Task not found" error.
    pub fn task_not_found(key: u64) -> Self {
        Self::NotFound {
            code: ErrorCode::TaskNotFound,
            message: format!("Task {key} not found"),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a feed error with context.
    pub fn feed(context: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Feed {
            context: context.into(),
            message: message.to_string(),
        }
    }

    /// Create a storage error with the offending location.
    pub fn storage(location: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Storage {
            location: location.into(),
            message: message.to_string(),
        }
    }

    /// Error code reported to API clients.
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::NotFound { code, .. } => *code,
            _ => ErrorCode::UndefinedError,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, AppError::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_not_found_carries_code() {
        let err = AppError::task_not_found(42);
        assert!(err.is_not_found());
        assert_eq!(err.code(), ErrorCode::TaskNotFound);
        assert_eq!(err.code().code(), 10);
        assert_eq!(err.to_string(), "Task 42 not found");
    }

    #[test]
    fn other_errors_are_undefined() {
        let err = AppError::config("missing years");
        assert!(!err.is_not_found());
        assert_eq!(err.code(), ErrorCode::UndefinedError);
        assert_eq!(err.code().code(), -1);
    }

    #[test]
    fn error_code_serializes_as_number() {
        let json = serde_json::to_string(&ErrorCode::TaskNotFound).unwrap();
        assert_eq!(json, "10");
    }
}
