//! Error handling module for Comment Blocks.
//!
//! This module provides a unified error type using the `thiserror` crate.
//! Placeholder resolution never produces these errors (it degrades to blank
//! text); they come from configuration loading and from settings that cannot
//! be interpreted once resolved.

use std::io;
use thiserror::Error;

/// Unified error type for the Comment Blocks library and CLI.
#[derive(Error, Debug)]
pub enum CommentBlockError {
    /// I/O operation errors
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON parsing errors (invocation args)
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// A per-line setting that does not make sense after resolution,
    /// e.g. `gapLeft = "wide"` or `justify = "middle"`.
    #[error("Invalid {field} on line {line}: {value:?}")]
    InvalidSetting {
        field: &'static str,
        line: usize,
        value: String,
    },

    /// Generic operation errors
    #[error("{0}")]
    Other(String),
}

/// Result type alias for Comment Blocks operations
pub type Result<T> = std::result::Result<T, CommentBlockError>;

impl CommentBlockError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        CommentBlockError::Config(msg.into())
    }

    /// Create an invalid setting error
    pub fn invalid_setting(field: &'static str, line: usize, value: impl Into<String>) -> Self {
        CommentBlockError::InvalidSetting {
            field,
            line,
            value: value.into(),
        }
    }

    /// Create a generic other error
    pub fn other(msg: impl Into<String>) -> Self {
        CommentBlockError::Other(msg.into())
    }
}

impl From<String> for CommentBlockError {
    fn from(s: String) -> Self {
        CommentBlockError::Other(s)
    }
}

impl From<&str> for CommentBlockError {
    fn from(s: &str) -> Self {
        CommentBlockError::Other(s.to_string())
    }
}
