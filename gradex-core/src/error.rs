//! Error types for gradient evaluation, clipboard text and gradient files.

use std::path::PathBuf;
use thiserror::Error;

/// Error codes for gradient processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// File not found (-1)
    FileNotFound = -1,
    /// Empty file (-2)
    EmptyFile = -2,
    /// General parse error (-3)
    ParseError = -3,
    /// Normalized time outside [0, 1] (E100)
    TimeOutOfRange = 100,
    /// Gradient failed validation (E101)
    InvalidGradient = 101,
    /// Text is not a gradient clipboard payload (E200)
    NotGradientText = 200,
}

/// Main error type for the gradient core.
#[derive(Debug, Error)]
pub enum GradientError {
    #[error("Normalized time {time} is outside [0, 1]")]
    TimeOutOfRange { time: f32 },

    #[error("Invalid gradient: {message}")]
    InvalidGradient { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Empty file: {path}")]
    EmptyFile { path: PathBuf },

    #[error("Clipboard text does not start with '{prefix}'")]
    MissingClipboardPrefix { prefix: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl GradientError {
    /// Get the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            GradientError::TimeOutOfRange { .. } => ErrorCode::TimeOutOfRange,
            GradientError::InvalidGradient { .. } => ErrorCode::InvalidGradient,
            GradientError::FileNotFound { .. } => ErrorCode::FileNotFound,
            GradientError::EmptyFile { .. } => ErrorCode::EmptyFile,
            GradientError::MissingClipboardPrefix { .. } => ErrorCode::NotGradientText,
            GradientError::Json(_) => ErrorCode::ParseError,
            GradientError::Io(_) => ErrorCode::FileNotFound,
        }
    }

    /// Get the numeric error code value.
    pub fn code_value(&self) -> i32 {
        self.code() as i32
    }
}

/// Result type alias for gradient operations.
pub type Result<T> = std::result::Result<T, GradientError>;
