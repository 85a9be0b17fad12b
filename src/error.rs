//! Error types and handling for the storefront server

use serde::Serialize;
use std::fmt;

/// Application error taxonomy shared by the CLI and HTTP surfaces
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum AppError {
    /// A required field is missing or malformed
    Validation(String),
    /// Unknown category or product id
    NotFound(String),
    /// Admin credential missing or mismatched
    Unauthorized(String),
    /// Backing store unreadable or unwritable; the operation did not take effect
    Persistence(String),
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Validation(msg) => write!(f, "Invalid input: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::Persistence(msg) => write!(f, "Persistence failed: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl AppError {
    /// Get the stable error code used in JSON responses
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "validation_error",
            AppError::NotFound(_) => "not_found",
            AppError::Unauthorized(_) => "unauthorized",
            AppError::Persistence(_) => "persistence_error",
            AppError::Internal(_) => "internal_error",
        }
    }

    /// HTTP status for this error
    pub fn status_code(&self) -> u16 {
        match self {
            AppError::Validation(_) => 400,
            AppError::Unauthorized(_) => 401,
            AppError::NotFound(_) => 404,
            AppError::Persistence(_) => 503,
            AppError::Internal(_) => 500,
        }
    }

    /// Process exit code for CLI mode
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::Validation(_) => 1,
            AppError::Unauthorized(_) => 2,
            AppError::NotFound(_) => 3,
            AppError::Persistence(_) => 4,
            AppError::Internal(_) => 5,
        }
    }

    /// Persistence failures leave state untouched, so the caller may retry
    pub fn is_retryable(&self) -> bool {
        matches!(self, AppError::Persistence(_))
    }

    /// Get the error message
    pub fn message(&self) -> String {
        self.to_string()
    }
}

/// Convert anyhow::Error to AppError
impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

/// Convert serde_json::Error to AppError
impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Persistence(err.to_string())
    }
}

/// Convert std::io::Error to AppError
impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Persistence(err.to_string())
    }
}

/// Require a non-blank string field, returning it trimmed
pub fn require_field(field: &str, value: Option<&str>) -> Result<String, AppError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(AppError::Validation(format!("{} is required", field))),
    }
}

/// Normalize text using Unicode NFKC, trimmed and lowercased
pub fn normalize_text(text: &str) -> String {
    use unicode_normalization::UnicodeNormalization;
    text.nfkc().collect::<String>().trim().to_lowercase()
}
