/// Error types for the coin-flip simulator
///
/// Design Philosophy:
/// - The core reports failures through `SimulationError` and never recovers
///   or logs-and-continues; callers decide how to surface them
/// - `ServiceError` carries a standardized code and category so any front
///   end can map a core failure onto a status code and log level
///
/// Usage:
/// - Core functions return `Result<T>` (alias over `SimulationError`)
/// - Service layers convert with `ServiceError::from(&err)`
/// - Error codes follow pattern: <CATEGORY>_<SPECIFIC>_<DETAIL>
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Failures raised by the trial generator, binomial test and summarizer
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimulationError {
    #[error("Invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("Numerical degeneracy: {0}")]
    NumericalDegeneracy(String),
}

impl SimulationError {
    pub fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        SimulationError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }

    pub fn degenerate(reason: impl Into<String>) -> Self {
        SimulationError::NumericalDegeneracy(reason.into())
    }
}

/// Error categories that map to HTTP status codes and logging severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCategory {
    /// Validation errors (400 Bad Request)
    /// Client provided invalid input
    Validation,

    /// Internal errors (500 Internal Server Error)
    /// Numerical failures, worker panics, programming errors
    Internal,

    /// Resource not found (404 Not Found)
    NotFound,
}

impl ErrorCategory {
    /// Map error category to HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            ErrorCategory::Validation => 400,
            ErrorCategory::Internal => 500,
            ErrorCategory::NotFound => 404,
        }
    }

    /// Map error category to log level
    pub fn log_level(&self) -> &'static str {
        match self {
            ErrorCategory::Validation => "warn",
            ErrorCategory::Internal => "error",
            ErrorCategory::NotFound => "info",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Validation => "Validation",
            ErrorCategory::Internal => "Internal",
            ErrorCategory::NotFound => "NotFound",
        }
    }
}

/// Standard error codes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorCode(pub &'static str);

impl ErrorCode {
    // Validation errors
    pub const VALIDATION_INVALID_PARAMETER: ErrorCode = ErrorCode("VALIDATION_INVALID_PARAMETER");
    pub const VALIDATION_INVALID_INPUT: ErrorCode = ErrorCode("VALIDATION_INVALID_INPUT");
    pub const VALIDATION_MISSING_FIELD: ErrorCode = ErrorCode("VALIDATION_MISSING_FIELD");

    // Internal errors
    pub const INTERNAL_NUMERICAL_DEGENERACY: ErrorCode =
        ErrorCode("INTERNAL_NUMERICAL_DEGENERACY");
    pub const INTERNAL_UNEXPECTED: ErrorCode = ErrorCode("INTERNAL_UNEXPECTED");

    // Resource errors
    pub const NOT_FOUND_SIMULATION: ErrorCode = ErrorCode("NOT_FOUND_SIMULATION");

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Standardized error structure handed to front ends
///
/// This provides consistent error reporting with:
/// - Structured error codes for programmatic handling
/// - Human-readable messages
/// - Optional context for debugging
/// - Category-based classification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceError {
    /// Error category (determines status code and log level)
    pub category: ErrorCategory,

    /// Structured error code
    pub code: String,

    /// Human-readable error message
    pub message: String,

    /// Optional additional context (e.g., offending parameter)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

impl ServiceError {
    pub fn new(category: ErrorCategory, code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            category,
            code: code.as_str().to_string(),
            message: message.into(),
            context: None,
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(
            ErrorCategory::Validation,
            ErrorCode::VALIDATION_INVALID_INPUT,
            message,
        )
    }

    pub fn missing_field(field: impl fmt::Display) -> Self {
        Self::new(
            ErrorCategory::Validation,
            ErrorCode::VALIDATION_MISSING_FIELD,
            format!("Missing required field: {}", field),
        )
    }

    pub fn simulation_not_found() -> Self {
        Self::new(
            ErrorCategory::NotFound,
            ErrorCode::NOT_FOUND_SIMULATION,
            "No simulation has been run yet. Adjust parameters if needed and run a simulation to see results.",
        )
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCategory::Internal, ErrorCode::INTERNAL_UNEXPECTED, message)
    }
}

impl From<&SimulationError> for ServiceError {
    fn from(error: &SimulationError) -> Self {
        match error {
            SimulationError::InvalidParameter { name, .. } => Self::new(
                ErrorCategory::Validation,
                ErrorCode::VALIDATION_INVALID_PARAMETER,
                error.to_string(),
            )
            .with_context(format!("parameter: {}", name)),
            SimulationError::NumericalDegeneracy(_) => Self::new(
                ErrorCategory::Internal,
                ErrorCode::INTERNAL_NUMERICAL_DEGENERACY,
                error.to_string(),
            ),
        }
    }
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(context) = &self.context {
            write!(f, "[{}] {}: {}", self.code, self.message, context)
        } else {
            write!(f, "[{}] {}", self.code, self.message)
        }
    }
}

impl std::error::Error for ServiceError {}

// Convenience type alias
pub type Result<T> = std::result::Result<T, SimulationError>;
