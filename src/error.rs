//! Error types for the plume CLI.
//!
//! Uses thiserror for derive macros and provides user-actionable error messages.

use crate::exit_codes;
use thiserror::Error;

/// Main error type for plume operations.
///
/// Each variant maps to a specific exit code so scripts can distinguish
/// between user mistakes, missing input, failed generations, and in-flight
/// collisions.
#[derive(Error, Debug)]
pub enum PlumeError {
    /// User provided invalid arguments or the storage/config is in an invalid state.
    #[error("{0}")]
    UserError(String),

    /// A required input field is missing; no request was issued.
    #[error("{0}")]
    ValidationError(String),

    /// The text-generation request failed (transport, status, or response shape).
    #[error("generation failed: {0}")]
    GenerationError(String),

    /// The generation lock could not be acquired.
    #[error("lock acquisition failed: {0}")]
    LockError(String),
}

impl PlumeError {
    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            PlumeError::UserError(_) => exit_codes::USER_ERROR,
            PlumeError::ValidationError(_) => exit_codes::VALIDATION_FAILURE,
            PlumeError::GenerationError(_) => exit_codes::GENERATION_FAILURE,
            PlumeError::LockError(_) => exit_codes::LOCK_FAILURE,
        }
    }
}

/// Result type alias for plume operations.
pub type Result<T> = std::result::Result<T, PlumeError>;
