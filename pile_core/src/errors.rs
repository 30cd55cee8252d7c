//! # Error Types
//!
//! Structured error types for pile_core. Errors carry enough context to be
//! handled programmatically: mesh-level structural errors abort an analysis,
//! while per-load-level equilibrium failures are recoverable and show up as
//! gaps in a settlement curve rather than as fatal errors.
//!
//! ## Example
//!
//! ```rust
//! use pile_core::errors::{PileError, PileResult};
//!
//! fn validate_diameter(diameter_m: f64) -> PileResult<()> {
//!     if diameter_m <= 0.0 {
//!         return Err(PileError::invalid_input(
//!             "tip_diameter_m",
//!             diameter_m.to_string(),
//!             "Diameter must be positive",
//!         ));
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for pile_core operations
pub type PileResult<T> = Result<T, PileError>;

/// Structured error type for pile analysis operations.
///
/// Each variant provides specific context about what went wrong. The only
/// recoverable variant is [`PileError::NoEquilibrium`]: the settlement sweep
/// skips the offending load level and continues.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum PileError {
    /// Lithology does not contiguously and monotonically cover the pile
    /// height. Detected at mesh-build time, fatal to mesh construction.
    #[error("Stratigraphy error: {reason}")]
    Stratigraphy { reason: String },

    /// A per-slice or per-load-level solve found no non-trivial consistent
    /// state. The caller must treat this as "no solution at this load
    /// level", never as a valid zero-settlement answer.
    #[error("No equilibrium: {reason}")]
    NoEquilibrium { reason: String },

    /// An unrecognized design-situation or combination label was passed to
    /// a selector. Surfaced to the caller, not auto-corrected.
    #[error("Invalid configuration for '{parameter}': got '{value}', expected {expected}")]
    InvalidConfiguration {
        parameter: String,
        value: String,
        expected: String,
    },

    /// An input value is invalid (out of range, wrong sign, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// File is locked by another user/process
    #[error("File locked: '{path}' is locked by {locked_by} since {locked_at}")]
    FileLocked {
        path: String,
        locked_by: String,
        locked_at: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Schema version mismatch
    #[error("Version mismatch: file version {file_version}, expected {expected_version}")]
    VersionMismatch {
        file_version: String,
        expected_version: String,
    },
}

impl PileError {
    /// Create a Stratigraphy error
    pub fn stratigraphy(reason: impl Into<String>) -> Self {
        PileError::Stratigraphy {
            reason: reason.into(),
        }
    }

    /// Create a NoEquilibrium error
    pub fn no_equilibrium(reason: impl Into<String>) -> Self {
        PileError::NoEquilibrium {
            reason: reason.into(),
        }
    }

    /// Create an InvalidConfiguration error
    pub fn invalid_configuration(
        parameter: impl Into<String>,
        value: impl Into<String>,
        expected: impl Into<String>,
    ) -> Self {
        PileError::InvalidConfiguration {
            parameter: parameter.into(),
            value: value.into(),
            expected: expected.into(),
        }
    }

    /// Create an InvalidInput error
    pub fn invalid_input(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        PileError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(
        operation: impl Into<String>,
        path: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        PileError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileLocked error
    pub fn file_locked(
        path: impl Into<String>,
        locked_by: impl Into<String>,
        locked_at: impl Into<String>,
    ) -> Self {
        PileError::FileLocked {
            path: path.into(),
            locked_by: locked_by.into(),
            locked_at: locked_at.into(),
        }
    }

    /// Check if this is a recoverable error. A settlement sweep contains
    /// NoEquilibrium to the failing load level and continues.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            PileError::NoEquilibrium { .. } | PileError::FileLocked { .. }
        )
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            PileError::Stratigraphy { .. } => "STRATIGRAPHY",
            PileError::NoEquilibrium { .. } => "NO_EQUILIBRIUM",
            PileError::InvalidConfiguration { .. } => "INVALID_CONFIGURATION",
            PileError::InvalidInput { .. } => "INVALID_INPUT",
            PileError::FileError { .. } => "FILE_ERROR",
            PileError::FileLocked { .. } => "FILE_LOCKED",
            PileError::SerializationError { .. } => "SERIALIZATION_ERROR",
            PileError::VersionMismatch { .. } => "VERSION_MISMATCH",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = PileError::invalid_input("tip_diameter_m", "-0.6", "Diameter must be positive");
        let json = serde_json::to_string(&error).unwrap();
        let roundtrip: PileError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            PileError::stratigraphy("gap below -4.0 m").error_code(),
            "STRATIGRAPHY"
        );
        assert_eq!(
            PileError::no_equilibrium("load above ultimate").error_code(),
            "NO_EQUILIBRIUM"
        );
    }

    #[test]
    fn test_recoverability() {
        assert!(PileError::no_equilibrium("over ultimate").is_recoverable());
        assert!(!PileError::stratigraphy("gap").is_recoverable());
        assert!(!PileError::invalid_input("f", "v", "r").is_recoverable());
    }
}
