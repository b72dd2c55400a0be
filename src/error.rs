// In: src/error.rs

//! This module defines the single, unified error type for the sgmarshal library.
//! It uses the `thiserror` crate to provide ergonomic, context-aware error handling.
//!
//! Positions carried by the variants are 1-based argument positions, the way the
//! host runtime numbers arguments in its own error messages.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MarshalError {
    // =========================================================================
    // === Boundary Validation Errors (raised by the importer/exporter)
    // =========================================================================
    #[error("Expected {expected} as argument {position}")]
    TypeMismatch { position: usize, expected: String },

    #[error("Expected Integer as argument {position}, got {value}")]
    NotIntegral { position: usize, value: f64 },

    #[error("Expected {expected} as argument {position}, got {found}")]
    ShapeMismatch {
        position: usize,
        expected: String,
        found: String,
    },

    #[error("Corrupted sparse matrix as argument {position}: {detail}")]
    CorruptedSparseInput { position: usize, detail: String },

    #[error("Expected non-empty String as argument {position}")]
    EmptyString { position: usize },

    #[error("Argument {position} requested but only {available} were supplied")]
    PositionOutOfRange { position: usize, available: usize },

    // =========================================================================
    // === Export-Side Errors
    // =========================================================================
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Couldn't create container of {requested} elements (got {actual})")]
    AllocationMismatch { requested: usize, actual: usize },

    #[error("Expected {expected} return values, produced {actual}")]
    OutputCountMismatch { expected: usize, actual: usize },

    // =========================================================================
    // === Outer-Boundary Errors
    // =========================================================================
    #[error("Out of memory error (requested {requested} elements)")]
    OutOfMemory { requested: usize },

    #[error("{0}")]
    InternalToolkit(String),

    #[error("Unknown command.")]
    UnknownCommand,

    // =========================================================================
    // === External Error Wrappers (Using #[from] for automatic conversion)
    // =========================================================================
    /// An error from the Serde JSON library, typically while loading a config.
    #[error("Serde JSON error: {0}")]
    Config(#[from] serde_json::Error),

    /// An error from the I/O subsystem, e.g. an unopenable log file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl MarshalError {
    /// The 1-based argument position the error refers to, if any.
    pub fn position(&self) -> Option<usize> {
        match self {
            Self::TypeMismatch { position, .. }
            | Self::NotIntegral { position, .. }
            | Self::ShapeMismatch { position, .. }
            | Self::CorruptedSparseInput { position, .. }
            | Self::EmptyString { position }
            | Self::PositionOutOfRange { position, .. } => Some(*position),
            _ => None,
        }
    }

    pub(crate) fn type_mismatch(position: usize, expected: impl Into<String>) -> Self {
        Self::TypeMismatch {
            position,
            expected: expected.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_is_reported_for_argument_errors() {
        let err = MarshalError::type_mismatch(3, "Double Precision Matrix");
        assert_eq!(err.position(), Some(3));
        assert_eq!(err.to_string(), "Expected Double Precision Matrix as argument 3");

        let err = MarshalError::NotIntegral {
            position: 1,
            value: 3.5,
        };
        assert_eq!(err.position(), Some(1));
        assert!(err.to_string().contains("3.5"));
    }

    #[test]
    fn test_export_errors_carry_no_position() {
        let err = MarshalError::AllocationMismatch {
            requested: 4,
            actual: 3,
        };
        assert_eq!(err.position(), None);
        assert!(MarshalError::InvalidArgument("x".into()).position().is_none());
    }

    #[test]
    fn test_json_error_converts_with_from() {
        let json_err = serde_json::from_str::<u32>("not json").unwrap_err();
        let err: MarshalError = json_err.into();
        assert!(matches!(err, MarshalError::Config(_)));
    }
}
