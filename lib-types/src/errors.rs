//! Boundary validation errors

use thiserror::Error;

/// Error raised when a raw value fails validation at the boundary
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TypeError {
    #[error("Invalid hex encoding: {0}")]
    InvalidHex(String),

    #[error("Invalid length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("External reference is empty")]
    EmptyExternalRef,

    #[error("External reference too long: {len} > {max}")]
    ExternalRefTooLong { len: usize, max: usize },

    #[error("External reference contains forbidden character {0:?}")]
    ExternalRefInvalidChar(char),

    #[error("Content too long: {len} > {max}")]
    ContentTooLong { len: usize, max: usize },
}

/// Result type for boundary validation
pub type TypeResult<T> = Result<T, TypeError>;
