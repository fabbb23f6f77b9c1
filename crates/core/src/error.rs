//! Error type shared by ingestion, conversion and arithmetic.
//!
//! Floating-point special values (±∞, NaN) produced by division are ordinary
//! results and never surface here.

use std::fmt;

/// Errors that can occur when building or combining SI arrays
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArrayError {
    /// A required input was empty, out of range or otherwise unusable
    InvalidArgument {
        /// Name of the offending parameter (e.g. `"values"`, `"length"`)
        param: &'static str,
        /// What was wrong with it
        reason: String,
    },
    /// Operands of an element-wise operation have different sizes
    SizeMismatch {
        /// Size of the receiver
        left: usize,
        /// Size of the argument
        right: usize,
    },
    /// Operands of a matrix operation have different `(rows, cols)`
    ShapeMismatch {
        /// Shape of the receiver
        left: (usize, usize),
        /// Shape of the argument
        right: (usize, usize),
    },
    /// Positional access outside `0..size`
    IndexOutOfBounds {
        /// Requested position
        index: usize,
        /// Logical length of the array
        len: usize,
    },
    /// A storage kind that is neither dense nor sparse
    UnsupportedStorageKind(String),
}

impl ArrayError {
    /// Create an error for an unusable parameter.
    ///
    /// # Arguments
    /// * `param` - The name of the parameter (e.g. `"values"`, `"map"`)
    /// * `reason` - A description of the validation failure
    pub fn invalid_argument(param: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            param,
            reason: reason.into(),
        }
    }

    /// Create an error for an empty required input.
    pub fn empty(param: &'static str) -> Self {
        Self::invalid_argument(param, "must not be empty")
    }
}

impl fmt::Display for ArrayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArrayError::InvalidArgument { param, reason } => {
                write!(f, "Invalid argument '{param}': {reason}")
            }
            ArrayError::SizeMismatch { left, right } => {
                write!(f, "Operands do not have the same size: {left} vs {right}")
            }
            ArrayError::ShapeMismatch { left, right } => write!(
                f,
                "Operands do not have the same shape: {}x{} vs {}x{}",
                left.0, left.1, right.0, right.1
            ),
            ArrayError::IndexOutOfBounds { index, len } => {
                write!(f, "Index {index} out of bounds for length {len}")
            }
            ArrayError::UnsupportedStorageKind(kind) => {
                write!(f, "Unsupported storage kind: {kind}")
            }
        }
    }
}

impl std::error::Error for ArrayError {}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ArrayError>;
