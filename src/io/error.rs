//! Error types for mask construction, noise shaping and file handling

use std::fmt;
use std::path::{Path, PathBuf};

/// Main error type for all seeding operations
#[derive(Debug)]
pub enum FillError {
    /// Failed to load source image from filesystem
    ImageLoad {
        /// Path to the image file
        path: PathBuf,
        /// Underlying image loading error
        source: image::ImageError,
    },

    /// Source data doesn't meet algorithm requirements
    InvalidSourceData {
        /// Description of what's wrong with the source data
        reason: String,
    },

    /// Parameter validation failed
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },

    /// Input or output path cannot be used
    InvalidPath {
        /// Path that was rejected
        path: PathBuf,
        /// Explanation of why the path is unusable
        reason: String,
    },

    /// Array operands have incompatible shapes
    ShapeMismatch {
        /// Operation that received the operands
        operation: &'static str,
        /// Shape that was required
        expected: Vec<usize>,
        /// Shape that was provided
        actual: Vec<usize>,
    },

    /// Failed to save an image to disk
    ImageExport {
        /// Path where export was attempted
        path: PathBuf,
        /// Underlying image export error
        source: image::ImageError,
    },

    /// General file system operation failure
    FileSystem {
        /// Path involved in the operation
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Numerical computation produced invalid result
    Computation {
        /// Name of the computation that failed
        operation: &'static str,
        /// Description of the failure
        reason: String,
    },
}

impl fmt::Display for FillError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ImageLoad { path, source } => {
                write!(f, "Failed to load image '{}': {source}", path.display())
            }
            Self::InvalidSourceData { reason } => {
                write!(f, "Invalid source data: {reason}")
            }
            Self::InvalidParameter {
                parameter,
                value,
                reason,
            } => {
                write!(f, "Invalid parameter '{parameter}' = '{value}': {reason}")
            }
            Self::InvalidPath { path, reason } => {
                write!(f, "Invalid path '{}': {reason}", path.display())
            }
            Self::ShapeMismatch {
                operation,
                expected,
                actual,
            } => {
                write!(
                    f,
                    "Shape mismatch in {operation}: expected {expected:?}, got {actual:?}"
                )
            }
            Self::ImageExport { path, source } => {
                write!(
                    f,
                    "Failed to export image to '{}': {source}",
                    path.display()
                )
            }
            Self::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "File system error during {operation} on '{}': {source}",
                    path.display()
                )
            }
            Self::Computation { operation, reason } => {
                write!(f, "Computation error in {operation}: {reason}")
            }
        }
    }
}

impl std::error::Error for FillError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ImageLoad { source, .. } | Self::ImageExport { source, .. } => Some(source),
            Self::FileSystem { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Convenience type alias for seeding results
pub type Result<T> = std::result::Result<T, FillError>;

impl From<image::ImageError> for FillError {
    fn from(err: image::ImageError) -> Self {
        Self::ImageLoad {
            path: PathBuf::from("<unknown>"),
            source: err,
        }
    }
}

impl From<std::io::Error> for FillError {
    fn from(err: std::io::Error) -> Self {
        Self::FileSystem {
            path: PathBuf::from("<unknown>"),
            operation: "unknown",
            source: err,
        }
    }
}

impl From<ndarray::ShapeError> for FillError {
    fn from(err: ndarray::ShapeError) -> Self {
        Self::Computation {
            operation: "reshape",
            reason: err.to_string(),
        }
    }
}

/// Create an invalid parameter error
pub fn invalid_parameter(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> FillError {
    FillError::InvalidParameter {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Create a computation error
pub fn computation_error(operation: &'static str, reason: &impl ToString) -> FillError {
    FillError::Computation {
        operation,
        reason: reason.to_string(),
    }
}

/// Create a shape mismatch error from two array shapes
pub fn shape_mismatch(operation: &'static str, expected: &[usize], actual: &[usize]) -> FillError {
    FillError::ShapeMismatch {
        operation,
        expected: expected.to_vec(),
        actual: actual.to_vec(),
    }
}

/// Create an error for an unusable input or output path
pub fn invalid_path(path: &Path, reason: &impl ToString) -> FillError {
    FillError::InvalidPath {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}
