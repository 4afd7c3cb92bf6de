//! Error types and context management for layout operations

use std::fmt;
use std::path::PathBuf;

use crate::structure::{CornId, GroupId, LayerId};

/// Target of a plan offset assignment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignTarget {
    /// A wall layer group
    Wall(GroupId),
    /// A corner
    Corner(CornId),
}

impl fmt::Display for AssignTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Wall(id) => write!(f, "wall {}", id.0),
            Self::Corner(id) => write!(f, "corner {}", id.0),
        }
    }
}

/// Main error type for all layout operations
#[derive(Debug)]
pub enum BondError {
    /// Input geometry is inconsistent with a detected corner
    ///
    /// Raised when no layer of a corner contains the corner point between
    /// its endpoints, so the corner has no frame to anchor its bricks.
    ModelingData {
        /// Corner that could not be anchored
        corner: CornId,
        /// Description of the inconsistency
        reason: String,
    },

    /// Plan offset assigned twice within one search trial
    DoubleAssignment {
        /// Wall or corner that was already touched
        target: AssignTarget,
    },

    /// Layer shortening that would consume the whole layer
    InvalidLength {
        /// Layer being shortened
        layer: LayerId,
        /// Requested reduction
        requested: f64,
        /// Current layer length
        current: f64,
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

    /// General file system operation failure
    FileSystem {
        /// Path involved in the operation
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Wall description or brick export could not be (de)serialized
    Serialization {
        /// File being read or written
        path: PathBuf,
        /// Underlying JSON error
        source: serde_json::Error,
    },
}

impl fmt::Display for BondError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ModelingData { corner, reason } => {
                write!(f, "Inconsistent modeling data at corner {}: {reason}", corner.0)
            }
            Self::DoubleAssignment { target } => {
                write!(f, "Plan offset of {target} assigned twice")
            }
            Self::InvalidLength {
                layer,
                requested,
                current,
            } => {
                write!(
                    f,
                    "Cannot shorten layer {} by {requested} (current length {current})",
                    layer.0
                )
            }
            Self::InvalidParameter {
                parameter,
                value,
                reason,
            } => {
                write!(f, "Invalid parameter '{parameter}' = '{value}': {reason}")
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
            Self::Serialization { path, source } => {
                write!(f, "Malformed JSON in '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for BondError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::FileSystem { source, .. } => Some(source),
            Self::Serialization { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Convenience type alias for layout results
pub type Result<T> = std::result::Result<T, BondError>;

/// Create an invalid parameter error
pub fn invalid_parameter(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> BondError {
    BondError::InvalidParameter {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Create a modeling data error for a corner
pub fn modeling_error(corner: CornId, reason: &impl ToString) -> BondError {
    BondError::ModelingData {
        corner,
        reason: reason.to_string(),
    }
}

/// Create a file system error bound to a path
pub fn file_error(
    path: impl Into<PathBuf>,
    operation: &'static str,
    source: std::io::Error,
) -> BondError {
    BondError::FileSystem {
        path: path.into(),
        operation,
        source,
    }
}
