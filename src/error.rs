use std::fmt::Debug;
use thiserror::Error;

/// Enum with all errors in this crate.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KdTreeError {
    /// Two points, or a point and a tree, disagree on the number of coordinates.
    #[error("Dimension mismatch: expected {expected} coordinates, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// A nearest neighbor query was issued against a tree without any points.
    #[error("Query against an empty tree: no data")]
    EmptyQuery,

    /// Range bounds do not describe a valid box for this tree.
    #[error("Malformed bounds: {0}")]
    MalformedBounds(String),

    /// A coordinate was NaN, which has no place on any axis.
    #[error("Points must not have NaN coordinates")]
    NanCoordinate,

    /// Points must have at least one coordinate to be indexed.
    #[error("Points must have at least one dimension")]
    ZeroDimensions,
}

pub type Result<T> = std::result::Result<T, KdTreeError>;
