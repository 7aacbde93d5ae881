use thiserror::Error;

/// Enum with all errors in this crate.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KnnError {
    /// Two points that must share a dimension do not.
    #[error("Dimension mismatch: expected {expected} coordinates, got {actual}.")]
    DimensionMismatch {
        /// The dimension established by the tree or the first operand.
        expected: usize,
        /// The dimension of the offending point.
        actual: usize,
    },

    /// A point without any coordinates was given to the tree.
    #[error("Points must have at least one coordinate.")]
    EmptyPoint,

    /// The classifier got a different number of points and labels.
    #[error("Got {points} points but {labels} labels.")]
    LengthMismatch {
        /// Number of training points.
        points: usize,
        /// Number of training labels.
        labels: usize,
    },

    /// The classifier was fitted without any training points.
    #[error("Cannot fit a classifier on an empty training set.")]
    EmptyTrainingSet,

    /// The classifier was fitted with `k = 0`.
    #[error("k must be at least 1 to vote over neighbours.")]
    ZeroNeighbors,

    /// A classifier label is too large to derive the number of classes from.
    #[error("Label {label} is too large.")]
    InvalidLabel {
        /// The offending label.
        label: usize,
    },

    /// The classifier was used before `fit`.
    #[error("The model has not been trained yet. First, use the fit method.")]
    NotFitted,
}

/// Crate-specific result type.
pub type Result<T> = std::result::Result<T, KnnError>;
