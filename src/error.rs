/// Error types for smoothing operations
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SmoothError {
    /// A window size, degree, buffer or index range was rejected before any
    /// sample was touched
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
    /// The normal-equations matrix could not be inverted
    #[error("Singular matrix: {rows}x{cols} system has no unique solution")]
    SingularMatrix {
        /// Rows of the offending matrix
        rows: usize,
        /// Columns of the offending matrix
        cols: usize,
    },
}

impl SmoothError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        SmoothError::InvalidParameter(msg.into())
    }
}

/// Result type for smoothing operations
pub type Result<T> = std::result::Result<T, SmoothError>;
