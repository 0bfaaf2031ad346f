use thiserror::Error;

/// Rejections raised while parsing money and identifiers at the engine edge.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The text does not have the required shape.
    #[error("{field} ('{value}') is not well-formed")]
    PatternMismatch {
        /// Which primitive was being parsed.
        field: &'static str,
        /// Rejected text.
        value: String,
    },
    /// The text is well-formed but its magnitude or precision is unsupported.
    #[error("{field} ('{value}') is out of range")]
    OutOfBounds {
        /// Which primitive was being parsed.
        field: &'static str,
        /// Rejected text.
        value: String,
    },
}
