//! Error types for template parsing.

/// Error type for template operations.
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    /// Input is not JSON, or violates the node grammar
    #[error("Malformed template: {0}")]
    Malformed(String),

    /// Repeat count is negative, fractional or not a number
    #[error("Invalid cardinality: {0}")]
    InvalidCardinality(String),
}

impl From<serde_json::Error> for TemplateError {
    fn from(err: serde_json::Error) -> Self {
        TemplateError::Malformed(err.to_string())
    }
}
