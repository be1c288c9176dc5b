//! Error types for generation.

use template_core::TemplateError;

/// Error type for a generation call.
///
/// Every variant is fatal: the call stops, and whatever reached the sink
/// must not be treated as a complete document.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    /// Input is not JSON or violates the template grammar
    #[error("Malformed template: {0}")]
    MalformedTemplate(String),

    /// Directive names a generator that is not registered
    #[error("Unknown generator: {0}")]
    UnknownGenerator(String),

    /// Repeat count is negative, fractional or not a number
    #[error("Invalid cardinality: {0}")]
    InvalidCardinality(String),

    /// Reference points at a path that has not been produced
    #[error("Unresolved reference: {0}")]
    UnresolvedReference(String),

    /// Generator received arguments it cannot use
    #[error("Invalid argument for generator '{generator}': {message}")]
    InvalidArgument { generator: String, message: String },

    /// Reading the template or writing the output failed
    #[error("I/O failure: {0}")]
    Io(#[from] std::io::Error),
}

impl GenerationError {
    /// Shorthand for [`GenerationError::InvalidArgument`].
    pub fn invalid_argument(generator: &str, message: impl Into<String>) -> Self {
        GenerationError::InvalidArgument {
            generator: generator.to_string(),
            message: message.into(),
        }
    }
}

impl From<TemplateError> for GenerationError {
    fn from(err: TemplateError) -> Self {
        match err {
            TemplateError::Malformed(msg) => GenerationError::MalformedTemplate(msg),
            TemplateError::InvalidCardinality(msg) => GenerationError::InvalidCardinality(msg),
        }
    }
}

/// Error type for registry operations.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// Name already bound while the registry is in strict mode
    #[error("Generator already registered: {0}")]
    DuplicateRegistration(String),

    /// Extension identifier does not match any known pack
    #[error("Generator extension not found: {0}")]
    ExtensionNotFound(String),
}
