//! Entry point for turning a template into a document.

use crate::context::GenerationOptions;
use crate::error::GenerationError;
use crate::registry::Registry;
use crate::walker::TemplateWalker;
use std::io::{self, Read, Write};

/// Generates JSON test data from templates.
///
/// Holds a shared registry and the options applied to every call. Each call
/// gets its own walker and context, so one `JsonDataGenerator` can be used
/// from several threads at once.
#[derive(Debug, Clone)]
pub struct JsonDataGenerator<'r> {
    registry: &'r Registry,
    options: GenerationOptions,
}

impl<'r> JsonDataGenerator<'r> {
    /// Create a generator over a fully populated registry.
    pub fn new(registry: &'r Registry, options: GenerationOptions) -> Self {
        Self { registry, options }
    }

    /// Options applied to every call.
    pub fn options(&self) -> &GenerationOptions {
        &self.options
    }

    /// Read a template from `source`, stream the generated document into
    /// `sink` and return the complete document.
    ///
    /// The sink is flushed but never closed. On error the sink may hold an
    /// incomplete document that must be discarded.
    pub fn generate_test_data_json<R: Read, W: Write>(
        &self,
        source: R,
        sink: W,
    ) -> Result<String, GenerationError> {
        TemplateWalker::new(self.registry, &self.options).run(source, sink)
    }

    /// Generate from template text without an external sink.
    pub fn generate_string(&self, template: &str) -> Result<String, GenerationError> {
        self.generate_test_data_json(template.as_bytes(), io::sink())
    }
}
