//! Generator arguments.

use serde_json::{Map, Value};

/// Arguments passed to a generator.
///
/// The object form (`{"$gen": "int", "min": 1}`) yields named arguments and
/// the inline form (`{{int(1, 10)}}`) yields positional ones. Generators look
/// an argument up by name first and fall back to its position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Args {
    positional: Vec<Value>,
    named: Map<String, Value>,
}

impl Args {
    /// Arguments given by position.
    pub fn positional(values: Vec<Value>) -> Self {
        Self {
            positional: values,
            named: Map::new(),
        }
    }

    /// Arguments given by name.
    pub fn named(values: Map<String, Value>) -> Self {
        Self {
            positional: Vec::new(),
            named: values,
        }
    }

    /// Look up an argument by name, falling back to its position.
    pub fn get(&self, name: &str, position: usize) -> Option<&Value> {
        self.named
            .get(name)
            .or_else(|| self.positional.get(position))
    }

    /// True when no arguments were given.
    pub fn is_empty(&self) -> bool {
        self.positional.is_empty() && self.named.is_empty()
    }

    /// Positional arguments in declaration order.
    pub fn positional_values(&self) -> &[Value] {
        &self.positional
    }

    /// Named arguments in declaration order.
    pub fn named_values(&self) -> &Map<String, Value> {
        &self.named
    }
}
