//! Name-to-generator registration table.
//!
//! The table is built once at start-up (built-ins, then any extension packs
//! or user generators) and passed by reference into every generation call.
//! Lookups take `&self`, so one registry can serve concurrent calls once
//! registration is over.

use crate::context::GenerationContext;
use crate::error::{GenerationError, RegistryError};
use crate::extensions;
use crate::generators::{ArgReader, Builtin, ValueGenerator};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use template_core::Args;
use tracing::debug;

/// A registered generator implementation.
#[derive(Clone)]
pub enum Generator {
    /// One of the built-in generators
    Builtin(Builtin),
    /// User-supplied implementation
    Custom(Arc<dyn ValueGenerator>),
}

impl Generator {
    /// Wrap a user-supplied implementation.
    pub fn custom(generator: impl ValueGenerator + 'static) -> Self {
        Generator::Custom(Arc::new(generator))
    }

    /// Invoke the generator registered under `name`.
    pub fn generate(
        &self,
        name: &str,
        args: &Args,
        ctx: &mut GenerationContext,
    ) -> Result<Value, GenerationError> {
        let reader = ArgReader::new(name, args);
        match self {
            Generator::Builtin(builtin) => builtin.generate(&reader, ctx),
            Generator::Custom(custom) => custom.generate(&reader, ctx),
        }
    }
}

impl fmt::Debug for Generator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Generator::Builtin(builtin) => f.debug_tuple("Builtin").field(builtin).finish(),
            Generator::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// What happens when a name is registered twice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RegistrationMode {
    /// Last registration wins
    #[default]
    Replace,
    /// Second registration fails with [`RegistryError::DuplicateRegistration`]
    Strict,
}

/// Registration table mapping generator names to implementations.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    generators: HashMap<String, Generator>,
    mode: RegistrationMode,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding every built-in generator.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for (name, builtin) in Builtin::NAMES {
            registry
                .generators
                .insert((*name).to_string(), Generator::Builtin(*builtin));
        }
        registry
    }

    /// Switch to strict mode: duplicate names are rejected.
    pub fn strict(mut self) -> Self {
        self.mode = RegistrationMode::Strict;
        self
    }

    /// Current registration mode.
    pub fn mode(&self) -> RegistrationMode {
        self.mode
    }

    /// Bind `name` to `generator`.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        generator: Generator,
    ) -> Result<(), RegistryError> {
        let name = name.into();
        if self.mode == RegistrationMode::Strict && self.generators.contains_key(&name) {
            return Err(RegistryError::DuplicateRegistration(name));
        }
        debug!("Registering generator '{}'", name);
        self.generators.insert(name, generator);
        Ok(())
    }

    /// Bind `name` to a user-supplied implementation.
    pub fn register_custom(
        &mut self,
        name: impl Into<String>,
        generator: impl ValueGenerator + 'static,
    ) -> Result<(), RegistryError> {
        self.register(name, Generator::custom(generator))
    }

    /// Look up the generator bound to `name`.
    pub fn resolve(&self, name: &str) -> Result<&Generator, GenerationError> {
        self.generators
            .get(name)
            .ok_or_else(|| GenerationError::UnknownGenerator(name.to_string()))
    }

    /// True if `name` is bound.
    pub fn contains(&self, name: &str) -> bool {
        self.generators.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.generators.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Register the generators of the extension pack `id`.
    pub fn load_extension(&mut self, id: &str) -> Result<(), RegistryError> {
        let install =
            extensions::find(id).ok_or_else(|| RegistryError::ExtensionNotFound(id.to_string()))?;
        install(self)?;
        debug!("Loaded generator extension '{}'", id);
        Ok(())
    }

    /// Register every extension pack named in `ids`, in order.
    ///
    /// Meant to run once during start-up, before any generation call.
    pub fn bootstrap<I, S>(&mut self, ids: I) -> Result<(), RegistryError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for id in ids {
            self.load_extension(id.as_ref())?;
        }
        Ok(())
    }
}
