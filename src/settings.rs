//! Effective run settings, merged from the configuration file and flags.

use crate::args::GenerateArgs;
use crate::config::{parse_duration, parse_time_zone, DataGenConfig};
use crate::output::Destination;
use anyhow::Context;
use std::path::PathBuf;
use std::time::Duration;
use template_generator::{GenerationOptions, Registry};
use tracing::debug;

/// Settings for one run after flags have been applied over the file.
#[derive(Debug, Clone)]
pub struct Settings {
    pub source: Option<PathBuf>,
    pub destination: Destination,
    pub options: GenerationOptions,
    pub extensions: Vec<String>,
    pub strict_registration: bool,
    pub timeout: Option<Duration>,
    pub record_field: Option<String>,
}

impl Settings {
    /// Merge `args` over the configuration file they point at, if any.
    pub fn resolve(args: &GenerateArgs) -> anyhow::Result<Self> {
        let config = match &args.config {
            Some(path) => DataGenConfig::from_file(path)?,
            None => DataGenConfig::default(),
        };
        Self::merge(args, config)
    }

    /// Merge `args` over an already loaded configuration.
    pub fn merge(args: &GenerateArgs, config: DataGenConfig) -> anyhow::Result<Self> {
        let mut options = GenerationOptions::default();
        if let Some(seed) = args.seed.or(config.seed) {
            options = options.with_seed(seed);
        }
        if let Some(name) = args.time_zone.as_ref().or(config.time_zone.as_ref()) {
            options = options.with_time_zone(parse_time_zone(name)?);
        }
        options = options.with_pretty(args.pretty || config.pretty);

        let mut extensions = config.extensions;
        for id in &args.extensions {
            if !extensions.contains(id) {
                extensions.push(id.clone());
            }
        }

        let timeout = args
            .timeout
            .as_ref()
            .or(config.timeout.as_ref())
            .map(|value| {
                parse_duration(value).with_context(|| format!("Invalid timeout '{value}'"))
            })
            .transpose()?;

        let destination = match &args.destination_file {
            Some(path) => Destination::File(path.clone()),
            None => Destination::Stdout,
        };

        Ok(Self {
            source: args.source_file.clone(),
            destination,
            options,
            extensions,
            strict_registration: args.strict_registration || config.strict_registration,
            timeout,
            record_field: args.record_field.clone(),
        })
    }

    /// Build the registry: builtins first, then each extension pack in order.
    pub fn build_registry(&self) -> anyhow::Result<Registry> {
        let mut registry = Registry::with_builtins();
        if self.strict_registration {
            registry = registry.strict();
        }
        registry
            .bootstrap(&self.extensions)
            .context("Failed to load extension packs")?;
        debug!(
            "Registry ready with {} generators ({} extension packs)",
            registry.names().len(),
            self.extensions.len()
        );
        Ok(registry)
    }
}
