//! json-data-generator: synthetic JSON documents from templates.
//!
//! The engine lives in two crates:
//!
//! - `template-core`: template grammar, paths and argument model
//! - `template-generator`: generator registry, directive resolution,
//!   the template walker and the dual-sink serializer
//!
//! This package adds the command-line surface on top: configuration files,
//! flag handling, output staging and the generation timeout.

pub mod args;
pub mod config;
pub mod output;
pub mod records;
pub mod settings;

pub use args::GenerateArgs;
pub use config::DataGenConfig;
pub use output::Destination;
pub use settings::Settings;

pub use template_core::Template;
pub use template_generator::{GenerationError, GenerationOptions, JsonDataGenerator, Registry};
