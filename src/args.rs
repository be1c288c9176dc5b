//! CLI argument definitions for the generator binary.

use clap::Args;
use std::path::PathBuf;

/// Arguments controlling a single generation run.
#[derive(Args, Clone, Debug, Default)]
pub struct GenerateArgs {
    /// Path to the JSON template
    #[arg(long, short = 's', required_unless_present = "list_generators")]
    pub source_file: Option<PathBuf>,

    /// Write the document to this file instead of standard output
    #[arg(long, short = 'd')]
    pub destination_file: Option<PathBuf>,

    /// Extension packs to register (comma-separated, e.g. "person,lorem")
    #[arg(
        long = "extensions",
        short = 'f',
        alias = "function-classes",
        value_delimiter = ','
    )]
    pub extensions: Vec<String>,

    /// IANA time zone used to render dates (default: UTC)
    #[arg(long, short = 't', env = "DATAGEN_TIME_ZONE")]
    pub time_zone: Option<String>,

    /// Random seed for deterministic generation (same seed = same document)
    #[arg(long, env = "DATAGEN_SEED")]
    pub seed: Option<u64>,

    /// Indent the generated document
    #[arg(long)]
    pub pretty: bool,

    /// Fail when an extension registers a name that is already taken
    #[arg(long)]
    pub strict_registration: bool,

    /// Abort generation after this long, e.g. "30s", "5m"
    #[arg(long)]
    pub timeout: Option<String>,

    /// YAML configuration file; flags given here take precedence
    #[arg(long, short = 'c', value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log this field of every generated record
    #[arg(long, value_name = "FIELD")]
    pub record_field: Option<String>,

    /// Print the registered generator names and exit
    #[arg(long)]
    pub list_generators: bool,
}
