//! Command-line interface for json-data-generator
//!
//! # Usage Examples
//!
//! ```bash
//! # Print a document generated from a template
//! json-data-generator -s template.json
//!
//! # Reproducible, indented output written to a file
//! json-data-generator -s template.json -d data.json --seed 42 --pretty
//!
//! # Load extension packs and render dates in another zone
//! json-data-generator -s users.json -f person,internet -t Europe/Berlin
//!
//! # Settings from a YAML file, with a time limit
//! json-data-generator -s template.json -c datagen.yaml --timeout 30s
//! ```

use anyhow::Context;
use clap::Parser;
use json_data_generator::output::{self, Destination};
use json_data_generator::records::record_messages;
use json_data_generator::{GenerateArgs, Settings};
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(name = "json-data-generator")]
#[command(about = "Generate synthetic JSON documents from templates")]
#[command(long_about = None)]
struct Cli {
    #[command(flatten)]
    args: GenerateArgs,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = run().await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let settings = Settings::resolve(&cli.args)?;
    let registry = settings.build_registry()?;

    if cli.args.list_generators {
        for name in registry.names() {
            println!("{name}");
        }
        return Ok(());
    }

    let source = settings
        .source
        .clone()
        .context("A template is required (--source-file)")?;
    info!("Generating document from {:?}", source);

    let document = match settings.timeout {
        Some(limit) => {
            output::generate_with_timeout(
                Arc::new(registry),
                settings.options.clone(),
                source,
                settings.destination.clone(),
                limit,
            )
            .await?
        }
        None => output::generate(
            &registry,
            &settings.options,
            &source,
            &settings.destination,
        )?,
    };

    if let Destination::File(path) = &settings.destination {
        info!("Document written to {:?}", path);
    }

    if let Some(field) = &settings.record_field {
        for message in record_messages(&document, field)? {
            info!(field = %field, "{}", message);
        }
    }

    Ok(())
}
