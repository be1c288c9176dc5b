//! Where generated documents go.
//!
//! File destinations are staged through a temporary file in the target
//! directory and only renamed into place once generation succeeded, so a
//! failed or timed-out run never leaves a partial document behind. Standard
//! output is written through its lock and never closed.

use anyhow::Context;
use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tempfile::NamedTempFile;
use template_generator::{GenerationOptions, JsonDataGenerator, Registry};
use tracing::{debug, info, warn};

/// Output destination for a generated document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    Stdout,
    File(PathBuf),
}

/// A generated document whose output has not been committed yet.
#[derive(Debug)]
pub struct Staged {
    document: String,
    pending: Pending,
}

#[derive(Debug)]
enum Pending {
    /// Already streamed to standard output
    Nothing,
    /// Needs to be printed on commit
    Stdout,
    /// Needs to be moved into place on commit
    File(NamedTempFile, PathBuf),
}

impl Staged {
    /// The generated document.
    pub fn document(&self) -> &str {
        &self.document
    }

    /// Make the output visible and return the document.
    pub fn commit(self) -> anyhow::Result<String> {
        match self.pending {
            Pending::Nothing => {}
            Pending::Stdout => {
                let mut out = io::stdout().lock();
                out.write_all(self.document.as_bytes())?;
                out.flush()?;
            }
            Pending::File(staged, path) => {
                staged
                    .persist(&path)
                    .with_context(|| format!("Failed to write {path:?}"))?;
                info!("Wrote {} bytes to {:?}", self.document.len(), path);
            }
        }
        Ok(self.document)
    }
}

/// Generate the document described by the template at `source` and stage
/// it for `destination`.
///
/// With `stream_stdout` set, a standard-output destination is written while
/// the document is generated. Otherwise it is held back until
/// [`Staged::commit`].
pub fn stage(
    registry: &Registry,
    options: &GenerationOptions,
    source: &Path,
    destination: &Destination,
    stream_stdout: bool,
) -> anyhow::Result<Staged> {
    let template =
        File::open(source).with_context(|| format!("Failed to open template {source:?}"))?;
    let template = BufReader::new(template);
    let generator = JsonDataGenerator::new(registry, options.clone());
    debug!("Generating from {:?} into {:?}", source, destination);

    match destination {
        Destination::Stdout if stream_stdout => {
            let document = generator
                .generate_test_data_json(template, io::stdout().lock())
                .with_context(|| format!("Failed to generate data from {source:?}"))?;
            Ok(Staged {
                document,
                pending: Pending::Nothing,
            })
        }
        Destination::Stdout => {
            let document = generator
                .generate_test_data_json(template, io::sink())
                .with_context(|| format!("Failed to generate data from {source:?}"))?;
            Ok(Staged {
                document,
                pending: Pending::Stdout,
            })
        }
        Destination::File(path) => {
            let mut staged = staging_file(path)?;
            let document = generator
                .generate_test_data_json(template, staged.as_file_mut())
                .with_context(|| format!("Failed to generate data from {source:?}"))?;
            Ok(Staged {
                document,
                pending: Pending::File(staged, path.clone()),
            })
        }
    }
}

/// Generate and commit in one step.
pub fn generate(
    registry: &Registry,
    options: &GenerationOptions,
    source: &Path,
    destination: &Destination,
) -> anyhow::Result<String> {
    stage(registry, options, source, destination, true)?.commit()
}

/// Generate on a blocking task and give up after `limit`.
///
/// Nothing reaches the destination unless generation finishes in time. A
/// task that overruns keeps running in the background; its staged output is
/// discarded when it ends.
pub async fn generate_with_timeout(
    registry: Arc<Registry>,
    options: GenerationOptions,
    source: PathBuf,
    destination: Destination,
    limit: Duration,
) -> anyhow::Result<String> {
    let task = tokio::task::spawn_blocking(move || {
        stage(&registry, &options, &source, &destination, false)
    });

    match tokio::time::timeout(limit, task).await {
        Ok(joined) => joined.context("Generation task failed")??.commit(),
        Err(_) => {
            warn!("Generation did not finish within {:?}", limit);
            anyhow::bail!("Generation timed out after {limit:?}")
        }
    }
}

fn staging_file(path: &Path) -> anyhow::Result<NamedTempFile> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    NamedTempFile::new_in(dir).with_context(|| format!("Failed to create staging file in {dir:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_template(dir: &Path, body: &str) -> PathBuf {
        let path = dir.join("template.json");
        fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn test_file_destination_written_on_success() {
        let dir = tempfile::tempdir().unwrap();
        let source = write_template(dir.path(), r#"{"n": {"$gen": "int", "min": 3, "max": 3}}"#);
        let target = dir.path().join("out.json");

        let registry = Registry::with_builtins();
        let document = generate(
            &registry,
            &GenerationOptions::default().with_seed(1),
            &source,
            &Destination::File(target.clone()),
        )
        .unwrap();

        assert_eq!(document, r#"{"n":3}"#);
        assert_eq!(fs::read_to_string(&target).unwrap(), document);
    }

    #[test]
    fn test_file_destination_untouched_on_failure() {
        let dir = tempfile::tempdir().unwrap();
        let source = write_template(dir.path(), r#"{"n": {"$gen": "no_such_generator"}}"#);
        let target = dir.path().join("out.json");

        let registry = Registry::with_builtins();
        let result = generate(
            &registry,
            &GenerationOptions::default(),
            &source,
            &Destination::File(target.clone()),
        );

        assert!(result.is_err());
        assert!(!target.exists());
        // only the template is left in the directory
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_staged_stdout_holds_document() {
        let dir = tempfile::tempdir().unwrap();
        let source = write_template(dir.path(), r#"[1, 2, 3]"#);

        let registry = Registry::with_builtins();
        let staged = stage(
            &registry,
            &GenerationOptions::default(),
            &source,
            &Destination::Stdout,
            false,
        )
        .unwrap();
        assert_eq!(staged.document(), "[1,2,3]");
    }

    #[test]
    fn test_missing_template() {
        let dir = tempfile::tempdir().unwrap();
        let registry = Registry::with_builtins();
        let result = stage(
            &registry,
            &GenerationOptions::default(),
            &dir.path().join("missing.json"),
            &Destination::Stdout,
            false,
        );
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_generate_with_timeout_completes() {
        let dir = tempfile::tempdir().unwrap();
        let source = write_template(dir.path(), r#"{"$repeat": 4, "of": {"$gen": "index"}}"#);
        let target = dir.path().join("out.json");

        let document = generate_with_timeout(
            Arc::new(Registry::with_builtins()),
            GenerationOptions::default(),
            source,
            Destination::File(target.clone()),
            Duration::from_secs(30),
        )
        .await
        .unwrap();

        assert_eq!(document, "[0,1,2,3]");
        assert_eq!(fs::read_to_string(&target).unwrap(), document);
    }

    #[tokio::test]
    async fn test_generate_with_timeout_expired_leaves_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let source = write_template(
            dir.path(),
            r#"{"$repeat": 200000, "of": {"id": {"$gen": "uuid"}, "n": {"$gen": "int"}}}"#,
        );
        let target = dir.path().join("out.json");

        let result = generate_with_timeout(
            Arc::new(Registry::with_builtins()),
            GenerationOptions::default().with_seed(3),
            source,
            Destination::File(target.clone()),
            Duration::from_millis(1),
        )
        .await;

        assert!(result.is_err());
        assert!(!target.exists());
    }

    #[tokio::test]
    async fn test_late_failure_after_large_output_leaves_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let source = write_template(
            dir.path(),
            r#"{"rows": {"$repeat": 2000, "of": "padding-padding-padding"}, "tail": {"$ref": "missing.value"}}"#,
        );
        let target = dir.path().join("out.json");

        let result = generate_with_timeout(
            Arc::new(Registry::with_builtins()),
            GenerationOptions::default(),
            source,
            Destination::File(target.clone()),
            Duration::from_secs(30),
        )
        .await;

        let err = result.unwrap_err();
        assert!(format!("{err:#}").contains("Unresolved reference"), "got {err:#}");
        assert!(!target.exists());
        // the staging file is gone as well
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }
}
