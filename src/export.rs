/*!
 * The export pipeline: discovery, decoding, digesting, serialization
 */

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Local};
use indicatif::ProgressBar;
use tracing::{debug, info};

use crate::config::Config;
use crate::decode::decode_bytes;
use crate::digest::sha256_hex;
use crate::error::{AllCodeError, IoResultExt, Result};
use crate::scanner::Scanner;
use crate::types::{ExportEntry, ExportManifest, FileCandidate, FileRecord};
use crate::writer::ArtifactWriter;

/// Timestamp format used in both artifacts
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// What a successful run produced
#[derive(Debug, Clone)]
pub struct ExportOutcome {
    /// Location of the text artifact
    pub text_path: PathBuf,
    /// Location of the JSON manifest
    pub manifest_path: PathBuf,
    /// The manifest that was written
    pub manifest: ExportManifest,
    /// Wall time of the whole run
    pub duration: Duration,
}

/// Runs the export pipeline for one configuration
pub struct Exporter {
    config: Config,
    progress: Arc<ProgressBar>,
}

impl Exporter {
    /// Create a new exporter
    pub fn new(config: Config, progress: Arc<ProgressBar>) -> Self {
        Self { config, progress }
    }

    /// Run the pipeline stamped with the current local time
    pub fn run(&self) -> Result<ExportOutcome> {
        self.run_at(Local::now())
    }

    /// Run the pipeline with an explicit generation time.
    ///
    /// Any failure aborts the run. Artifacts are only written once every
    /// candidate has been read, so a missing root, an empty selection, or
    /// an unreadable file leaves previous artifacts untouched.
    pub fn run_at(&self, generated_at: DateTime<Local>) -> Result<ExportOutcome> {
        let start = Instant::now();
        self.config.validate()?;

        let root = fs::canonicalize(&self.config.root).at_path(&self.config.root)?;
        info!(root = %root.display(), "starting export");

        let scanner = Scanner::new(&self.config, Arc::clone(&self.progress));
        let candidates = scanner.discover(&root)?;
        if candidates.is_empty() {
            return Err(AllCodeError::NothingToExport {
                root,
                extensions: self
                    .config
                    .allowed_extensions()
                    .iter()
                    .map(|e| format!(".{e}"))
                    .collect::<Vec<_>>()
                    .join("/"),
            });
        }
        info!(count = candidates.len(), "discovered files");

        self.progress.set_length(candidates.len() as u64);
        let entries = candidates
            .into_iter()
            .map(|candidate| self.process(candidate))
            .collect::<Result<Vec<_>>>()?;

        let manifest = ExportManifest {
            generated_at: generated_at.format(TIMESTAMP_FORMAT).to_string(),
            project_root: root.display().to_string(),
            file_count: entries.len(),
            files: entries.iter().map(|e| e.record.clone()).collect(),
        };

        let (text_path, manifest_path) = self.config.output_paths(&root);
        self.progress.set_message("Writing artifacts");
        ArtifactWriter::write(&manifest, &entries, &text_path, &manifest_path)?;

        let duration = start.elapsed();
        info!(
            files = manifest.file_count,
            elapsed = ?duration,
            "export complete"
        );

        Ok(ExportOutcome {
            text_path,
            manifest_path,
            manifest,
            duration,
        })
    }

    /// Read, decode and hash one candidate
    fn process(&self, candidate: FileCandidate) -> Result<ExportEntry> {
        self.progress.set_message(candidate.relative_path.clone());
        let raw = fs::read(&candidate.absolute_path).at_path(&candidate.absolute_path)?;

        let decoded = decode_bytes(&raw);
        debug!(
            path = %candidate.absolute_path.display(),
            encoding = %decoded.encoding_used,
            "read file"
        );
        let record = FileRecord {
            path: candidate.relative_path,
            size_bytes: raw.len() as u64,
            sha256: sha256_hex(&raw),
            encoding_read: decoded.encoding_used,
        };
        self.progress.inc(1);

        Ok(ExportEntry { decoded, record })
    }
}
