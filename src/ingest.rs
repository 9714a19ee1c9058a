//! Batch document walker.
//!
//! Iterates a directory in listing order, extracts text per document,
//! obtains a field mapping from the reasoning service, and absorbs it into
//! the aggregate store. Strictly sequential; every per-document failure is
//! logged and the walk continues — there is no rollback.

use std::path::{Path, PathBuf};
use std::time::Duration;

use miette::Diagnostic;
use thiserror::Error;
use tracing::{info, warn};

use crate::error::StoreError;
use crate::extract::{self, ExtractError};
use crate::reason::{self, ReasonError, TextReasoner};
use crate::store::AggregateStore;

/// Errors from the batch walker.
#[derive(Debug, Error, Diagnostic)]
pub enum IngestError {
    #[error("cannot read directory \"{path}\": {source}")]
    #[diagnostic(
        code(dossier::ingest::read_dir),
        help("Check that the path exists and is a readable directory.")
    )]
    ReadDir {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Extract(#[from] ExtractError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Reason(#[from] ReasonError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Store(#[from] StoreError),
}

/// Result type for ingestion operations.
pub type IngestResult<T> = std::result::Result<T, IngestError>;

/// Options for a batch run.
#[derive(Debug, Clone)]
pub struct IngestOptions {
    /// Wait applied between documents (not after the last). Exists to
    /// respect external service rate limits; zero disables it.
    pub delay: Duration,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            delay: Duration::from_secs(10),
        }
    }
}

/// Summary of a batch run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct IngestReport {
    /// Documents successfully merged into the aggregate.
    pub processed: usize,
    /// Files skipped for unsupported extensions.
    pub skipped: usize,
    /// Documents that failed extraction, reasoning, or parsing.
    pub failed: usize,
}

impl std::fmt::Display for IngestReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} processed, {} skipped, {} failed",
            self.processed, self.skipped, self.failed
        )
    }
}

/// Ingest a single document into the aggregate store.
///
/// extract text → extract fields via the reasoner → absorb (read-merge-replace).
pub fn ingest_file(
    store: &AggregateStore,
    reasoner: &dyn TextReasoner,
    path: &Path,
) -> IngestResult<()> {
    let text = extract::extract_text(reasoner, path)?;
    let incoming = reason::extract_fields(reasoner, &text)?;
    let merged = store.absorb(&incoming)?;
    info!(
        document = %path.display(),
        fields_in = incoming.len(),
        fields_total = merged.len(),
        "document absorbed"
    );
    Ok(())
}

/// Ingest every file in a directory, sequentially, in listing order.
///
/// Subdirectories and hidden files are skipped. A failure on one document is
/// logged and the walk proceeds to the next; only an unreadable directory
/// aborts the batch.
pub fn ingest_dir(
    store: &AggregateStore,
    reasoner: &dyn TextReasoner,
    dir: &Path,
    options: &IngestOptions,
) -> IngestResult<IngestReport> {
    let files = list_files(dir)?;
    let mut report = IngestReport::default();

    for (i, path) in files.iter().enumerate() {
        if i > 0 && !options.delay.is_zero() {
            std::thread::sleep(options.delay);
        }

        info!(document = %path.display(), "processing");
        match ingest_file(store, reasoner, path) {
            Ok(()) => report.processed += 1,
            Err(IngestError::Extract(ExtractError::Unsupported { path })) => {
                warn!(document = %path, "unsupported file type, skipping");
                report.skipped += 1;
            }
            Err(e) => {
                // Recoverable at document granularity: no new information
                // from this document, aggregate unchanged.
                warn!(document = %path.display(), error = %e, "document failed, continuing");
                report.failed += 1;
            }
        }
    }

    info!(%report, "batch complete");
    Ok(report)
}

/// List regular files in a directory, in listing order, skipping hidden files.
fn list_files(dir: &Path) -> IngestResult<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir).map_err(|e| IngestError::ReadDir {
        path: dir.display().to_string(),
        source: e,
    })?;

    Ok(entries
        .flatten()
        .map(|e| e.path())
        .filter(|p| p.is_file())
        .filter(|p| {
            !p.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with('.'))
        })
        .collect())
}
