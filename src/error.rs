//! Rich diagnostic error types for dossier.
//!
//! Each subsystem defines its own error type with miette `#[diagnostic]`
//! derives, providing error codes and help text so users know exactly what
//! went wrong and how to fix it. This module holds the store errors and the
//! top-level wrapper; extraction, reasoning, path, and config errors live
//! with their subsystems.

use miette::Diagnostic;
use thiserror::Error;

/// Top-level error type for dossier.
///
/// Each variant wraps a subsystem-specific error, preserving the full
/// diagnostic chain (error codes, help text, sources) through to the user.
#[derive(Debug, Error, Diagnostic)]
pub enum DossierError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Extract(#[from] crate::extract::ExtractError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Reason(#[from] crate::reason::ReasonError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Ingest(#[from] crate::ingest::IngestError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Label(#[from] crate::labels::LabelError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Path(#[from] crate::paths::PathError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] crate::config::ConfigError),
}

/// Errors from the aggregate store.
#[derive(Debug, Error, Diagnostic)]
pub enum StoreError {
    #[error("I/O error: {source}")]
    #[diagnostic(
        code(dossier::store::io),
        help(
            "A filesystem operation failed. Check that the data directory exists, \
             has correct permissions, and that the disk is not full."
        )
    )]
    Io {
        #[source]
        source: std::io::Error,
    },

    #[error("redb transaction error: {message}")]
    #[diagnostic(
        code(dossier::store::redb),
        help(
            "The embedded database encountered a transaction error. \
             This may indicate corruption — try `dossier reset` with a fresh \
             data directory. If the problem persists, file a bug report."
        )
    )]
    Redb { message: String },

    #[error("serialization error: {message}")]
    #[diagnostic(
        code(dossier::store::serde),
        help(
            "Failed to serialize or deserialize the aggregate record. \
             This usually means the stored data format has changed between \
             versions. Try resetting and re-ingesting your documents."
        )
    )]
    Serialization { message: String },
}

/// Convenience alias for functions returning dossier results.
pub type DossierResult<T> = std::result::Result<T, DossierError>;
