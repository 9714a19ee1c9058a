//! Extraction adapters: raw text out of documents.
//!
//! Each supported source kind (image, PDF, DOCX, plain text) has its own
//! adapter; [`detect_kind`] classifies a file by extension and
//! [`extract_text`] dispatches to the right one. Images go through the
//! reasoning service's OCR capability; everything else is decoded locally.

pub mod docx;
pub mod link;
pub mod pdf;

use std::path::Path;

use miette::Diagnostic;
use thiserror::Error;

use crate::prompts;
use crate::reason::{ReasonError, TextReasoner};

/// Errors from extraction adapters.
#[derive(Debug, Error, Diagnostic)]
pub enum ExtractError {
    #[error("unsupported file type: \"{path}\"")]
    #[diagnostic(
        code(dossier::extract::unsupported),
        help(
            "Supported extensions are: .png, .jpg, .jpeg, .pdf, .docx, and .txt. \
             The file is skipped; the batch continues."
        )
    )]
    Unsupported { path: String },

    #[error("failed to read \"{path}\": {source}")]
    #[diagnostic(
        code(dossier::extract::io),
        help("Check that the file exists and is readable.")
    )]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("parse error in {format} document: {message}")]
    #[diagnostic(
        code(dossier::extract::parse_error),
        help("The document could not be decoded. Verify the file is valid {format} and not corrupted.")
    )]
    Parse { format: String, message: String },

    #[error("fetch error for URL \"{url}\": {message}")]
    #[diagnostic(
        code(dossier::extract::fetch_error),
        help("Failed to download the link. Check that the URL is reachable and publicly shared.")
    )]
    Fetch { url: String, message: String },

    #[error("invalid document link: \"{url}\"")]
    #[diagnostic(
        code(dossier::extract::invalid_link),
        help("Enter a valid http(s) link, e.g. a public Google Docs share URL.")
    )]
    InvalidLink { url: String },

    #[error("empty document: no text extracted from \"{origin}\"")]
    #[diagnostic(
        code(dossier::extract::empty),
        help(
            "The adapter produced no text. The file may be empty, image-only \
             (for PDFs), or contain nothing readable."
        )
    )]
    Empty { origin: String },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Reason(#[from] ReasonError),
}

/// Result type for extraction operations.
pub type ExtractResult<T> = std::result::Result<T, ExtractError>;

/// Supported document source kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Image,
    Pdf,
    Docx,
    PlainText,
}

impl SourceKind {
    /// Human-readable name for diagnostics.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Pdf => "pdf",
            Self::Docx => "docx",
            Self::PlainText => "text",
        }
    }
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Detect the source kind from a file extension.
pub fn detect_kind(path: &Path) -> Option<SourceKind> {
    let ext = path.extension()?.to_str()?.to_lowercase();
    match ext.as_str() {
        "png" | "jpg" | "jpeg" => Some(SourceKind::Image),
        "pdf" => Some(SourceKind::Pdf),
        "docx" => Some(SourceKind::Docx),
        "txt" => Some(SourceKind::PlainText),
        _ => None,
    }
}

/// Extract raw text from a local file, dispatching on its extension.
///
/// Images are routed through the reasoner's OCR capability; other formats
/// are decoded locally.
pub fn extract_text(reasoner: &dyn TextReasoner, path: &Path) -> ExtractResult<String> {
    let kind = detect_kind(path).ok_or_else(|| ExtractError::Unsupported {
        path: path.display().to_string(),
    })?;

    let text = match kind {
        SourceKind::PlainText => {
            std::fs::read_to_string(path).map_err(|e| ExtractError::Io {
                path: path.display().to_string(),
                source: e,
            })?
        }
        SourceKind::Pdf => pdf::extract(&read_bytes(path)?)?,
        SourceKind::Docx => docx::extract(&read_bytes(path)?)?,
        SourceKind::Image => {
            reasoner.describe_image(&read_bytes(path)?, prompts::IMAGE_OCR_INSTRUCTION)?
        }
    };

    if text.trim().is_empty() {
        return Err(ExtractError::Empty {
            origin: path.display().to_string(),
        });
    }
    Ok(text)
}

fn read_bytes(path: &Path) -> ExtractResult<Vec<u8>> {
    std::fs::read(path).map_err(|e| ExtractError::Io {
        path: path.display().to_string(),
        source: e,
    })
}
