//! Label extraction and matching.
//!
//! A label list is an ordered sequence of free-form field labels pulled from
//! a form-like document (independently of the aggregate record). Matching
//! delegates the semantic association to the reasoning service but owns the
//! output contract: every input label appears exactly once, verbatim, in
//! input order, with `N/A` for anything the service could not match.

use std::path::Path;

use miette::Diagnostic;
use thiserror::Error;
use tracing::debug;

use crate::extract;
use crate::reason::{self, ReasonError, TextReasoner, strip_fences};
use crate::record::{FieldMapping, NA_SENTINEL};

/// Errors from label operations.
#[derive(Debug, Error, Diagnostic)]
pub enum LabelError {
    #[error("no saved label list at \"{path}\"")]
    #[diagnostic(
        code(dossier::labels::no_labels),
        help("Extract labels first with `dossier labels <FILE>` or `dossier labels-link <URL>`.")
    )]
    NoLabels { path: String },

    #[error("label file I/O error at \"{path}\": {source}")]
    #[diagnostic(
        code(dossier::labels::io),
        help("Check that the data directory exists and is writable.")
    )]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("label file is not a JSON array of strings: {message}")]
    #[diagnostic(
        code(dossier::labels::malformed_file),
        help("The saved label file is corrupt. Re-extract the labels to regenerate it.")
    )]
    MalformedFile { message: String },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Extract(#[from] extract::ExtractError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Reason(#[from] ReasonError),
}

/// Result type for label operations.
pub type LabelResult<T> = std::result::Result<T, LabelError>;

/// Extract a label list from a local document.
pub fn labels_from_file(
    reasoner: &dyn TextReasoner,
    path: &Path,
) -> LabelResult<Vec<String>> {
    let text = extract::extract_text(reasoner, path)?;
    Ok(reason::extract_labels(reasoner, &text)?)
}

/// Extract a label list from a remote document link.
pub fn labels_from_link(reasoner: &dyn TextReasoner, url: &str) -> LabelResult<Vec<String>> {
    let text = extract::link::fetch_text(url)?;
    Ok(reason::extract_labels(reasoner, &text)?)
}

/// Persist a label list as a JSON array.
pub fn save_labels(path: &Path, labels: &[String]) -> LabelResult<()> {
    let json = serde_json::to_string_pretty(labels).map_err(|e| LabelError::MalformedFile {
        message: e.to_string(),
    })?;
    std::fs::write(path, json).map_err(|e| LabelError::Io {
        path: path.display().to_string(),
        source: e,
    })
}

/// Load a previously saved label list.
pub fn load_labels(path: &Path) -> LabelResult<Vec<String>> {
    if !path.is_file() {
        return Err(LabelError::NoLabels {
            path: path.display().to_string(),
        });
    }
    let content = std::fs::read_to_string(path).map_err(|e| LabelError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    let labels: Vec<String> =
        serde_json::from_str(&content).map_err(|e| LabelError::MalformedFile {
            message: e.to_string(),
        })?;
    if labels.is_empty() {
        return Err(LabelError::NoLabels {
            path: path.display().to_string(),
        });
    }
    Ok(labels)
}

/// Match a label list against the aggregate record.
///
/// The reasoning service proposes the associations; the returned text is
/// rebuilt locally so the output contract holds regardless of what the model
/// produced: one `Label: Value` line per input label, labels verbatim, input
/// order preserved, `N/A` for unmatched labels. Duplicate input labels each
/// consume the next unclaimed response line for that label text.
pub fn match_labels(
    reasoner: &dyn TextReasoner,
    labels: &[String],
    record: &FieldMapping,
) -> LabelResult<String> {
    let labels_json = serde_json::to_string_pretty(labels).map_err(|e| {
        LabelError::MalformedFile {
            message: e.to_string(),
        }
    })?;
    let record_json = record
        .to_json_pretty()
        .map_err(|e| LabelError::MalformedFile {
            message: e.to_string(),
        })?;

    let prompt = crate::prompts::label_match_prompt(&labels_json, &record_json);
    let response = reasoner.complete(None, &prompt)?;

    let mut pairs = parse_pairs(strip_fences(&response));
    debug!(lines = pairs.len(), "parsed label-match response");

    let mut out = Vec::with_capacity(labels.len());
    for label in labels {
        let value = take_value(&mut pairs, label).unwrap_or_else(|| NA_SENTINEL.to_string());
        out.push(format!("{label}: {value}"));
    }
    Ok(out.join("\n"))
}

/// Parse `Label: Value` lines into ordered pairs. Lines without a colon are
/// model chatter and are dropped.
fn parse_pairs(text: &str) -> Vec<(String, String)> {
    text.lines()
        .filter_map(|line| {
            let (label, value) = line.split_once(':')?;
            let label = label.trim();
            let value = value.trim();
            if label.is_empty() {
                return None;
            }
            Some((label.to_string(), value.to_string()))
        })
        .collect()
}

/// Take the first unconsumed value whose label matches (case-insensitively).
fn take_value(pairs: &mut Vec<(String, String)>, label: &str) -> Option<String> {
    let idx = pairs
        .iter()
        .position(|(l, _)| l.eq_ignore_ascii_case(label.trim()))?;
    let (_, value) = pairs.remove(idx);
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}
