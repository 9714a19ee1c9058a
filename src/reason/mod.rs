//! The reasoning-service boundary.
//!
//! All semantic work (field extraction, label extraction, label matching,
//! query answering) is delegated to an external text-in/text-out service
//! behind the [`TextReasoner`] trait, so the merge and matching logic can be
//! tested with a deterministic fake instead of a live network dependency.
//!
//! This module also owns response hygiene: every call site must tolerate
//! responses wrapped in Markdown fences and treat unparsable output as a
//! recoverable failure, never a crash.

mod ollama;

pub use ollama::{OllamaReasoner, ReasonerConfig};

use miette::Diagnostic;
use thiserror::Error;

use crate::prompts;
use crate::record::FieldMapping;

/// Errors from the reasoning subsystem.
#[derive(Debug, Error, Diagnostic)]
pub enum ReasonError {
    #[error("reasoning service is not available at {url}")]
    #[diagnostic(
        code(dossier::reason::unavailable),
        help("Start the service (e.g. `ollama serve`) or point --base-url at a running instance.")
    )]
    Unavailable { url: String },

    #[error("reasoning request failed: {message}")]
    #[diagnostic(
        code(dossier::reason::request_failed),
        help("Check that the service is running and the configured model is pulled.")
    )]
    RequestFailed { message: String },

    #[error("malformed reasoning response: {message}")]
    #[diagnostic(
        code(dossier::reason::malformed_response),
        help(
            "The model returned output that could not be parsed. This is \
             recoverable — the operation is treated as producing no new \
             information. A larger model usually helps."
        )
    )]
    MalformedResponse { message: String },
}

/// Result type for reasoning operations.
pub type ReasonResult<T> = std::result::Result<T, ReasonError>;

/// External text-in/text-out reasoning capability.
pub trait TextReasoner {
    /// Generate a completion for `prompt`, with an optional system prompt.
    fn complete(&self, system: Option<&str>, prompt: &str) -> ReasonResult<String>;

    /// Describe an image: OCR-style extraction with `instruction` applied to
    /// the raw image bytes.
    fn describe_image(&self, image: &[u8], instruction: &str) -> ReasonResult<String>;
}

/// Strip Markdown code fences from a response, if present.
///
/// Handles ```` ```json ... ``` ```` and bare ```` ``` ... ``` ```` wrappers;
/// anything else passes through untouched.
pub fn strip_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(body) = rest.strip_suffix("```") else {
        return trimmed;
    };
    // Drop the optional language tag on the opening fence line.
    match body.split_once('\n') {
        Some((first, tail)) if !first.trim().is_empty() && !first.contains(' ') => tail.trim(),
        _ => body.trim(),
    }
}

/// Extract the outermost JSON object from free text.
///
/// Models often surround the object with prose; everything outside the first
/// `{` and the last `}` is discarded.
pub fn extract_json_object(text: &str) -> ReasonResult<&str> {
    let start = text.find('{');
    let end = text.rfind('}');
    match (start, end) {
        (Some(s), Some(e)) if e > s => Ok(&text[s..=e]),
        _ => Err(ReasonError::MalformedResponse {
            message: "no JSON object found in response".into(),
        }),
    }
}

/// Parse a field mapping from a raw reasoning response.
///
/// Tolerates fences, surrounding prose, and the model emitting the sentinel
/// as a bare `N/A` token instead of a quoted string.
pub fn parse_field_mapping(response: &str) -> ReasonResult<FieldMapping> {
    let body = strip_fences(response);
    let object = extract_json_object(body)?;

    // Quote bare N/A values so the object parses as JSON.
    let re = regex::Regex::new(r#":\s*N/A"#).expect("static regex");
    let fixed = re.replace_all(object, r#": "N/A""#);

    serde_json::from_str(&fixed).map_err(|e| ReasonError::MalformedResponse {
        message: format!("JSON parse error: {e}"),
    })
}

/// Extract a labeled field mapping from raw document text.
pub fn extract_fields(reasoner: &dyn TextReasoner, text: &str) -> ReasonResult<FieldMapping> {
    let system = prompts::field_extraction_system();
    let user = prompts::field_extraction_user(text);
    let response = reasoner.complete(Some(&system), &user)?;
    parse_field_mapping(&response)
}

/// Extract an ordered list of form labels from raw document text.
///
/// The response is one label per line; empty and very short lines are noise
/// and are dropped. Duplicates and composite "Parent - Child" labels are
/// preserved as-is.
pub fn extract_labels(reasoner: &dyn TextReasoner, text: &str) -> ReasonResult<Vec<String>> {
    let system = prompts::label_extraction_system(text);
    let user = prompts::label_extraction_user();
    let response = reasoner.complete(Some(&system), &user)?;

    let labels: Vec<String> = strip_fences(&response)
        .lines()
        .map(str::trim)
        .filter(|line| line.len() > 2)
        .map(str::to_string)
        .collect();

    if labels.is_empty() {
        return Err(ReasonError::MalformedResponse {
            message: "no labels found in response".into(),
        });
    }
    Ok(labels)
}
