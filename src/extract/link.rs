//! Remote document links.
//!
//! Google Docs share links are rewritten to the plain-text export endpoint;
//! other http(s) links are fetched as-is. Synchronous `ureq` with a timeout
//! and a response-size cap.

use regex::Regex;

use super::{ExtractError, ExtractResult};

/// Maximum response body size (1 MB). Documents beyond this are truncated.
const MAX_RESPONSE_SIZE: usize = 1024 * 1024;

/// Fetch timeout in seconds.
const FETCH_TIMEOUT_SECS: u64 = 30;

/// Fetch the text content of a remote document link.
pub fn fetch_text(url: &str) -> ExtractResult<String> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ExtractError::InvalidLink { url: url.into() });
    }

    let target = rewrite_google_docs(url).unwrap_or_else(|| url.to_string());

    let agent = ureq::AgentBuilder::new()
        .timeout(std::time::Duration::from_secs(FETCH_TIMEOUT_SECS))
        .build();

    let response = agent.get(&target).call().map_err(|e| ExtractError::Fetch {
        url: url.into(),
        message: e.to_string(),
    })?;

    let mut body = response.into_string().map_err(|e| ExtractError::Fetch {
        url: url.into(),
        message: format!("failed to read body: {e}"),
    })?;

    truncate_at_char_boundary(&mut body, MAX_RESPONSE_SIZE);

    if body.trim().is_empty() {
        return Err(ExtractError::Empty { origin: url.into() });
    }
    Ok(body)
}

/// Truncate `text` to at most `max` bytes without splitting a UTF-8
/// character. `String::truncate` panics on a non-boundary index, so the cut
/// point walks back to the nearest boundary.
fn truncate_at_char_boundary(text: &mut String, max: usize) {
    if text.len() <= max {
        return;
    }
    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    text.truncate(end);
}

/// Rewrite a Google Docs share URL to its plain-text export endpoint.
///
/// Returns `None` when the URL is not a Google Docs document link.
fn rewrite_google_docs(url: &str) -> Option<String> {
    if !url.contains("docs.google.com/document") {
        return None;
    }
    let id_re = Regex::new(r"/d/([a-zA-Z0-9_-]+)").expect("static regex");
    let doc_id = id_re.captures(url)?.get(1)?.as_str().to_string();
    Some(format!(
        "https://docs.google.com/document/d/{doc_id}/export?format=txt"
    ))
}
