//! PDF text extraction using the `pdf-extract` crate.

use super::{ExtractError, ExtractResult};

/// Extract all text from PDF bytes.
pub fn extract(data: &[u8]) -> ExtractResult<String> {
    let text = pdf_extract::extract_text_from_mem(data).map_err(|e| ExtractError::Parse {
        format: "pdf".into(),
        message: e.to_string(),
    })?;
    Ok(text.trim().to_string())
}
