//! DOCX text extraction.
//!
//! A `.docx` file is a zip container; the body text lives in
//! `word/document.xml`. Paragraph closers become newlines, remaining markup
//! is stripped, and the common XML entities are decoded. This deliberately
//! ignores styling, tables-as-structure, and embedded objects — only the raw
//! text matters downstream.

use std::io::{Cursor, Read};

use super::{ExtractError, ExtractResult};

/// Extract the body text from DOCX bytes.
pub fn extract(data: &[u8]) -> ExtractResult<String> {
    let mut archive =
        zip::ZipArchive::new(Cursor::new(data)).map_err(|e| ExtractError::Parse {
            format: "docx".into(),
            message: format!("not a zip container: {e}"),
        })?;

    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(|e| ExtractError::Parse {
            format: "docx".into(),
            message: format!("missing word/document.xml: {e}"),
        })?
        .read_to_string(&mut xml)
        .map_err(|e| ExtractError::Parse {
            format: "docx".into(),
            message: format!("document.xml is not UTF-8: {e}"),
        })?;

    Ok(strip_document_xml(&xml))
}

/// Reduce WordprocessingML to plain text.
fn strip_document_xml(xml: &str) -> String {
    // Paragraph and line-break boundaries first, then drop all tags.
    let with_breaks = xml
        .replace("</w:p>", "\n")
        .replace("<w:br/>", "\n")
        .replace("<w:tab/>", "\t");

    let tag = regex::Regex::new(r"<[^>]+>").expect("static regex");
    let text = tag.replace_all(&with_breaks, "");

    let decoded = text
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'");

    // Collapse runs of blank lines.
    decoded
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
