//! Comment-stripping JSON decoder
//!
//! Configuration documents are JSON with whole-line `//` comments. Stripping
//! is line based: any line whose left-trimmed text starts with `//` is
//! dropped, even when that line sits inside a multi-line string literal.
//! Trailing comments after a value on the same line are not supported.

use serde_json::Value;

use crate::error::Result;

/// Remove every line whose left-trimmed content begins with `//`
pub fn strip_comments(text: &str) -> String {
    text.lines()
        .filter(|line| !line.trim_start().starts_with("//"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Strip comment lines and parse the remainder into a document tree
pub fn decode(text: &str) -> Result<Value> {
    let stripped = strip_comments(text);
    let value = serde_json::from_str(&stripped)?;
    tracing::trace!("decoded document: {}", value);
    Ok(value)
}
