//! Reader for existing `SISSO.in` files.
//!
//! Only the `key=value` structure is recovered; values are kept as their
//! literal text.

use std::path::Path;

use crate::core::error::{Result, SissoError};

/// Keyword/value pairs of a `SISSO.in` text, in file order.
///
/// Blank lines and `!` comments are skipped. A `!` inside a quoted value is
/// kept.
pub fn read_keywords(text: &str) -> Result<Vec<(String, String)>> {
    let mut keywords = Vec::new();
    for (index, line) in text.lines().enumerate() {
        let line = strip_comment(line).trim();
        if line.is_empty() {
            continue;
        }
        let (key, value) = line.split_once('=').ok_or_else(|| {
            SissoError::config(format!("line {}: expected key=value, got \"{}\"", index + 1, line))
        })?;
        let key = key.trim();
        if key.is_empty() {
            return Err(SissoError::config(format!("line {}: missing keyword", index + 1)));
        }
        keywords.push((key.to_string(), value.trim().to_string()));
    }
    Ok(keywords)
}

/// Read the keywords of a `SISSO.in` file.
pub fn read_input_file<P: AsRef<Path>>(path: P) -> Result<Vec<(String, String)>> {
    let text = std::fs::read_to_string(path)?;
    read_keywords(&text)
}

fn strip_comment(line: &str) -> &str {
    let mut quote = None;
    for (i, c) in line.char_indices() {
        match (c, quote) {
            ('\'' | '"', None) => quote = Some(c),
            (c, Some(open)) if c == open => quote = None,
            ('!', None) => return &line[..i],
            _ => {}
        }
    }
    line
}
