//! Guards applied to request documents before decoding.
//!
//! - Size limit
//! - Rejection of language-specific YAML tags

use sluice_core::error::StreamError;

/// Maximum accepted document size (1 MB).
pub const MAX_DOCUMENT_SIZE: usize = 1_000_000;

/// YAML tags that ask a loader to construct host-language objects.
const DANGEROUS_TAGS: &[&str] = &[
    "!!python",
    "!!js",
    "!!ruby",
    "!!exec",
    "!!subprocess",
    "!!eval",
    "!!code",
];

/// Check a request document before it reaches the decoder.
///
/// This is pattern matching, not a parser-level restriction. Tags are only
/// matched where YAML allows a tag, so the same text inside a quoted value
/// or a comment passes. The decoder still rejects unknown tags on its own.
///
/// # Examples
///
/// ```
/// # use sluice_manager::api::yaml_security::validate_document;
/// assert!(validate_document("input:\n  type: kafka\n").is_ok());
/// assert!(validate_document("input: !!python/object/apply:os.system ['ls']").is_err());
/// ```
pub fn validate_document(text: &str) -> Result<(), StreamError> {
    if text.len() > MAX_DOCUMENT_SIZE {
        return Err(StreamError::bad_request(format!(
            "document too large: {} bytes (max: {} bytes)",
            text.len(),
            MAX_DOCUMENT_SIZE
        )));
    }

    if let Some(tag) = find_dangerous_tag(text) {
        return Err(StreamError::bad_request(format!(
            "YAML tag {} is not allowed",
            tag
        )));
    }

    Ok(())
}

/// Find a dangerous tag in tag position.
///
/// Quoted scalars and comments are skipped. Quotes are tracked per line.
fn find_dangerous_tag(text: &str) -> Option<&'static str> {
    for line in text.lines() {
        let mut quote: Option<char> = None;
        let mut escaped = false;
        let mut prev = ' ';

        for (i, c) in line.char_indices() {
            match quote {
                Some(_) if escaped => escaped = false,
                Some('"') if c == '\\' => escaped = true,
                Some(q) if c == q => quote = None,
                Some(_) => {}
                None if !is_boundary(prev) => {}
                None => match c {
                    '"' | '\'' => quote = Some(c),
                    '#' => break,
                    '!' => {
                        let rest = &line[i..];
                        if let Some(tag) = DANGEROUS_TAGS.iter().find(|t| rest.starts_with(**t)) {
                            return Some(*tag);
                        }
                    }
                    _ => {}
                },
            }
            prev = c;
        }
    }
    None
}

fn is_boundary(c: char) -> bool {
    c.is_whitespace() || matches!(c, ':' | '[' | '{' | ',' | '-' | '?')
}
