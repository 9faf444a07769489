//! Text decoding for composed file content.
//!
//! Strategy:
//! - BOM markers first (UTF-8 BOM is stripped, UTF-16 LE/BE are decoded)
//! - strict UTF-8 otherwise, so undecodable content surfaces as an error
//!   instead of being silently patched with replacement characters
//! - line endings are normalized to `\n`

use encoding_rs::{Encoding, UTF_8};

use crate::error::FileReadError;

/// Decode raw file bytes into text with `\n` line endings.
pub fn decode_text(bytes: &[u8]) -> Result<String, FileReadError> {
    if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
        let (decoded, had_errors) =
            encoding.decode_without_bom_handling(&bytes[bom_len..]);
        if had_errors {
            return Err(FileReadError::Decode { encoding: encoding.name() });
        }
        return Ok(normalize_newlines(&decoded));
    }

    match std::str::from_utf8(bytes) {
        Ok(text) => Ok(normalize_newlines(text)),
        Err(_) => Err(FileReadError::Decode { encoding: UTF_8.name() }),
    }
}

/// Convert `\r\n` and lone `\r` to `\n`.
pub fn normalize_newlines(text: &str) -> String {
    if !text.contains('\r') {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\r' {
            if chars.peek() == Some(&'\n') {
                chars.next();
            }
            out.push('\n');
        } else {
            out.push(c);
        }
    }
    out
}
