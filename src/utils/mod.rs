//! Shared helpers for path normalization and text decoding.

pub mod encoding;
pub mod paths;

pub use encoding::{decode_text, normalize_newlines};
pub use paths::normalize_path;
