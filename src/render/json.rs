//! JSON rendering for tooling

use crate::domain::OutputDocument;

pub fn render_json(doc: &OutputDocument) -> serde_json::Result<String> {
    let mut out = serde_json::to_string_pretty(doc)?;
    out.push('\n');
    Ok(out)
}
