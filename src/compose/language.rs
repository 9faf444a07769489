//! Extension to fenced-block language tag lookup.

use once_cell::sync::Lazy;
use std::collections::BTreeMap;
use std::path::Path;

/// Tag used when no extension matches.
pub const FALLBACK_LANGUAGE: &str = "text";

static BUILTIN_LANGUAGES: Lazy<BTreeMap<&'static str, &'static str>> = Lazy::new(|| {
    BTreeMap::from([
        (".py", "python"),
        (".js", "javascript"),
        (".java", "java"),
        (".cpp", "cpp"),
        (".c", "c"),
    ])
});

/// Built-in extension table plus user overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LanguageTable {
    overrides: BTreeMap<String, String>,
}

impl LanguageTable {
    /// Extend or override the built-in table. Keys may be given with or
    /// without the leading dot and in any case.
    pub fn with_overrides<I, K, V>(overrides: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let overrides = overrides
            .into_iter()
            .filter_map(|(ext, lang)| {
                normalize_extension(ext.as_ref()).map(|ext| (ext, lang.into()))
            })
            .collect();
        Self { overrides }
    }

    /// Language tag for a relative path, by its lowercased extension.
    pub fn language_for(&self, path: &str) -> &str {
        let Some(ext) = Path::new(path).extension().and_then(|e| e.to_str()) else {
            return FALLBACK_LANGUAGE;
        };
        let ext = format!(".{}", ext.to_lowercase());
        if let Some(lang) = self.overrides.get(&ext) {
            return lang;
        }
        BUILTIN_LANGUAGES.get(ext.as_str()).copied().unwrap_or(FALLBACK_LANGUAGE)
    }
}

fn normalize_extension(ext: &str) -> Option<String> {
    let ext = ext.trim().trim_start_matches('.').to_lowercase();
    if ext.is_empty() {
        None
    } else {
        Some(format!(".{}", ext))
    }
}
