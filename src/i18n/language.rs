//! Language type and browser-language detection.

use crate::i18n::{LanguageConfig, LanguageRegistry};
use anyhow::{bail, Result};
use std::fmt;

/// A validated site language.
///
/// Only enabled registry languages can be constructed, so a `Language` is
/// always safe to look up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Language {
    /// ISO 639-1 language code (e.g., "nl", "en")
    code: &'static str,
}

impl Language {
    pub const DUTCH: Language = Language { code: "nl" };
    pub const ENGLISH: Language = Language { code: "en" };

    /// Create a Language from a language code string.
    ///
    /// # Returns
    /// * `Ok(Language)` if the code is valid and the language is enabled
    /// * `Err` if the code is not found or the language is disabled
    pub fn from_code(code: &str) -> Result<Language> {
        let registry = LanguageRegistry::get();

        match registry.get_by_code(code) {
            Some(config) if config.enabled => Ok(Language { code: config.code }),
            Some(_) => bail!("Language '{}' is not enabled", code),
            None => bail!("Unknown language code: '{}'", code),
        }
    }

    /// The site's default language (Dutch).
    pub fn default_language() -> Language {
        Language {
            code: LanguageRegistry::get().default_language().code,
        }
    }

    /// Get the ISO 639-1 language code.
    pub fn code(&self) -> &'static str {
        self.code
    }

    /// Get the full language configuration from the registry.
    ///
    /// # Panics
    /// Panics if the code is missing from the registry, which cannot happen
    /// for a Language built via `from_code` or the constants.
    pub fn config(&self) -> &'static LanguageConfig {
        LanguageRegistry::get()
            .get_by_code(self.code)
            .expect("Language code should always be valid")
    }

    /// English name of the language (e.g., "Dutch").
    pub fn name(&self) -> &'static str {
        self.config().name
    }

    pub fn native_name(&self) -> &'static str {
        self.config().native_name
    }

    /// Canonical URL path segment for this language.
    pub fn url_path(&self) -> &'static str {
        self.config().url_path
    }

    pub fn is_default(&self) -> bool {
        self.config().is_default
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code)
    }
}

/// Pick the site language for a browser language tag.
///
/// Tags starting with "en" give English; everything else gives Dutch.
pub fn detect_default(browser_language_tag: &str) -> Language {
    if browser_language_tag.starts_with("en") {
        Language::ENGLISH
    } else {
        Language::DUTCH
    }
}

/// Pick a code from `supported` for a browser language tag.
///
/// Uses the longest supported code that prefixes the tag, comparing case
/// insensitively; falls back to `primary` when nothing matches.
pub fn detect_supported<'a>(browser_language_tag: &str, supported: &[&'a str], primary: &'a str) -> &'a str {
    let tag = browser_language_tag.to_ascii_lowercase();

    supported
        .iter()
        .filter(|code| !code.is_empty() && tag.starts_with(&code.to_ascii_lowercase()))
        .max_by_key(|code| code.len())
        .copied()
        .unwrap_or(primary)
}
