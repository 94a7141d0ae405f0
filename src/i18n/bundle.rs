//! Locale bundles and the store that holds them.
//!
//! The locale resource is one JSON document shaped as
//! `{ "<language>": { "<section>": { "<key>": "text" | { ... } } } }`.
//! Lookups never fail loudly: a missing language, section or key gives
//! `None`, and every caller supplies its own default text.

use crate::i18n::loader::{LoadError, ResourceLoader};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// Sections every bundle is expected to carry.
pub const BUNDLE_SECTIONS: [&str; 9] = [
    "nav",
    "header",
    "intro",
    "services",
    "contact",
    "form",
    "footer",
    "seo",
    "priceCalculator",
];

/// All display strings for one language.
#[derive(Debug, Clone, PartialEq)]
pub struct LocaleBundle {
    language_code: String,
    sections: Map<String, Value>,
}

impl LocaleBundle {
    /// Build a bundle from a parsed JSON object of sections.
    ///
    /// Sections that are not objects are dropped with a warning.
    pub fn from_sections(language_code: impl Into<String>, sections: Map<String, Value>) -> Self {
        let language_code = language_code.into();
        let sections = sections
            .into_iter()
            .filter(|(name, value)| {
                let keep = value.is_object();
                if !keep {
                    warn!(
                        "Ignoring non-object section '{}' in '{}' bundle",
                        name, language_code
                    );
                }
                keep
            })
            .collect();

        Self {
            language_code,
            sections,
        }
    }

    pub fn language_code(&self) -> &str {
        &self.language_code
    }

    /// Section names in resource order.
    pub fn section_names(&self) -> impl Iterator<Item = &str> {
        self.sections.keys().map(String::as_str)
    }

    /// Resolve a dotted section path such as `priceCalculator.errors`.
    pub fn section(&self, section_path: &str) -> Option<&Map<String, Value>> {
        let mut parts = section_path.split('.');
        let mut current = self.sections.get(parts.next()?)?.as_object()?;
        for part in parts {
            current = current.get(part)?.as_object()?;
        }
        Some(current)
    }

    /// String value of `key` under `section_path`.
    pub fn lookup(&self, section_path: &str, key: &str) -> Option<&str> {
        self.section(section_path)?.get(key)?.as_str()
    }
}

/// Every loaded bundle, keyed by language code.
///
/// An empty store is a valid degraded mode: lookups return `None` and the
/// page keeps rendering its default strings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocaleStore {
    bundles: BTreeMap<String, LocaleBundle>,
}

impl LocaleStore {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_bundles(bundles: impl IntoIterator<Item = LocaleBundle>) -> Self {
        Self {
            bundles: bundles
                .into_iter()
                .map(|bundle| (bundle.language_code.clone(), bundle))
                .collect(),
        }
    }

    /// Parse the locale resource.
    pub fn from_json_str(json: &str) -> Result<Self, LoadError> {
        let document: Value = serde_json::from_str(json)
            .map_err(|e| LoadError::Malformed(format!("invalid JSON: {}", e)))?;

        let Value::Object(languages) = document else {
            return Err(LoadError::Malformed(
                "top level must be an object keyed by language code".to_string(),
            ));
        };

        let mut bundles = BTreeMap::new();
        for (code, sections) in languages {
            let Value::Object(sections) = sections else {
                return Err(LoadError::Malformed(format!(
                    "bundle '{}' must be an object of sections",
                    code
                )));
            };
            debug!("Parsed '{}' bundle with {} sections", code, sections.len());
            bundles.insert(code.clone(), LocaleBundle::from_sections(code, sections));
        }

        Ok(Self { bundles })
    }

    /// Fetch and parse the locale resource once. Not retried.
    pub async fn load(loader: &dyn ResourceLoader) -> Result<Self, LoadError> {
        let body = loader.fetch().await?;
        let store = Self::from_json_str(&body)?;
        info!(
            "Loaded locale bundles from {}: {:?}",
            loader.describe(),
            store.language_codes()
        );
        Ok(store)
    }

    pub fn bundle(&self, language_code: &str) -> Option<&LocaleBundle> {
        self.bundles.get(language_code)
    }

    pub fn has_language(&self, language_code: &str) -> bool {
        self.bundles.contains_key(language_code)
    }

    pub fn language_codes(&self) -> Vec<&str> {
        self.bundles.keys().map(String::as_str).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.bundles.is_empty()
    }

    /// Look up a display string; `None` when the language, section or key
    /// is absent.
    pub fn get(&self, language_code: &str, section_path: &str, key: &str) -> Option<&str> {
        self.bundle(language_code)?.lookup(section_path, key)
    }

    /// Look up a display string, falling back to `default`.
    pub fn text(&self, language_code: &str, section_path: &str, key: &str, default: &str) -> String {
        self.get(language_code, section_path, key)
            .unwrap_or(default)
            .to_string()
    }
}
