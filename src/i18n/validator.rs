//! Bundle parity validation.
//!
//! Compares each translated bundle against the default-language bundle so a
//! partial translation shows up in the logs instead of as silently stale
//! text on the page.

use crate::i18n::bundle::{LocaleBundle, LocaleStore, BUNDLE_SECTIONS};
use regex::Regex;
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use std::sync::OnceLock;

/// Validation report containing errors and warnings about a bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    /// Problems that leave whole page areas untranslated
    pub errors: Vec<String>,

    /// Missing keys and placeholder mismatches
    pub warnings: Vec<String>,
}

impl ValidationReport {
    /// Create a new empty validation report
    pub fn new() -> Self {
        Self {
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Check if the report has any errors
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Check if the report has any warnings
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Check if the report is clean (no errors or warnings)
    pub fn is_clean(&self) -> bool {
        !self.has_errors() && !self.has_warnings()
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new()
    }
}

/// Validator for bundle completeness.
pub struct BundleValidator;

static PLACEHOLDER_REGEX: OnceLock<Regex> = OnceLock::new();

impl BundleValidator {
    /// Validate `candidate` against `reference`.
    ///
    /// - A missing expected section is an error.
    /// - A key present in the reference but absent (or of a different shape)
    ///   in the candidate is a warning.
    /// - Differing `{placeholder}` tokens in a string are a warning.
    pub fn validate(reference: &LocaleBundle, candidate: &LocaleBundle) -> ValidationReport {
        let mut report = ValidationReport::new();

        for section in BUNDLE_SECTIONS {
            if candidate.section(section).is_none() {
                report.errors.push(format!(
                    "Missing section '{}' in '{}' bundle",
                    section,
                    candidate.language_code()
                ));
            }
        }

        for section in reference.section_names() {
            let (Some(expected), Some(actual)) =
                (reference.section(section), candidate.section(section))
            else {
                continue;
            };
            Self::compare_objects(section, expected, actual, &mut report);
        }

        report
    }

    /// Validate every bundle in `store` against the `reference_code` bundle.
    ///
    /// Returns one report per non-reference language; an empty vector when
    /// the reference language is not loaded.
    pub fn validate_store(store: &LocaleStore, reference_code: &str) -> Vec<(String, ValidationReport)> {
        let Some(reference) = store.bundle(reference_code) else {
            return Vec::new();
        };

        store
            .language_codes()
            .into_iter()
            .filter(|code| *code != reference_code)
            .filter_map(|code| store.bundle(code))
            .map(|bundle| {
                (
                    bundle.language_code().to_string(),
                    Self::validate(reference, bundle),
                )
            })
            .collect()
    }

    fn compare_objects(
        path: &str,
        expected: &Map<String, Value>,
        actual: &Map<String, Value>,
        report: &mut ValidationReport,
    ) {
        for (key, expected_value) in expected {
            let key_path = format!("{}.{}", path, key);
            match (expected_value, actual.get(key)) {
                (Value::String(expected_text), Some(Value::String(actual_text))) => {
                    let expected_tokens = Self::extract_placeholders(expected_text);
                    let actual_tokens = Self::extract_placeholders(actual_text);
                    if expected_tokens != actual_tokens {
                        report.warnings.push(format!(
                            "Placeholder mismatch at {}: expected {:?}, found {:?}",
                            key_path, expected_tokens, actual_tokens
                        ));
                    }
                }
                (Value::Object(expected_nested), Some(Value::Object(actual_nested))) => {
                    Self::compare_objects(&key_path, expected_nested, actual_nested, report);
                }
                (_, None) => report.warnings.push(format!("Missing key {}", key_path)),
                _ => report.warnings.push(format!("Shape mismatch at {}", key_path)),
            }
        }
    }

    /// Extract the set of `{name}` placeholders in a string
    fn extract_placeholders(text: &str) -> BTreeSet<String> {
        let regex = PLACEHOLDER_REGEX.get_or_init(|| Regex::new(r"\{([a-zA-Z0-9_]+)\}").unwrap());

        regex
            .captures_iter(text)
            .filter_map(|cap| cap.get(0).map(|m| m.as_str().to_string()))
            .collect()
    }
}
