use anyhow::{Context, Result};
use std::path::PathBuf;
use std::time::Duration;

use crate::seo::DEFAULT_SITE_URL;

#[derive(Debug, Clone)]
pub struct Config {
    // Locale bundles: a file path or an http(s) URL
    pub locale_source: String,

    // Remembered language choice
    pub preference_file: PathBuf,

    // Page environment
    pub browser_language: String,
    pub transition: Duration,
    pub site_url: String,

    // Optional language to switch to after start-up
    pub switch_to: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any variable source; `from_env` reads the process
    /// environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let transition_ms: u64 = match lookup("FRANXVAN_TRANSITION_MS") {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("FRANXVAN_TRANSITION_MS is not a number: {}", raw))?,
            None => 150,
        };

        Ok(Self {
            locale_source: lookup("FRANXVAN_LOCALE_SOURCE")
                .unwrap_or_else(|| "data/translations.json".to_string()),

            preference_file: lookup("FRANXVAN_PREFERENCE_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(".franxvan/preferences.json")),

            browser_language: lookup("FRANXVAN_BROWSER_LANGUAGE")
                .unwrap_or_else(|| "nl-NL".to_string()),
            transition: Duration::from_millis(transition_ms),
            site_url: lookup("FRANXVAN_SITE_URL").unwrap_or_else(|| DEFAULT_SITE_URL.to_string()),

            switch_to: lookup("FRANXVAN_SWITCH_TO").filter(|code| !code.trim().is_empty()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();

        assert_eq!(config.locale_source, "data/translations.json");
        assert_eq!(config.preference_file, PathBuf::from(".franxvan/preferences.json"));
        assert_eq!(config.browser_language, "nl-NL");
        assert_eq!(config.transition, Duration::from_millis(150));
        assert_eq!(config.site_url, "https://www.franxvan.nl/");
        assert_eq!(config.switch_to, None);
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("FRANXVAN_LOCALE_SOURCE", "https://cdn.example.com/translations.json"),
            ("FRANXVAN_PREFERENCE_FILE", "/tmp/prefs.json"),
            ("FRANXVAN_BROWSER_LANGUAGE", "en-GB"),
            ("FRANXVAN_TRANSITION_MS", "0"),
            ("FRANXVAN_SWITCH_TO", "en"),
        ])
        .unwrap();

        assert_eq!(config.locale_source, "https://cdn.example.com/translations.json");
        assert_eq!(config.preference_file, PathBuf::from("/tmp/prefs.json"));
        assert_eq!(config.browser_language, "en-GB");
        assert_eq!(config.transition, Duration::ZERO);
        assert_eq!(config.switch_to.as_deref(), Some("en"));
    }

    #[test]
    fn test_blank_switch_target_ignored() {
        let config = config_from(&[("FRANXVAN_SWITCH_TO", "  ")]).unwrap();
        assert_eq!(config.switch_to, None);
    }

    #[test]
    fn test_invalid_transition_rejected() {
        let err = config_from(&[("FRANXVAN_TRANSITION_MS", "fast")]).unwrap_err();
        assert!(err.to_string().contains("FRANXVAN_TRANSITION_MS"));
    }
}
