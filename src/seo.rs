//! SEO tag writer: keeps title, meta tags and the canonical link in the
//! active language.

use crate::controller::LanguageObserver;
use crate::document::{DocumentMutator, MetaAttribute};
use crate::i18n::{Language, LocaleStore};
use anyhow::Result;
use std::sync::Arc;
use tracing::debug;

/// Base URL of the Dutch (default) site.
pub const DEFAULT_SITE_URL: &str = "https://www.franxvan.nl/";

pub struct SeoTagWriter {
    locales: Arc<LocaleStore>,
    document: Arc<dyn DocumentMutator>,
    site_url: String,
}

impl SeoTagWriter {
    pub fn new(locales: Arc<LocaleStore>, document: Arc<dyn DocumentMutator>, site_url: impl Into<String>) -> Self {
        let mut site_url = site_url.into();
        if !site_url.ends_with('/') {
            site_url.push('/');
        }
        Self {
            locales,
            document,
            site_url,
        }
    }

    /// Rewrite the page metadata for `language`.
    ///
    /// Returns `false` (and changes nothing) when the bundle has no `seo`
    /// section. Individual missing keys leave their tag as it was.
    pub fn update(&self, language: &str) -> bool {
        let Some(bundle) = self.locales.bundle(language) else {
            return false;
        };
        if bundle.section("seo").is_none() {
            debug!("No SEO section for '{}'", language);
            return false;
        }
        let seo = |key: &str| bundle.lookup("seo", key);

        if let Some(title) = seo("title") {
            self.document.set_title(title);
        }

        let tags = [
            (MetaAttribute::Name, "description", "description"),
            (MetaAttribute::Name, "keywords", "keywords"),
            (MetaAttribute::Property, "og:title", "ogTitle"),
            (MetaAttribute::Property, "og:description", "ogDescription"),
            (MetaAttribute::Name, "twitter:title", "ogTitle"),
            (MetaAttribute::Name, "twitter:description", "ogDescription"),
        ];
        for (attribute, name, key) in tags {
            if let Some(content) = seo(key) {
                self.document.upsert_meta(attribute, name, content);
            }
        }

        self.document.set_lang(language);
        self.document.set_canonical(&self.canonical_url(language));
        true
    }

    /// Site URL plus the language's path segment.
    pub fn canonical_url(&self, language: &str) -> String {
        let path = Language::from_code(language)
            .map(|language| language.url_path())
            .unwrap_or("");
        format!("{}{}", self.site_url, path)
    }
}

impl LanguageObserver for SeoTagWriter {
    fn name(&self) -> &str {
        "seo tags"
    }

    fn on_language_change(&self, language: &str) -> Result<()> {
        self.update(language);
        Ok(())
    }
}
