//! Internationalization (i18n) module for the bilingual site.
//!
//! # Architecture
//!
//! - `registry`: Single source of truth for the site's languages and their metadata
//! - `language`: Validated `Language` type and browser-language detection
//! - `bundle`: Locale bundles and the lookup store with default-string fallback
//! - `loader`: Capability for fetching the locale resource (HTTP, file, memory)
//! - `validator`: Parity checks between translated bundles
//!
//! # Example
//!
//! ```rust,ignore
//! use franxvan_site::i18n::{detect_default, FileLoader, LocaleStore};
//!
//! let store = LocaleStore::load(&FileLoader::new("data/translations.json")).await?;
//! let language = detect_default("en-US");
//! let title = store.text(language.code(), "header", "title", "FranxVan");
//! ```

mod bundle;
mod language;
mod loader;
mod registry;
mod validator;

pub use bundle::{LocaleBundle, LocaleStore, BUNDLE_SECTIONS};
pub use language::{detect_default, detect_supported, Language};
pub use loader::{loader_for, FileLoader, HttpLoader, LoadError, ResourceLoader, StaticLoader};
pub use registry::{LanguageConfig, LanguageRegistry};
pub use validator::{BundleValidator, ValidationReport};
