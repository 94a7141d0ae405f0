//! Language switch controller.
//!
//! The controller is the only writer of the active language. A switch moves
//! the machine from `Idle` to `Switching`, rebinds the page, notifies every
//! registered observer, persists the choice and returns to `Idle`. While a
//! switch is in flight further requests are dropped, not queued.

use crate::binder::PresentationBinder;
use crate::document::{DocumentMutator, Element};
use crate::i18n::{detect_default, Language, LanguageRegistry, LocaleStore};
use crate::storage::{KeyValueStore, LANGUAGE_PREFERENCE_KEY};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, info, warn};

/// A collaborator that reacts to language changes (SEO tags, structured
/// data, the price calculator).
///
/// Failures are reported to the controller, which logs them and carries on
/// with the remaining observers.
pub trait LanguageObserver: Send + Sync {
    /// Short name for log lines.
    fn name(&self) -> &str;

    fn on_language_change(&self, language: &str) -> anyhow::Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchState {
    Idle,
    Switching,
}

/// Result of a switch request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchOutcome {
    Switched,
    /// The requested language was already active; nothing happened
    AlreadyActive,
    /// Unknown code or no loaded bundle; nothing happened
    UnsupportedLanguage,
    /// Another switch was in flight; the request was dropped
    Busy,
}

/// Read-only view of the process-wide language state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveLocale {
    pub current: Language,
    pub is_switching: bool,
}

/// Delays of the fade animation around an animated switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionTiming {
    /// Wait after fading out, before rebinding
    pub fade_out: Duration,
    /// Wait after rebinding, before fading in
    pub settle: Duration,
    /// How long the fade-in class stays on the body
    pub fade_in: Duration,
}

impl TransitionTiming {
    pub fn new(fade_out: Duration) -> Self {
        Self {
            fade_out,
            settle: Duration::from_millis(50),
            fade_in: Duration::from_millis(300),
        }
    }

    /// No waiting at all.
    pub fn instant() -> Self {
        Self {
            fade_out: Duration::ZERO,
            settle: Duration::ZERO,
            fade_in: Duration::ZERO,
        }
    }
}

impl Default for TransitionTiming {
    fn default() -> Self {
        Self::new(Duration::from_millis(150))
    }
}

pub struct LanguageSwitchController {
    locales: Arc<LocaleStore>,
    binder: PresentationBinder,
    document: Arc<dyn DocumentMutator>,
    preferences: Arc<dyn KeyValueStore>,
    observers: Vec<Arc<dyn LanguageObserver>>,
    current: RwLock<Language>,
    switching: AtomicBool,
    timing: TransitionTiming,
    // Pending removal of the body's fade-in class
    fade_in_cleanup: Mutex<Option<JoinHandle<()>>>,
}

/// Clears the switching flag when the switch ends, however it ends.
struct SwitchGuard<'a>(&'a AtomicBool);

impl Drop for SwitchGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl LanguageSwitchController {
    pub fn new(
        locales: Arc<LocaleStore>,
        document: Arc<dyn DocumentMutator>,
        preferences: Arc<dyn KeyValueStore>,
    ) -> Self {
        Self {
            locales,
            binder: PresentationBinder::new(document.clone()),
            document,
            preferences,
            observers: Vec::new(),
            current: RwLock::new(Language::default_language()),
            switching: AtomicBool::new(false),
            timing: TransitionTiming::default(),
            fade_in_cleanup: Mutex::new(None),
        }
    }

    pub fn with_timing(mut self, timing: TransitionTiming) -> Self {
        self.timing = timing;
        self
    }

    /// Add an observer; observers are notified in registration order.
    pub fn register(&mut self, observer: Arc<dyn LanguageObserver>) {
        debug!("Registered language observer: {}", observer.name());
        self.observers.push(observer);
    }

    pub fn current_language(&self) -> Language {
        *self
            .current
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn state(&self) -> SwitchState {
        if self.switching.load(Ordering::Acquire) {
            SwitchState::Switching
        } else {
            SwitchState::Idle
        }
    }

    pub fn active_locale(&self) -> ActiveLocale {
        ActiveLocale {
            current: self.current_language(),
            is_switching: self.state() == SwitchState::Switching,
        }
    }

    /// Language to start in: the remembered preference when it names a
    /// supported language, otherwise the browser-language rule.
    pub fn initial_language(&self, browser_language_tag: &str) -> Language {
        match self.preferences.get(LANGUAGE_PREFERENCE_KEY) {
            Ok(Some(saved)) => match Language::from_code(&saved) {
                Ok(language) => return language,
                Err(e) => warn!("Ignoring saved language preference: {}", e),
            },
            Ok(None) => {}
            Err(e) => warn!("Could not read language preference: {}", e),
        }
        detect_default(browser_language_tag)
    }

    /// Pick the starting language and render the page in it once, without
    /// animation.
    pub async fn initialize(&self, browser_language_tag: &str) -> Language {
        let language = self.initial_language(browser_language_tag);
        *self
            .current
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = language;
        self.update_toggle_buttons(language);

        if !self.locales.has_language(language.code()) {
            warn!(
                "No bundle for '{}'; page keeps its default strings",
                language.code()
            );
            return language;
        }

        if self
            .switching
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
        {
            let _guard = SwitchGuard(&self.switching);
            self.run_switch(language, false).await;
        }

        info!("Language system initialized in '{}'", language.code());
        language
    }

    /// Request a switch to `code`.
    pub async fn switch_language(&self, code: &str, animate: bool) -> SwitchOutcome {
        let Some(language) = self.supported(code) else {
            debug!("Ignoring switch to unsupported language '{}'", code);
            return SwitchOutcome::UnsupportedLanguage;
        };

        if self
            .switching
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("Dropping switch to '{}': another switch is in flight", code);
            return SwitchOutcome::Busy;
        }
        let _guard = SwitchGuard(&self.switching);

        if language == self.current_language() {
            return SwitchOutcome::AlreadyActive;
        }

        self.run_switch(language, animate).await;
        info!("Switched language to '{}'", language.code());
        SwitchOutcome::Switched
    }

    fn supported(&self, code: &str) -> Option<Language> {
        let language = Language::from_code(code).ok()?;
        self.locales.has_language(code).then_some(language)
    }

    async fn run_switch(&self, language: Language, animate: bool) {
        let code = language.code();
        self.document.set_class(&Element::LanguageToggle, "loading", true);

        if animate {
            self.cancel_fade_in_cleanup();
            self.document.set_class(&Element::Body, "fade-transition", true);
            sleep(self.timing.fade_out).await;
        }

        *self
            .current
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = language;

        if let Some(bundle) = self.locales.bundle(code) {
            self.binder.apply(code, bundle);
        }
        self.update_toggle_buttons(language);
        self.document.set_lang(code);

        self.notify_observers(code);

        if let Err(e) = self.preferences.set(LANGUAGE_PREFERENCE_KEY, code) {
            warn!("Language preference not saved: {}", e);
        }

        if animate {
            sleep(self.timing.settle).await;
            self.document.set_class(&Element::Body, "fade-transition", false);
            self.document.set_class(&Element::Body, "fade-in", true);

            let document = self.document.clone();
            let fade_in = self.timing.fade_in;
            let cleanup = tokio::spawn(async move {
                sleep(fade_in).await;
                document.set_class(&Element::Body, "fade-in", false);
            });
            *self
                .fade_in_cleanup
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(cleanup);
        }

        self.document.set_class(&Element::LanguageToggle, "loading", false);
    }

    fn cancel_fade_in_cleanup(&self) {
        let pending = self
            .fade_in_cleanup
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take();
        if let Some(cleanup) = pending {
            cleanup.abort();
        }
    }

    fn notify_observers(&self, code: &str) {
        for observer in &self.observers {
            if let Err(e) = observer.on_language_change(code) {
                warn!(
                    "Observer '{}' failed to handle switch to '{}': {:#}",
                    observer.name(),
                    code,
                    e
                );
            }
        }
    }

    fn update_toggle_buttons(&self, language: Language) {
        for config in LanguageRegistry::get().list_enabled() {
            self.document.set_class(
                &Element::LanguageButton(config.code.to_string()),
                "active",
                config.code == language.code(),
            );
        }
    }
}
