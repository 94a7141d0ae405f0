//! Presentation surface: the page the behavior layer writes into.
//!
//! [`DocumentMutator`] is the narrow capability the binder, the controller
//! and the observers use. Production binds it to the real page; the
//! [`InMemoryDocument`] here models the page as plain data so the whole
//! layer can run headless and be asserted on.

use crate::quote_display::ResultContent;
use serde::Serialize;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::{Mutex, MutexGuard};

/// A named text slot in the page.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Slot {
    /// Generic element tagged `data-translate="<section>-<key>"`
    Translate { section: String, key: String },

    /// Navigation link tagged `data-translate="nav.<key>"`
    NavLink(String),

    /// Title or description of service card `n` (1-based)
    ServiceCard { card: usize, part: CardPart },

    /// Heading or paragraph of footer block `n` (1-based)
    FooterBlock { block: usize, part: FooterPart },

    /// Last paragraph of the footer
    Copyright,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CardPart {
    Title,
    Description,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FooterPart {
    Heading,
    Text,
}

impl Slot {
    pub fn translate(section: &str, key: &str) -> Self {
        Slot::Translate {
            section: section.to_string(),
            key: key.to_string(),
        }
    }

    pub fn nav(key: &str) -> Self {
        Slot::NavLink(key.to_string())
    }
}

/// Renders the selector the slot stands for.
impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slot::Translate { section, key } => write!(f, "[data-translate=\"{}-{}\"]", section, key),
            Slot::NavLink(key) => write!(f, ".nav-link[data-translate=\"nav.{}\"]", key),
            Slot::ServiceCard { card, part } => {
                let class = match part {
                    CardPart::Title => "card-title",
                    CardPart::Description => "card-p",
                };
                write!(f, ".card-{} .{}", card, class)
            }
            Slot::FooterBlock { block, part } => {
                let tag = match part {
                    FooterPart::Heading => "h4",
                    FooterPart::Text => "p",
                };
                write!(f, ".footer-text:nth-of-type({}) {}", block, tag)
            }
            Slot::Copyright => f.write_str("footer > p:last-child"),
        }
    }
}

/// Elements whose class list or style the layer toggles.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Element {
    Body,
    LanguageToggle,
    LanguageButton(String),
    NavToggle,
    NavMenu,
    /// Link `n` (1-based) of the navigation menu
    NavLink(usize),
    Card(usize),
    ResultArea,
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Element::Body => f.write_str("body"),
            Element::LanguageToggle => f.write_str(".language-toggle"),
            Element::LanguageButton(code) => write!(f, ".lang-btn[data-lang=\"{}\"]", code),
            Element::NavToggle => f.write_str(".nav-toggle"),
            Element::NavMenu => f.write_str(".nav-menu"),
            Element::NavLink(n) => write!(f, ".nav-link:nth-of-type({})", n),
            Element::Card(n) => write!(f, ".card-{}", n),
            Element::ResultArea => f.write_str("#price-result"),
        }
    }
}

/// Which attribute identifies a `<meta>` tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetaAttribute {
    Name,
    Property,
}

impl MetaAttribute {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetaAttribute::Name => "name",
            MetaAttribute::Property => "property",
        }
    }
}

/// One `<option>` of a dropdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// A dropdown: placeholder option (empty value) followed by real options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SelectState {
    pub placeholder: String,
    pub options: Vec<SelectOption>,
}

/// Capability to mutate the page.
///
/// Methods addressing an element the page does not have return `false` and
/// change nothing; the layer treats that as "skip", never as an error.
pub trait DocumentMutator: Send + Sync {
    fn set_text(&self, slot: &Slot, text: &str) -> bool;
    fn text(&self, slot: &Slot) -> Option<String>;

    /// The `lang` attribute of the root element.
    fn set_lang(&self, language_code: &str);
    fn set_title(&self, title: &str);

    /// Update a `<meta>` tag, creating it when absent.
    fn upsert_meta(&self, attribute: MetaAttribute, name: &str, content: &str);

    /// Point `<link rel="canonical">` at `href` if the page has one.
    fn set_canonical(&self, href: &str) -> bool;

    /// Drop every previously injected JSON-LD document and inject these.
    fn replace_structured_data(&self, documents: Vec<Value>);

    fn set_class(&self, element: &Element, class: &str, enabled: bool) -> bool;
    fn has_class(&self, element: &Element, class: &str) -> bool;
    fn set_body_overflow(&self, value: &str);

    /// Set an attribute such as `aria-expanded`.
    fn set_attribute(&self, element: &Element, name: &str, value: &str) -> bool;
    fn attribute(&self, element: &Element, name: &str) -> Option<String>;

    /// Move keyboard focus to `element`.
    fn focus(&self, element: &Element) -> bool;

    /// Replace every non-placeholder option of dropdown `id`.
    fn set_select_options(&self, id: &str, options: Vec<SelectOption>) -> bool;
    fn set_select_placeholder(&self, id: &str, text: &str) -> bool;

    /// Show content in the price result area.
    fn show_price_result(&self, content: ResultContent) -> bool;
    fn hide_price_result(&self) -> bool;
    fn price_result_visible(&self) -> bool;
}

/// Plain-data model of the page, serializable as a snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DocumentSnapshot {
    pub lang: Option<String>,
    pub title: Option<String>,
    pub texts: BTreeMap<String, String>,
    pub meta: BTreeMap<String, String>,
    pub canonical: Option<String>,
    pub structured_data: Vec<Value>,
    pub classes: BTreeMap<String, BTreeSet<String>>,
    pub attributes: BTreeMap<String, BTreeMap<String, String>>,
    pub focused: Option<String>,
    pub body_overflow: Option<String>,
    pub selects: BTreeMap<String, SelectState>,
    pub price_result: Option<ResultContent>,
}

/// In-memory page. Only declared slots, elements and dropdowns exist.
#[derive(Debug, Default)]
pub struct InMemoryDocument {
    state: Mutex<DocumentState>,
}

#[derive(Debug, Default)]
struct DocumentState {
    snapshot: DocumentSnapshot,
    slots: BTreeSet<Slot>,
    elements: BTreeSet<Element>,
    has_result_area: bool,
}

impl InMemoryDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_slot(self, slot: Slot) -> Self {
        {
            let mut state = self.lock();
            state.snapshot.texts.insert(slot.to_string(), String::new());
            state.slots.insert(slot);
        }
        self
    }

    pub fn with_element(self, element: Element) -> Self {
        {
            let mut state = self.lock();
            state.snapshot.classes.insert(element.to_string(), BTreeSet::new());
            state.elements.insert(element);
        }
        self
    }

    pub fn with_select(self, id: &str) -> Self {
        self.lock()
            .snapshot
            .selects
            .insert(id.to_string(), SelectState::default());
        self
    }

    pub fn with_canonical(self, href: &str) -> Self {
        self.lock().snapshot.canonical = Some(href.to_string());
        self
    }

    pub fn with_result_area(self) -> Self {
        self.lock().has_result_area = true;
        self.with_element(Element::ResultArea)
    }

    /// The FranxVan landing page skeleton.
    pub fn site_template() -> Self {
        let mut document = Self::new()
            .with_canonical("https://www.franxvan.nl/")
            .with_result_area()
            .with_element(Element::Body)
            .with_element(Element::LanguageToggle)
            .with_element(Element::NavToggle)
            .with_element(Element::NavMenu);

        for code in ["nl", "en"] {
            document = document.with_element(Element::LanguageButton(code.to_string()));
        }
        for (index, key) in ["home", "services", "calculator", "contact"].into_iter().enumerate() {
            document = document
                .with_slot(Slot::nav(key))
                .with_element(Element::NavLink(index + 1));
        }

        let generic: [(&str, &[&str]); 5] = [
            ("header", &["title", "subtitle", "cta"]),
            ("intro", &["title", "text"]),
            ("services", &["title", "subtitle"]),
            ("contact", &["title", "text", "phone", "email"]),
            ("form", &["title", "from", "to", "service", "calculate"]),
        ];
        for (section, keys) in generic {
            for key in keys {
                document = document.with_slot(Slot::translate(section, key));
            }
        }

        for card in 1..=3 {
            document = document
                .with_element(Element::Card(card))
                .with_slot(Slot::ServiceCard { card, part: CardPart::Title })
                .with_slot(Slot::ServiceCard { card, part: CardPart::Description });
        }
        for block in 1..=3 {
            document = document.with_slot(Slot::FooterBlock { block, part: FooterPart::Heading });
            if block > 1 {
                document = document.with_slot(Slot::FooterBlock { block, part: FooterPart::Text });
            }
        }

        document
            .with_slot(Slot::Copyright)
            .with_select(crate::quote_display::FROM_SELECT)
            .with_select(crate::quote_display::TO_SELECT)
            .with_select(crate::quote_display::SERVICE_SELECT)
    }

    pub fn snapshot(&self) -> DocumentSnapshot {
        self.lock().snapshot.clone()
    }

    pub fn meta(&self, attribute: MetaAttribute, name: &str) -> Option<String> {
        self.lock().snapshot.meta.get(&meta_key(attribute, name)).cloned()
    }

    fn lock(&self) -> MutexGuard<'_, DocumentState> {
        // A panicked writer leaves plain data behind; keep serving it
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn meta_key(attribute: MetaAttribute, name: &str) -> String {
    format!("meta[{}=\"{}\"]", attribute.as_str(), name)
}

impl DocumentMutator for InMemoryDocument {
    fn set_text(&self, slot: &Slot, text: &str) -> bool {
        let mut state = self.lock();
        if !state.slots.contains(slot) {
            return false;
        }
        state.snapshot.texts.insert(slot.to_string(), text.to_string());
        true
    }

    fn text(&self, slot: &Slot) -> Option<String> {
        let state = self.lock();
        if !state.slots.contains(slot) {
            return None;
        }
        state.snapshot.texts.get(&slot.to_string()).cloned()
    }

    fn set_lang(&self, language_code: &str) {
        self.lock().snapshot.lang = Some(language_code.to_string());
    }

    fn set_title(&self, title: &str) {
        self.lock().snapshot.title = Some(title.to_string());
    }

    fn upsert_meta(&self, attribute: MetaAttribute, name: &str, content: &str) {
        self.lock()
            .snapshot
            .meta
            .insert(meta_key(attribute, name), content.to_string());
    }

    fn set_canonical(&self, href: &str) -> bool {
        let mut state = self.lock();
        match state.snapshot.canonical.as_mut() {
            Some(canonical) => {
                *canonical = href.to_string();
                true
            }
            None => false,
        }
    }

    fn replace_structured_data(&self, documents: Vec<Value>) {
        self.lock().snapshot.structured_data = documents;
    }

    fn set_class(&self, element: &Element, class: &str, enabled: bool) -> bool {
        let mut state = self.lock();
        if !state.elements.contains(element) {
            return false;
        }
        let classes = state.snapshot.classes.entry(element.to_string()).or_default();
        if enabled {
            classes.insert(class.to_string());
        } else {
            classes.remove(class);
        }
        true
    }

    fn has_class(&self, element: &Element, class: &str) -> bool {
        self.lock()
            .snapshot
            .classes
            .get(&element.to_string())
            .is_some_and(|classes| classes.contains(class))
    }

    fn set_body_overflow(&self, value: &str) {
        self.lock().snapshot.body_overflow = Some(value.to_string());
    }

    fn set_attribute(&self, element: &Element, name: &str, value: &str) -> bool {
        let mut state = self.lock();
        if !state.elements.contains(element) {
            return false;
        }
        state
            .snapshot
            .attributes
            .entry(element.to_string())
            .or_default()
            .insert(name.to_string(), value.to_string());
        true
    }

    fn attribute(&self, element: &Element, name: &str) -> Option<String> {
        self.lock()
            .snapshot
            .attributes
            .get(&element.to_string())
            .and_then(|attributes| attributes.get(name))
            .cloned()
    }

    fn focus(&self, element: &Element) -> bool {
        let mut state = self.lock();
        if !state.elements.contains(element) {
            return false;
        }
        state.snapshot.focused = Some(element.to_string());
        true
    }

    fn set_select_options(&self, id: &str, options: Vec<SelectOption>) -> bool {
        match self.lock().snapshot.selects.get_mut(id) {
            Some(select) => {
                select.options = options;
                true
            }
            None => false,
        }
    }

    fn set_select_placeholder(&self, id: &str, text: &str) -> bool {
        match self.lock().snapshot.selects.get_mut(id) {
            Some(select) => {
                select.placeholder = text.to_string();
                true
            }
            None => false,
        }
    }

    fn show_price_result(&self, content: ResultContent) -> bool {
        let mut state = self.lock();
        if !state.has_result_area {
            return false;
        }
        state.snapshot.price_result = Some(content);
        true
    }

    fn hide_price_result(&self) -> bool {
        let mut state = self.lock();
        if !state.has_result_area {
            return false;
        }
        state.snapshot.price_result = None;
        true
    }

    fn price_result_visible(&self) -> bool {
        self.lock().snapshot.price_result.is_some()
    }
}
