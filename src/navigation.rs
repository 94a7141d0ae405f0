//! Mobile navigation menu and the service card deck.

use crate::document::{DocumentMutator, Element};
use std::sync::Arc;
use tracing::debug;

/// Above this viewport width the mobile menu is never shown.
pub const MOBILE_BREAKPOINT_PX: u32 = 768;

const ACTIVE: &str = "active";
const CARD_ACTIVE: &str = "card-active";

/// Hamburger menu for narrow viewports. While the menu is open the body
/// does not scroll, the toggle reports `aria-expanded="true"` and focus sits
/// in the menu.
pub struct MobileNav {
    document: Arc<dyn DocumentMutator>,
}

impl MobileNav {
    pub fn new(document: Arc<dyn DocumentMutator>) -> Self {
        Self { document }
    }

    pub fn is_open(&self) -> bool {
        self.document.has_class(&Element::NavMenu, ACTIVE)
    }

    /// Flip the menu; returns the new open state.
    pub fn toggle(&self) -> bool {
        let open = !self.is_open();
        self.set_open(open);
        open
    }

    pub fn close(&self) {
        if self.is_open() {
            self.set_open(false);
        }
    }

    /// A menu link was followed.
    pub fn on_link_click(&self) {
        self.close();
    }

    /// A click landed somewhere on the page; `inside_nav` is true when it
    /// hit the menu or its toggle.
    pub fn on_document_click(&self, inside_nav: bool) {
        if !inside_nav {
            self.close();
        }
    }

    pub fn on_resize(&self, viewport_width: u32) {
        if viewport_width > MOBILE_BREAKPOINT_PX {
            self.close();
        }
    }

    /// A key was pressed anywhere on the page. Escape closes an open menu
    /// and hands focus back to the toggle; returns whether the key was used.
    pub fn on_key(&self, key: &str) -> bool {
        if key != "Escape" || !self.is_open() {
            return false;
        }
        self.set_open(false);
        self.document.focus(&Element::NavToggle);
        true
    }

    fn set_open(&self, open: bool) {
        self.document.set_class(&Element::NavToggle, ACTIVE, open);
        self.document.set_class(&Element::NavMenu, ACTIVE, open);
        self.document
            .set_attribute(&Element::NavToggle, "aria-expanded", if open { "true" } else { "false" });
        self.document
            .set_body_overflow(if open { "hidden" } else { "auto" });

        if open {
            self.document.focus(&Element::NavLink(1));
        }
        debug!("Mobile menu {}", if open { "opened" } else { "closed" });
    }
}

/// Service cards where at most one is expanded at a time.
pub struct CardDeck {
    document: Arc<dyn DocumentMutator>,
    cards: Vec<usize>,
}

impl CardDeck {
    pub fn new(document: Arc<dyn DocumentMutator>, cards: impl IntoIterator<Item = usize>) -> Self {
        Self {
            document,
            cards: cards.into_iter().collect(),
        }
    }

    /// Expand `card`, collapsing the others, or collapse it when it was
    /// already expanded. Returns whether `card` ends up expanded.
    pub fn toggle(&self, card: usize) -> bool {
        if !self.cards.contains(&card) {
            return false;
        }
        let expand = !self.is_active(card);

        for &other in &self.cards {
            if other != card {
                self.document.set_class(&Element::Card(other), CARD_ACTIVE, false);
            }
        }
        self.document.set_class(&Element::Card(card), CARD_ACTIVE, expand)
            && expand
    }

    pub fn is_active(&self, card: usize) -> bool {
        self.document.has_class(&Element::Card(card), CARD_ACTIVE)
    }

    pub fn active(&self) -> Option<usize> {
        self.cards.iter().copied().find(|&card| self.is_active(card))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::InMemoryDocument;

    fn page() -> Arc<InMemoryDocument> {
        Arc::new(InMemoryDocument::site_template())
    }

    // ==================== MobileNav Tests ====================

    #[test]
    fn test_toggle_opens_and_closes() {
        let document = page();
        let nav = MobileNav::new(document.clone());

        assert!(nav.toggle());
        assert!(document.has_class(&Element::NavToggle, "active"));
        assert!(document.has_class(&Element::NavMenu, "active"));
        assert_eq!(document.snapshot().body_overflow.as_deref(), Some("hidden"));

        assert!(!nav.toggle());
        assert!(!nav.is_open());
        assert_eq!(document.snapshot().body_overflow.as_deref(), Some("auto"));
    }

    #[test]
    fn test_toggle_updates_aria_expanded_and_focus() {
        let document = page();
        let nav = MobileNav::new(document.clone());

        nav.toggle();
        assert_eq!(
            document.attribute(&Element::NavToggle, "aria-expanded").as_deref(),
            Some("true")
        );
        assert_eq!(document.snapshot().focused, Some(Element::NavLink(1).to_string()));

        nav.toggle();
        assert_eq!(
            document.attribute(&Element::NavToggle, "aria-expanded").as_deref(),
            Some("false")
        );
    }

    #[test]
    fn test_escape_closes_and_returns_focus() {
        let document = page();
        let nav = MobileNav::new(document.clone());
        nav.toggle();

        assert!(!nav.on_key("Enter"));
        assert!(nav.is_open());

        assert!(nav.on_key("Escape"));
        assert!(!nav.is_open());
        assert_eq!(document.snapshot().focused, Some(Element::NavToggle.to_string()));
        assert_eq!(
            document.attribute(&Element::NavToggle, "aria-expanded").as_deref(),
            Some("false")
        );
        assert_eq!(document.snapshot().body_overflow.as_deref(), Some("auto"));
    }

    #[test]
    fn test_escape_when_closed_is_ignored() {
        let document = page();
        let nav = MobileNav::new(document.clone());

        assert!(!nav.on_key("Escape"));
        assert_eq!(document.snapshot().focused, None);
    }

    #[test]
    fn test_link_click_closes() {
        let document = page();
        let nav = MobileNav::new(document.clone());
        nav.toggle();
        nav.on_link_click();
        assert!(!nav.is_open());
    }

    #[test]
    fn test_click_outside_closes_inside_keeps() {
        let document = page();
        let nav = MobileNav::new(document.clone());
        nav.toggle();

        nav.on_document_click(true);
        assert!(nav.is_open());

        nav.on_document_click(false);
        assert!(!nav.is_open());
    }

    #[test]
    fn test_resize_closes_only_above_breakpoint() {
        let document = page();
        let nav = MobileNav::new(document.clone());
        nav.toggle();

        nav.on_resize(768);
        assert!(nav.is_open());

        nav.on_resize(1024);
        assert!(!nav.is_open());
    }

    #[test]
    fn test_close_when_closed_leaves_overflow() {
        let document = page();
        let nav = MobileNav::new(document.clone());
        nav.on_document_click(false);
        assert_eq!(document.snapshot().body_overflow, None);
    }

    // ==================== CardDeck Tests ====================

    #[test]
    fn test_card_toggle_is_exclusive() {
        let document = page();
        let deck = CardDeck::new(document.clone(), 1..=3);

        assert!(deck.toggle(1));
        assert!(deck.toggle(2));
        assert!(!deck.is_active(1));
        assert_eq!(deck.active(), Some(2));

        assert!(!deck.toggle(2));
        assert_eq!(deck.active(), None);
    }

    #[test]
    fn test_card_toggle_unknown_card() {
        let document = page();
        let deck = CardDeck::new(document.clone(), 1..=3);
        assert!(!deck.toggle(7));
        assert_eq!(deck.active(), None);
    }
}
