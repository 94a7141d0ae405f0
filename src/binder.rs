//! Presentation binder: pushes a locale bundle into the page.
//!
//! Binding is a pure function of (language, bundle, page slots). Slots the
//! page does not have are skipped, and values the bundle lacks leave the
//! page text untouched, so partial translations degrade gracefully.

use crate::document::{CardPart, DocumentMutator, FooterPart, Slot};
use crate::i18n::LocaleBundle;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::debug;

/// Sections bound through `data-translate="<section>-<key>"` slots.
pub const BOUND_SECTIONS: [&str; 6] = ["header", "intro", "services", "contact", "form", "footer"];

/// Service cards in page order.
pub const SERVICE_CARDS: [&str; 3] = ["transport", "roadside", "storage"];

/// Footer blocks in page order; the first has a heading only.
pub const FOOTER_BLOCKS: [&str; 3] = ["contact", "hours", "location"];

pub struct PresentationBinder {
    document: Arc<dyn DocumentMutator>,
}

impl PresentationBinder {
    pub fn new(document: Arc<dyn DocumentMutator>) -> Self {
        Self { document }
    }

    /// Make the page reflect `bundle`.
    pub fn apply(&self, language_code: &str, bundle: &LocaleBundle) {
        let mut written = 0;

        if let Some(nav) = bundle.section("nav") {
            for (key, text) in strings(nav) {
                written += self.write(&Slot::nav(key), text);
            }
        }

        for section in BOUND_SECTIONS {
            let Some(values) = bundle.section(section) else {
                continue;
            };

            for (key, text) in strings(values) {
                written += self.write(&Slot::translate(section, key), text);
            }

            match section {
                "services" => written += self.apply_service_cards(values),
                "footer" => written += self.apply_footer(values),
                _ => {}
            }
        }

        debug!("Bound {} slots for '{}'", written, language_code);
    }

    fn apply_service_cards(&self, services: &Map<String, Value>) -> usize {
        let mut written = 0;

        for (index, card_key) in SERVICE_CARDS.iter().enumerate() {
            let Some(card) = services.get(*card_key).and_then(Value::as_object) else {
                continue;
            };
            let card_number = index + 1;

            if let Some(title) = card.get("title").and_then(Value::as_str) {
                written += self.write(
                    &Slot::ServiceCard { card: card_number, part: CardPart::Title },
                    title,
                );
            }
            if let Some(description) = card.get("description").and_then(Value::as_str) {
                written += self.write(
                    &Slot::ServiceCard { card: card_number, part: CardPart::Description },
                    description,
                );
            }
        }

        written
    }

    fn apply_footer(&self, footer: &Map<String, Value>) -> usize {
        let mut written = 0;

        for (index, block_key) in FOOTER_BLOCKS.iter().enumerate() {
            let Some(block) = footer.get(*block_key).and_then(Value::as_object) else {
                continue;
            };
            let block_number = index + 1;

            if let Some(title) = block.get("title").and_then(Value::as_str) {
                written += self.write(
                    &Slot::FooterBlock { block: block_number, part: FooterPart::Heading },
                    title,
                );
            }
            if block_number > 1 {
                if let Some(text) = block.get("text").and_then(Value::as_str) {
                    written += self.write(
                        &Slot::FooterBlock { block: block_number, part: FooterPart::Text },
                        text,
                    );
                }
            }
        }

        if let Some(copyright) = footer.get("copyright").and_then(Value::as_str) {
            written += self.write(&Slot::Copyright, copyright);
        }

        written
    }

    fn write(&self, slot: &Slot, text: &str) -> usize {
        usize::from(self.document.set_text(slot, text))
    }
}

/// String-valued entries of a section; nested objects are skipped.
fn strings(section: &Map<String, Value>) -> impl Iterator<Item = (&str, &str)> {
    section
        .iter()
        .filter_map(|(key, value)| value.as_str().map(|text| (key.as_str(), text)))
}
