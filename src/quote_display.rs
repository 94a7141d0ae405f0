//! Price calculator widget: dropdowns, result area and inline errors.
//!
//! The display owns no language state of its own. The language is passed in
//! on every call, and on a language change the last selection is rendered
//! again so a visible result follows the switch.

use crate::controller::LanguageObserver;
use crate::document::{DocumentMutator, Element, SelectOption};
use crate::estimator::{estimate, EstimationError, Money, PriceQuoteRequest, PriceQuoteResult};
use crate::i18n::LocaleStore;
use crate::pricing::PricingTable;
use anyhow::Result;
use serde::Serialize;
use std::sync::{Arc, Mutex};
use tracing::debug;

pub const FROM_SELECT: &str = "from-city";
pub const TO_SELECT: &str = "to-city";
pub const SERVICE_SELECT: &str = "service-type";

const ERRORS: &str = "priceCalculator.errors";
const RESULT: &str = "priceCalculator.result";

/// What the result area shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResultContent {
    /// Inline message for a selection problem
    Error { message: String },
    Breakdown(QuoteBreakdown),
}

/// A label and the value printed next to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabeledValue {
    pub label: String,
    pub value: String,
}

impl LabeledValue {
    fn new(label: String, value: String) -> Self {
        Self { label, value }
    }
}

/// A rendered price estimate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuoteBreakdown {
    pub title: String,
    pub from: LabeledValue,
    pub to: LabeledValue,
    pub service: LabeledValue,
    pub estimated_time: LabeledValue,
    pub price_ex_vat: LabeledValue,
    pub vat: LabeledValue,
    pub total_inc_vat: LabeledValue,
    pub disclaimer: String,
}

pub struct QuoteDisplay {
    table: Arc<PricingTable>,
    locales: Arc<LocaleStore>,
    document: Arc<dyn DocumentMutator>,
    last_request: Mutex<Option<PriceQuoteRequest>>,
}

impl QuoteDisplay {
    /// Display over the built-in pricing table.
    pub fn new(locales: Arc<LocaleStore>, document: Arc<dyn DocumentMutator>) -> Self {
        Self::with_table(Arc::new(PricingTable::get().clone()), locales, document)
    }

    pub fn with_table(
        table: Arc<PricingTable>,
        locales: Arc<LocaleStore>,
        document: Arc<dyn DocumentMutator>,
    ) -> Self {
        Self {
            table,
            locales,
            document,
            last_request: Mutex::new(None),
        }
    }

    /// Fill the dropdowns from the pricing table.
    ///
    /// Returns `false` when the page has no calculator form.
    pub fn populate(&self, language: &str) -> bool {
        let cities: Vec<SelectOption> = self
            .table
            .locations()
            .iter()
            .map(|location| SelectOption::new(location.key, location.display_name))
            .collect();

        let has_from = self.document.set_select_options(FROM_SELECT, cities.clone());
        let has_to = self.document.set_select_options(TO_SELECT, cities);
        if !has_from || !has_to {
            debug!("Price calculator form elements not found");
            return false;
        }

        // The service dropdown is optional
        let services = self
            .table
            .services()
            .iter()
            .map(|service| SelectOption::new(service.key, service.display_name))
            .collect();
        self.document.set_select_options(SERVICE_SELECT, services);

        self.update_placeholders(language);
        true
    }

    /// Localize the placeholder option of each dropdown.
    pub fn update_placeholders(&self, language: &str) {
        let select_city = self
            .locales
            .text(language, "form", "selectCity", "Selecteer een stad");
        self.document.set_select_placeholder(FROM_SELECT, &select_city);
        self.document.set_select_placeholder(TO_SELECT, &select_city);

        let select_service = self
            .locales
            .text(language, "form", "selectService", "Selecteer een service");
        self.document.set_select_placeholder(SERVICE_SELECT, &select_service);
    }

    /// Estimate `request` and show the outcome in the result area.
    ///
    /// The selection is remembered so a language switch can re-render it.
    pub fn calculate(
        &self,
        language: &str,
        request: PriceQuoteRequest,
    ) -> Result<PriceQuoteResult, EstimationError> {
        let outcome = estimate(&self.table, &request);

        let content = match &outcome {
            Ok(result) => ResultContent::Breakdown(self.breakdown(language, &request, result)),
            Err(error) => ResultContent::Error {
                message: self.error_message(language, error),
            },
        };
        if self.document.show_price_result(content) {
            self.set_live_region(true);
        }

        *self
            .last_request
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(request);

        outcome
    }

    /// Hide the result area and forget the last selection.
    pub fn clear(&self) {
        if self.document.hide_price_result() {
            self.set_live_region(false);
        }
        *self
            .last_request
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = None;
    }

    /// Screen readers announce the result area only while it is shown.
    fn set_live_region(&self, visible: bool) {
        self.document.set_attribute(
            &Element::ResultArea,
            "aria-live",
            if visible { "polite" } else { "off" },
        );
    }

    fn error_message(&self, language: &str, error: &EstimationError) -> String {
        match error {
            EstimationError::MissingSelection => self.locales.text(
                language,
                ERRORS,
                "selectLocations",
                "Selecteer van en naar locatie om een prijsschatting te krijgen.",
            ),
            EstimationError::SameLocation => self.locales.text(
                language,
                ERRORS,
                "sameLocation",
                "Van en naar locatie kunnen niet hetzelfde zijn.",
            ),
            EstimationError::UnknownService(_) => self.locales.text(
                language,
                ERRORS,
                "unknownService",
                "Deze service is niet beschikbaar.",
            ),
        }
    }

    fn breakdown(
        &self,
        language: &str,
        request: &PriceQuoteRequest,
        result: &PriceQuoteResult,
    ) -> QuoteBreakdown {
        let label = |key: &str, default: &str| self.locales.text(language, RESULT, key, default);

        let service_name = if request.has_explicit_service() {
            result.service_name.clone()
        } else {
            label("standardTransport", "Standaard transport")
        };

        let hours = format!("{} {}", result.estimated_hours, label("hours", "uur"));

        QuoteBreakdown {
            title: label("title", "Prijsschatting"),
            from: LabeledValue::new(label("from", "Van:"), result.origin_name.clone()),
            to: LabeledValue::new(label("to", "Naar:"), result.destination_name.clone()),
            service: LabeledValue::new(label("service", "Service:"), service_name),
            estimated_time: LabeledValue::new(label("estimatedTime", "Geschatte tijd:"), hours),
            price_ex_vat: LabeledValue::new(
                label("priceExVat", "Prijs ex BTW:"),
                format_price(result.price_ex_tax),
            ),
            vat: LabeledValue::new(label("vat", "BTW (21%):"), format!("€{}", result.tax_amount)),
            total_inc_vat: LabeledValue::new(
                label("totalIncVat", "Totaal inc BTW:"),
                format!("€{}", result.price_inc_tax),
            ),
            disclaimer: label(
                "disclaimer",
                "Dit is een indicatieve prijsschatting. Voor een exacte offerte neem contact op.",
            ),
        }
    }
}

/// Whole amounts print as "€100,-", others with cents.
fn format_price(amount: Money) -> String {
    if amount.is_whole() {
        format!("€{},-", amount.whole_units())
    } else {
        format!("€{}", amount)
    }
}

impl LanguageObserver for QuoteDisplay {
    fn name(&self) -> &str {
        "price calculator"
    }

    fn on_language_change(&self, language: &str) -> Result<()> {
        self.update_placeholders(language);

        if !self.document.price_result_visible() {
            return Ok(());
        }

        let last_request = self
            .last_request
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone();
        if let Some(request) = last_request {
            // The outcome is already reflected in the result area
            let _ = self.calculate(language, request);
        }
        Ok(())
    }
}
