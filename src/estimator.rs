//! Price estimator: turns a route and a service category into a quote.
//!
//! All arithmetic is done on integers. Travel times and multipliers are
//! scaled to hundredths, money is held in euro cents, and VAT is rounded
//! half-up to the cent. Billing rounds the effective duration up to whole
//! hours; partial hours are never billed fractionally.

use crate::pricing::{Location, PricingTable, ServiceCategory};
use std::fmt;
use thiserror::Error;

/// Errors a visitor can trigger from the calculator form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EstimationError {
    /// Origin or destination is empty or not a known location
    #[error("select both an origin and a destination")]
    MissingSelection,

    #[error("origin and destination are the same location")]
    SameLocation,

    #[error("unknown service category: '{0}'")]
    UnknownService(String),
}

/// An amount of money in euro cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Money(i64);

impl Money {
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    pub fn cents(&self) -> i64 {
        self.0
    }

    /// True when the amount has no cents part (renders as "€100,-").
    pub fn is_whole(&self) -> bool {
        self.0 % 100 == 0
    }

    pub fn whole_units(&self) -> i64 {
        self.0 / 100
    }

    pub fn as_f64(&self) -> f64 {
        self.0 as f64 / 100.0
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.abs();
        write!(f, "{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}

/// A visitor's calculator selection.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PriceQuoteRequest {
    pub origin_key: String,
    pub destination_key: String,

    /// `None` (or an empty key) selects the table's default category
    pub service_key: Option<String>,
}

impl PriceQuoteRequest {
    pub fn new(origin_key: impl Into<String>, destination_key: impl Into<String>) -> Self {
        Self {
            origin_key: origin_key.into(),
            destination_key: destination_key.into(),
            service_key: None,
        }
    }

    pub fn with_service(mut self, service_key: impl Into<String>) -> Self {
        self.service_key = Some(service_key.into());
        self
    }

    /// Whether the visitor picked a service explicitly.
    pub fn has_explicit_service(&self) -> bool {
        self.service_key.as_deref().is_some_and(|key| !key.is_empty())
    }
}

/// A successful estimate.
///
/// `price_inc_tax == price_ex_tax + tax_amount` and `estimated_hours` is
/// never below the policy minimum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceQuoteResult {
    pub origin_name: String,
    pub destination_name: String,
    pub service_name: String,
    pub estimated_hours: u32,
    pub price_ex_tax: Money,
    pub tax_amount: Money,
    pub price_inc_tax: Money,
}

/// Compute a quote for `request` against `table`.
pub fn estimate(
    table: &PricingTable,
    request: &PriceQuoteRequest,
) -> Result<PriceQuoteResult, EstimationError> {
    let origin = lookup_location(table, &request.origin_key)?;
    let destination = lookup_location(table, &request.destination_key)?;

    if origin.key == destination.key {
        return Err(EstimationError::SameLocation);
    }

    let service = resolve_service(table, request.service_key.as_deref())?;
    let policy = table.policy();

    let distance = (to_hundredths(destination.travel_time_hours)
        - to_hundredths(origin.travel_time_hours))
    .abs();
    let base_centihours = distance + policy.handling_centihours;

    // base (1/100 h) * multiplier (1/100) gives 1/10_000 h
    let effective = (base_centihours * to_hundredths(service.duration_multiplier))
        .max(policy.minimum_centihours * 100);
    let estimated_hours = ceil_div(effective, 10_000);

    let price_ex_tax = estimated_hours * policy.hourly_rate_cents;
    let tax_amount = round_half_up_div(price_ex_tax * policy.tax_rate_basis_points, 10_000);
    let price_inc_tax = price_ex_tax + tax_amount;

    Ok(PriceQuoteResult {
        origin_name: origin.display_name.to_string(),
        destination_name: destination.display_name.to_string(),
        service_name: service.display_name.to_string(),
        estimated_hours: estimated_hours as u32,
        price_ex_tax: Money::from_cents(price_ex_tax),
        tax_amount: Money::from_cents(tax_amount),
        price_inc_tax: Money::from_cents(price_inc_tax),
    })
}

fn lookup_location<'a>(
    table: &'a PricingTable,
    key: &str,
) -> Result<&'a Location, EstimationError> {
    if key.is_empty() {
        return Err(EstimationError::MissingSelection);
    }
    table
        .location(key)
        .ok_or(EstimationError::MissingSelection)
}

fn resolve_service<'a>(
    table: &'a PricingTable,
    key: Option<&str>,
) -> Result<&'a ServiceCategory, EstimationError> {
    match key.filter(|key| !key.is_empty()) {
        Some(key) => table
            .service(key)
            .ok_or_else(|| EstimationError::UnknownService(key.to_string())),
        None => table
            .default_service()
            .ok_or_else(|| EstimationError::UnknownService(String::new())),
    }
}

fn to_hundredths(value: f64) -> i64 {
    (value * 100.0).round() as i64
}

fn ceil_div(numerator: i64, denominator: i64) -> i64 {
    (numerator + denominator - 1) / denominator
}

/// Non-negative division rounding halves away from zero.
fn round_half_up_div(numerator: i64, denominator: i64) -> i64 {
    (numerator + denominator / 2) / denominator
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::PricingPolicy;
    use proptest::prelude::*;

    fn quote(from: &str, to: &str, service: Option<&str>) -> Result<PriceQuoteResult, EstimationError> {
        let mut request = PriceQuoteRequest::new(from, to);
        request.service_key = service.map(str::to_string);
        estimate(PricingTable::get(), &request)
    }

    // ==================== Scenario Tests ====================

    #[test]
    fn test_amsterdam_to_rotterdam_default_service() {
        let result = quote("amsterdam", "rotterdam", None).expect("Should estimate");

        assert_eq!(result.origin_name, "Amsterdam");
        assert_eq!(result.destination_name, "Rotterdam");
        assert_eq!(result.service_name, "Klein transport (pakketten, kleine items)");
        assert_eq!(result.estimated_hours, 2);
        assert_eq!(result.price_ex_tax, Money::from_cents(10_000));
        assert_eq!(result.tax_amount, Money::from_cents(2_100));
        assert_eq!(result.price_inc_tax, Money::from_cents(12_100));
        assert_eq!(result.price_inc_tax.to_string(), "121.00");
    }

    #[test]
    fn test_direction_does_not_matter() {
        let there = quote("amsterdam", "maastricht", Some("moving")).unwrap();
        let back = quote("maastricht", "amsterdam", Some("moving")).unwrap();
        assert_eq!(there.estimated_hours, back.estimated_hours);
        assert_eq!(there.price_inc_tax, back.price_inc_tax);
    }

    #[test]
    fn test_minimum_hour_applies() {
        // 0.75 - 0.75 + 0.5 = 0.5h, lifted to the 1h minimum
        let result = quote("amstelveen", "diemen", None).unwrap();
        assert_eq!(result.estimated_hours, 1);
        assert_eq!(result.price_ex_tax.to_string(), "50.00");
        assert_eq!(result.tax_amount.to_string(), "10.50");
        assert_eq!(result.price_inc_tax.to_string(), "60.50");
    }

    #[test]
    fn test_partial_hours_round_up() {
        // (1.25 - 0.5 + 0.5) * 1.3 = 1.625h -> 2h
        let result = quote("amsterdam", "haarlem", Some("furniture")).unwrap();
        assert_eq!(result.estimated_hours, 2);
        assert_eq!(result.service_name, "Meubels en grote items");
    }

    #[test]
    fn test_rounding_across_services() {
        // (3.5 - 0.5 + 0.5) * 2.5 = 8.75 -> 9
        let result = quote("amsterdam", "maastricht", Some("full-moving")).unwrap();
        assert_eq!(result.estimated_hours, 9);

        // (2.5 - 0.5 + 0.5) * 1.8 = 4.5 -> 5
        let result = quote("amsterdam", "eindhoven", Some("moving")).unwrap();
        assert_eq!(result.estimated_hours, 5);

        // (2.0 - 0.5 + 0.5) * 1.0 = 2.0 stays 2
        let result = quote("amsterdam", "den-haag", Some("urgent")).unwrap();
        assert_eq!(result.estimated_hours, 2);
    }

    #[test]
    fn test_empty_service_key_uses_default() {
        let explicit_empty = quote("amsterdam", "utrecht", Some("")).unwrap();
        let missing = quote("amsterdam", "utrecht", None).unwrap();
        assert_eq!(explicit_empty, missing);
    }

    // ==================== Error Tests ====================

    #[test]
    fn test_same_location() {
        for service in [None, Some("furniture"), Some("urgent")] {
            assert_eq!(
                quote("utrecht", "utrecht", service),
                Err(EstimationError::SameLocation)
            );
        }
    }

    #[test]
    fn test_missing_selection() {
        assert_eq!(quote("", "utrecht", None), Err(EstimationError::MissingSelection));
        assert_eq!(quote("utrecht", "", None), Err(EstimationError::MissingSelection));
        assert_eq!(quote("", "", None), Err(EstimationError::MissingSelection));
    }

    #[test]
    fn test_unknown_location_is_missing_selection() {
        assert_eq!(
            quote("atlantis", "utrecht", None),
            Err(EstimationError::MissingSelection)
        );
    }

    #[test]
    fn test_unknown_service() {
        let err = quote("amsterdam", "utrecht", Some("piano")).unwrap_err();
        assert_eq!(err, EstimationError::UnknownService("piano".to_string()));
        assert!(err.to_string().contains("piano"));
    }

    #[test]
    fn test_custom_table_policy() {
        let table = PricingTable::new(
            vec![
                Location { key: "a", display_name: "A", travel_time_hours: 1.0 },
                Location { key: "b", display_name: "B", travel_time_hours: 4.0 },
            ],
            vec![ServiceCategory { key: "std", display_name: "Std", duration_multiplier: 1.0 }],
            "std",
            PricingPolicy {
                hourly_rate_cents: 3_333,
                minimum_centihours: 200,
                handling_centihours: 0,
                tax_rate_basis_points: 900,
            },
        );
        let result = estimate(&table, &PriceQuoteRequest::new("a", "b")).unwrap();
        assert_eq!(result.estimated_hours, 3);
        assert_eq!(result.price_ex_tax.cents(), 9_999);
        // 9999 * 0.09 = 899.91 -> 900
        assert_eq!(result.tax_amount.cents(), 900);
        assert_eq!(result.price_inc_tax.cents(), 10_899);
    }

    // ==================== Money Tests ====================

    #[test]
    fn test_money_display() {
        assert_eq!(Money::from_cents(12_100).to_string(), "121.00");
        assert_eq!(Money::from_cents(1_050).to_string(), "10.50");
        assert_eq!(Money::from_cents(5).to_string(), "0.05");
        assert_eq!(Money::from_cents(-250).to_string(), "-2.50");
        assert!(Money::from_cents(10_000).is_whole());
        assert_eq!(Money::from_cents(10_000).whole_units(), 100);
    }

    // ==================== Property Tests ====================

    fn location_keys() -> Vec<&'static str> {
        PricingTable::get().locations().iter().map(|l| l.key).collect()
    }

    fn service_keys() -> Vec<&'static str> {
        PricingTable::get().services().iter().map(|s| s.key).collect()
    }

    proptest! {
        #[test]
        fn prop_quote_arithmetic(
            origin in prop::sample::select(location_keys()),
            destination in prop::sample::select(location_keys()),
            service in prop::sample::select(service_keys()),
        ) {
            prop_assume!(origin != destination);
            let table = PricingTable::get();
            let result = quote(origin, destination, Some(service)).unwrap();

            let o = table.location(origin).unwrap().travel_time_hours;
            let d = table.location(destination).unwrap().travel_time_hours;
            let m = table.service(service).unwrap().duration_multiplier;
            let expected_hours = (((d - o).abs() + 0.5) * m).max(1.0);

            prop_assert!(result.estimated_hours >= 1);
            prop_assert!((result.estimated_hours as f64) >= expected_hours - 1e-9);
            prop_assert!((result.estimated_hours as f64) < expected_hours + 1.0);
            prop_assert_eq!(
                result.price_inc_tax.cents(),
                result.price_ex_tax.cents() + result.tax_amount.cents()
            );
            let expected_inc = (result.price_ex_tax.as_f64() * 1.21 * 100.0).round() as i64;
            prop_assert_eq!(result.price_inc_tax.cents(), expected_inc);
        }

        #[test]
        fn prop_same_location_always_rejected(
            location in prop::sample::select(location_keys()),
            service in prop::option::of(prop::sample::select(service_keys())),
        ) {
            prop_assert_eq!(
                quote(location, location, service),
                Err(EstimationError::SameLocation)
            );
        }

        #[test]
        fn prop_empty_origin_or_destination_rejected(
            location in prop::sample::select(location_keys()),
            service in prop::option::of(prop::sample::select(service_keys())),
        ) {
            prop_assert_eq!(quote("", location, service), Err(EstimationError::MissingSelection));
            prop_assert_eq!(quote(location, "", service), Err(EstimationError::MissingSelection));
        }
    }
}
