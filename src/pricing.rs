//! Pricing table: the fixed reference data behind the price estimator.
//!
//! Locations carry a travel-time coefficient (hours from the Amsterdam
//! depot) and service categories carry a duration multiplier. The table is
//! built once and never mutated; changing prices means shipping new data.

use std::sync::OnceLock;

/// A named place the company drives to.
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    /// Stable identifier used in dropdown values (e.g., "den-haag")
    pub key: &'static str,

    /// Name shown to the visitor (e.g., "Den Haag")
    pub display_name: &'static str,

    /// Estimated travel time from the depot, in hours (always > 0)
    pub travel_time_hours: f64,
}

/// A class of transport job.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceCategory {
    pub key: &'static str,
    pub display_name: &'static str,

    /// Factor applied to the base time (always > 0)
    pub duration_multiplier: f64,
}

/// Commercial constants applied by the estimator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricingPolicy {
    /// Hourly rate ex VAT, in euro cents
    pub hourly_rate_cents: i64,

    /// Minimum billable time, in hundredths of an hour
    pub minimum_centihours: i64,

    /// Fixed loading/unloading overhead, in hundredths of an hour
    pub handling_centihours: i64,

    /// VAT rate in basis points (2100 = 21%)
    pub tax_rate_basis_points: i64,
}

impl PricingPolicy {
    /// €50/h, 1 hour minimum, 30 minutes handling, 21% VAT.
    pub const STANDARD: PricingPolicy = PricingPolicy {
        hourly_rate_cents: 5_000,
        minimum_centihours: 100,
        handling_centihours: 50,
        tax_rate_basis_points: 2_100,
    };

    /// VAT rate as a fraction (0.21).
    pub fn tax_rate(&self) -> f64 {
        self.tax_rate_basis_points as f64 / 10_000.0
    }

    /// Hourly rate in whole currency units (50).
    pub fn hourly_rate(&self) -> f64 {
        self.hourly_rate_cents as f64 / 100.0
    }
}

impl Default for PricingPolicy {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// Read-only lookup of locations and service categories.
///
/// Entries keep their declaration order so dropdowns list them the way the
/// data file does.
#[derive(Debug, Clone)]
pub struct PricingTable {
    locations: Vec<Location>,
    services: Vec<ServiceCategory>,
    default_service: &'static str,
    policy: PricingPolicy,
}

/// Global table instance (initialized lazily)
static TABLE: OnceLock<PricingTable> = OnceLock::new();

impl PricingTable {
    /// The built-in FranxVan table.
    pub fn get() -> &'static PricingTable {
        TABLE.get_or_init(|| PricingTable {
            locations: default_locations(),
            services: default_services(),
            default_service: DEFAULT_SERVICE_KEY,
            policy: PricingPolicy::STANDARD,
        })
    }

    /// Build a custom table. `default_service` must name one of `services`.
    pub fn new(
        locations: Vec<Location>,
        services: Vec<ServiceCategory>,
        default_service: &'static str,
        policy: PricingPolicy,
    ) -> Self {
        Self {
            locations,
            services,
            default_service,
            policy,
        }
    }

    pub fn location(&self, key: &str) -> Option<&Location> {
        self.locations.iter().find(|location| location.key == key)
    }

    pub fn service(&self, key: &str) -> Option<&ServiceCategory> {
        self.services.iter().find(|service| service.key == key)
    }

    /// The category used when a request names no service.
    pub fn default_service(&self) -> Option<&ServiceCategory> {
        self.service(self.default_service)
    }

    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    pub fn services(&self) -> &[ServiceCategory] {
        &self.services
    }

    pub fn policy(&self) -> &PricingPolicy {
        &self.policy
    }
}

/// Key of the "small/standard transport" category.
pub const DEFAULT_SERVICE_KEY: &str = "small-transport";

fn location(key: &'static str, display_name: &'static str, travel_time_hours: f64) -> Location {
    Location {
        key,
        display_name,
        travel_time_hours,
    }
}

fn default_locations() -> Vec<Location> {
    vec![
        // Amsterdam and close suburbs
        location("amsterdam", "Amsterdam", 0.5),
        location("amstelveen", "Amstelveen", 0.75),
        location("diemen", "Diemen", 0.75),
        location("ouderkerk", "Ouderkerk aan de Amstel", 1.0),
        location("zaandam", "Zaandam", 1.0),
        location("purmerend", "Purmerend", 1.0),
        location("hoofddorp", "Hoofddorp", 1.0),
        location("aalsmeer", "Aalsmeer", 1.0),
        // Within two hours
        location("haarlem", "Haarlem", 1.25),
        location("hilversum", "Hilversum", 1.25),
        location("utrecht", "Utrecht", 1.5),
        location("leiden", "Leiden", 1.5),
        location("alkmaar", "Alkmaar", 1.5),
        location("almere", "Almere", 1.5),
        location("den-haag", "Den Haag", 2.0),
        location("rotterdam", "Rotterdam", 2.0),
        location("amersfoort", "Amersfoort", 2.0),
        // Two hours and more
        location("eindhoven", "Eindhoven", 2.5),
        location("tilburg", "Tilburg", 2.5),
        location("groningen", "Groningen", 3.0),
        location("maastricht", "Maastricht", 3.5),
        location("enschede", "Enschede", 3.0),
        location("nijmegen", "Nijmegen", 2.5),
        location("breda", "Breda", 2.25),
        location("apeldoorn", "Apeldoorn", 2.25),
        location("arnhem", "Arnhem", 2.5),
        location("zwolle", "Zwolle", 2.25),
    ]
}

fn default_services() -> Vec<ServiceCategory> {
    vec![
        ServiceCategory {
            key: DEFAULT_SERVICE_KEY,
            display_name: "Klein transport (pakketten, kleine items)",
            duration_multiplier: 1.0,
        },
        ServiceCategory {
            key: "furniture",
            display_name: "Meubels en grote items",
            duration_multiplier: 1.3,
        },
        ServiceCategory {
            key: "moving",
            display_name: "Verhuizing (gedeeltelijk)",
            duration_multiplier: 1.8,
        },
        ServiceCategory {
            key: "full-moving",
            display_name: "Complete verhuizing",
            duration_multiplier: 2.5,
        },
        ServiceCategory {
            key: "urgent",
            display_name: "Spoedtransport",
            duration_multiplier: 1.0,
        },
    ]
}
