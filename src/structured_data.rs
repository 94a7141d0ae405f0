//! JSON-LD structured data for search engines (schema.org vocabulary).
//!
//! Every language change regenerates the full set of documents so the
//! localized descriptions follow the page.

use crate::controller::LanguageObserver;
use crate::document::DocumentMutator;
use crate::i18n::{LanguageRegistry, LocaleStore};
use crate::pricing::PricingTable;
use anyhow::Result;
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;

const SCHEMA_CONTEXT: &str = "https://schema.org";

const ALL_WEEK: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Locations published as `areaServed`, in order.
pub const SERVICE_AREA_KEYS: [&str; 20] = [
    "amsterdam",
    "amstelveen",
    "diemen",
    "zaandam",
    "purmerend",
    "hoofddorp",
    "aalsmeer",
    "haarlem",
    "hilversum",
    "utrecht",
    "leiden",
    "alkmaar",
    "almere",
    "den-haag",
    "rotterdam",
    "amersfoort",
    "eindhoven",
    "tilburg",
    "groningen",
    "maastricht",
];

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostalAddress {
    pub street_address: String,
    pub address_locality: String,
    pub address_region: String,
    pub postal_code: String,
    pub address_country: String,
}

/// Company facts published in the structured data.
#[derive(Debug, Clone, PartialEq)]
pub struct BusinessProfile {
    pub name: String,
    pub phone: String,
    pub website: String,
    pub email: String,
    pub address: PostalAddress,
    pub latitude: String,
    pub longitude: String,
    pub service_areas: Vec<String>,
    pub same_as: Vec<String>,
    pub currency: String,
}

impl BusinessProfile {
    /// The FranxVan profile; service areas are the pricing-table names of
    /// [`SERVICE_AREA_KEYS`].
    pub fn franxvan() -> Self {
        Self {
            name: "FranxVan".to_string(),
            phone: "+31630600300".to_string(),
            website: "https://www.franxvan.nl".to_string(),
            email: "info@franxvan.nl".to_string(),
            address: PostalAddress {
                street_address: "Amsterdam".to_string(),
                address_locality: "Amsterdam".to_string(),
                address_region: "Noord-Holland".to_string(),
                postal_code: "1000 AA".to_string(),
                address_country: "NL".to_string(),
            },
            latitude: "52.3676".to_string(),
            longitude: "4.9041".to_string(),
            service_areas: SERVICE_AREA_KEYS
                .iter()
                .filter_map(|key| PricingTable::get().location(key))
                .map(|location| location.display_name.to_string())
                .collect(),
            same_as: vec![
                "https://www.facebook.com/FRANXVAN.NL".to_string(),
                "https://www.instagram.com/franxvan".to_string(),
            ],
            currency: "EUR".to_string(),
        }
    }

    fn logo_url(&self) -> String {
        format!("{}/images/logo.png", self.website)
    }
}

pub struct StructuredDataWriter {
    locales: Arc<LocaleStore>,
    document: Arc<dyn DocumentMutator>,
    profile: BusinessProfile,
    hourly_rate: f64,
}

impl StructuredDataWriter {
    pub fn new(locales: Arc<LocaleStore>, document: Arc<dyn DocumentMutator>, profile: BusinessProfile) -> Self {
        Self {
            locales,
            document,
            profile,
            hourly_rate: PricingTable::get().policy().hourly_rate(),
        }
    }

    /// Replace the page's structured data with documents for `language`.
    pub fn inject(&self, language: &str) {
        self.document.replace_structured_data(self.documents(language));
    }

    /// All documents for `language`, in injection order.
    pub fn documents(&self, language: &str) -> Vec<Value> {
        let mut documents = vec![self.local_business(language), self.organization()];
        documents.extend(self.services(language));
        documents.push(self.website());
        documents
    }

    fn local_business(&self, language: &str) -> Value {
        let profile = &self.profile;
        let description = self.locales.text(
            language,
            "seo",
            "description",
            "Professional transport and moving services in Amsterdam",
        );
        let area_served: Vec<Value> = profile
            .service_areas
            .iter()
            .map(|area| json!({ "@type": "City", "name": area, "addressCountry": "NL" }))
            .collect();

        json!({
            "@context": SCHEMA_CONTEXT,
            "@type": "MovingCompany",
            "name": profile.name,
            "description": description,
            "url": profile.website,
            "telephone": profile.phone,
            "email": profile.email,
            "address": self.address(),
            "geo": {
                "@type": "GeoCoordinates",
                "latitude": profile.latitude,
                "longitude": profile.longitude,
            },
            "areaServed": area_served,
            "openingHours": "Mo-Su 00:00-23:59",
            "openingHoursSpecification": opening_hours(),
            "priceRange": "€€",
            "currenciesAccepted": profile.currency,
            "paymentAccepted": "Cash, Bank transfer",
            "logo": profile.logo_url(),
            "image": profile.logo_url(),
            "sameAs": profile.same_as,
        })
    }

    fn organization(&self) -> Value {
        let profile = &self.profile;
        let languages: Vec<&str> = LanguageRegistry::get()
            .list_enabled()
            .iter()
            .map(|config| config.name)
            .collect();

        json!({
            "@context": SCHEMA_CONTEXT,
            "@type": "Organization",
            "name": profile.name,
            "url": profile.website,
            "logo": profile.logo_url(),
            "contactPoint": {
                "@type": "ContactPoint",
                "telephone": profile.phone,
                "contactType": "customer service",
                "availableLanguage": languages,
                "areaServed": profile.address.address_country,
            },
            "address": {
                "@type": "PostalAddress",
                "addressLocality": profile.address.address_locality,
                "addressCountry": profile.address.address_country,
            },
        })
    }

    fn services(&self, language: &str) -> Vec<Value> {
        let text = |card: &str, key: &str, default: &str| {
            self.locales
                .text(language, &format!("services.{}", card), key, default)
        };

        let mut transport = self.service(
            text("transport", "title", "Transport Service"),
            text("transport", "description", "Reliable transport services"),
        );
        transport["offers"] = json!({
            "@type": "Offer",
            "price": self.hourly_rate,
            "priceCurrency": self.profile.currency,
            "priceSpecification": {
                "@type": "UnitPriceSpecification",
                "price": self.hourly_rate,
                "priceCurrency": self.profile.currency,
                "unitText": "per hour",
            },
        });

        let mut roadside = self.service(
            text("roadside", "title", "Roadside Assistance"),
            text("roadside", "description", "24/7 roadside assistance"),
        );
        roadside["hoursAvailable"] = opening_hours();

        let storage = self.service(
            text("storage", "title", "Storage Service"),
            text("storage", "description", "Temporary storage solutions"),
        );

        vec![transport, roadside, storage]
    }

    fn service(&self, name: String, description: String) -> Value {
        json!({
            "@context": SCHEMA_CONTEXT,
            "@type": "Service",
            "name": name,
            "description": description,
            "provider": {
                "@type": "MovingCompany",
                "name": self.profile.name,
                "telephone": self.profile.phone,
            },
            "areaServed": self.profile.service_areas,
        })
    }

    fn website(&self) -> Value {
        let website = &self.profile.website;
        json!({
            "@context": SCHEMA_CONTEXT,
            "@type": "WebSite",
            "name": self.profile.name,
            "url": website,
            "potentialAction": {
                "@type": "SearchAction",
                "target": {
                    "@type": "EntryPoint",
                    "urlTemplate": format!("{}?q={{search_term_string}}", website),
                },
                "query-input": "required name=search_term_string",
            },
        })
    }

    fn address(&self) -> Value {
        let mut address = serde_json::to_value(&self.profile.address).unwrap_or_else(|_| json!({}));
        if let Value::Object(map) = &mut address {
            map.insert("@type".to_string(), json!("PostalAddress"));
        }
        address
    }
}

fn opening_hours() -> Value {
    json!({
        "@type": "OpeningHoursSpecification",
        "dayOfWeek": ALL_WEEK,
        "opens": "00:00",
        "closes": "23:59",
    })
}

impl LanguageObserver for StructuredDataWriter {
    fn name(&self) -> &str {
        "structured data"
    }

    fn on_language_change(&self, language: &str) -> Result<()> {
        self.inject(language);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::InMemoryDocument;

    fn setup() -> (Arc<InMemoryDocument>, StructuredDataWriter) {
        let json = json!({
            "nl": {
                "seo": { "description": "Betrouwbaar transport in Amsterdam" },
                "services": {
                    "transport": { "title": "Transport", "description": "Van A naar B" },
                    "roadside": { "title": "Pechhulp", "description": "Dag en nacht" }
                }
            },
            "en": {
                "seo": { "description": "Reliable transport in Amsterdam" }
            }
        });
        let locales = Arc::new(LocaleStore::from_json_str(&json.to_string()).unwrap());
        let document = Arc::new(InMemoryDocument::new());
        let writer = StructuredDataWriter::new(locales, document.clone(), BusinessProfile::franxvan());
        (document, writer)
    }

    fn types(documents: &[Value]) -> Vec<&str> {
        documents.iter().map(|d| d["@type"].as_str().unwrap()).collect()
    }

    // ==================== Document Tests ====================

    #[test]
    fn test_documents_order_and_types() {
        let (_, writer) = setup();
        let documents = writer.documents("nl");
        assert_eq!(
            types(&documents),
            vec!["MovingCompany", "Organization", "Service", "Service", "Service", "WebSite"]
        );
        assert!(documents.iter().all(|d| d["@context"] == SCHEMA_CONTEXT));
    }

    #[test]
    fn test_local_business_localized() {
        let (_, writer) = setup();
        assert_eq!(
            writer.documents("nl")[0]["description"],
            "Betrouwbaar transport in Amsterdam"
        );
        assert_eq!(
            writer.documents("en")[0]["description"],
            "Reliable transport in Amsterdam"
        );
        assert_eq!(
            writer.documents("de")[0]["description"],
            "Professional transport and moving services in Amsterdam"
        );
    }

    #[test]
    fn test_local_business_details() {
        let (_, writer) = setup();
        let business = &writer.documents("nl")[0];

        assert_eq!(business["address"]["@type"], "PostalAddress");
        assert_eq!(business["address"]["addressRegion"], "Noord-Holland");
        assert_eq!(business["areaServed"].as_array().unwrap().len(), 20);
        assert_eq!(business["areaServed"][0]["name"], "Amsterdam");
        assert_eq!(business["openingHoursSpecification"]["dayOfWeek"][6], "Sunday");
    }

    #[test]
    fn test_service_areas_match_published_list() {
        let profile = BusinessProfile::franxvan();

        assert_eq!(profile.service_areas.len(), SERVICE_AREA_KEYS.len());
        assert_eq!(profile.service_areas.last().map(String::as_str), Some("Maastricht"));
        assert!(profile.service_areas.iter().any(|area| area == "Den Haag"));
        assert!(!profile
            .service_areas
            .iter()
            .any(|area| area == "Ouderkerk aan de Amstel"));
    }

    #[test]
    fn test_services_localized_with_defaults() {
        let (_, writer) = setup();
        let documents = writer.documents("nl");

        assert_eq!(documents[2]["name"], "Transport");
        assert_eq!(documents[2]["offers"]["price"], 50.0);
        assert_eq!(documents[2]["offers"]["priceSpecification"]["unitText"], "per hour");
        assert_eq!(documents[3]["name"], "Pechhulp");
        assert_eq!(documents[3]["hoursAvailable"]["opens"], "00:00");
        // No storage card in the bundle
        assert_eq!(documents[4]["name"], "Storage Service");
    }

    #[test]
    fn test_organization_languages() {
        let (_, writer) = setup();
        let organization = &writer.documents("nl")[1];
        assert_eq!(
            organization["contactPoint"]["availableLanguage"],
            json!(["Dutch", "English"])
        );
    }

    #[test]
    fn test_website_search_action() {
        let (_, writer) = setup();
        let website = &writer.documents("nl")[5];
        assert_eq!(
            website["potentialAction"]["target"]["urlTemplate"],
            "https://www.franxvan.nl?q={search_term_string}"
        );
    }

    // ==================== Injection Tests ====================

    #[test]
    fn test_inject_replaces_previous_documents() {
        let (document, writer) = setup();
        writer.inject("nl");
        writer.on_language_change("en").unwrap();

        let injected = document.snapshot().structured_data;
        assert_eq!(injected.len(), 6);
        assert_eq!(injected[0]["description"], "Reliable transport in Amsterdam");
    }
}
