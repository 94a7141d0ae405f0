use anyhow::Result;
use franxvan_site::config::Config;
use franxvan_site::controller::{LanguageSwitchController, SwitchOutcome, TransitionTiming};
use franxvan_site::document::InMemoryDocument;
use franxvan_site::i18n::{loader_for, BundleValidator, Language, LocaleStore};
use franxvan_site::quote_display::QuoteDisplay;
use franxvan_site::seo::SeoTagWriter;
use franxvan_site::storage::JsonFileStore;
use franxvan_site::structured_data::{BusinessProfile, StructuredDataWriter};
use std::sync::Arc;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored in production)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("franxvan_site=info".parse()?),
        )
        .init();

    info!("Starting FranxVan site");

    let config = Config::from_env()?;

    // Step 1: Load locale bundles; without them the page keeps its default strings
    let loader = loader_for(&config.locale_source, reqwest::Client::new());
    info!("Loading translations from {}", loader.describe());
    let locales = match LocaleStore::load(loader.as_ref()).await {
        Ok(store) => store,
        Err(e) => {
            error!("Failed to load translations: {}", e);
            LocaleStore::empty()
        }
    };
    let locales = Arc::new(locales);

    for (code, report) in BundleValidator::validate_store(&locales, Language::default_language().code()) {
        for message in &report.errors {
            error!("Bundle '{}': {}", code, message);
        }
        for message in &report.warnings {
            warn!("Bundle '{}': {}", code, message);
        }
    }

    // Step 2: Wire the page and its language observers
    let document = Arc::new(InMemoryDocument::site_template());
    let preferences = Arc::new(JsonFileStore::new(config.preference_file.clone()));

    let quote_display = Arc::new(QuoteDisplay::new(locales.clone(), document.clone()));
    let timing = TransitionTiming::new(config.transition);
    let mut controller =
        LanguageSwitchController::new(locales.clone(), document.clone(), preferences)
            .with_timing(timing);
    controller.register(Arc::new(SeoTagWriter::new(
        locales.clone(),
        document.clone(),
        config.site_url.clone(),
    )));
    controller.register(Arc::new(StructuredDataWriter::new(
        locales.clone(),
        document.clone(),
        BusinessProfile::franxvan(),
    )));
    controller.register(quote_display.clone());

    // Step 3: Render in the starting language
    let language = controller.initialize(&config.browser_language).await;
    if !quote_display.populate(language.code()) {
        warn!("Price calculator not available on this page");
    }

    if let Some(target) = &config.switch_to {
        match controller.switch_language(target, true).await {
            // Let the fade-in finish before taking the snapshot
            SwitchOutcome::Switched => tokio::time::sleep(timing.fade_in * 2).await,
            outcome => warn!("Switch to '{}' not applied: {:?}", target, outcome),
        }
    }

    println!("{}", serde_json::to_string_pretty(&document.snapshot())?);
    Ok(())
}
