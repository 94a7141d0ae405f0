pub mod binder;
pub mod config;
pub mod controller;
pub mod document;
pub mod estimator;
pub mod i18n;
pub mod navigation;
pub mod pricing;
pub mod quote_display;
pub mod seo;
pub mod storage;
pub mod structured_data;
