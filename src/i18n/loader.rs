//! Locale resource loading.
//!
//! The resource is fetched once at startup. Loaders only move bytes; parsing
//! happens in [`LocaleStore::from_json_str`](crate::i18n::LocaleStore::from_json_str).

use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    /// Transport failure: network error, HTTP error status, missing file
    #[error("locale resource unreachable: {0}")]
    Unreachable(String),

    #[error("locale resource malformed: {0}")]
    Malformed(String),
}

/// Capability to fetch the raw locale resource.
#[async_trait]
pub trait ResourceLoader: Send + Sync {
    async fn fetch(&self) -> Result<String, LoadError>;

    /// Human-readable source for log lines.
    fn describe(&self) -> String;
}

/// Fetches the resource over HTTP(S).
pub struct HttpLoader {
    client: reqwest::Client,
    url: String,
}

impl HttpLoader {
    pub fn new(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl ResourceLoader for HttpLoader {
    async fn fetch(&self) -> Result<String, LoadError> {
        debug!("Fetching locale resource from {}", self.url);

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| LoadError::Unreachable(format!("request to {} failed: {}", self.url, e)))?;

        if !response.status().is_success() {
            return Err(LoadError::Unreachable(format!(
                "HTTP error! status: {}",
                response.status()
            )));
        }

        response
            .text()
            .await
            .map_err(|e| LoadError::Unreachable(format!("failed to read body: {}", e)))
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

/// Reads the resource from the local filesystem.
pub struct FileLoader {
    path: PathBuf,
}

impl FileLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ResourceLoader for FileLoader {
    async fn fetch(&self) -> Result<String, LoadError> {
        tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            LoadError::Unreachable(format!("failed to read {}: {}", self.path.display(), e))
        })
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Serves a resource held in memory.
pub struct StaticLoader {
    body: String,
}

impl StaticLoader {
    pub fn new(body: impl Into<String>) -> Self {
        Self { body: body.into() }
    }
}

#[async_trait]
impl ResourceLoader for StaticLoader {
    async fn fetch(&self) -> Result<String, LoadError> {
        Ok(self.body.clone())
    }

    fn describe(&self) -> String {
        "<in-memory>".to_string()
    }
}

/// Pick a loader for a configured source: http(s) URLs go over the network,
/// anything else is a file path.
pub fn loader_for(source: &str, client: reqwest::Client) -> Box<dyn ResourceLoader> {
    if source.starts_with("http://") || source.starts_with("https://") {
        Box::new(HttpLoader::new(client, source))
    } else {
        Box::new(FileLoader::new(source))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::LocaleStore;
    use tempfile::TempDir;
    use wiremock::{
        matchers::{method, path},
        Mock, MockServer, ResponseTemplate,
    };

    const RESOURCE: &str = r#"{"nl": {"nav": {"home": "Home"}}, "en": {"nav": {"home": "Home"}}}"#;

    // ==================== HttpLoader Tests ====================

    #[tokio::test]
    async fn test_http_loader_success() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data/translations.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string(RESOURCE))
            .expect(1)
            .mount(&mock_server)
            .await;

        let url = format!("{}/data/translations.json", mock_server.uri());
        let loader = HttpLoader::new(reqwest::Client::new(), url);

        let store = LocaleStore::load(&loader).await.expect("Should load");
        assert_eq!(store.language_codes(), vec!["en", "nl"]);
    }

    #[tokio::test]
    async fn test_http_loader_error_status_is_unreachable() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let loader = HttpLoader::new(reqwest::Client::new(), mock_server.uri());
        let err = loader.fetch().await.unwrap_err();

        assert!(matches!(err, LoadError::Unreachable(msg) if msg.contains("404")));
    }

    #[tokio::test]
    async fn test_http_loader_bad_body_is_malformed() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&mock_server)
            .await;

        let loader = HttpLoader::new(reqwest::Client::new(), mock_server.uri());
        let err = LocaleStore::load(&loader).await.unwrap_err();

        assert!(matches!(err, LoadError::Malformed(_)));
    }

    #[tokio::test]
    async fn test_http_loader_connection_refused() {
        // Nothing listens on port 1
        let loader = HttpLoader::new(reqwest::Client::new(), "http://127.0.0.1:1/translations.json");
        let err = loader.fetch().await.unwrap_err();
        assert!(matches!(err, LoadError::Unreachable(_)));
    }

    // ==================== FileLoader Tests ====================

    #[tokio::test]
    async fn test_file_loader_reads_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let file = temp_dir.path().join("translations.json");
        std::fs::write(&file, RESOURCE).expect("Failed to write resource");

        let loader = FileLoader::new(&file);
        let store = LocaleStore::load(&loader).await.expect("Should load");

        assert_eq!(store.get("nl", "nav", "home"), Some("Home"));
        assert!(loader.describe().ends_with("translations.json"));
    }

    #[tokio::test]
    async fn test_file_loader_missing_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let loader = FileLoader::new(temp_dir.path().join("missing.json"));

        let err = loader.fetch().await.unwrap_err();
        assert!(matches!(err, LoadError::Unreachable(msg) if msg.contains("missing.json")));
    }

    // ==================== loader_for Tests ====================

    #[test]
    fn test_loader_for_picks_transport() {
        let client = reqwest::Client::new();
        assert_eq!(
            loader_for("https://www.franxvan.nl/data/translations.json", client.clone()).describe(),
            "https://www.franxvan.nl/data/translations.json"
        );
        assert_eq!(
            loader_for("data/translations.json", client).describe(),
            "data/translations.json"
        );
    }

    #[tokio::test]
    async fn test_static_loader() {
        let store = LocaleStore::load(&StaticLoader::new(RESOURCE)).await.unwrap();
        assert!(store.has_language("en"));
    }
}
