use serde::{Deserialize, Serialize};
use std::fs;
use std::net::SocketAddr;
use std::path::Path;

use studymate_core::config::{get_default_config_file, GeminiConfig};
use studymate_store::FirestoreConfig;

pub const DEFAULT_HTTP_ADDR: &str = "127.0.0.1:8080";

/// Top-level server configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP listen address, `127.0.0.1:8080` when unset.
    pub http_addr: Option<String>,
    /// Shared secret for verifying bearer tokens from the identity provider.
    pub auth_secret: Option<String>,
    pub gemini: GeminiConfig,
    /// Document-store backend; the in-memory store is used when absent.
    pub firestore: Option<FirestoreConfig>,
}

impl AppConfig {
    /// Loads configuration from a file if it exists, otherwise returns the default config
    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path)?;
            let config = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Loads from the unified config location (`~/.config/studymate/config.toml`)
    pub fn load_from_default() -> anyhow::Result<Self> {
        let path = get_default_config_file("studymate")
            .map_err(|e| anyhow::anyhow!("Configuration error: {}", e))?;
        Self::load_from_file(&path)
    }

    pub fn http_addr(&self) -> anyhow::Result<SocketAddr> {
        let raw = self.http_addr.as_deref().unwrap_or(DEFAULT_HTTP_ADDR);
        raw.parse()
            .map_err(|e| anyhow::anyhow!("Invalid http_addr '{}': {}", raw, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_parses_the_default_addr() {
        let config = AppConfig::default();
        assert_eq!(config.http_addr().unwrap().port(), 8080);
        assert!(config.firestore.is_none());
    }

    #[test]
    fn parses_a_full_toml_document() {
        let raw = r#"
            http_addr = "0.0.0.0:9000"
            auth_secret = "shh"

            [gemini]
            api_key = "k"
            model_name = "gemini-2.5-flash"

            [firestore]
            project_id = "studymate-dev"
        "#;
        let config: AppConfig = toml::from_str(raw).unwrap();

        assert_eq!(config.http_addr().unwrap().port(), 9000);
        assert_eq!(config.gemini.api_key.as_deref(), Some("k"));
        assert_eq!(
            config.firestore.as_ref().unwrap().project_id,
            "studymate-dev"
        );
    }

    #[test]
    fn bad_addr_is_an_error() {
        let config = AppConfig {
            http_addr: Some("nonsense".to_string()),
            ..Default::default()
        };
        assert!(config.http_addr().is_err());
    }
}
