use crate::errors::{GeminiError, GeminiResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_TEXT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_TTS_MODEL: &str = "gemini-2.5-flash-preview-tts";
pub const DEFAULT_TTS_VOICE: &str = "Algenib";

/// Configuration struct for the Gemini API
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub model_name: Option<String>,
    pub tts_model: Option<String>,
    pub tts_voice: Option<String>,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model_name: Some(DEFAULT_TEXT_MODEL.to_string()),
            tts_model: Some(DEFAULT_TTS_MODEL.to_string()),
            tts_voice: Some(DEFAULT_TTS_VOICE.to_string()),
        }
    }
}

impl GeminiConfig {
    /// Effective text/structured-output model name.
    pub fn text_model(&self) -> &str {
        self.model_name.as_deref().unwrap_or(DEFAULT_TEXT_MODEL)
    }

    /// Effective speech synthesis model name.
    pub fn speech_model(&self) -> &str {
        self.tts_model.as_deref().unwrap_or(DEFAULT_TTS_MODEL)
    }

    /// Effective prebuilt voice identity for speech synthesis.
    pub fn speech_voice(&self) -> &str {
        self.tts_voice.as_deref().unwrap_or(DEFAULT_TTS_VOICE)
    }

    /// Loads configuration from a file if it exists, otherwise returns the default config
    pub fn load_from_file(path: &Path) -> GeminiResult<Self> {
        if path.exists() {
            let content = fs::read_to_string(path)
                .map_err(|e| GeminiError::Config(format!("Failed to read config file: {}", e)))?;

            let config: Self = toml::from_str(&content)
                .map_err(|e| GeminiError::Config(format!("Failed to parse config file: {}", e)))?;

            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Saves configuration to a file
    pub fn save_to_file(&self, path: &Path) -> GeminiResult<()> {
        let content = toml::to_string(self)
            .map_err(|e| GeminiError::Config(format!("Failed to serialize config: {}", e)))?;

        // Ensure the directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                GeminiError::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        fs::write(path, content)
            .map_err(|e| GeminiError::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Merges this config with another config, preferring values from the other config if present
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            api_key: other.api_key.clone().or_else(|| self.api_key.clone()),
            model_name: other.model_name.clone().or_else(|| self.model_name.clone()),
            tts_model: other.tts_model.clone().or_else(|| self.tts_model.clone()),
            tts_voice: other.tts_voice.clone().or_else(|| self.tts_voice.clone()),
        }
    }

    /// Fills the API key from the `GEMINI_API_KEY` environment variable when
    /// the config itself carries none. Loads `.env` first if present.
    pub fn apply_env_key(&mut self) {
        let _ = dotenvy::dotenv();
        if self.api_key.is_none() {
            self.api_key = std::env::var("GEMINI_API_KEY").ok();
        }
    }
}

/// Helper function to get default config directory
pub fn get_default_config_dir(app_name: &str) -> GeminiResult<PathBuf> {
    let home_dir = dirs::home_dir()
        .ok_or_else(|| GeminiError::Config("Could not determine home directory".to_string()))?;

    Ok(home_dir.join(".config").join(app_name))
}

/// Helper function to get default config file path
pub fn get_default_config_file(app_name: &str) -> GeminiResult<PathBuf> {
    let config_dir = get_default_config_dir(app_name)?;
    Ok(config_dir.join("config.toml"))
}
