use crate::language::Language;
use anyhow::{Context, Result};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    #[serde(default = "default_api_url")]
    pub api_url: String,

    #[serde(default)]
    pub language: Language,

    #[serde(default = "default_timeout")]
    pub timeout: u64,

    #[serde(default = "default_camera_feed_path")]
    pub camera_feed_path: PathBuf,

    #[serde(default = "default_jpeg_quality")]
    pub jpeg_quality: u8,
}

fn default_api_url() -> String {
    "http://127.0.0.1:5000".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_camera_feed_path() -> PathBuf {
    PathBuf::from("/tmp/moodtune/frame.jpg")
}

fn default_jpeg_quality() -> u8 {
    90
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            language: Language::default(),
            timeout: default_timeout(),
            camera_feed_path: default_camera_feed_path(),
            jpeg_quality: default_jpeg_quality(),
        }
    }
}

impl Config {
    /// Load configuration from the default location (~/.config/moodtune/config.json)
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            tracing::info!(
                "Config file not found at {:?}, creating default config",
                config_path
            );
            let config = Self::default();
            config.save()?;
            return Ok(config);
        }

        let contents = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {:?}", config_path))?;

        let config = Self::from_json(&contents)
            .with_context(|| format!("Failed to parse config file: {:?}", config_path))?;

        tracing::info!("Loaded config from {:?}", config_path);
        Ok(config)
    }

    fn from_json(contents: &str) -> Result<Self> {
        Ok(serde_json::from_str(contents)?)
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let contents = serde_json::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(&config_path, contents)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;

        tracing::info!("Saved config to {:?}", config_path);
        Ok(())
    }

    /// Get the path to the configuration file
    fn config_path() -> Result<PathBuf> {
        let config_dir = if let Ok(dir) = std::env::var("XDG_CONFIG_HOME") {
            PathBuf::from(dir)
        } else {
            let home = std::env::var("HOME").context("HOME environment variable not set")?;
            PathBuf::from(home).join(".config")
        };

        Ok(config_dir.join("moodtune").join("config.json"))
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.api_url.is_empty() {
            return Err(anyhow::anyhow!("api_url cannot be empty"));
        }

        Url::parse(&self.api_url)
            .with_context(|| format!("api_url is not a valid URL: {}", self.api_url))?;

        if self.timeout == 0 {
            return Err(anyhow::anyhow!("timeout must be greater than zero"));
        }

        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(anyhow::anyhow!("jpeg_quality must be between 1 and 100"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_take_defaults() {
        let config = Config::from_json(r#"{"language":"ta"}"#).unwrap();

        assert_eq!(config.api_url, "http://127.0.0.1:5000");
        assert_eq!(config.language, Language::Ta);
        assert_eq!(config.timeout, 30);
        assert_eq!(config.jpeg_quality, 90);
        config.validate().unwrap();
    }

    #[test]
    fn test_unknown_language_is_rejected() {
        assert!(Config::from_json(r#"{"language":"fr"}"#).is_err());
    }

    #[test]
    fn test_validate() {
        let bad_url = Config {
            api_url: "not a url".to_string(),
            ..Config::default()
        };
        assert!(bad_url.validate().is_err());

        let zero_timeout = Config {
            timeout: 0,
            ..Config::default()
        };
        assert!(zero_timeout.validate().is_err());

        let bad_quality = Config {
            jpeg_quality: 0,
            ..Config::default()
        };
        assert!(bad_quality.validate().is_err());

        Config::default().validate().unwrap();
    }

    #[test]
    fn test_language_serializes_as_code() {
        let json = serde_json::to_string(&Config::default()).unwrap();
        assert!(json.contains(r#""language":"en""#));
    }
}
