use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::engine::filter::CharFilter;
use crate::engine::normalize::DEFAULT_MIN_CONTENT_CHARS;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_min_content_chars")]
    pub min_content_chars: usize,
    #[serde(default = "default_sanitize_symbols")]
    pub sanitize_symbols: bool,
    #[serde(default = "default_tick_rate_ms")]
    pub tick_rate_ms: u64,
    #[serde(default = "default_keep_results")]
    pub keep_results: usize,
    #[serde(default = "default_extraction_model")]
    pub extraction_model: String,
    #[serde(default = "default_extraction_api_key_env")]
    pub extraction_api_key_env: String,
    #[serde(default = "default_extraction_endpoint")]
    pub extraction_endpoint: String,
    #[serde(default = "default_extraction_timeout_secs")]
    pub extraction_timeout_secs: u64,
}

fn default_theme() -> String {
    "slate".to_string()
}
fn default_min_content_chars() -> usize {
    DEFAULT_MIN_CONTENT_CHARS
}
fn default_sanitize_symbols() -> bool {
    true
}
fn default_tick_rate_ms() -> u64 {
    100
}
fn default_keep_results() -> usize {
    500
}
fn default_extraction_model() -> String {
    "gemini-2.5-flash".to_string()
}
fn default_extraction_api_key_env() -> String {
    "GEMINI_API_KEY".to_string()
}
fn default_extraction_endpoint() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}
fn default_extraction_timeout_secs() -> u64 {
    120
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            min_content_chars: default_min_content_chars(),
            sanitize_symbols: default_sanitize_symbols(),
            tick_rate_ms: default_tick_rate_ms(),
            keep_results: default_keep_results(),
            extraction_model: default_extraction_model(),
            extraction_api_key_env: default_extraction_api_key_env(),
            extraction_endpoint: default_extraction_endpoint(),
            extraction_timeout_secs: default_extraction_timeout_secs(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path)?;
            let mut config: Config = toml::from_str(&content)?;
            config.validate();
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Store a theme choice in the file at `path`, leaving every other saved
    /// setting as it is on disk.
    pub fn save_theme(path: &Path, theme: &str) -> Result<()> {
        let mut on_disk = Self::load_from(path)?;
        on_disk.theme = theme.to_string();
        on_disk.save_to(path)
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("typen")
            .join("config.toml")
    }

    /// Clamp numeric settings into usable ranges.
    pub fn validate(&mut self) {
        self.min_content_chars = self.min_content_chars.clamp(1, 10_000);
        self.tick_rate_ms = self.tick_rate_ms.clamp(16, 1000);
        self.keep_results = self.keep_results.clamp(1, 100_000);
        self.extraction_timeout_secs = self.extraction_timeout_secs.clamp(5, 600);
        if self.extraction_endpoint.trim().is_empty() {
            self.extraction_endpoint = default_extraction_endpoint();
        }
        self.extraction_endpoint = self.extraction_endpoint.trim_end_matches('/').to_string();
    }

    pub fn char_filter(&self) -> CharFilter {
        CharFilter::typing(self.sanitize_symbols)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_serde_defaults_from_empty() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.min_content_chars, 10);
        assert!(config.sanitize_symbols);
        assert_eq!(config.tick_rate_ms, 100);
        assert_eq!(config.extraction_api_key_env, "GEMINI_API_KEY");
    }

    #[test]
    fn test_config_partial_file_keeps_defaults() {
        let toml_str = r#"
theme = "paper"
min_content_chars = 5
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.theme, "paper");
        assert_eq!(config.min_content_chars, 5);
        assert_eq!(config.keep_results, 500);
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let config = Config::default();
        let serialized = toml::to_string_pretty(&config).unwrap();
        let deserialized: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(config.theme, deserialized.theme);
        assert_eq!(config.extraction_model, deserialized.extraction_model);
        assert_eq!(config.extraction_endpoint, deserialized.extraction_endpoint);
    }

    #[test]
    fn test_validate_clamps_values() {
        let mut config = Config::default();
        config.min_content_chars = 0;
        config.tick_rate_ms = 5;
        config.keep_results = 0;
        config.extraction_endpoint = "https://example.test/v1/".to_string();
        config.validate();
        assert_eq!(config.min_content_chars, 1);
        assert_eq!(config.tick_rate_ms, 16);
        assert_eq!(config.keep_results, 1);
        assert_eq!(config.extraction_endpoint, "https://example.test/v1");
    }

    #[test]
    fn test_save_theme_keeps_other_saved_values() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "min_content_chars = 40\n").unwrap();

        Config::save_theme(&path, "ember").unwrap();

        let saved = Config::load_from(&path).unwrap();
        assert_eq!(saved.theme, "ember");
        assert_eq!(saved.min_content_chars, 40);
    }
}
