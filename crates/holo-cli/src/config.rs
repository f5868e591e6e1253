//! Configuration file support

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration for holo
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Endpoint that answers questions
    pub endpoint: Option<String>,
    /// Whether to use TUI mode by default
    pub tui: Option<bool>,
    /// Color theme ("dark" or "light")
    pub theme: Option<String>,
}

impl Config {
    /// Get the config directory
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("holo")
    }

    /// Get the config file path
    pub fn config_path() -> PathBuf {
        if let Ok(path) = std::env::var("HOLO_CONFIG_PATH") {
            return PathBuf::from(path);
        }
        Self::config_dir().join("config.toml")
    }

    /// Load config from the default location
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    /// Load config from `path`, falling back to defaults with a warning
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("Warning: Failed to parse config file: {}", e);
                    Self::default()
                }
            },
            Err(e) => {
                eprintln!("Warning: Failed to read config file: {}", e);
                Self::default()
            }
        }
    }

    /// Save config to `path`
    pub fn save_to(&self, path: &Path) -> std::io::Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }

        let content = toml::to_string_pretty(self).map_err(std::io::Error::other)?;
        fs::write(path, content)
    }

    /// Create a default config file if it doesn't exist
    pub fn init() -> std::io::Result<PathBuf> {
        let path = Self::config_path();
        if path.exists() {
            return Ok(path);
        }

        let default_config = Config {
            endpoint: Some(holo_ai::DEFAULT_ENDPOINT.to_string()),
            tui: Some(true),
            theme: Some("dark".to_string()),
        };

        default_config.save_to(&path)?;
        Ok(path)
    }

    /// Endpoint to use: flag, then file, then built-in
    pub fn resolve_endpoint(&self, flag: Option<String>) -> String {
        flag.or_else(|| self.endpoint.clone())
            .unwrap_or_else(|| holo_ai::DEFAULT_ENDPOINT.to_string())
    }

    /// Whether to start the TUI
    pub fn resolve_tui(&self, no_tui_flag: bool) -> bool {
        !no_tui_flag && self.tui.unwrap_or(true)
    }

    /// Theme name to use: flag, then file, then "dark"
    pub fn resolve_theme(&self, flag: Option<String>) -> String {
        flag.or_else(|| self.theme.clone())
            .unwrap_or_else(|| "dark".to_string())
    }
}

/// Generate example config content
pub fn example_config() -> &'static str {
    r#"# holo configuration file
# Place at ~/.config/holo/config.toml (Linux), ~/Library/Application Support/holo/config.toml (Mac)
# or %APPDATA%\holo\config.toml (Windows). HOLO_CONFIG_PATH overrides the location.

# Endpoint that answers questions (POST {"question": ...} -> {"answer": ...})
endpoint = "https://crustdata-challenge-yyyv.onrender.com/ask"

# Whether to use TUI mode by default (true by default)
# Set to false for simple stdin/stdout mode
tui = true

# Color theme: "dark" or "light"
theme = "dark"
"#
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("holo-config-test-{}-{}", std::process::id(), name))
            .join("config.toml")
    }

    #[test]
    fn test_example_config_parses() {
        let config: Config = toml::from_str(example_config()).unwrap();
        assert_eq!(config.endpoint.as_deref(), Some(holo_ai::DEFAULT_ENDPOINT));
        assert_eq!(config.tui, Some(true));
        assert_eq!(config.theme.as_deref(), Some("dark"));
    }

    #[test]
    fn test_missing_fields_default() {
        let config: Config = toml::from_str("tui = false").unwrap();
        assert_eq!(config.endpoint, None);
        assert_eq!(config.tui, Some(false));
    }

    #[test]
    fn test_precedence_flag_then_file_then_default() {
        let empty = Config::default();
        assert_eq!(empty.resolve_endpoint(None), holo_ai::DEFAULT_ENDPOINT);
        assert!(empty.resolve_tui(false));
        assert_eq!(empty.resolve_theme(None), "dark");

        let file = Config {
            endpoint: Some("http://file.local/ask".into()),
            tui: Some(false),
            theme: Some("light".into()),
        };
        assert_eq!(file.resolve_endpoint(None), "http://file.local/ask");
        assert_eq!(
            file.resolve_endpoint(Some("http://flag.local/ask".into())),
            "http://flag.local/ask"
        );
        assert!(!file.resolve_tui(false));
        assert!(!Config::default().resolve_tui(true));
        assert_eq!(file.resolve_theme(Some("dark".into())), "dark");
    }

    #[test]
    fn test_save_then_load() {
        let path = temp_path("roundtrip");
        let config = Config {
            endpoint: Some("http://127.0.0.1:9/ask".into()),
            tui: None,
            theme: Some("light".into()),
        };
        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path), config);
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_invalid_file_falls_back_to_defaults() {
        let path = temp_path("invalid");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "endpoint = [not toml").unwrap();
        assert_eq!(Config::load_from(&path), Config::default());
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_missing_file_is_default() {
        assert_eq!(
            Config::load_from(&temp_path("absent")),
            Config::default()
        );
    }
}
