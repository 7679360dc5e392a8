//! Configuration file support for bookpace.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/bookpace/config.toml`.

use crate::{Cadence, Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub reading: ReadingConfig,
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Defaults applied when a new book omits the rate or cadence
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ReadingConfig {
    #[serde(default = "default_pages_per_day")]
    pub default_pages_per_day: i32,

    /// "daily" or "work"
    #[serde(default = "default_cadence")]
    pub default_cadence: String,
}

impl Default for ReadingConfig {
    fn default() -> Self {
        Self {
            default_pages_per_day: default_pages_per_day(),
            default_cadence: default_cadence(),
        }
    }
}

impl ReadingConfig {
    /// Parse the configured cadence, falling back to daily on bad values
    pub fn cadence(&self) -> Cadence {
        match self.default_cadence.parse() {
            Ok(cadence) => cadence,
            Err(_) => {
                tracing::warn!(
                    "Unknown default_cadence '{}' in config, using daily",
                    self.default_cadence
                );
                Cadence::Standard
            }
        }
    }
}

// Default value functions
fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| {
        let home = std::env::var("HOME").expect("HOME environment variable not set");
        PathBuf::from(home).join(".local/share")
    });
    base.join("bookpace")
}

fn default_pages_per_day() -> i32 {
    10
}

fn default_cadence() -> String {
    "daily".into()
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| {
            let home = std::env::var("HOME").expect("HOME environment variable not set");
            PathBuf::from(home).join(".config")
        });
        base.join("bookpace").join("config.toml")
    }

    /// Save the current configuration to the default path
    pub fn save(&self) -> Result<()> {
        let config_path = Self::default_config_path();
        self.save_to(&config_path)
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.reading.default_pages_per_day, 10);
        assert_eq!(config.reading.cadence(), Cadence::Standard);
    }

    #[test]
    fn test_config_roundtrip() {
        let config = Config::default();
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();

        assert_eq!(
            config.reading.default_pages_per_day,
            parsed.reading.default_pages_per_day
        );
        assert_eq!(config.reading.default_cadence, parsed.reading.default_cadence);
    }

    #[test]
    fn test_partial_config() {
        let toml_str = r#"
[reading]
default_cadence = "work"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.reading.cadence(), Cadence::Work);
        assert_eq!(config.reading.default_pages_per_day, 10); // default
    }

    #[test]
    fn test_bad_cadence_falls_back_to_daily() {
        let toml_str = r#"
[reading]
default_cadence = "weekends"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.reading.cadence(), Cadence::Standard);
    }
}
