//! Markast Config
//!
//! This crate handles configuration loading and management
//! for markast, supporting TOML configuration files.
//!
//! # Overview
//!
//! Configuration is loaded from platform-specific locations:
//! - Linux: `~/.config/markast/config.toml`
//! - macOS: `~/Library/Application Support/markast/config.toml`
//! - Windows: `%APPDATA%\markast\config.toml`
//!
//! The `[parser]` section maps onto [`ParserOptions`], the `[html]` section
//! onto [`HtmlConfig`].
//!
//! # Example
//!
//! ```no_run
//! use markast_config::Config;
//!
//! // Load config with defaults
//! let config = Config::load().unwrap();
//!
//! // Or load with an override file
//! let config = Config::load_with_override(Some("./custom.toml")).unwrap();
//! ```

mod html;

pub use html::{HtmlConfig, SoftBreak};
pub use markast_core::ParserOptions;

use markast_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default TOML configuration string.
const DEFAULT_TOML: &str = r#"[parser]
GFM                  = true
StrictMode           = false
MaxNestingDepth      = 32
TrackSourceLocations = true
MaxParsingTime       = 0.0
MaxStalledIterations = 64
MaxEmptyResults      = 256

[html]
LanguagePrefix  = "language-"
DiagramLanguage = "mermaid"
SoftBreak       = "newline"
"#;

/// Main configuration structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Parser options
    #[serde(default)]
    pub parser: ParserOptions,

    /// HTML output options
    #[serde(default)]
    pub html: HtmlConfig,
}

impl Default for Config {
    fn default() -> Self {
        // Parse the default TOML to ensure consistency
        toml::from_str(DEFAULT_TOML).expect("Default TOML should be valid")
    }
}

impl Config {
    /// Returns the default TOML configuration string.
    ///
    /// # Example
    ///
    /// ```
    /// use markast_config::Config;
    /// let toml = Config::default_toml();
    /// assert!(toml.contains("[parser]"));
    /// assert!(toml.contains("[html]"));
    /// ```
    pub fn default_toml() -> &'static str {
        DEFAULT_TOML
    }

    /// Returns the platform-specific configuration file path.
    pub fn config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "markast")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Returns the platform-specific configuration directory.
    pub fn config_dir() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "markast")
            .map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Ensures the config file exists, creating it with defaults if not.
    ///
    /// Returns the path to the config file.
    pub fn ensure_config_file() -> Result<PathBuf> {
        let config_dir = Self::config_dir()
            .ok_or_else(|| Error::Config("Could not determine config directory".into()))?;

        std::fs::create_dir_all(&config_dir)?;

        let config_path = config_dir.join("config.toml");
        if !config_path.exists() {
            std::fs::write(&config_path, DEFAULT_TOML)?;
        }

        Ok(config_path)
    }

    /// Load configuration from the default platform-specific path.
    ///
    /// If no config file exists, returns the default configuration.
    pub fn load() -> Result<Self> {
        if let Some(config_path) = Self::config_path() {
            if config_path.exists() {
                return Self::load_from(&config_path);
            }
        }
        Ok(Self::default())
    }

    /// Load configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
            .map_err(|e| Error::Config(format!("Parse error in {}: {}", path.display(), e)))
    }

    /// Parse configuration from a TOML string.
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("Parse error: {}", e)))
    }

    /// Load configuration with an optional override file or string.
    ///
    /// 1. Load the base config from the default location
    /// 2. If an override is provided:
    ///    - If it's a path to an existing file, load and merge it
    ///    - Otherwise, treat it as a TOML string and merge that
    ///
    /// Only the keys present in the override replace base values.
    pub fn load_with_override(override_config: Option<&str>) -> Result<Self> {
        let base = Self::load()?;
        match override_config {
            Some(override_str) => base.with_override(override_str),
            None => Ok(base),
        }
    }

    /// Apply an override (file path or inline TOML) on top of this config.
    pub fn with_override(&self, override_str: &str) -> Result<Self> {
        let override_path = Path::new(override_str);
        let override_toml = if override_path.is_file() {
            std::fs::read_to_string(override_path)?
        } else {
            override_str.to_string()
        };

        let overrides: toml::Table = toml::from_str(&override_toml)
            .map_err(|e| Error::Config(format!("Override parse error: {}", e)))?;
        let mut merged = match toml::Value::try_from(self) {
            Ok(toml::Value::Table(table)) => table,
            Ok(_) => return Err(Error::Config("Config did not serialize to a table".into())),
            Err(e) => return Err(Error::Config(format!("Serialization error: {}", e))),
        };
        merge_tables(&mut merged, overrides);

        toml::Value::Table(merged)
            .try_into()
            .map_err(|e| Error::Config(format!("Override parse error: {}", e)))
    }

    /// Merge another config into this one.
    ///
    /// Values from `other` take precedence over values in `self`.
    pub fn merge(&mut self, other: &Config) {
        self.parser = other.parser.clone();
        self.html.merge(&other.html);
    }

    /// Save configuration to a file.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Serialization error: {}", e)))?;
        std::fs::write(path, toml_string)?;
        Ok(())
    }
}

/// Recursively merge `overrides` into `base`. Nested tables merge key by
/// key; any other value replaces the base value.
fn merge_tables(base: &mut toml::Table, overrides: toml::Table) {
    for (key, value) in overrides {
        let incoming = match value {
            toml::Value::Table(incoming) => incoming,
            other => {
                base.insert(key, other);
                continue;
            }
        };
        if let Some(toml::Value::Table(existing)) = base.get_mut(&key) {
            merge_tables(existing, incoming);
            continue;
        }
        base.insert(key, toml::Value::Table(incoming));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.parser.enable_gfm_extensions);
        assert_eq!(config.parser.max_nesting_depth, 32);
        assert_eq!(config.html.language_prefix, "language-");
        assert_eq!(config.html.soft_break, SoftBreak::Newline);
    }

    #[test]
    fn test_default_toml_matches_defaults() {
        let config: Config = toml::from_str(DEFAULT_TOML).unwrap();
        assert_eq!(config.parser, ParserOptions::default());
        assert_eq!(config.html, HtmlConfig::default());
    }

    #[test]
    fn test_merge() {
        let mut base = Config::default();
        let override_config: Config = toml::from_str(
            r#"
            [parser]
            GFM = false
            [html]
            SoftBreak = "space"
        "#,
        )
        .unwrap();

        base.merge(&override_config);
        assert!(!base.parser.enable_gfm_extensions);
        assert_eq!(base.html.soft_break, SoftBreak::Space);
    }

    #[test]
    fn test_inline_override_keeps_other_keys() {
        let mut base = Config::default();
        base.parser.max_nesting_depth = 8;

        let config = base.with_override("[parser]\nStrictMode = true").unwrap();
        assert!(config.parser.strict_mode);
        assert_eq!(config.parser.max_nesting_depth, 8);
        assert_eq!(config.html, HtmlConfig::default());
    }

    #[test]
    fn test_invalid_override() {
        let err = Config::default().with_override("[parser\nGFM = ").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_config_path() {
        // Containers may have no home directory
        if let Some(p) = Config::config_path() {
            assert!(p.to_string_lossy().contains("markast"));
        }
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = std::env::temp_dir().join(format!("markast-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");

        let mut config = Config::default();
        config.parser.max_parsing_time = 2.5;
        config.html.diagram_language = String::new();
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
