use anyhow::{Context, Result};
use confyg::{env, Confygery};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::protocol::{Protocol, SemanticTuning};

/// Largest `max_results` the semantic endpoint accepts.
pub const MAX_RESULTS_LIMIT: u32 = 200;

/// Configuration for lyrica.
///
/// Configuration is loaded from multiple sources with the following priority:
/// 1. CLI arguments (highest priority)
/// 2. Environment variables (LYRICA_* prefix)
/// 3. Config file (~/.config/lyrica/config.toml)
/// 4. Built-in defaults (lowest priority)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the lyric search backend.
    ///
    /// Can be set via:
    /// - CLI: --backend-url http://host:port
    /// - ENV: LYRICA_BACKEND_URL
    /// - Config: backend_url = "..."
    /// - Default: http://localhost:8000
    #[serde(default = "default_backend_url")]
    pub backend_url: String,

    /// Which search endpoint to use: "semantic" (default) or "simple".
    #[serde(default)]
    pub protocol: Protocol,

    /// Minimum similarity (0.0 to 1.0) sent to the semantic endpoint.
    /// Left to the backend when unset.
    #[serde(default)]
    pub similarity_threshold: Option<f64>,

    /// Maximum number of songs (1 to 200) requested from the semantic
    /// endpoint. Left to the backend when unset.
    #[serde(default)]
    pub max_results: Option<u32>,

    /// Per-request timeout in seconds. Requests never time out when unset.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logger settings, applied by the CLI when it installs the logger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// One of: trace, debug, info, warn, error.
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_true")]
    pub coloured: bool,
    #[serde(default)]
    pub report_caller: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            coloured: true,
            report_caller: false,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: default_backend_url(),
            protocol: Protocol::default(),
            similarity_threshold: None,
            max_results: None,
            request_timeout_secs: None,
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from file and environment variables.
    ///
    /// Searches for config file at: ~/.config/lyrica/config.toml
    /// Reads environment variables with LYRICA_ prefix.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed, or
    /// if a value is out of range.
    pub fn load() -> Result<Self> {
        Self::load_from(&config_file_path())
    }

    /// Load configuration using `config_path` instead of the default file.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        let mut builder = Confygery::new().context("Failed to create config builder")?;

        if config_path.exists() {
            let path_str = config_path
                .to_str()
                .ok_or_else(|| anyhow::anyhow!("Config path contains invalid UTF-8"))?;
            builder
                .add_file(path_str)
                .context("Failed to load config file")?;
        }

        let env_opts = env::Options::with_top_level("lyrica");
        builder
            .add_env(env_opts)
            .context("Failed to load environment variables")?;

        let config: Self = builder.build().context("Failed to build configuration")?;
        config.validate()?;

        Ok(config)
    }

    /// Apply CLI overrides on top of loaded configuration.
    #[must_use]
    pub fn with_overrides(mut self, backend_url: Option<String>, protocol: Option<Protocol>) -> Self {
        if let Some(url) = backend_url {
            self.backend_url = url;
        }
        if let Some(protocol) = protocol {
            self.protocol = protocol;
        }
        self
    }

    /// Check that tuning values are within the ranges the backend accepts.
    pub fn validate(&self) -> Result<()> {
        if let Some(threshold) = self.similarity_threshold {
            if !(0.0..=1.0).contains(&threshold) {
                anyhow::bail!("similarity_threshold must be between 0.0 and 1.0, got {}", threshold);
            }
        }
        if let Some(max) = self.max_results {
            if max == 0 || max > MAX_RESULTS_LIMIT {
                anyhow::bail!(
                    "max_results must be between 1 and {}, got {}",
                    MAX_RESULTS_LIMIT,
                    max
                );
            }
        }
        if self.request_timeout_secs == Some(0) {
            anyhow::bail!("request_timeout_secs must be positive when set");
        }
        Ok(())
    }

    pub fn tuning(&self) -> SemanticTuning {
        SemanticTuning {
            similarity_threshold: self.similarity_threshold,
            max_results: self.max_results,
        }
    }
}

fn default_backend_url() -> String {
    String::from("http://localhost:8000")
}

fn default_log_level() -> String {
    String::from("info")
}

fn default_true() -> bool {
    true
}

/// Get the config file path.
///
/// Returns:
/// - Linux: ~/.config/lyrica/config.toml
/// - macOS: ~/Library/Application Support/lyrica/config.toml
/// - Windows: %APPDATA%\lyrica\config.toml
pub fn config_file_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("lyrica")
        .join("config.toml")
}

/// Get the example config file content.
pub fn example_config() -> &'static str {
    r#"# Lyrica Configuration File
#
# Configuration is loaded from multiple sources with the following priority:
# 1. CLI arguments (highest priority)
# 2. Environment variables (LYRICA_* prefix)
# 3. This config file
# 4. Built-in defaults (lowest priority)

# Base URL of the lyric search backend
#
# Can also be set via:
# - CLI: lyrica --backend-url http://host:8000 search ...
# - Environment: LYRICA_BACKEND_URL=http://host:8000
backend_url = "http://localhost:8000"

# Search endpoint
#
# "semantic" - /semantic-search, supports exclude terms (default)
# "simple"   - /search, keyword match on the include terms only
protocol = "semantic"

# Semantic search tuning (optional; the backend picks defaults when unset)
#similarity_threshold = 0.2
#max_results = 10

# Per-request timeout in seconds (optional; no timeout when unset)
#request_timeout_secs = 30

[logging]
level = "info"
coloured = true
report_caller = false
"#
}

/// Create default config file if it doesn't exist.
///
/// Returns true if a new file was created, false if it already existed.
pub fn ensure_config_file() -> Result<bool> {
    write_example_config(&config_file_path())
}

fn write_example_config(config_path: &Path) -> Result<bool> {
    if config_path.exists() {
        return Ok(false);
    }

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent).context("Failed to create config directory")?;
    }

    std::fs::write(config_path, example_config()).context("Failed to write config file")?;

    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.backend_url, "http://localhost:8000");
        assert_eq!(config.protocol, Protocol::Semantic);
        assert!(config.similarity_threshold.is_none());
        assert!(config.request_timeout_secs.is_none());
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_config_load() {
        // Should not fail even if config file doesn't exist
        let result = Config::load();
        assert!(result.is_ok());
    }

    #[test]
    fn test_load_from_missing_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config::load_from(&temp_dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.protocol, Protocol::Semantic);
    }

    #[test]
    fn test_example_config_parses() {
        let config: Config = toml_roundtrip(example_config());
        assert_eq!(config.backend_url, "http://localhost:8000");
        assert_eq!(config.protocol, Protocol::Semantic);
        assert!(config.max_results.is_none());
        assert!(config.logging.coloured);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_write_example_config_once() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("lyrica").join("config.toml");

        assert!(write_example_config(&path).unwrap());
        assert!(!write_example_config(&path).unwrap());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), example_config());
    }

    #[test]
    fn test_with_overrides() {
        let config = Config::default()
            .with_overrides(Some("http://10.0.0.2:8000".to_string()), Some(Protocol::Simple));
        assert_eq!(config.backend_url, "http://10.0.0.2:8000");
        assert_eq!(config.protocol, Protocol::Simple);

        let untouched = Config::default().with_overrides(None, None);
        assert_eq!(untouched.backend_url, "http://localhost:8000");
    }

    #[test]
    fn test_validate_rejects_out_of_range_tuning() {
        let config = Config {
            similarity_threshold: Some(1.5),
            ..Config::default()
        };
        assert!(config.validate().is_err());

        let config = Config {
            max_results: Some(0),
            ..Config::default()
        };
        assert!(config.validate().is_err());

        let config = Config {
            max_results: Some(201),
            ..Config::default()
        };
        assert!(config.validate().is_err());

        let config = Config {
            similarity_threshold: Some(0.2),
            max_results: Some(10),
            ..Config::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_tuning() {
        let config = Config {
            similarity_threshold: Some(0.2),
            max_results: Some(10),
            ..Config::default()
        };
        let tuning = config.tuning();
        assert_eq!(tuning.similarity_threshold, Some(0.2));
        assert_eq!(tuning.max_results, Some(10));
    }

    fn toml_roundtrip(text: &str) -> Config {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, text).unwrap();
        Config::load_from(&path).unwrap()
    }
}
