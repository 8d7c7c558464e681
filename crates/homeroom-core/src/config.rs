//! Homeroom configuration
//!
//! Loaded from an optional TOML file; every field has a default so a partial
//! (or missing) file is valid.

use crate::error::ConfigError;
use crate::generator::{PromptTemplate, DEFAULT_MODEL, DEFAULT_WRAP_THRESHOLD};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default configuration file name
pub const DEFAULT_CONFIG_FILE: &str = "homeroom.toml";

/// Default secrets file location
pub const DEFAULT_SECRETS_FILE: &str = ".homeroom/secrets.toml";

/// Default Gemini API base URL
pub const DEFAULT_API_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Default report file name
pub const DEFAULT_OUTPUT_FILE: &str = "students_behavior_descriptions.xlsx";

/// Homeroom configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HomeroomConfig {
    /// Model identifier sent to the endpoint
    pub model: String,
    /// Base URL of the text-generation API
    pub api_base_url: String,
    /// Per-call timeout in seconds
    pub request_timeout_secs: u64,
    /// Sentence length that triggers a line break in generated text
    pub wrap_threshold: usize,
    /// Student count when none is given
    pub default_students: usize,
    /// Report output path
    pub output_path: PathBuf,
    /// Secrets file consulted for the API key
    pub secrets_path: PathBuf,
}

impl HomeroomConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With model identifier
    #[inline]
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// With API base URL
    #[inline]
    #[must_use]
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    /// With request timeout
    #[inline]
    #[must_use]
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.request_timeout_secs = secs;
        self
    }

    /// With output path
    #[inline]
    #[must_use]
    pub fn with_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = path.into();
        self
    }

    /// With secrets path
    #[inline]
    #[must_use]
    pub fn with_secrets_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.secrets_path = path.into();
        self
    }

    /// Prompt template derived from this configuration
    #[inline]
    #[must_use]
    pub fn prompt_template(&self) -> PromptTemplate {
        PromptTemplate {
            wrap_threshold: self.wrap_threshold,
        }
    }

    /// Parse configuration from TOML text
    ///
    /// # Errors
    /// - `ConfigError::Toml` on syntax or unknown keys
    /// - `ConfigError::InvalidValue` on out-of-range values
    pub fn from_toml_str(text: &str, origin: &Path) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text).map_err(|e| ConfigError::toml_error(origin, e))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file, falling back to defaults if absent
    ///
    /// # Errors
    /// - `ConfigError::Io` if the file exists but cannot be read
    /// - any error of [`Self::from_toml_str`]
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(text) => {
                tracing::debug!(path = %path.display(), "loaded configuration file");
                Self::from_toml_str(&text, path)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no configuration file, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(ConfigError::io_error(path, e)),
        }
    }

    /// Check values that serde cannot
    ///
    /// # Errors
    /// - `ConfigError::InvalidValue` naming the first offending key
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.model.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "model",
                reason: "must not be empty".to_string(),
            });
        }
        if !(self.api_base_url.starts_with("http://") || self.api_base_url.starts_with("https://")) {
            return Err(ConfigError::InvalidValue {
                key: "api_base_url",
                reason: format!("'{}' is not an http(s) URL", self.api_base_url),
            });
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "request_timeout_secs",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.wrap_threshold == 0 {
            return Err(ConfigError::InvalidValue {
                key: "wrap_threshold",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.default_students == 0 {
            return Err(ConfigError::InvalidValue {
                key: "default_students",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

impl Default for HomeroomConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout_secs: 60,
            wrap_threshold: DEFAULT_WRAP_THRESHOLD,
            default_students: 1,
            output_path: PathBuf::from(DEFAULT_OUTPUT_FILE),
            secrets_path: PathBuf::from(DEFAULT_SECRETS_FILE),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults() {
        let config = HomeroomConfig::new();
        assert_eq!(config.model, "gemini-1.5-flash-latest");
        assert_eq!(config.wrap_threshold, 70);
        assert_eq!(config.output_path, PathBuf::from("students_behavior_descriptions.xlsx"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let config = HomeroomConfig::from_toml_str(
            "model = \"gemini-2.0-flash\"\nwrap_threshold = 60\n",
            Path::new("inline.toml"),
        )
        .unwrap();
        assert_eq!(config.model, "gemini-2.0-flash");
        assert_eq!(config.wrap_threshold, 60);
        assert_eq!(config.request_timeout_secs, 60);
        assert_eq!(config.prompt_template().wrap_threshold, 60);
    }

    #[test]
    fn unknown_key_is_rejected() {
        let err = HomeroomConfig::from_toml_str("modle = \"x\"", Path::new("bad.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Toml { .. }));
        assert!(err.to_string().contains("bad.toml"));
    }

    #[test]
    fn invalid_values_are_rejected() {
        let err = HomeroomConfig::from_toml_str("request_timeout_secs = 0", Path::new("c.toml"))
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue { key: "request_timeout_secs", .. }
        ));

        let err = HomeroomConfig::new()
            .with_api_base_url("ftp://example.com")
            .validate()
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key: "api_base_url", .. }));
    }

    #[test]
    fn load_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = HomeroomConfig::load(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, HomeroomConfig::default());
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("homeroom.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "default_students = 25").unwrap();
        writeln!(file, "output_path = \"out/class-3.xlsx\"").unwrap();

        let config = HomeroomConfig::load(&path).unwrap();
        assert_eq!(config.default_students, 25);
        assert_eq!(config.output_path, PathBuf::from("out/class-3.xlsx"));
    }
}
