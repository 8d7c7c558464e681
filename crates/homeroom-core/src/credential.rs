//! API credential resolution
//!
//! Sources are consulted in order; the first non-empty value wins. An empty
//! result means "no credential" and disables generation.

use crate::error::ConfigError;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// Key looked up in secrets files and the environment
pub const API_KEY_NAME: &str = "GEMINI_API_KEY";

/// A resolved credential and where it came from
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    value: String,
    source: String,
}

impl Credential {
    /// Create credential
    #[inline]
    pub fn new(value: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            source: source.into(),
        }
    }

    /// Secret value
    #[inline]
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.value
    }

    /// Name of the source that supplied it
    #[inline]
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("value", &"<redacted>")
            .field("source", &self.source)
            .finish()
    }
}

/// One place a credential may come from
pub trait CredentialSource {
    /// Source name for logs
    fn name(&self) -> String;

    /// Look up the credential; `Ok(None)` when this source has none
    ///
    /// # Errors
    /// Source-specific read or parse failures
    fn lookup(&self) -> Result<Option<String>, ConfigError>;
}

/// TOML secrets file with a top-level key
#[derive(Debug, Clone)]
pub struct SecretsFile {
    path: PathBuf,
    key: String,
}

impl SecretsFile {
    /// Secrets file holding [`API_KEY_NAME`]
    #[inline]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            key: API_KEY_NAME.to_string(),
        }
    }

    /// Path of the secrets file
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CredentialSource for SecretsFile {
    fn name(&self) -> String {
        format!("secrets file {}", self.path.display())
    }

    fn lookup(&self) -> Result<Option<String>, ConfigError> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(ConfigError::io_error(&self.path, e)),
        };
        let table: HashMap<String, toml::Value> =
            toml::from_str(&text).map_err(|e| ConfigError::toml_error(&self.path, e))?;
        Ok(table
            .get(&self.key)
            .and_then(toml::Value::as_str)
            .map(str::to_string))
    }
}

/// Process environment variable
#[derive(Debug, Clone)]
pub struct EnvVar {
    var: String,
}

impl EnvVar {
    /// Read [`API_KEY_NAME`]
    #[inline]
    #[must_use]
    pub fn api_key() -> Self {
        Self::named(API_KEY_NAME)
    }

    /// Read a custom variable
    #[inline]
    pub fn named(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl CredentialSource for EnvVar {
    fn name(&self) -> String {
        format!("environment variable {}", self.var)
    }

    fn lookup(&self) -> Result<Option<String>, ConfigError> {
        Ok(std::env::var(&self.var).ok())
    }
}

/// Ordered list of credential sources
#[derive(Default)]
pub struct CredentialChain {
    sources: Vec<Box<dyn CredentialSource>>,
}

impl fmt::Debug for CredentialChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self.sources.iter().map(|s| s.name()).collect();
        f.debug_struct("CredentialChain").field("sources", &names).finish()
    }
}

impl CredentialChain {
    /// Create empty chain
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Secrets file, then environment
    #[must_use]
    pub fn standard(secrets_path: impl Into<PathBuf>) -> Self {
        Self::new()
            .with_source(SecretsFile::new(secrets_path))
            .with_source(EnvVar::api_key())
    }

    /// Append a source (lowest priority so far)
    #[must_use]
    pub fn with_source(mut self, source: impl CredentialSource + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    /// Number of sources
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// Check if chain has no sources
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// First non-empty credential
    ///
    /// A failing source is logged and skipped so later sources still apply.
    #[must_use]
    pub fn resolve(&self) -> Option<Credential> {
        for source in &self.sources {
            match source.lookup() {
                Ok(Some(value)) if !value.trim().is_empty() => {
                    tracing::debug!(source = %source.name(), "API key resolved");
                    return Some(Credential::new(value.trim(), source.name()));
                }
                Ok(_) => {
                    tracing::trace!(source = %source.name(), "no API key in source");
                }
                Err(e) => {
                    tracing::warn!(source = %source.name(), error = %e, "credential source failed");
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(Option<&'static str>);

    impl CredentialSource for Fixed {
        fn name(&self) -> String {
            "fixed".to_string()
        }

        fn lookup(&self) -> Result<Option<String>, ConfigError> {
            Ok(self.0.map(str::to_string))
        }
    }

    struct Broken;

    impl CredentialSource for Broken {
        fn name(&self) -> String {
            "broken".to_string()
        }

        fn lookup(&self) -> Result<Option<String>, ConfigError> {
            Err(ConfigError::InvalidValue {
                key: "secret",
                reason: "unreadable".to_string(),
            })
        }
    }

    #[test]
    fn first_non_empty_source_wins() {
        let chain = CredentialChain::new()
            .with_source(Fixed(None))
            .with_source(Fixed(Some("  ")))
            .with_source(Fixed(Some("key-b")))
            .with_source(Fixed(Some("key-c")));
        assert_eq!(chain.len(), 4);
        assert_eq!(chain.resolve().unwrap().expose(), "key-b");
    }

    #[test]
    fn failing_source_is_skipped() {
        let chain = CredentialChain::new()
            .with_source(Broken)
            .with_source(Fixed(Some("fallback")));
        assert_eq!(chain.resolve().unwrap().expose(), "fallback");
    }

    #[test]
    fn empty_chain_resolves_nothing() {
        assert!(CredentialChain::new().resolve().is_none());
    }

    #[test]
    fn secrets_file_lookup() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("secrets.toml");
        std::fs::write(&path, "GEMINI_API_KEY = \"from-file\"\nOTHER = 1\n").unwrap();

        let source = SecretsFile::new(&path);
        assert_eq!(source.lookup().unwrap().as_deref(), Some("from-file"));
        assert!(SecretsFile::new(dir.path().join("missing.toml")).lookup().unwrap().is_none());
    }

    #[test]
    fn secrets_file_without_key_falls_through() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("secrets.toml");
        std::fs::write(&path, "OTHER_KEY = \"x\"\n").unwrap();

        let chain = CredentialChain::new()
            .with_source(SecretsFile::new(&path))
            .with_source(Fixed(Some("from-env")));
        let credential = chain.resolve().unwrap();
        assert_eq!(credential.expose(), "from-env");
        assert_eq!(credential.source(), "fixed");
    }

    #[test]
    fn env_var_lookup() {
        let var = "HOMEROOM_TEST_CREDENTIAL_ENV_LOOKUP";
        std::env::set_var(var, "from-env");
        assert_eq!(EnvVar::named(var).lookup().unwrap().as_deref(), Some("from-env"));
        std::env::remove_var(var);
        assert!(EnvVar::named(var).lookup().unwrap().is_none());
    }

    #[test]
    fn debug_redacts_secret() {
        let credential = Credential::new("super-secret", "test");
        let rendered = format!("{credential:?}");
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
