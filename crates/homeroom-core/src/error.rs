//! Error types for Homeroom Core
//!
//! Provides error handling for:
//! - Comment generation failures (per student, never fatal to a session)
//! - Session lookups by student label
//! - Configuration and secrets loading

use std::path::PathBuf;

use crate::types::StudentLabel;

/// Outcome classification for a single comment-generation attempt
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerationError {
    /// No API credential was configured
    #[error("no API key has been configured")]
    MissingCredential,

    /// The student has no selected keywords
    #[error("no traits were selected")]
    EmptySelection,

    /// The text-generation endpoint failed; detail is the upstream message verbatim
    #[error("API call failed: {0}")]
    Upstream(String),
}

impl GenerationError {
    /// Create upstream error from any displayable message
    #[inline]
    pub fn upstream(detail: impl Into<String>) -> Self {
        Self::Upstream(detail.into())
    }

    /// Check if the failure stems from missing setup rather than the endpoint
    #[inline]
    #[must_use]
    pub fn is_credential_problem(&self) -> bool {
        matches!(self, Self::MissingCredential)
    }

    /// Check if re-running the same request could plausibly succeed
    ///
    /// Nothing is retried automatically; this only informs the caller.
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Upstream(_))
    }
}

/// Text-completion backend errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BackendError {
    /// Connection or protocol failure
    #[error("transport error: {0}")]
    Transport(String),

    /// No response within the configured timeout
    #[error("request timed out after {secs}s")]
    Timeout { secs: u64 },

    /// Endpoint answered with a non-success status
    #[error("{status}: {message}")]
    Status { status: u16, message: String },

    /// Endpoint answered without usable text
    #[error("response contained no text")]
    EmptyResponse,

    /// Endpoint refused the prompt
    #[error("prompt was blocked: {0}")]
    Blocked(String),

    /// Response body could not be decoded
    #[error("could not decode response: {0}")]
    Decode(String),
}

impl From<BackendError> for GenerationError {
    fn from(err: BackendError) -> Self {
        Self::Upstream(err.to_string())
    }
}

/// Selection state errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// Label is outside the configured student range
    #[error("unknown student: {label} (session has {count} students)")]
    UnknownStudent {
        /// Requested label
        label: StudentLabel,
        /// Current student count
        count: usize,
    },
}

/// Student label parse errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LabelParseError {
    /// Input does not look like "Student N" or "N"
    #[error("invalid student label: '{0}' (expected \"Student N\" or a number)")]
    Malformed(String),

    /// Student numbers start at 1
    #[error("student numbers start at 1")]
    Zero,
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error reading a config or secrets file
    #[error("io error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// TOML syntax or schema error
    #[error("invalid TOML in {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// Semantically invalid value
    #[error("invalid configuration value for '{key}': {reason}")]
    InvalidValue { key: &'static str, reason: String },
}

impl ConfigError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create TOML error for path
    pub fn toml_error(path: impl Into<PathBuf>, source: toml::de::Error) -> Self {
        Self::Toml {
            path: path.into(),
            source,
        }
    }
}
