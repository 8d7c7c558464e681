//! Per-student comment outcome
//!
//! Success and failure are distinct variants; the failure marker shown to
//! users is rendered from the typed error, never parsed back.

use crate::error::GenerationError;
use serde::Serialize;

/// Prefix of a rendered failure
pub const FAILURE_PREFIX: &str = "Generation failed: ";

/// Rendered text of an empty comment on an exported row
pub const NOT_GENERATED: &str = "Not generated yet";

/// Latest comment outcome of a slot
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum CommentState {
    /// Nothing generated yet
    #[default]
    Empty,
    /// Text produced by the endpoint (or set manually)
    Generated(String),
    /// Last attempt failed
    #[serde(serialize_with = "serialize_error")]
    Failed(GenerationError),
}

impl CommentState {
    /// Check if no comment exists
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Check if last attempt failed
    #[inline]
    #[must_use]
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    /// Generated text, if any
    #[inline]
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Generated(text) => Some(text),
            _ => None,
        }
    }

    /// Failure, if any
    #[inline]
    #[must_use]
    pub fn error(&self) -> Option<&GenerationError> {
        match self {
            Self::Failed(err) => Some(err),
            _ => None,
        }
    }

    /// Human-readable rendering for display and export
    #[must_use]
    pub fn render(&self) -> String {
        match self {
            Self::Empty => String::new(),
            Self::Generated(text) => text.clone(),
            Self::Failed(err) => format!("{FAILURE_PREFIX}{err}"),
        }
    }
}

impl From<Result<String, GenerationError>> for CommentState {
    fn from(outcome: Result<String, GenerationError>) -> Self {
        match outcome {
            Ok(text) => Self::Generated(text),
            Err(err) => Self::Failed(err),
        }
    }
}

fn serialize_error<S: serde::Serializer>(
    err: &GenerationError,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_str(err)
}
