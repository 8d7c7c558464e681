//! Core types for Homeroom
//!
//! Defines the fundamental value types shared across the workspace:
//! - Positional student labels
//! - Report rows handed to the exporter

use crate::error::LabelParseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroUsize;
use std::str::FromStr;

/// Prefix of every rendered student label
pub const LABEL_PREFIX: &str = "Student ";

/// Positional student label ("Student N", 1-based)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StudentLabel(NonZeroUsize);

impl StudentLabel {
    /// Create label for a 1-based student number
    ///
    /// # Errors
    /// - `LabelParseError::Zero` if `number` is 0
    #[inline]
    pub fn new(number: usize) -> Result<Self, LabelParseError> {
        NonZeroUsize::new(number)
            .map(Self)
            .ok_or(LabelParseError::Zero)
    }

    /// Label for a 0-based slot position
    #[inline]
    #[must_use]
    pub fn from_index(index: usize) -> Self {
        Self(NonZeroUsize::MIN.saturating_add(index))
    }

    /// 1-based student number
    #[inline]
    #[must_use]
    pub fn number(&self) -> usize {
        self.0.get()
    }

    /// 0-based slot position
    #[inline]
    #[must_use]
    pub fn index(&self) -> usize {
        self.0.get() - 1
    }

    /// All labels of a session with `count` students, in order
    pub fn range(count: usize) -> impl Iterator<Item = StudentLabel> {
        (0..count).map(Self::from_index)
    }
}

impl fmt::Display for StudentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{LABEL_PREFIX}{}", self.0)
    }
}

impl FromStr for StudentLabel {
    type Err = LabelParseError;

    /// Accepts "Student N" or a bare "N"; N is plain decimal without sign
    /// or leading zeros.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed.strip_prefix(LABEL_PREFIX).unwrap_or(trimmed).trim();
        let canonical = !digits.is_empty()
            && digits.bytes().all(|b| b.is_ascii_digit())
            && (digits == "0" || !digits.starts_with('0'));
        if !canonical {
            return Err(LabelParseError::Malformed(s.to_string()));
        }
        let number: usize = digits
            .parse()
            .map_err(|_| LabelParseError::Malformed(s.to_string()))?;
        Self::new(number)
    }
}

impl TryFrom<String> for StudentLabel {
    type Error = LabelParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<StudentLabel> for String {
    fn from(label: StudentLabel) -> Self {
        label.to_string()
    }
}

/// One exported line of the report
///
/// Snapshot built at export time; never written back into the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    /// Student label ("Student N")
    pub label: StudentLabel,
    /// Comma-joined keyword list
    pub keywords: String,
    /// Comment text (generated text or failure marker)
    pub comment: String,
}

impl ReportRow {
    /// Create new report row
    #[inline]
    pub fn new(label: StudentLabel, keywords: impl Into<String>, comment: impl Into<String>) -> Self {
        Self {
            label,
            keywords: keywords.into(),
            comment: comment.into(),
        }
    }

    /// The three cell values in column order
    #[must_use]
    pub fn cells(&self) -> [String; 3] {
        [
            self.label.to_string(),
            self.keywords.clone(),
            self.comment.clone(),
        ]
    }
}
