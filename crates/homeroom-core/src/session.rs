//! Selection state for one interactive session
//!
//! Holds one slot per student, addressed by positional label. Slots live in a
//! vector so the label set is always exactly `Student 1..=Student K`.

use crate::comment::CommentState;
use crate::error::{GenerationError, SessionError};
use crate::taxonomy::Taxonomy;
use crate::types::StudentLabel;
use serde::Serialize;
use std::collections::BTreeSet;

/// Rendered keyword list of a slot with no selection
pub const NO_TRAITS: &str = "No traits selected";

/// One student's keyword selection and latest comment
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StudentSlot {
    /// Selected keywords (sorted, deduplicated)
    keywords: BTreeSet<String>,
    /// Latest comment outcome
    comment: CommentState,
}

impl StudentSlot {
    /// Selected keywords in display order
    #[inline]
    #[must_use]
    pub fn keywords(&self) -> &BTreeSet<String> {
        &self.keywords
    }

    /// Check if any keyword is selected
    #[inline]
    #[must_use]
    pub fn has_keywords(&self) -> bool {
        !self.keywords.is_empty()
    }

    /// Latest comment outcome
    #[inline]
    #[must_use]
    pub fn comment(&self) -> &CommentState {
        &self.comment
    }

    /// Keywords joined for display and export
    #[must_use]
    pub fn keyword_list(&self) -> String {
        self.keywords
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// In-memory selection state of a session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    slots: Vec<StudentSlot>,
}

impl SelectionState {
    /// Create session with `count` empty slots
    #[must_use]
    pub fn new(count: usize) -> Self {
        let mut state = Self::default();
        state.set_student_count(count);
        state
    }

    /// Resize to exactly `count` slots
    ///
    /// Retained labels keep their data, removed labels are discarded and new
    /// labels start empty. Calling with the current count changes nothing.
    pub fn set_student_count(&mut self, count: usize) {
        let previous = self.slots.len();
        if previous == count {
            return;
        }
        self.slots.resize_with(count, StudentSlot::default);
        tracing::debug!(previous, count, "resized student slots");
    }

    /// Current number of students
    #[inline]
    #[must_use]
    pub fn student_count(&self) -> usize {
        self.slots.len()
    }

    /// Replace a slot's keywords
    ///
    /// Input is deduplicated and intersected with the taxonomy; unknown
    /// keywords are dropped silently.
    ///
    /// # Errors
    /// - `SessionError::UnknownStudent` if the label is out of range
    pub fn set_keywords<I, S>(&mut self, label: StudentLabel, keywords: I) -> Result<(), SessionError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let (known, rejected) = Taxonomy::global().partition(keywords);
        if !rejected.is_empty() {
            tracing::debug!(%label, ?rejected, "ignoring keywords outside the taxonomy");
        }
        self.slot_mut(label)?.keywords = known;
        Ok(())
    }

    /// Overwrite a slot's comment with the given text
    ///
    /// # Errors
    /// - `SessionError::UnknownStudent` if the label is out of range
    pub fn set_comment(&mut self, label: StudentLabel, text: impl Into<String>) -> Result<(), SessionError> {
        self.slot_mut(label)?.comment = CommentState::Generated(text.into());
        Ok(())
    }

    /// Store the outcome of a generation attempt
    ///
    /// # Errors
    /// - `SessionError::UnknownStudent` if the label is out of range
    pub fn record_outcome(
        &mut self,
        label: StudentLabel,
        outcome: Result<String, GenerationError>,
    ) -> Result<(), SessionError> {
        self.slot_mut(label)?.comment = outcome.into();
        Ok(())
    }

    /// Look up one slot
    ///
    /// # Errors
    /// - `SessionError::UnknownStudent` if the label is out of range
    pub fn slot(&self, label: StudentLabel) -> Result<&StudentSlot, SessionError> {
        self.slots.get(label.index()).ok_or(SessionError::UnknownStudent {
            label,
            count: self.slots.len(),
        })
    }

    /// All slots in label order
    pub fn slots(&self) -> impl Iterator<Item = (StudentLabel, &StudentSlot)> {
        self.slots
            .iter()
            .enumerate()
            .map(|(index, slot)| (StudentLabel::from_index(index), slot))
    }

    /// All labels in order
    pub fn labels(&self) -> impl Iterator<Item = StudentLabel> {
        StudentLabel::range(self.slots.len())
    }

    /// Check if any student has a keyword selected
    #[must_use]
    pub fn any_selected(&self) -> bool {
        self.slots.iter().any(StudentSlot::has_keywords)
    }

    /// Labels with a non-empty selection, in label order
    #[must_use]
    pub fn pending(&self) -> Vec<StudentLabel> {
        self.slots()
            .filter(|(_, slot)| slot.has_keywords())
            .map(|(label, _)| label)
            .collect()
    }

    fn slot_mut(&mut self, label: StudentLabel) -> Result<&mut StudentSlot, SessionError> {
        let count = self.slots.len();
        self.slots
            .get_mut(label.index())
            .ok_or(SessionError::UnknownStudent { label, count })
    }
}
