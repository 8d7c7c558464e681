//! Report row assembly
//!
//! Decides which students are worth exporting and renders their cells. The
//! exporter itself writes whatever rows it is given.

use crate::comment::{CommentState, NOT_GENERATED};
use crate::session::{SelectionState, StudentSlot, NO_TRAITS};
use crate::types::{ReportRow, StudentLabel};

/// Check if a slot carries anything worth exporting
///
/// A slot qualifies with a keyword selection, a non-blank comment or a
/// failure.
#[inline]
#[must_use]
pub fn is_exportable(slot: &StudentSlot) -> bool {
    if slot.has_keywords() {
        return true;
    }
    match slot.comment() {
        CommentState::Empty => false,
        CommentState::Generated(text) => !text.trim().is_empty(),
        CommentState::Failed(_) => true,
    }
}

/// Render one slot as a report row
#[must_use]
pub fn row_for(label: StudentLabel, slot: &StudentSlot) -> ReportRow {
    let keywords = if slot.has_keywords() {
        slot.keyword_list()
    } else {
        NO_TRAITS.to_string()
    };
    let comment = match slot.comment() {
        CommentState::Empty => NOT_GENERATED.to_string(),
        CommentState::Generated(text) if text.trim().is_empty() => NOT_GENERATED.to_string(),
        other => other.render(),
    };
    ReportRow::new(label, keywords, comment)
}

/// Exportable rows of a session, in label order
#[must_use]
pub fn build_rows(session: &SelectionState) -> Vec<ReportRow> {
    session
        .slots()
        .filter(|(_, slot)| is_exportable(slot))
        .map(|(label, slot)| row_for(label, slot))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GenerationError;
    use pretty_assertions::assert_eq;

    fn label(n: usize) -> StudentLabel {
        StudentLabel::new(n).unwrap()
    }

    #[test]
    fn empty_session_has_no_rows() {
        assert!(build_rows(&SelectionState::new(3)).is_empty());
    }

    #[test]
    fn rows_follow_label_order_and_skip_blank_slots() {
        let mut session = SelectionState::new(4);
        session.set_keywords(label(3), ["wit", "courage"]).unwrap();
        session.set_keywords(label(1), ["honesty"]).unwrap();
        session
            .record_outcome(label(1), Ok("Honest in all things.".to_string()))
            .unwrap();

        let rows = build_rows(&session);
        assert_eq!(
            rows,
            vec![
                ReportRow::new(label(1), "honesty", "Honest in all things."),
                ReportRow::new(label(3), "courage, wit", NOT_GENERATED),
            ]
        );
    }

    #[test]
    fn failed_slot_is_exported_with_marker() {
        let mut session = SelectionState::new(1);
        session.set_keywords(label(1), ["honesty"]).unwrap();
        session
            .record_outcome(label(1), Err(GenerationError::upstream("deadline exceeded")))
            .unwrap();

        let rows = build_rows(&session);
        assert_eq!(rows.len(), 1);
        assert_eq!(
            rows[0].comment,
            "Generation failed: API call failed: deadline exceeded"
        );
    }

    #[test]
    fn comment_without_keywords_still_exports() {
        let mut session = SelectionState::new(2);
        session.set_comment(label(2), "Kept from before.").unwrap();

        let rows = build_rows(&session);
        assert_eq!(rows, vec![ReportRow::new(label(2), NO_TRAITS, "Kept from before.")]);
    }

    #[test]
    fn blank_comment_without_keywords_is_skipped() {
        let mut session = SelectionState::new(3);
        session.set_comment(label(2), "").unwrap();
        session.set_comment(label(3), "  \n").unwrap();
        assert!(build_rows(&session).is_empty());

        session.set_keywords(label(2), ["wit"]).unwrap();
        assert_eq!(build_rows(&session), vec![ReportRow::new(label(2), "wit", NOT_GENERATED)]);
    }
}
