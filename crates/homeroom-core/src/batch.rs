//! Batch generation over a whole session
//!
//! Walks students with a keyword selection in label order, one call at a
//! time. Each outcome is recorded into its slot; a failure never stops the
//! loop.

use crate::error::GenerationError;
use crate::generator::{CommentGenerator, CompletionBackend};
use crate::session::SelectionState;
use crate::types::StudentLabel;
use serde::Serialize;
use std::time::Instant;

/// Progress after one attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchProgress {
    /// Student just processed
    pub label: StudentLabel,
    /// Attempts finished so far
    pub processed: usize,
    /// Attempts planned
    pub total: usize,
    /// Whether this attempt produced text
    pub succeeded: bool,
}

impl BatchProgress {
    /// Completed fraction in `0.0..=1.0`
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            self.processed as f64 / self.total as f64
        }
    }
}

/// Summary of a batch run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Students with a selection when the batch started
    pub total: usize,
    /// Students attempted
    pub processed: usize,
    /// Students whose comment was generated
    pub succeeded: usize,
    /// Students whose attempt failed
    pub failed: Vec<(StudentLabel, GenerationError)>,
    /// Wall-clock time of the run
    pub elapsed_ms: u64,
}

impl BatchReport {
    /// Check if every attempt succeeded
    #[inline]
    #[must_use]
    pub fn all_succeeded(&self) -> bool {
        self.failed.is_empty() && self.processed == self.total
    }
}

/// Runs the generator over every selected student
#[derive(Debug)]
pub struct BatchRunner<B> {
    generator: CommentGenerator<B>,
}

impl<B: CompletionBackend> BatchRunner<B> {
    /// Create runner around a generator
    #[inline]
    #[must_use]
    pub fn new(generator: CommentGenerator<B>) -> Self {
        Self { generator }
    }

    /// Underlying generator
    #[inline]
    #[must_use]
    pub fn generator(&self) -> &CommentGenerator<B> {
        &self.generator
    }

    /// Check whether a batch may start at all
    ///
    /// # Errors
    /// - `GenerationError::MissingCredential` if `api_key` is blank
    /// - `GenerationError::EmptySelection` if no student has keywords
    pub fn check_ready(session: &SelectionState, api_key: &str) -> Result<(), GenerationError> {
        if api_key.trim().is_empty() {
            return Err(GenerationError::MissingCredential);
        }
        if !session.any_selected() {
            return Err(GenerationError::EmptySelection);
        }
        Ok(())
    }

    /// Generate comments for every student with a selection
    ///
    /// Calls are strictly sequential. `progress` is invoked after each
    /// attempt. Students without keywords keep their previous comment.
    ///
    /// # Errors
    /// Only the readiness checks of [`Self::check_ready`] abort the batch;
    /// per-student failures are recorded in the session and the report.
    pub async fn run<F>(
        &self,
        session: &mut SelectionState,
        api_key: &str,
        mut progress: F,
    ) -> Result<BatchReport, GenerationError>
    where
        F: FnMut(&BatchProgress),
    {
        Self::check_ready(session, api_key)?;

        let start_time = Instant::now();
        let pending = session.pending();
        let mut report = BatchReport {
            total: pending.len(),
            ..BatchReport::default()
        };

        tracing::info!(
            students = report.total,
            model = self.generator.model(),
            "starting comment generation"
        );

        for label in pending {
            let keywords: Vec<String> = match session.slot(label) {
                Ok(slot) => slot.keywords().iter().cloned().collect(),
                Err(_) => continue,
            };

            let outcome = self.generator.generate(api_key, &keywords).await;
            let succeeded = outcome.is_ok();
            match &outcome {
                Ok(_) => {
                    report.succeeded += 1;
                    tracing::info!(%label, "comment generated");
                }
                Err(e) => {
                    report.failed.push((label, e.clone()));
                    tracing::warn!(%label, error = %e, "comment generation failed");
                }
            }
            if let Err(e) = session.record_outcome(label, outcome) {
                tracing::error!(%label, error = %e, "slot vanished during batch");
            }
            report.processed += 1;

            progress(&BatchProgress {
                label,
                processed: report.processed,
                total: report.total,
                succeeded,
            });
        }

        report.elapsed_ms = u64::try_from(start_time.elapsed().as_millis()).unwrap_or(u64::MAX);
        tracing::info!(
            processed = report.processed,
            succeeded = report.succeeded,
            failed = report.failed.len(),
            elapsed_ms = report.elapsed_ms,
            "comment generation finished"
        );

        Ok(report)
    }
}
