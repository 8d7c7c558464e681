//! Testing utilities for Homeroom workspace
//!
//! Shared completion backends and session fixtures.

#![allow(missing_docs)]

use async_trait::async_trait;
use homeroom_core::{
    BackendError, CompletionBackend, CompletionRequest, SelectionState, StudentLabel,
};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;

/// Backend that answers every request with the same text
#[derive(Debug, Clone)]
pub struct FixedBackend {
    text: String,
    calls: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl FixedBackend {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            calls: Arc::default(),
        }
    }

    /// Requests received so far
    pub fn calls(&self) -> Vec<CompletionRequest> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl CompletionBackend for FixedBackend {
    async fn complete(&self, request: CompletionRequest) -> Result<String, BackendError> {
        self.calls.lock().push(request);
        Ok(self.text.clone())
    }

    fn name(&self) -> &str {
        "fixed"
    }
}

/// Backend that plays back a script of outcomes in call order
///
/// Once the script runs out every further call fails with `Transport`.
#[derive(Debug, Clone, Default)]
pub struct ScriptedBackend {
    script: Arc<Mutex<VecDeque<Result<String, BackendError>>>>,
    calls: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn then_ok(self, text: impl Into<String>) -> Self {
        self.script.lock().push_back(Ok(text.into()));
        self
    }

    #[must_use]
    pub fn then_err(self, err: BackendError) -> Self {
        self.script.lock().push_back(Err(err));
        self
    }

    /// Requests received so far
    pub fn calls(&self) -> Vec<CompletionRequest> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

#[async_trait]
impl CompletionBackend for ScriptedBackend {
    async fn complete(&self, request: CompletionRequest) -> Result<String, BackendError> {
        self.calls.lock().push(request);
        self.script
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(BackendError::Transport("script exhausted".to_string())))
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

pub fn label(number: usize) -> StudentLabel {
    StudentLabel::new(number).unwrap()
}

/// Session where student N (1-based) gets `selections[N - 1]`
pub fn session_with(selections: &[&[&str]]) -> SelectionState {
    let mut session = SelectionState::new(selections.len());
    for (index, keywords) in selections.iter().enumerate() {
        session
            .set_keywords(StudentLabel::from_index(index), keywords.iter())
            .unwrap();
    }
    session
}
