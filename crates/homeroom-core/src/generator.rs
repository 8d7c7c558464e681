//! Comment generation
//!
//! Turns one student's keywords into a prose comment by sending a fixed
//! instruction to a text-completion backend:
//! - Credential and selection are checked before any network call
//! - Exactly one backend call per attempt, never retried
//! - Successful text is returned unmodified

use crate::error::{BackendError, GenerationError};
use async_trait::async_trait;
use std::fmt::Write as _;

/// Model used when none is configured
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash-latest";

/// Character count above which a sentence should be broken
pub const DEFAULT_WRAP_THRESHOLD: usize = 70;

/// One request to a text-completion endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    /// Credential for the endpoint
    pub api_key: String,
    /// Model identifier
    pub model: String,
    /// Full instruction text
    pub prompt: String,
}

/// Text-completion endpoint
///
/// Implementations own transport details, including the call timeout.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Send prompt, return response text
    async fn complete(&self, request: CompletionRequest) -> Result<String, BackendError>;

    /// Backend name for logs
    fn name(&self) -> &str;
}

#[async_trait]
impl<B: CompletionBackend + ?Sized> CompletionBackend for Box<B> {
    async fn complete(&self, request: CompletionRequest) -> Result<String, BackendError> {
        (**self).complete(request).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Fixed instruction template
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptTemplate {
    /// Sentence length that triggers a line break
    pub wrap_threshold: usize,
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self {
            wrap_threshold: DEFAULT_WRAP_THRESHOLD,
        }
    }
}

impl PromptTemplate {
    /// Render instruction for the given keywords
    #[must_use]
    pub fn render(&self, keywords: &[String]) -> String {
        let threshold = self.wrap_threshold;
        let mut prompt = String::with_capacity(2048);

        prompt.push_str(
            "You are an elementary school homeroom teacher. \
             The following positive trait keywords were observed for one student:\n",
        );
        let _ = writeln!(prompt, "[{}]", keywords.join(", "));
        prompt.push('\n');
        prompt.push_str(
            "Using these keywords, write the student's 'behavioral characteristics and \
             comprehensive opinion' so that their school life comes through clearly.\n\
             You must follow these rules:\n\
             1. Every sentence ends in a nominal, declarative closing form \
             (for example 'shows a sincere attitude.', 'stands out for diligence.').\n\
             2. Sentences connect naturally and contain positive, concrete observations of the student.\n\
             3. Each sentence fully reflects the meaning of the selected keywords.\n",
        );
        let _ = writeln!(
            prompt,
            "4. If a sentence exceeds {threshold} characters, insert a line break (\\n) at a natural \
             point so the meaning still flows."
        );
        prompt.push_str(
            "5. Compose the whole text as a single, complete paragraph.\n\
             6. Never include the student's name or any identifying information \
             (no phrases such as 'Student X is').\n\
             7. Use varied vocabulary and expressions so each keyword's trait is clearly visible.\n\
             \n\
             Example (selected keywords: responsibility, consideration, learning focus):\n\
             'Shows a strong sense of responsibility for assigned work and a determined effort \
             to see even difficult tasks through.\n\
             Deeply considerate toward classmates, gets along without quarrels,\n\
             and reaches out first with a warm heart when others struggle.\n\
             Highly focused in class, grasps lesson content quickly, and actively asks about \
             anything unclear.'\n\
             \n\
             Following the example and the rules above, write a natural and specific \
             behavioral characteristics and comprehensive opinion for the given keywords.\n",
        );
        prompt
    }
}

/// Generates one comment per call
#[derive(Debug, Clone)]
pub struct CommentGenerator<B> {
    backend: B,
    model: String,
    template: PromptTemplate,
}

impl<B: CompletionBackend> CommentGenerator<B> {
    /// Create generator over a backend with the default model and template
    #[inline]
    #[must_use]
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            model: DEFAULT_MODEL.to_string(),
            template: PromptTemplate::default(),
        }
    }

    /// With model identifier
    #[inline]
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// With prompt template
    #[inline]
    #[must_use]
    pub fn with_template(mut self, template: PromptTemplate) -> Self {
        self.template = template;
        self
    }

    /// Configured model identifier
    #[inline]
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Underlying backend
    #[inline]
    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Generate a comment for one student
    ///
    /// # Errors
    /// - `GenerationError::MissingCredential` if `api_key` is blank
    /// - `GenerationError::EmptySelection` if `keywords` is empty
    /// - `GenerationError::Upstream` if the backend fails or returns no text
    pub async fn generate<I, S>(&self, api_key: &str, keywords: I) -> Result<String, GenerationError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err(GenerationError::MissingCredential);
        }

        let keywords: Vec<String> = keywords
            .into_iter()
            .map(|k| k.as_ref().to_string())
            .collect();
        if keywords.is_empty() {
            return Err(GenerationError::EmptySelection);
        }

        let prompt = self.template.render(&keywords);
        tracing::debug!(
            backend = self.backend.name(),
            model = %self.model,
            keywords = keywords.len(),
            prompt_chars = prompt.chars().count(),
            "requesting comment"
        );

        let request = CompletionRequest {
            api_key: api_key.to_string(),
            model: self.model.clone(),
            prompt,
        };

        match self.backend.complete(request).await {
            Ok(text) if text.trim().is_empty() => Err(BackendError::EmptyResponse.into()),
            Ok(text) => Ok(text),
            Err(err) => Err(err.into()),
        }
    }
}
