//! Gemini backend for Homeroom
//!
//! Implements [`homeroom_core::CompletionBackend`] over the Gemini
//! `generateContent` REST endpoint.
//!
//! # Example
//!
//! ```rust,ignore
//! use homeroom_core::{CommentGenerator, HomeroomConfig};
//! use homeroom_gemini::{GeminiBackend, GeminiConfig};
//!
//! let config = HomeroomConfig::default();
//! let backend = GeminiBackend::new(GeminiConfig::from(&config))?;
//! let generator = CommentGenerator::new(backend).with_model(&config.model);
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod backend;
pub mod protocol;

pub use backend::{GeminiBackend, GeminiConfig, API_KEY_HEADER};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
