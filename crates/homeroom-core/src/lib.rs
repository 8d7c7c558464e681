//! Homeroom Core - student comment generation
//!
//! The session-level logic of the tool:
//! - Holds per-student trait keyword selections drawn from a fixed taxonomy
//! - Turns one student's keywords into a prose comment via a completion backend
//! - Runs the generator over every selected student, one call at a time
//! - Assembles the rows handed to the report exporter
//!
//! # Example
//!
//! ```rust,ignore
//! use homeroom_core::{BatchRunner, CommentGenerator, SelectionState, StudentLabel};
//!
//! # async fn example(backend: impl homeroom_core::CompletionBackend) -> Result<(), Box<dyn std::error::Error>> {
//! let mut session = SelectionState::new(2);
//! session.set_keywords(StudentLabel::new(1)?, ["responsibility", "consideration"])?;
//!
//! let runner = BatchRunner::new(CommentGenerator::new(backend));
//! let report = runner
//!     .run(&mut session, "api-key", |p| println!("{}/{}", p.processed, p.total))
//!     .await?;
//!
//! let rows = homeroom_core::report::build_rows(&session);
//! println!("{} generated, {} rows to export", report.succeeded, rows.len());
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

// Core modules
pub mod batch;
pub mod comment;
pub mod config;
pub mod credential;
pub mod error;
pub mod generator;
pub mod report;
pub mod session;
pub mod taxonomy;
pub mod types;

// Re-exports for convenience
pub use batch::{BatchProgress, BatchReport, BatchRunner};
pub use comment::CommentState;
pub use config::HomeroomConfig;
pub use credential::{Credential, CredentialChain, CredentialSource, EnvVar, SecretsFile};
pub use error::{BackendError, ConfigError, GenerationError, LabelParseError, SessionError};
pub use generator::{CommentGenerator, CompletionBackend, CompletionRequest, PromptTemplate};
pub use session::{SelectionState, StudentSlot};
pub use taxonomy::Taxonomy;
pub use types::{ReportRow, StudentLabel};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with Homeroom Core
    pub use crate::{
        BatchReport, BatchRunner, CommentGenerator, CommentState, CompletionBackend,
        GenerationError, HomeroomConfig, ReportRow, SelectionState, StudentLabel, Taxonomy,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
