//! Homeroom command line
//!
//! Builds a session from `--select` flags or a selection file, generates a
//! comment per selected student through the Gemini backend and writes the
//! spreadsheet report.
//!
//! # Quick Start
//!
//! ```text
//! homeroom taxonomy
//! homeroom generate --students 2 --select "Student 1=responsibility,consideration"
//! homeroom export --input class.yaml --output report.xlsx
//! ```

// Core modules
pub mod cli;
pub mod commands;
pub mod logging;
pub mod prompt;
pub mod selection;

pub use commands::{dispatch, EXIT_OK, EXIT_REFUSED};
pub use logging::LogFormat;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
