//! Homeroom report export
//!
//! Turns the rows assembled by [`homeroom_core::report::build_rows`] into a
//! single-sheet `.xlsx` workbook.
//!
//! # Layout
//!
//! ```text
//! | Student Label | Selected Traits         | Generated Comment          |
//! |---------------|-------------------------|----------------------------|
//! | Student 1     | consideration, courage  | Shows strong ...           |
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use homeroom_core::report::build_rows;
//! use homeroom_export::{export_to_path, REPORT_FILE_NAME};
//!
//! let rows = build_rows(&session);
//! if !export_to_path(&rows, REPORT_FILE_NAME)? {
//!     println!("nothing to export");
//! }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod error;
pub mod xlsx;

pub use error::ExportError;
pub use xlsx::{
    export, export_to_path, HEADERS, REPORT_FILE_NAME, REPORT_MIME_TYPE, SHEET_NAME,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
