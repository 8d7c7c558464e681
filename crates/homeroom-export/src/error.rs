//! Error types for report export

use std::path::PathBuf;

/// Errors while building or writing a report
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// Workbook could not be assembled or serialized
    #[error("spreadsheet error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    /// IO error while writing the report file
    #[error("io error writing {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ExportError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
