//! `.xlsx` serialization of report rows
//!
//! One worksheet, three fixed columns. Rows are written exactly as given;
//! filtering and placeholder text are the caller's job (see
//! [`homeroom_core::report::build_rows`]).

use std::path::Path;

use homeroom_core::ReportRow;
use rust_xlsxwriter::{Format, FormatAlign, Workbook, XlsxError};
use tracing::{debug, info};

use crate::error::ExportError;

/// Header row, in column order
pub const HEADERS: [&str; 3] = ["Student Label", "Selected Traits", "Generated Comment"];

/// Column widths, in character units
pub const COLUMN_WIDTHS: [f64; 3] = [15.0, 60.0, 85.0];

/// Name of the single worksheet
pub const SHEET_NAME: &str = "Student Comments";

/// Font family applied to every cell
pub const FONT_NAME: &str = "Malgun Gothic";

/// Suggested download name for the report
pub const REPORT_FILE_NAME: &str = "students_behavior_descriptions.xlsx";

/// MIME type of the report
pub const REPORT_MIME_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

struct Formats {
    header: Format,
    label: Format,
    wrapped: Format,
}

impl Formats {
    fn new() -> Self {
        let base = Format::new().set_font_name(FONT_NAME);
        Self {
            header: base
                .clone()
                .set_bold()
                .set_align(FormatAlign::Center)
                .set_align(FormatAlign::VerticalCenter),
            label: base.clone().set_align(FormatAlign::Top),
            wrapped: base.set_text_wrap().set_align(FormatAlign::Top),
        }
    }

    /// Body format for each column
    fn body(&self) -> [&Format; 3] {
        [&self.label, &self.wrapped, &self.wrapped]
    }
}

/// Serialize rows into an in-memory workbook.
///
/// Returns `Ok(None)` when there is nothing to export.
///
/// # Errors
/// - `ExportError::Xlsx` if the workbook cannot be built
pub fn export(rows: &[ReportRow]) -> Result<Option<Vec<u8>>, ExportError> {
    if rows.is_empty() {
        debug!("no rows, skipping export");
        return Ok(None);
    }

    let mut workbook = build_workbook(rows)?;
    let bytes = workbook.save_to_buffer()?;
    info!(rows = rows.len(), bytes = bytes.len(), "report built");
    Ok(Some(bytes))
}

/// Serialize rows and write them to `path`.
///
/// Returns `Ok(false)` without touching the filesystem when there is
/// nothing to export.
///
/// # Errors
/// - `ExportError::Xlsx` if the workbook cannot be built
/// - `ExportError::Io` if the file cannot be written
pub fn export_to_path(rows: &[ReportRow], path: impl AsRef<Path>) -> Result<bool, ExportError> {
    let path = path.as_ref();
    let Some(bytes) = export(rows)? else {
        return Ok(false);
    };
    std::fs::write(path, bytes).map_err(|e| ExportError::io_error(path, e))?;
    info!(path = %path.display(), "report written");
    Ok(true)
}

fn build_workbook(rows: &[ReportRow]) -> Result<Workbook, XlsxError> {
    let formats = Formats::new();
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;

    for (col, width) in (0u16..).zip(COLUMN_WIDTHS) {
        sheet.set_column_width(col, width)?;
    }
    for (col, title) in (0u16..).zip(HEADERS) {
        sheet.write_string_with_format(0, col, title, &formats.header)?;
    }

    for (row, report_row) in (1u32..).zip(rows) {
        for (col, (value, format)) in (0u16..).zip(report_row.cells().iter().zip(formats.body())) {
            sheet.write_string_with_format(row, col, value, format)?;
        }
    }

    Ok(workbook)
}
