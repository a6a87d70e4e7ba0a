//! Workbook reader backed by `calamine`.

use std::path::Path;

use calamine::{Data, ExcelDateTime, Reader, open_workbook_auto};
use tracing::debug;

use crate::types::{FieldValue, TabularRecord};

use super::{SourceError, SourceResult, records_from_rows};

/// Reads the first worksheet; its first row is the header.
pub fn read_first_sheet(path: &Path) -> SourceResult<Vec<TabularRecord>> {
    let mut workbook = open_workbook_auto(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| SourceError::NoWorksheet(path.to_path_buf()))??;

    let mut rows = range.rows();
    let Some(header_row) = rows.next() else {
        return Ok(Vec::new());
    };
    let header: Vec<String> = header_row.iter().map(header_text).collect();
    debug!(columns = header.len(), rows = range.height().saturating_sub(1), "worksheet loaded");

    Ok(records_from_rows(
        &header,
        rows.map(|row| row.iter().map(cell_value).collect::<Vec<_>>()),
    ))
}

/// Renders a header-row cell as a column name; blank cells yield `""`.
pub fn header_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        other => cell_value(other).to_string(),
    }
}

/// Maps one worksheet cell to a [`FieldValue`].
pub fn cell_value(cell: &Data) -> FieldValue {
    match cell {
        Data::Empty => FieldValue::Empty,
        Data::String(s) => FieldValue::Text(s.clone()),
        Data::Int(v) => FieldValue::Integer(*v),
        Data::Float(v) => FieldValue::Float(*v),
        Data::Bool(v) => FieldValue::Bool(*v),
        Data::DateTime(dt) => excel_datetime(dt),
        Data::DateTimeIso(s) | Data::DurationIso(s) => FieldValue::Text(s.clone()),
        Data::Error(e) => FieldValue::Text(e.to_string()),
    }
}

fn excel_datetime(dt: &ExcelDateTime) -> FieldValue {
    let Some(value) = dt.as_datetime() else {
        return FieldValue::Float(dt.as_f64());
    };
    // Serials below one day carry no calendar date.
    if dt.as_f64() < 1.0 {
        FieldValue::Time(value.time())
    } else {
        FieldValue::DateTime(value)
    }
}
