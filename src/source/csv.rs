//! CSV reader. Cells stay text; only empty cells become [`FieldValue::Empty`].

use std::{io::Read, path::Path};

use crate::types::{FieldValue, TabularRecord};

use super::{SourceResult, records_from_rows};

/// Reads records from a CSV file with a header row.
pub fn read_path(path: &Path) -> SourceResult<Vec<TabularRecord>> {
    let reader = ::csv::ReaderBuilder::new().flexible(true).from_path(path)?;
    collect(reader)
}

/// Reads records from any CSV byte stream with a header row.
pub fn read_from<R: Read>(input: R) -> SourceResult<Vec<TabularRecord>> {
    let reader = ::csv::ReaderBuilder::new().flexible(true).from_reader(input);
    collect(reader)
}

fn collect<R: Read>(mut reader: ::csv::Reader<R>) -> SourceResult<Vec<TabularRecord>> {
    let header: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

    let mut rows = Vec::new();
    for row in reader.records() {
        let row = row?;
        rows.push(row.iter().map(cell_value).collect::<Vec<_>>());
    }
    Ok(records_from_rows(&header, rows))
}

fn cell_value(cell: &str) -> FieldValue {
    if cell.is_empty() {
        FieldValue::Empty
    } else {
        FieldValue::Text(cell.to_string())
    }
}
