//! Tabular input sources: workbook sheets and CSV files.

pub mod csv;
pub mod spreadsheet;

use std::path::{Path, PathBuf};

use hashbrown::HashMap;

use crate::types::{FieldValue, TabularRecord};

/// Failure to turn an input file into records.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// Workbook could not be opened or read.
    #[error("spreadsheet error: {0}")]
    Spreadsheet(#[from] calamine::Error),
    /// CSV input could not be parsed.
    #[error("csv error: {0}")]
    Csv(#[from] ::csv::Error),
    /// Workbook has no worksheet to read.
    #[error("no worksheet found in {}", .0.display())]
    NoWorksheet(PathBuf),
    /// File extension maps to no known reader.
    #[error("unsupported input format: {}", .0.display())]
    UnsupportedFormat(PathBuf),
}

/// Convenience alias for source results.
pub type SourceResult<T> = Result<T, SourceError>;

const WORKBOOK_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xlsb", "xls", "ods"];

/// Reads every record from `path`, choosing a reader by file extension.
pub fn read_records(path: impl AsRef<Path>) -> SourceResult<Vec<TabularRecord>> {
    let path = path.as_ref();
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    if ext == "csv" {
        csv::read_path(path)
    } else if WORKBOOK_EXTENSIONS.contains(&ext.as_str()) {
        spreadsheet::read_first_sheet(path)
    } else {
        Err(SourceError::UnsupportedFormat(path.to_path_buf()))
    }
}

/// Zips a header row with data rows into records.
///
/// Blank headers drop their column, repeated headers get `.1`, `.2`, ...
/// suffixes, and rows with no non-blank cell are skipped.
pub fn records_from_rows<I>(header: &[String], rows: I) -> Vec<TabularRecord>
where
    I: IntoIterator<Item = Vec<FieldValue>>,
{
    let names = column_names(header);
    rows.into_iter()
        .filter(|row| row.iter().any(|v| !v.is_blank()))
        .map(|row| {
            let mut cells = row.into_iter();
            let mut rec = TabularRecord::with_capacity(names.len());
            for name in &names {
                let value = cells.next().unwrap_or(FieldValue::Empty);
                if let Some(name) = name {
                    rec.insert(name.clone(), value);
                }
            }
            rec
        })
        .collect()
}

fn column_names(header: &[String]) -> Vec<Option<String>> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    header
        .iter()
        .map(|raw| {
            let name = raw.trim();
            if name.is_empty() {
                return None;
            }
            let count = seen.entry(name.to_string()).or_insert(0);
            let out = if *count == 0 {
                name.to_string()
            } else {
                format!("{name}.{count}")
            };
            *count += 1;
            Some(out)
        })
        .collect()
}
