//! ADIF record encoding.
//!
//! Each [`TabularRecord`] becomes one line of `<name:len>value` tags closed by
//! [`END_OF_RECORD`]. Field names are emitted lowercased and sorted without
//! regard to case, so the same record always encodes to the same string.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::TabularRecord;

/// Marker appended after the last field of every record.
pub const END_OF_RECORD: &str = "<eor>";

/// One encoded contact-log entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AdifRecord(String);

impl AdifRecord {
    /// Borrows the encoded text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the encoded text.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for AdifRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for AdifRecord {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Encodes a single record.
///
/// Values are rendered through their `Display` impl and every `,` becomes `.`
/// before the length is taken. The declared length counts characters, not
/// bytes. Field names are passed through without validation.
pub fn encode_record(record: &TabularRecord) -> AdifRecord {
    let mut names: Vec<&String> = record.keys().collect();
    names.sort_by_cached_key(|name| (name.to_lowercase(), name.to_string()));

    let mut out = String::new();
    for name in names {
        let text = record[name].to_string().replace(',', ".");
        push_field(&mut out, &name.to_lowercase(), &text);
    }
    out.push_str(END_OF_RECORD);
    AdifRecord(out)
}

/// Encodes records in source order.
pub fn encode_records(records: &[TabularRecord]) -> Vec<AdifRecord> {
    records.iter().map(encode_record).collect()
}

fn push_field(out: &mut String, name: &str, text: &str) {
    use std::fmt::Write as _;

    // Writing into a String cannot fail.
    let _ = write!(out, "<{name}:{}>{text}", text.chars().count());
}
