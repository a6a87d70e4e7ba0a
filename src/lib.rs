//! Spreadsheet-to-logbook QSO uploader.
//!
//! Rows from a workbook or CSV file become ADIF records, which are posted one
//! at a time to a QRZ-compatible logbook API.
//!
//! # Examples
//!
//! Encoding a record with [`adif::encode_record`]:
//! ```
//! use qsoupload::{adif::encode_record, types::TabularRecord};
//!
//! let mut rec = TabularRecord::new();
//! rec.insert("call".to_string(), "SP2JW".into());
//! rec.insert("rst_sent".to_string(), "59".into());
//! rec.insert("band".to_string(), "20m".into());
//!
//! assert_eq!(
//!     encode_record(&rec).as_str(),
//!     "<band:3>20m<call:5>SP2JW<rst_sent:2>59<eor>"
//! );
//! ```
//!
//! Uploading with a journal:
//! ```no_run
//! use qsoupload::{
//!     adif::encode_records,
//!     config::load_api_key,
//!     persist::sqlite::SqliteUploadJournal,
//!     runtime::runner::UploadRun,
//!     source::read_records,
//!     upload::qrz::QrzLogbookClient,
//! };
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let key = load_api_key("api_key.txt").expect("api key");
//! let records = encode_records(&read_records("log.xlsx").expect("read"));
//! let client = QrzLogbookClient::new(key);
//! let mut journal = SqliteUploadJournal::open("uploads.db").expect("open sqlite");
//! let summary = UploadRun::new(&client)
//!     .with_journal(&mut journal, "log.xlsx")
//!     .run(&records, |_| {})
//!     .await
//!     .expect("transport");
//! assert_eq!(summary.accepted + summary.failed, records.len());
//! # }
//! ```
#![deny(missing_docs)]

/// ADIF record encoding.
pub mod adif;
/// Command-line arguments.
pub mod cli;
/// Run configuration and credential loading.
pub mod config;
/// Tracing subscriber setup.
pub mod logging;
/// Upload journal abstraction and SQLite implementation.
pub mod persist;
/// Sequential upload loop and events.
pub mod runtime;
/// Workbook and CSV readers.
pub mod source;
/// Shared record and value types.
pub mod types;
/// Logbook client trait, HTTP client and response classification.
pub mod upload;
