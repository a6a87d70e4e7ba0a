use std::{fs, path::Path};

use chrono::{Local, TimeZone};
use tempfile::TempDir;

use qsoupload::logging::{self, LOG_FILE_PREFIX, run_log_path};

#[test]
fn run_log_name_carries_minute_timestamp() {
    let started = Local
        .with_ymd_and_hms(2023, 5, 14, 18, 30, 45)
        .single()
        .expect("local time");
    let path = run_log_path(Path::new("log"), &started);
    assert_eq!(
        path.file_name().and_then(|n| n.to_str()),
        Some(format!("{LOG_FILE_PREFIX}202305141830").as_str())
    );
}

#[test]
fn unwritable_log_dir_falls_back_to_console() {
    let tmp = TempDir::new().expect("tmp");
    let blocker = tmp.path().join("log");
    fs::write(&blocker, "not a directory").expect("write");

    assert!(logging::init(&blocker).is_err());
    logging::init_console();
    tracing::warn!("console subscriber installed");
}
