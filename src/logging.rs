//! Tracing setup: a per-run log file plus filtered stderr output.

use std::{
    fs::{self, File},
    io,
    path::{Path, PathBuf},
    sync::Mutex,
};

use chrono::{DateTime, Local, TimeZone};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Prefix of every per-run log file name.
pub const LOG_FILE_PREFIX: &str = "qrz_upload_log_";

/// Builds the log file path for a run started at `started`.
pub fn run_log_path<Tz: TimeZone>(log_dir: &Path, started: &DateTime<Tz>) -> PathBuf
where
    Tz::Offset: std::fmt::Display,
{
    log_dir.join(format!("{LOG_FILE_PREFIX}{}", started.format("%Y%m%d%H%M")))
}

/// Installs the global subscriber and returns the log file path.
///
/// The file layer records INFO and above. The stderr layer honours
/// `RUST_LOG` and defaults to `warn`.
pub fn init(log_dir: &Path) -> io::Result<PathBuf> {
    fs::create_dir_all(log_dir)?;
    let path = run_log_path(log_dir, &Local::now());
    let file = File::options().create(true).append(true).open(&path)?;

    let file_layer = fmt::layer()
        .with_ansi(false)
        .with_target(false)
        .with_writer(Mutex::new(file))
        .with_filter(LevelFilter::INFO);

    let console_layer = fmt::layer()
        .with_writer(io::stderr)
        .with_filter(console_filter());

    // A second init (e.g. from tests) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(file_layer)
        .with(console_layer)
        .try_init();

    Ok(path)
}

/// Installs a stderr-only subscriber, used when no log file can be opened.
pub fn init_console() {
    let _ = tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(console_filter())
        .try_init();
}

fn console_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
}
