use std::path::PathBuf;

use clap::Parser;

use crate::config::UploadConfig;

/// Upload QSOs from a spreadsheet to the QRZ.com logbook.
#[derive(Debug, Clone, Parser)]
#[command(name = "qso-upload", version, about)]
pub struct Cli {
    /// QSO import file (.xlsx, .xls, .ods or .csv).
    #[arg(short = 'i', long = "import", value_name = "FILE")]
    pub import: PathBuf,

    /// File containing the logbook API key [default: api_key.txt].
    #[arg(long, env = "QRZ_API_KEY_FILE")]
    pub api_key_file: Option<PathBuf>,

    /// Logbook API endpoint [default: https://logbook.qrz.com/api].
    #[arg(long, env = "QRZ_LOGBOOK_URL")]
    pub endpoint: Option<String>,

    /// Directory for per-run log files [default: log].
    #[arg(long)]
    pub log_dir: Option<PathBuf>,

    /// SQLite file recording every upload attempt.
    #[arg(long, value_name = "DB")]
    pub journal: Option<PathBuf>,
}

impl Cli {
    /// Splits the arguments into the input path and run configuration.
    /// Options left unset keep their [`UploadConfig::default`] values.
    pub fn into_parts(self) -> (PathBuf, UploadConfig) {
        let defaults = UploadConfig::default();
        let config = UploadConfig {
            api_key_file: self.api_key_file.unwrap_or(defaults.api_key_file),
            endpoint: self.endpoint.unwrap_or(defaults.endpoint),
            log_dir: self.log_dir.unwrap_or(defaults.log_dir),
            journal: self.journal.or(defaults.journal),
        };
        (self.import, config)
    }
}
