//! Run configuration and credential loading.

use std::{
    fmt, fs, io,
    path::{Path, PathBuf},
};

use crate::upload::qrz::DEFAULT_ENDPOINT;

/// Default credential file, resolved against the working directory.
pub const DEFAULT_API_KEY_FILE: &str = "api_key.txt";
/// Default directory for per-run log files.
pub const DEFAULT_LOG_DIR: &str = "log";

/// Errors that stop a run before any upload is attempted.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Credential file does not exist.
    #[error("no api key file at {}; save your api key to this file", .0.display())]
    MissingKeyFile(PathBuf),
    /// Credential file exists but could not be read.
    #[error("failed to read api key file {}: {source}", path.display())]
    ReadKeyFile {
        /// File that failed to read.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
    /// Credential file holds only whitespace.
    #[error("api key file {} is empty", .0.display())]
    EmptyKeyFile(PathBuf),
}

/// Opaque logbook credential. `Debug` output never shows the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Wraps a raw key.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Returns the secret for placing on the wire.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

/// Settings for one upload run.
#[derive(Debug, Clone)]
pub struct UploadConfig {
    /// File holding the API key as its entire contents.
    pub api_key_file: PathBuf,
    /// Logbook API endpoint URL.
    pub endpoint: String,
    /// Directory receiving the per-run log file.
    pub log_dir: PathBuf,
    /// Optional SQLite journal of upload attempts.
    pub journal: Option<PathBuf>,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            api_key_file: PathBuf::from(DEFAULT_API_KEY_FILE),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            log_dir: PathBuf::from(DEFAULT_LOG_DIR),
            journal: None,
        }
    }
}

/// Reads the API key from `path`, trimming surrounding whitespace.
pub fn load_api_key(path: impl AsRef<Path>) -> Result<ApiKey, ConfigError> {
    let path = path.as_ref();
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return Err(ConfigError::MissingKeyFile(path.to_path_buf()));
        }
        Err(source) => {
            return Err(ConfigError::ReadKeyFile {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    let key = raw.trim();
    if key.is_empty() {
        return Err(ConfigError::EmptyKeyFile(path.to_path_buf()));
    }
    Ok(ApiKey::new(key))
}
