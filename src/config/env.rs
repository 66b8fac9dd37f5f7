use std::time::Duration;

use thiserror::Error;
use url::Url;

pub const DEFAULT_SCAN_ENDPOINT: &str = "http://localhost:8000/scan";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub scanner: ScannerConfig,
    pub directories: DirectoryConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone)]
pub struct ScannerConfig {
    pub endpoint: Url,
    /// `None` leaves the request unbounded.
    pub request_timeout: Option<Duration>,
}

#[derive(Debug, Clone)]
pub struct DirectoryConfig {
    pub logs_dir: String,
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: String,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?} ({reason})")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}
