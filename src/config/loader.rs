use std::{env, time::Duration};

use url::Url;

use super::env::{
    AppConfig, ConfigError, DirectoryConfig, LoggingConfig, ScannerConfig, DEFAULT_SCAN_ENDPOINT,
};

pub fn load_config() -> Result<AppConfig, ConfigError> {
    AppConfig::from_lookup(|key| env::var(key).ok())
}

impl AppConfig {
    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let scanner = ScannerConfig {
            endpoint: parse_endpoint(
                var("SCAN_ENDPOINT").unwrap_or_else(|| DEFAULT_SCAN_ENDPOINT.to_string()),
            )?,
            request_timeout: parse_timeout(var("SCAN_TIMEOUT_MS"))?,
        };

        let directories = DirectoryConfig {
            logs_dir: var("LOGS_DIR").unwrap_or_else(|| "logs".to_string()),
        };

        let logging = LoggingConfig {
            level: var("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
        };

        Ok(Self {
            scanner,
            directories,
            logging,
        })
    }
}

fn parse_endpoint(raw: String) -> Result<Url, ConfigError> {
    let invalid = |reason: String| ConfigError::Invalid {
        key: "SCAN_ENDPOINT",
        value: raw.clone(),
        reason,
    };
    let url = Url::parse(raw.trim()).map_err(|err| invalid(err.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme {}", url.scheme())));
    }
    Ok(url)
}

fn parse_timeout(raw: Option<String>) -> Result<Option<Duration>, ConfigError> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    let millis = raw
        .trim()
        .parse::<u64>()
        .map_err(|err| ConfigError::Invalid {
            key: "SCAN_TIMEOUT_MS",
            value: raw.clone(),
            reason: err.to_string(),
        })?;
    Ok((millis > 0).then(|| Duration::from_millis(millis)))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_point_at_local_service_without_timeout() {
        let config = config_from(&[]).expect("defaults load");
        assert_eq!(config.scanner.endpoint.as_str(), DEFAULT_SCAN_ENDPOINT);
        assert!(config.scanner.request_timeout.is_none());
        assert_eq!(config.directories.logs_dir, "logs");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn overrides_are_applied() {
        let config = config_from(&[
            ("SCAN_ENDPOINT", "https://scanner.internal:9443/v1/scan"),
            ("SCAN_TIMEOUT_MS", "2500"),
            ("LOG_LEVEL", "debug"),
        ])
        .expect("config loads");
        assert_eq!(config.scanner.endpoint.host_str(), Some("scanner.internal"));
        assert_eq!(
            config.scanner.request_timeout,
            Some(Duration::from_millis(2500))
        );
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn zero_timeout_means_unbounded() {
        let config = config_from(&[("SCAN_TIMEOUT_MS", "0")]).expect("config loads");
        assert!(config.scanner.request_timeout.is_none());
    }

    #[test]
    fn rejects_non_http_endpoint() {
        let err = config_from(&[("SCAN_ENDPOINT", "ftp://localhost/scan")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "SCAN_ENDPOINT", .. }));
    }

    #[test]
    fn rejects_garbage_timeout() {
        let err = config_from(&[("SCAN_TIMEOUT_MS", "soon")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "SCAN_TIMEOUT_MS", .. }));
    }
}
