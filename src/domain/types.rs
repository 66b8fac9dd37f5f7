use serde::{Deserialize, Serialize};

/// Body of the outbound scan request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanRequest {
    pub url: String,
}

impl ScanRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

/// Verdict returned by the scan service.
///
/// `risk` is a free-form label and `score` a threat percentage that is
/// expected, but not guaranteed, to fall within `0..=100`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScanResult {
    pub risk: String,
    pub score: f64,
    pub reasons: Vec<String>,
}
