use thiserror::Error;

use crate::domain::ScanResult;

/// The only message a failed scan ever surfaces, whatever went wrong.
pub const SCAN_FAILED_MESSAGE: &str =
    "Failed to scan the website. Please check the URL and try again.";

/// Why a scan failed. Kept for logs; the user always sees [`SCAN_FAILED_MESSAGE`].
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("scan request failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("scan service answered with status {0}")]
    Status(u16),
    #[error("scan service did not answer in time")]
    Timeout,
    #[error("scan service returned an unexpected body: {0}")]
    InvalidResponse(String),
}

impl ScanError {
    pub fn user_message(&self) -> &'static str {
        SCAN_FAILED_MESSAGE
    }
}

impl From<reqwest::Error> for ScanError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ScanError::Timeout
        } else if let Some(status) = err.status() {
            ScanError::Status(status.as_u16())
        } else {
            ScanError::Transport(err)
        }
    }
}

/// Checks a response body against the `ScanResult` shape.
///
/// `risk` must be a string, `score` a finite number and `reasons` an array of
/// strings. Unknown fields are ignored.
pub fn parse_scan_body(body: &[u8]) -> Result<ScanResult, ScanError> {
    let result: ScanResult = serde_json::from_slice(body)
        .map_err(|err| ScanError::InvalidResponse(err.to_string()))?;
    if !result.score.is_finite() {
        return Err(ScanError::InvalidResponse(format!(
            "score is not a finite number: {}",
            result.score
        )));
    }
    Ok(result)
}
