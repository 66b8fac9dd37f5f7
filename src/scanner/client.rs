use futures::future::BoxFuture;
use reqwest::Client;

use crate::{
    config::ScannerConfig,
    domain::{ScanRequest, ScanResult},
};

use super::protocol::{parse_scan_body, ScanError};

/// Anything that can turn a URL into a verdict.
pub trait ScanService: Send + Sync + 'static {
    fn scan(&self, request: ScanRequest) -> BoxFuture<'_, Result<ScanResult, ScanError>>;
}

/// Talks to the remote scan endpoint over HTTP.
#[derive(Clone)]
pub struct HttpScanService {
    http: Client,
    config: ScannerConfig,
}

impl HttpScanService {
    pub fn new(http: Client, config: ScannerConfig) -> Self {
        Self { http, config }
    }

    async fn post(&self, request: ScanRequest) -> Result<ScanResult, ScanError> {
        let mut builder = self.http.post(self.config.endpoint.clone()).json(&request);
        if let Some(timeout) = self.config.request_timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder.send().await?.error_for_status()?;
        let body = response.bytes().await?;
        parse_scan_body(&body)
    }
}

impl ScanService for HttpScanService {
    fn scan(&self, request: ScanRequest) -> BoxFuture<'_, Result<ScanResult, ScanError>> {
        Box::pin(async move {
            let url = request.url.clone();
            let outcome = self.post(request).await;
            match &outcome {
                Ok(result) => tracing::debug!(
                    target: "scan",
                    url = %url,
                    risk = %result.risk,
                    score = result.score,
                    reasons = result.reasons.len(),
                    "scan service answered"
                ),
                Err(err) => tracing::warn!(
                    target: "scan",
                    url = %url,
                    error = %err,
                    "scan request failed"
                ),
            }
            outcome
        })
    }
}
