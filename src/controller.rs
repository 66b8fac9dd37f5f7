use std::sync::Arc;

use parking_lot::Mutex;
use tokio::task::{JoinError, JoinHandle};

use crate::{
    domain::{ScanRequest, ScanResult, UiState},
    infrastructure::cancel::CancelToken,
    scanner::{ScanError, ScanService},
};

/// Owns the scan form: the pending URL and the single [`UiState`] rendered from it.
///
/// Every submission gets a generation number. Only the latest generation may
/// settle the state, so an older request finishing late never overwrites a
/// newer one.
#[derive(Clone)]
pub struct ScanController {
    service: Arc<dyn ScanService>,
    inner: Arc<Mutex<FormState>>,
}

#[derive(Default)]
struct FormState {
    url: String,
    state: UiState,
    generation: u64,
    in_flight: Option<CancelToken>,
}

/// Handle to a submitted scan.
pub struct PendingScan {
    generation: u64,
    cancel: CancelToken,
    handle: JoinHandle<UiState>,
}

impl ScanController {
    pub fn new(service: Arc<dyn ScanService>) -> Self {
        Self {
            service,
            inner: Arc::new(Mutex::new(FormState::default())),
        }
    }

    pub fn set_url(&self, value: impl Into<String>) {
        self.inner.lock().url = value.into();
    }

    pub fn url(&self) -> String {
        self.inner.lock().url.clone()
    }

    pub fn state(&self) -> UiState {
        self.inner.lock().state.clone()
    }

    /// Whether the scan trigger should be enabled.
    pub fn can_submit(&self) -> bool {
        let form = self.inner.lock();
        !form.state.is_loading() && !form.url.trim().is_empty()
    }

    /// Starts a scan of the current URL.
    ///
    /// Blank input (empty or whitespace only) is ignored: no request, no state
    /// change, `None`. Otherwise the state is `Loading` by the time this returns.
    pub fn submit(&self) -> Option<PendingScan> {
        let (request, generation, cancel) = {
            let mut form = self.inner.lock();
            let url = form.url.trim();
            if url.is_empty() {
                tracing::debug!(target: "controller", "blank url; submit ignored");
                return None;
            }
            let request = ScanRequest::new(url);

            if let Some(previous) = form.in_flight.take() {
                tracing::debug!(
                    target: "controller",
                    generation = form.generation,
                    "superseding in-flight scan"
                );
                previous.cancel();
            }

            form.generation += 1;
            let cancel = CancelToken::new();
            form.in_flight = Some(cancel.clone());
            form.state = UiState::Loading;
            (request, form.generation, cancel)
        };

        tracing::info!(target: "controller", url = %request.url, generation, "scan submitted");

        let service = self.service.clone();
        let inner = self.inner.clone();
        let mut listener = cancel.subscribe();
        let handle = tokio::spawn(async move {
            let outcome = tokio::select! {
                res = service.scan(request) => Some(res),
                _ = listener.cancelled() => None,
            };
            settle(&inner, generation, outcome)
        });

        Some(PendingScan {
            generation,
            cancel,
            handle,
        })
    }
}

fn settle(
    inner: &Mutex<FormState>,
    generation: u64,
    outcome: Option<Result<ScanResult, ScanError>>,
) -> UiState {
    let mut form = inner.lock();
    if form.generation != generation {
        tracing::debug!(
            target: "controller",
            generation,
            latest = form.generation,
            "dropping stale scan outcome"
        );
        return form.state.clone();
    }

    form.in_flight = None;
    form.state = match outcome {
        Some(Ok(result)) => {
            tracing::info!(
                target: "controller",
                generation,
                risk = %result.risk,
                score = result.score,
                "scan completed"
            );
            UiState::Result(result)
        }
        Some(Err(err)) => {
            tracing::warn!(target: "controller", generation, error = %err, "scan failed");
            UiState::Error {
                message: err.user_message().to_string(),
            }
        }
        None => {
            tracing::info!(target: "controller", generation, "scan cancelled");
            UiState::Idle
        }
    };
    form.state.clone()
}

impl PendingScan {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Abandons the request. If it is still the latest one the form returns to `Idle`.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Token that aborts this scan, usable after [`PendingScan::wait`] has taken the handle.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Waits for the scan to settle and returns the form state at that moment.
    pub async fn wait(self) -> Result<UiState, JoinError> {
        self.handle.await
    }
}
