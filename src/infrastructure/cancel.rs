use tokio::sync::watch;

/// Owning side of a cancellation signal. Clones share the same signal.
#[derive(Debug, Clone)]
pub struct CancelToken {
    sender: watch::Sender<bool>,
}

#[derive(Debug, Clone)]
pub struct CancelListener {
    receiver: watch::Receiver<bool>,
}

impl CancelToken {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(false);
        Self { sender }
    }

    pub fn subscribe(&self) -> CancelListener {
        CancelListener {
            receiver: self.sender.subscribe(),
        }
    }

    pub fn cancel(&self) {
        self.sender.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.sender.borrow()
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

impl CancelListener {
    /// Resolves once the token is cancelled; returns immediately if it already was.
    pub async fn cancelled(&mut self) {
        if *self.receiver.borrow_and_update() {
            return;
        }
        while self.receiver.changed().await.is_ok() {
            if *self.receiver.borrow_and_update() {
                return;
            }
        }
        // Every token dropped without cancelling: never resolve.
        std::future::pending::<()>().await;
    }
}

/// Cancels `token` when the process receives SIGTERM. Ctrl-C is left to the
/// interactive loop, which uses it to abort a running scan first.
pub fn install_terminate_handler(token: CancelToken) {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        tokio::spawn(async move {
            if let Ok(mut sig) = signal(SignalKind::terminate()) {
                sig.recv().await;
                tracing::info!(target: "lifecycle", "SIGTERM received");
                token.cancel();
            }
        });
    }
    #[cfg(not(unix))]
    {
        let _ = token;
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::time::timeout;

    use super::*;

    #[tokio::test]
    async fn listener_wakes_on_cancel() {
        let token = CancelToken::new();
        let mut listener = token.subscribe();
        let waiter = tokio::spawn(async move {
            listener.cancelled().await;
        });
        token.cancel();
        timeout(Duration::from_secs(1), waiter)
            .await
            .expect("listener woke up")
            .expect("task finished");
        assert!(token.is_cancelled());
    }

    #[tokio::test]
    async fn late_subscriber_sees_prior_cancel() {
        let token = CancelToken::new();
        token.cancel();
        let mut listener = token.subscribe();
        timeout(Duration::from_millis(100), listener.cancelled())
            .await
            .expect("already cancelled");
    }

    #[tokio::test]
    async fn dropped_token_does_not_fire() {
        let token = CancelToken::new();
        let mut listener = token.subscribe();
        drop(token);
        let fired = timeout(Duration::from_millis(50), listener.cancelled()).await;
        assert!(fired.is_err());
    }
}
