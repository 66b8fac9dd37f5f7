use std::sync::Arc;

use anyhow::{Context, Result};
use reqwest::Client;
use tokio::{
    io::{self, AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader},
    sync::mpsc,
    task::JoinError,
};

use crate::{
    config::AppConfig,
    controller::{PendingScan, ScanController},
    domain::UiState,
    infrastructure::cancel::CancelToken,
    report,
    scanner::HttpScanService,
};

/// Interactive scan form on the terminal: one line of input is one URL,
/// Enter submits it.
pub struct ScannerApp {
    controller: ScanController,
    shutdown: CancelToken,
}

enum Input {
    Line(String),
    Eof,
    Interrupted,
}

enum Wait {
    Settled(Result<UiState, JoinError>),
    Interrupted,
    Shutdown,
}

impl ScannerApp {
    pub fn initialize(config: &AppConfig, shutdown: CancelToken) -> Result<Self> {
        let http_client = Client::builder()
            .user_agent(format!("site-scan/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .context("failed to build HTTP client")?;

        let service = HttpScanService::new(http_client, config.scanner.clone());
        Ok(Self::with_controller(ScanController::new(Arc::new(service)), shutdown))
    }

    pub fn with_controller(controller: ScanController, shutdown: CancelToken) -> Self {
        Self {
            controller,
            shutdown,
        }
    }

    /// Runs the form on stdin/stdout with Ctrl-C as the interrupt key.
    pub async fn run(self) -> Result<()> {
        let (interrupt_tx, mut interrupts) = mpsc::unbounded_channel();
        tokio::spawn(async move {
            while tokio::signal::ctrl_c().await.is_ok() {
                if interrupt_tx.send(()).is_err() {
                    break;
                }
            }
        });

        let mut stdout = io::stdout();
        self.run_session(BufReader::new(io::stdin()), &mut stdout, &mut interrupts)
            .await
    }

    /// Drives the form until end of input, `:quit`, shutdown, or an interrupt
    /// while no scan is running. An interrupt during a scan only cancels the scan.
    pub async fn run_session<R, W>(
        &self,
        input: R,
        output: &mut W,
        interrupts: &mut mpsc::UnboundedReceiver<()>,
    ) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = input.lines();
        let mut shutdown = self.shutdown.subscribe();
        let prompt = format!("{} > ", report::trigger_label(false));

        tracing::info!(target: "app", "scan form ready");
        write(output, &report::render_header()).await?;

        loop {
            if self.shutdown.is_cancelled() {
                break;
            }
            write(output, &prompt).await?;
            let input = tokio::select! {
                biased;
                line = lines.next_line() => match line.context("failed to read input")? {
                    Some(line) => Input::Line(line),
                    None => Input::Eof,
                },
                Some(()) = interrupts.recv() => Input::Interrupted,
                _ = shutdown.cancelled() => Input::Interrupted,
            };

            let line = match input {
                Input::Line(line) => line,
                Input::Eof | Input::Interrupted => break,
            };

            match line.trim() {
                ":quit" => break,
                ":state" => {
                    let state = self.controller.state();
                    let url = self.controller.url();
                    write(output, &format!("{} ({url})\n", state.name())).await?;
                    continue;
                }
                _ => {}
            }

            self.controller.set_url(line);
            if !self.controller.can_submit() {
                write(output, "Enter a URL to scan.\n").await?;
                continue;
            }
            let Some(pending) = self.controller.submit() else {
                continue;
            };

            write(output, &report::render(&UiState::Loading)).await?;
            let keep_going = self.await_scan(pending, output, interrupts).await?;
            if !keep_going {
                break;
            }
        }

        tracing::info!(target: "app", "scan form closed");
        Ok(())
    }

    /// Waits for `pending` to settle and renders the outcome. Returns `false`
    /// when the session should end.
    async fn await_scan<W>(
        &self,
        pending: PendingScan,
        output: &mut W,
        interrupts: &mut mpsc::UnboundedReceiver<()>,
    ) -> Result<bool>
    where
        W: AsyncWrite + Unpin,
    {
        let generation = pending.generation();
        let cancel = pending.cancel_token();
        let mut shutdown = self.shutdown.subscribe();
        let wait = pending.wait();
        tokio::pin!(wait);

        let first = tokio::select! {
            biased;
            res = &mut wait => Wait::Settled(res),
            Some(()) = interrupts.recv() => Wait::Interrupted,
            _ = shutdown.cancelled() => Wait::Shutdown,
        };

        let (settled, keep_going) = match first {
            Wait::Settled(res) => (res, true),
            Wait::Interrupted => {
                tracing::info!(target: "app", generation, "scan interrupted by user");
                cancel.cancel();
                (wait.as_mut().await, true)
            }
            Wait::Shutdown => {
                cancel.cancel();
                (wait.as_mut().await, false)
            }
        };

        let state = match settled {
            Ok(state) => state,
            Err(err) => {
                tracing::error!(target: "app", error = %err, "scan task did not complete");
                self.controller.state()
            }
        };

        match &state {
            UiState::Idle => write(output, "Scan cancelled.\n").await?,
            other => write(output, &report::render(other)).await?,
        }
        Ok(keep_going)
    }
}

async fn write<W>(output: &mut W, text: &str) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    output.write_all(text.as_bytes()).await?;
    output.flush().await?;
    Ok(())
}
