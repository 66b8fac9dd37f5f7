mod app;
mod config;
mod controller;
mod domain;
mod infrastructure;
mod report;
mod scanner;

use anyhow::Result;
use infrastructure::{cancel, directories, logging};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = config::load_config()?;
    let paths = directories::ensure_directories(&config.directories)?;
    logging::init_tracing(&config, &paths)?;

    let shutdown = cancel::CancelToken::new();
    cancel::install_terminate_handler(shutdown.clone());

    let app = app::ScannerApp::initialize(&config, shutdown)?;
    app.run().await
}
