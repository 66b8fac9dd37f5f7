pub mod env;
mod loader;

pub use env::{AppConfig, DirectoryConfig, ScannerConfig};
pub use loader::load_config;
