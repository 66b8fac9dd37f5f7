pub mod client;
pub mod protocol;
#[cfg(test)]
pub mod testing;

pub use client::{HttpScanService, ScanService};
pub use protocol::{ScanError, SCAN_FAILED_MESSAGE};
