pub mod state;
pub mod types;

pub use state::UiState;
pub use types::{ScanRequest, ScanResult};
