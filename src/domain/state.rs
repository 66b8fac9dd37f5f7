use super::types::ScanResult;

/// What the scan form currently shows. Exactly one variant is live at a time.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum UiState {
    #[default]
    Idle,
    Loading,
    Error {
        message: String,
    },
    Result(ScanResult),
}

impl UiState {
    pub fn is_loading(&self) -> bool {
        matches!(self, UiState::Loading)
    }

    pub fn name(&self) -> &'static str {
        match self {
            UiState::Idle => "idle",
            UiState::Loading => "loading",
            UiState::Error { .. } => "error",
            UiState::Result(_) => "result",
        }
    }
}
