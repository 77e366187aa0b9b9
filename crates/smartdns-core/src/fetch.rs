// ── Fetch lifecycle ──

use serde::Serialize;

/// idle → loading → (success | error). Re-entered only by a refetch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum FetchStatus {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

impl FetchStatus {
    pub fn is_loading(self) -> bool {
        self == Self::Loading
    }
}
