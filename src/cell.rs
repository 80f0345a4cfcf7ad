use serde::{Deserialize, Serialize};

/// Canonical player-visible state of a single board cell.
///
/// `Revealed(0)` is the blank cell; `ExposedMine` and `Locked` only appear
/// after a loss, when the whole board is uncovered and frozen.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum CellState {
    Hidden,
    Flagged,
    Revealed(u8),
    ExposedMine,
    Locked,
}

impl CellState {
    pub const fn is_hidden(self) -> bool {
        matches!(self, Self::Hidden)
    }
}

impl Default for CellState {
    fn default() -> Self {
        Self::Hidden
    }
}
