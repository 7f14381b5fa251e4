use serde::{Deserialize, Serialize};

/// Hidden content of a grid position, fixed when the grid is created.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cell {
    Safe,
    Mine,
}

impl Cell {
    pub const fn is_mine(self) -> bool {
        matches!(self, Self::Mine)
    }
}

impl From<bool> for Cell {
    fn from(is_mine: bool) -> Self {
        if is_mine { Self::Mine } else { Self::Safe }
    }
}

/// Player-visible state of a position, as handed to the presentation layer.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TileView {
    Hidden,
    Gem,
    Mine,
}

impl TileView {
    pub const fn is_hidden(self) -> bool {
        matches!(self, Self::Hidden)
    }
}

impl Default for TileView {
    fn default() -> Self {
        Self::Hidden
    }
}
