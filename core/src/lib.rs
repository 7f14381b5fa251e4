#![no_std]

extern crate alloc;

use alloc::collections::BTreeSet;
use core::ops::Index;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

pub use engine::*;
pub use error::*;
pub use generator::*;
pub use ledger::*;
pub use payout::*;
pub use tile::*;
pub use types::*;
pub use view::*;

mod engine;
mod error;
mod generator;
mod ledger;
mod payout;
mod tile;
mod types;
mod view;

/// Validated grid parameters: a `size × size` grid holding `mines` mines.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub size: Coord,
    pub mines: CellCount,
}

impl GameConfig {
    pub fn new(size: Coord, mines: CellCount) -> Result<Self> {
        if !(1..=MAX_GRID_SIZE).contains(&size) {
            return Err(GameError::InvalidConfiguration);
        }
        if mines < 1 || mines >= mult(size, size) {
            return Err(GameError::InvalidConfiguration);
        }
        Ok(Self { size, mines })
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.size, self.size)
    }

    pub const fn safe_cells(&self) -> CellCount {
        self.total_cells() - self.mines
    }
}

/// Immutable placement of mines on a square grid.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "StoredMineLayout")]
pub struct MineLayout {
    mine_mask: Array2<bool>,
    mine_count: CellCount,
}

impl MineLayout {
    pub(crate) fn from_mine_mask(mine_mask: Array2<bool>) -> Self {
        let mine_count = mine_mask.iter().filter(|&&is_mine| is_mine).count() as CellCount;
        Self {
            mine_mask,
            mine_count,
        }
    }

    /// Builds a layout with mines at exactly the given positions.
    ///
    /// The resulting grid must still be a valid configuration, so at least one mine and at least one safe cell.
    pub fn from_mine_coords(size: Coord, mine_coords: &[Coord2]) -> Result<Self> {
        if !(1..=MAX_GRID_SIZE).contains(&size) {
            return Err(GameError::InvalidConfiguration);
        }
        let mut mine_mask: Array2<bool> = Array2::default((size, size).to_nd_index());

        for &coords in mine_coords {
            if coords.0 >= size || coords.1 >= size {
                return Err(GameError::OutOfBounds);
            }
            mine_mask[coords.to_nd_index()] = true;
        }

        let layout = Self::from_mine_mask(mine_mask);
        GameConfig::new(size, layout.mine_count)?;
        Ok(layout)
    }

    pub fn game_config(&self) -> GameConfig {
        GameConfig {
            size: self.size(),
            mines: self.mine_count,
        }
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        let size = self.size();
        if coords.0 < size && coords.1 < size {
            Ok(coords)
        } else {
            Err(GameError::OutOfBounds)
        }
    }

    pub fn size(&self) -> Coord {
        self.mine_mask.nrows() as Coord
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.total_cells() - self.mine_count
    }

    pub fn total_cells(&self) -> CellCount {
        self.mine_mask.len() as CellCount
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn contains_mine(&self, coords: Coord2) -> bool {
        self[coords]
    }

    pub fn cell_at(&self, coords: Coord2) -> Cell {
        Cell::from(self[coords])
    }

    /// Ordered set of every mine position.
    pub fn mine_positions(&self) -> BTreeSet<Coord2> {
        iter_positions(self.size())
            .filter(|&pos| self[pos])
            .collect()
    }
}

/// Serialized shape of [`MineLayout`], checked before it becomes a layout.
#[derive(Deserialize)]
struct StoredMineLayout {
    mine_mask: Array2<bool>,
    mine_count: CellCount,
}

impl TryFrom<StoredMineLayout> for MineLayout {
    type Error = GameError;

    fn try_from(stored: StoredMineLayout) -> Result<Self> {
        let (rows, cols) = stored.mine_mask.dim();
        if rows != cols || rows > usize::from(MAX_GRID_SIZE) {
            return Err(GameError::InvalidConfiguration);
        }
        let layout = Self::from_mine_mask(stored.mine_mask);
        if layout.mine_count != stored.mine_count {
            return Err(GameError::InvalidConfiguration);
        }
        GameConfig::new(layout.size(), layout.mine_count)?;
        Ok(layout)
    }
}

impl Index<Coord2> for MineLayout {
    type Output = bool;

    fn index(&self, (row, col): Coord2) -> &Self::Output {
        &self.mine_mask[(row as usize, col as usize)]
    }
}

/// Result of revealing a single position.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum RevealOutcome {
    /// Safe cell, the multiplier grew.
    Gem { multiplier: f64 },
    /// Safe cell and the last one left; the game is still open for a cash-out.
    Cleared { multiplier: f64 },
    /// Hit a mine, the session is over and the bet is lost.
    Busted,
}

impl RevealOutcome {
    pub const fn is_busted(self) -> bool {
        matches!(self, Self::Busted)
    }

    pub const fn multiplier(self) -> Option<f64> {
        use RevealOutcome::*;
        match self {
            Gem { multiplier } | Cleared { multiplier } => Some(multiplier),
            Busted => None,
        }
    }
}
