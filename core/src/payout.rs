use serde::{Deserialize, Serialize};

use crate::*;

/// House edge applied when no other table is configured, a 4% cut.
pub const DEFAULT_HOUSE_EDGE: f64 = 0.96;

/// Payout parameters for a game. The house edge is a business setting, not derived from the grid.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PayoutTable {
    house_edge: f64,
}

impl PayoutTable {
    /// Fails for an edge outside `(0, 1]`; anything above one would pay more than fair odds.
    pub fn new(house_edge: f64) -> Result<Self> {
        if house_edge > 0.0 && house_edge <= 1.0 {
            Ok(Self { house_edge })
        } else {
            Err(GameError::InvalidConfiguration)
        }
    }

    pub const fn house_edge(&self) -> f64 {
        self.house_edge
    }

    /// Fair odds of drawing `gems_revealed` safe cells in a row without replacement, discounted by the house edge.
    ///
    /// With no gems revealed this is just the house edge. Picks beyond the number of safe cells cannot happen and
    /// are ignored.
    pub fn multiplier(&self, gems_revealed: CellCount, mine_count: CellCount, size: Coord) -> f64 {
        let total_cells = mult(size, size);
        let total_safe = total_cells.saturating_sub(mine_count);

        let mut cumulative = 1.0;
        for pick in 1..=gems_revealed.min(total_safe) {
            let remaining_total = f64::from(total_cells - (pick - 1));
            let remaining_safe = f64::from(total_safe - (pick - 1));
            cumulative *= remaining_total / remaining_safe;
        }

        cumulative * self.house_edge
    }
}

impl Default for PayoutTable {
    fn default() -> Self {
        Self {
            house_edge: DEFAULT_HOUSE_EDGE,
        }
    }
}

/// [`PayoutTable::multiplier`] with the default house edge.
pub fn multiplier(gems_revealed: CellCount, mine_count: CellCount, size: Coord) -> f64 {
    PayoutTable::default().multiplier(gems_revealed, mine_count, size)
}

pub fn payout(amount: f64, multiplier: f64) -> f64 {
    amount * multiplier
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        let diff = if actual > expected { actual - expected } else { expected - actual };
        assert!(
            diff < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn no_gems_pays_house_edge() {
        for size in 2..=MAX_GRID_SIZE {
            for mines in 1..mult(size, size) {
                assert_eq!(multiplier(0, mines, size), 0.96);
            }
        }
    }

    #[test]
    fn five_by_five_with_five_mines() {
        assert_close(multiplier(1, 5, 5), 1.2);
        assert_close(multiplier(2, 5, 5), 25.0 / 20.0 * 24.0 / 19.0 * 0.96);
        let two_gems = multiplier(2, 5, 5);
        assert!(two_gems > 1.5157 && two_gems < 1.5159);
    }

    #[test]
    fn strictly_increasing_with_gems() {
        for size in 2..=MAX_GRID_SIZE {
            let total = mult(size, size);
            for mines in 1..total {
                let mut previous = multiplier(0, mines, size);
                for gems in 1..=(total - mines) {
                    let current = multiplier(gems, mines, size);
                    assert!(
                        current > previous,
                        "size {size}, mines {mines}, gems {gems}: {current} <= {previous}"
                    );
                    previous = current;
                }
            }
        }
    }

    #[test]
    fn clearing_the_board_pays_inverse_probability() {
        // 3x3 with one mine: surviving all 8 picks has probability 1/9
        assert_close(multiplier(8, 1, 3), 9.0 * 0.96);
        assert_eq!(multiplier(9, 1, 3), multiplier(8, 1, 3));
    }

    #[test]
    fn custom_house_edge() {
        let table = PayoutTable::new(0.97).unwrap();
        assert_eq!(table.multiplier(0, 3, 5), 0.97);
        assert_close(table.multiplier(1, 5, 5), 1.25 * 0.97);
    }

    #[test]
    fn house_edge_must_be_a_discount() {
        assert_eq!(PayoutTable::new(0.0), Err(GameError::InvalidConfiguration));
        assert_eq!(PayoutTable::new(1.01), Err(GameError::InvalidConfiguration));
        assert_eq!(PayoutTable::new(f64::NAN), Err(GameError::InvalidConfiguration));
        assert!(PayoutTable::new(1.0).is_ok());
    }

    #[test]
    fn payout_scales_amount() {
        assert_eq!(payout(100.0, 1.5), 150.0);
        assert_eq!(payout(0.0, 3.0), 0.0);
    }
}
