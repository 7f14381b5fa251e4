use rand::Rng;
use rand::prelude::*;

use super::*;

/// Purely random generation strategy seeded from a fixed value, so the same seed always yields the same layout.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomMinefieldGenerator {
    seed: u64,
}

impl RandomMinefieldGenerator {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl MinefieldGenerator for RandomMinefieldGenerator {
    fn generate(self, config: GameConfig) -> MineLayout {
        let mut rng = SmallRng::seed_from_u64(self.seed);
        place_mines(config, &mut rng)
    }
}

/// Places `config.mines` mines uniformly at random without replacement, drawing from `rng`.
pub fn place_mines<R: Rng + ?Sized>(config: GameConfig, rng: &mut R) -> MineLayout {
    let mut mines: Array2<bool> = Array2::default((config.size, config.size).to_nd_index());
    let mut free_cells = config.total_cells();
    let mut mines_placed = 0;

    while mines_placed < config.mines {
        if free_cells == 0 {
            break;
        }
        // index among the cells that are still free, skip over placed mines to find it
        let mut place: CellCount = rng.random_range(0..free_cells);
        for (i, cell) in mines.iter_mut().enumerate() {
            let i = i as CellCount;
            if *cell {
                place += 1;
            }
            if i == place {
                *cell = true;
                mines_placed += 1;
                free_cells -= 1;
                break;
            }
        }
    }

    let layout = MineLayout::from_mine_mask(mines);
    if layout.mine_count() != config.mines {
        log::warn!(
            "Generated minefield count mismatch, actual: {}, requested: {}",
            layout.mine_count(),
            config.mines
        );
    }
    log::trace!("placed {} mines on a {}x{} grid", layout.mine_count(), config.size, config.size);
    layout
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_layout() {
        let config = GameConfig::new(5, 5).unwrap();

        let first = RandomMinefieldGenerator::new(7).generate(config);
        let second = RandomMinefieldGenerator::new(7).generate(config);

        assert_eq!(first, second);
    }

    #[test]
    fn every_valid_config_gets_exact_mine_count() {
        for size in 1..=MAX_GRID_SIZE {
            let total = mult(size, size);
            for mines in 1..total {
                let config = GameConfig::new(size, mines).unwrap();
                let layout = RandomMinefieldGenerator::new(u64::from(mines)).generate(config);

                assert_eq!(layout.size(), size);
                assert_eq!(layout.mine_count(), mines);
                assert_eq!(layout.safe_cell_count(), total - mines);
                assert_eq!(layout.mine_positions().len(), usize::from(mines));
            }
        }
    }

    #[test]
    fn different_seeds_spread_mines_around() {
        let config = GameConfig::new(5, 1).unwrap();
        let mut seen = BTreeSet::new();
        for seed in 0..200 {
            let layout = RandomMinefieldGenerator::new(seed).generate(config);
            seen.extend(layout.mine_positions());
        }
        // 200 single-mine draws over 25 cells should hit most of the grid
        assert!(seen.len() > 20, "only {} distinct positions", seen.len());
    }

    #[test]
    fn fixed_generator_returns_its_layout() {
        let layout = MineLayout::from_mine_coords(2, &[(1, 0)]).unwrap();
        let generated = FixedMinefieldGenerator::new(layout.clone()).generate(layout.game_config());
        assert_eq!(generated, layout);
    }
}
