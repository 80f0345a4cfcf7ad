use ndarray::Array2;

use super::*;

/// Generation strategy that draws mine cells one at a time, uniformly over the
/// grid, resampling on collision with an already-chosen mine until the
/// requested count is placed.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct UniformLayoutGenerator {
    seed: u64,
}

impl UniformLayoutGenerator {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl LayoutGenerator for UniformLayoutGenerator {
    fn generate(self, config: BoardConfig) -> MineLayout {
        use rand::prelude::*;

        let total_cells = config.total_cells();

        // unchecked configs can request more mines than fit; resampling would
        // never finish, so fill the board instead
        if config.mines >= total_cells {
            if config.mines > total_cells {
                log::warn!(
                    "mine count {} does not fit board of {} cells, generating full board",
                    config.mines,
                    total_cells
                );
            }
            return MineLayout::from_mine_mask(Array2::from_elem(
                [config.rows as usize, config.cols as usize],
                true,
            ));
        }

        let mut mine_mask: Array2<bool> =
            Array2::default([config.rows as usize, config.cols as usize]);
        let mut rng = SmallRng::seed_from_u64(self.seed);
        let mut mines_placed: CellCount = 0;
        let mut samples_drawn: u32 = 0;

        while mines_placed < config.mines {
            let row: Coord = rng.random_range(0..config.rows);
            let col: Coord = rng.random_range(0..config.cols);
            samples_drawn += 1;

            let cell = &mut mine_mask[(row, col).grid_index()];
            if *cell {
                continue;
            }
            *cell = true;
            mines_placed += 1;
        }

        log::debug!(
            "placed {} mines in {} samples on a {}x{} board",
            mines_placed,
            samples_drawn,
            config.rows,
            config.cols
        );

        MineLayout::from_mine_mask(mine_mask)
    }
}
