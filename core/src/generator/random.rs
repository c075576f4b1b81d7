use alloc::vec::Vec;

use rand::{SeedableRng, rngs::SmallRng, seq::index};

use super::*;

/// Uniform placement over every cell the emulation mode leaves eligible.
///
/// The same seed always yields the same layout for the same request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RandomMineGenerator {
    seed: u64,
}

impl RandomMineGenerator {
    pub const fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl MineGenerator for RandomMineGenerator {
    fn generate(
        self,
        size: Coord2,
        mine_count: CellCount,
        first_click: Coord2,
        mode: EmulationMode,
    ) -> Result<MineLayout> {
        if size.0 == 0 || size.1 == 0 {
            return Err(ConfigProblem::EmptyBoard.into());
        }
        if !in_bounds(first_click, size) {
            return Err(GameError::OutOfBounds);
        }

        let excluded = excluded_cells(size, first_click, mode);
        let candidates: Vec<Coord2> = all_coords(size)
            .filter(|pos| !excluded.contains(pos))
            .collect();

        let available = candidates.len() as CellCount;
        if mine_count > available {
            return Err(ConfigProblem::TooManyMines {
                requested: mine_count,
                available,
            }
            .into());
        }

        let mut rng = SmallRng::seed_from_u64(self.seed);
        let mut mine_mask: Array2<bool> = Array2::default(size.to_nd_index());
        for i in index::sample(&mut rng, candidates.len(), mine_count as usize) {
            mine_mask[candidates[i].to_nd_index()] = true;
        }

        log::debug!(
            "placed {} mines on {}x{} avoiding {:?} ({})",
            mine_count,
            size.0,
            size.1,
            first_click,
            mode
        );
        Ok(MineLayout::from_mine_mask(mine_mask))
    }
}
