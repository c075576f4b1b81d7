#![no_std]

extern crate alloc;

use alloc::vec::Vec;
use core::ops::{BitOr, Index, IndexMut};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

pub use board::*;
pub use cell::*;
pub use director::*;
pub use engine::*;
pub use error::*;
pub use generator::*;
pub use moves::*;
pub use render::*;
pub use scenario::*;
pub use session::*;
pub use types::*;

mod board;
mod cell;
mod director;
mod engine;
mod error;
mod generator;
mod moves;
mod render;
mod scenario;
mod session;
mod types;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub size: Coord2,
    pub mines: CellCount,
    pub mode: EmulationMode,
}

impl GameConfig {
    /// 30x16 with 99 mines, the default board.
    pub const EXPERT: Self = Self::new((30, 16), 99, EmulationMode::Win7);

    pub const fn new(size: Coord2, mines: CellCount, mode: EmulationMode) -> Self {
        Self { size, mines, mode }
    }

    pub const fn total_cells(&self) -> CellCount {
        area(self.size.0, self.size.1)
    }

    /// Rejects boards that could fail mine placement for some first click.
    pub fn validate(&self) -> Result<()> {
        if self.size.0 == 0 || self.size.1 == 0 {
            return Err(ConfigProblem::EmptyBoard.into());
        }

        let available = self
            .total_cells()
            .saturating_sub(self.mode.max_exclusion(self.size));
        if self.mines > available {
            return Err(ConfigProblem::TooManyMines {
                requested: self.mines,
                available,
            }
            .into());
        }

        Ok(())
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::EXPERT
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MineLayout {
    mine_mask: Array2<bool>,
    mine_count: CellCount,
}

impl MineLayout {
    pub fn from_mine_mask(mine_mask: Array2<bool>) -> Self {
        let mine_count = mine_mask.iter().filter(|&&is_mine| is_mine).count() as CellCount;
        Self {
            mine_mask,
            mine_count,
        }
    }

    pub fn from_mine_coords(size: Coord2, mine_coords: &[Coord2]) -> Result<Self> {
        let mut mine_mask: Array2<bool> = Array2::default(size.to_nd_index());

        for &coords in mine_coords {
            if !in_bounds(coords, size) {
                return Err(GameError::OutOfBounds);
            }
            mine_mask[coords.to_nd_index()] = true;
        }

        Ok(Self::from_mine_mask(mine_mask))
    }

    pub fn size(&self) -> Coord2 {
        let (width, height) = self.mine_mask.dim();
        (width as Coord, height as Coord)
    }

    pub fn total_cells(&self) -> CellCount {
        self.mine_mask.len() as CellCount
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.total_cells() - self.mine_count
    }

    pub fn contains_mine(&self, coords: Coord2) -> bool {
        in_bounds(coords, self.size()) && self[coords]
    }

    /// Mine positions in row-major order.
    pub fn mine_coords(&self) -> Vec<Coord2> {
        all_coords(self.size()).filter(|&pos| self[pos]).collect()
    }
}

impl Index<Coord2> for MineLayout {
    type Output = bool;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.mine_mask[coords.to_nd_index()]
    }
}

impl IndexMut<Coord2> for MineLayout {
    fn index_mut(&mut self, coords: Coord2) -> &mut Self::Output {
        &mut self.mine_mask[coords.to_nd_index()]
    }
}

/// What a single move did to the game.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    NoChange,
    Flagged,
    Unflagged,
    Revealed,
    HitMine,
    Won,
}

impl MoveOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::HitMine | Self::Won)
    }
}

/// Merges outcomes when one move reveals several cells.
impl BitOr for MoveOutcome {
    type Output = MoveOutcome;

    fn bitor(self, rhs: Self) -> Self::Output {
        use MoveOutcome::*;
        match (self, rhs) {
            (HitMine, _) | (_, HitMine) => HitMine,
            (Won, _) | (_, Won) => Won,
            (Revealed, _) | (_, Revealed) => Revealed,
            (NoChange, other) | (other, NoChange) => other,
            (Flagged | Unflagged, other) => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expert_config_is_valid() {
        assert_eq!(GameConfig::default().validate(), Ok(()));
    }

    #[test]
    fn config_rejects_empty_board() {
        let config = GameConfig::new((0, 5), 0, EmulationMode::WinXp);

        assert_eq!(
            config.validate(),
            Err(GameError::InvalidConfiguration(ConfigProblem::EmptyBoard))
        );
    }

    #[test]
    fn config_reserves_worst_case_exclusion() {
        let win7 = GameConfig::new((4, 4), 8, EmulationMode::Win7);
        let winxp = GameConfig::new((4, 4), 15, EmulationMode::WinXp);

        let too_many = ConfigProblem::TooManyMines {
            requested: 8,
            available: 7,
        };
        assert_eq!(win7.validate(), Err(too_many.into()));
        assert_eq!(winxp.validate(), Ok(()));
    }

    #[test]
    fn layout_rejects_out_of_bounds_mines() {
        assert_eq!(
            MineLayout::from_mine_coords((2, 2), &[(2, 0)]),
            Err(GameError::OutOfBounds)
        );
    }

    #[test]
    fn layout_lists_mines_row_major() {
        let layout = MineLayout::from_mine_coords((3, 2), &[(2, 0), (0, 1), (1, 0)]).unwrap();

        assert_eq!(layout.mine_count(), 3);
        assert_eq!(layout.safe_cell_count(), 3);
        assert_eq!(layout.mine_coords(), alloc::vec![(1, 0), (2, 0), (0, 1)]);
    }

    #[test]
    fn outcome_merge_prefers_terminal_results() {
        use MoveOutcome::*;

        assert_eq!(Revealed | HitMine, HitMine);
        assert_eq!(Won | Revealed, Won);
        assert_eq!(NoChange | Revealed, Revealed);
        assert_eq!(NoChange | NoChange, NoChange);
    }
}
