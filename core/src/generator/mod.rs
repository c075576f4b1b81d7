use core::str::FromStr;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::*;
pub use random::*;

mod random;

pub trait MineGenerator {
    fn generate(
        self,
        size: Coord2,
        mine_count: CellCount,
        first_click: Coord2,
        mode: EmulationMode,
    ) -> Result<MineLayout>;
}

/// How much of the board around the first click is kept free of mines.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EmulationMode {
    /// Only the clicked cell is safe.
    WinXp,
    /// The clicked cell and its whole neighborhood are safe.
    #[default]
    Win7,
}

impl EmulationMode {
    pub const ALL: [Self; 2] = [Self::WinXp, Self::Win7];

    pub const fn name(self) -> &'static str {
        match self {
            Self::WinXp => "winxp",
            Self::Win7 => "win7",
        }
    }

    /// Largest excluded set any first click can produce on a board of `size`.
    pub const fn max_exclusion(self, size: Coord2) -> CellCount {
        match self {
            Self::WinXp => 1,
            Self::Win7 => {
                let width = if size.0 < 3 { size.0 } else { 3 };
                let height = if size.1 < 3 { size.1 } else { 3 };
                area(width, height)
            }
        }
    }
}

impl FromStr for EmulationMode {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.name().eq_ignore_ascii_case(s))
            .ok_or(ConfigProblem::UnknownName.into())
    }
}

impl core::fmt::Display for EmulationMode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// Cells that must stay mine-free when the first click lands on `first_click`.
pub fn excluded_cells(
    size: Coord2,
    first_click: Coord2,
    mode: EmulationMode,
) -> SmallVec<[Coord2; 9]> {
    let mut excluded = SmallVec::new();
    excluded.push(first_click);
    if mode == EmulationMode::Win7 {
        excluded.extend(neighbors_within(first_click, size));
    }
    excluded
}
