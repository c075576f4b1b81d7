use core::fmt;

use serde::{Deserialize, Serialize};

use crate::*;

/// Which sprite a renderer should draw for a cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageKey {
    Mine,
    Empty,
    Number(u8),
    Flag,
    Unrevealed,
}

impl ImageKey {
    pub const fn of(cell: &Cell) -> Self {
        match (cell.is_revealed, cell.is_mine, cell.is_flagged) {
            (true, true, _) => Self::Mine,
            (true, false, _) if cell.adjacent_mine_count == 0 => Self::Empty,
            (true, false, _) => Self::Number(cell.adjacent_mine_count),
            (false, _, true) => Self::Flag,
            (false, _, false) => Self::Unrevealed,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Mine => "mine",
            Self::Empty => "empty",
            Self::Number(1) => "1",
            Self::Number(2) => "2",
            Self::Number(3) => "3",
            Self::Number(4) => "4",
            Self::Number(5) => "5",
            Self::Number(6) => "6",
            Self::Number(7) => "7",
            Self::Number(8) => "8",
            Self::Number(_) => {
                debug_assert!(false, "adjacent mine counts are 1..=8");
                "8"
            }
            Self::Flag => "flag",
            Self::Unrevealed => "unrevealed",
        }
    }

    /// Single character used by text dumps of a board.
    pub const fn glyph(self) -> char {
        match self {
            Self::Mine => '*',
            Self::Empty => '.',
            Self::Number(n) if n <= 8 => (b'0' + n) as char,
            Self::Number(_) => {
                debug_assert!(false, "adjacent mine counts are 0..=8");
                '8'
            }
            Self::Flag => 'F',
            Self::Unrevealed => '#',
        }
    }
}

impl fmt::Display for ImageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
