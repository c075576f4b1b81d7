use serde::{Deserialize, Serialize};

use crate::*;

/// One grid position together with everything the engine knows about it.
///
/// `adjacent_mine_count` is only meaningful once the board has been seeded.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub x: Coord,
    pub y: Coord,
    pub is_mine: bool,
    pub is_flagged: bool,
    pub is_revealed: bool,
    pub adjacent_mine_count: u8,
}

impl Cell {
    pub const fn new((x, y): Coord2) -> Self {
        Self {
            x,
            y,
            is_mine: false,
            is_flagged: false,
            is_revealed: false,
            adjacent_mine_count: 0,
        }
    }

    pub const fn coords(&self) -> Coord2 {
        (self.x, self.y)
    }

    /// Neither revealed nor flagged, the only state ordinary reveal acts on.
    pub const fn is_hidden(&self) -> bool {
        !self.is_revealed && !self.is_flagged
    }

    /// Revealed safe cell with at least one adjacent mine.
    pub const fn is_numbered(&self) -> bool {
        self.is_revealed && !self.is_mine && self.adjacent_mine_count > 0
    }

    pub const fn image_key(&self) -> ImageKey {
        ImageKey::of(self)
    }
}
