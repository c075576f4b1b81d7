use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Reveal,
    ToggleFlag,
    /// Reveal every hidden neighbor of a revealed numbered cell.
    CascadeNeighbors,
}

/// The only way to mutate a board.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub x: Coord,
    pub y: Coord,
    pub action: Action,
}

impl Move {
    pub const fn new((x, y): Coord2, action: Action) -> Self {
        Self { x, y, action }
    }

    pub const fn reveal(coords: Coord2) -> Self {
        Self::new(coords, Action::Reveal)
    }

    pub const fn toggle_flag(coords: Coord2) -> Self {
        Self::new(coords, Action::ToggleFlag)
    }

    pub const fn cascade_neighbors(coords: Coord2) -> Self {
        Self::new(coords, Action::CascadeNeighbors)
    }

    pub const fn coords(&self) -> Coord2 {
        (self.x, self.y)
    }
}

/// Pointer button as reported by the input layer.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Button {
    Primary,
    Secondary,
    Middle,
    Other(u8),
}

impl Button {
    /// Maps conventional button numbers: 1 left, 2 middle, 3 right.
    pub const fn from_index(index: u8) -> Self {
        match index {
            1 => Self::Primary,
            2 => Self::Middle,
            3 => Self::Secondary,
            other => Self::Other(other),
        }
    }

    pub const fn action(self) -> Option<Action> {
        match self {
            Self::Primary => Some(Action::Reveal),
            Self::Secondary => Some(Action::ToggleFlag),
            Self::Middle => Some(Action::CascadeNeighbors),
            Self::Other(_) => None,
        }
    }
}
