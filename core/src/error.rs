use thiserror::Error;

use crate::{CellCount, Coord};

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Coordinates out of bounds")]
    OutOfBounds,
    #[error("Game already over, no new moves are accepted")]
    GameAlreadyOver,
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(#[from] ConfigProblem),
    #[error("Malformed scenario: {0}")]
    ScenarioFormat(#[from] ScenarioProblem),
    #[error("Director failed: {0}")]
    DirectorFailure(#[from] DirectorError),
    #[error("Mine layout already committed")]
    AlreadySeeded,
    #[error("Board has no mine layout yet")]
    NoMineLayout,
}

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum ConfigProblem {
    #[error("board must have at least one cell")]
    EmptyBoard,
    #[error("{requested} mines requested but only {available} cells can hold one")]
    TooManyMines {
        requested: CellCount,
        available: CellCount,
    },
    #[error("mine layout does not match the board")]
    LayoutMismatch,
    #[error("unknown name")]
    UnknownName,
}

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum ScenarioProblem {
    #[error("no rows")]
    Empty,
    #[error("board exceeds the supported size")]
    TooLarge,
    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        found: usize,
        expected: usize,
    },
    #[error("unknown cell symbol {symbol:?} at ({x}, {y})")]
    UnknownSymbol { symbol: char, x: usize, y: usize },
    #[error("more than one losing mine")]
    MultipleLosingMines,
    #[error("masks do not match a {width}x{height} board")]
    MaskShape { width: Coord, height: Coord },
    #[error("mine ({x}, {y}) lies outside the board")]
    MineOutOfBounds { x: Coord, y: Coord },
    #[error("mine ({x}, {y}) listed twice")]
    DuplicateMine { x: Coord, y: Coord },
    #[error("safe cell ({x}, {y}) is both revealed and flagged")]
    RevealedAndFlagged { x: Coord, y: Coord },
    #[error("recorded status contradicts the cell masks")]
    InconsistentStatus,
    #[error("invalid JSON document")]
    Json,
}

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum DirectorError {
    #[error("board contradicts the clue at ({x}, {y})")]
    Contradiction { x: Coord, y: Coord },
    #[error("{0}")]
    GaveUp(&'static str),
}

pub type Result<T> = core::result::Result<T, GameError>;
