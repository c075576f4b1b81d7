use alloc::string::String;
use alloc::vec::Vec;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Snapshot of a seeded game: the full mine layout plus the reveal and flag
/// state a player had reached.
///
/// The text form writes one line per row, one symbol per cell:
///
/// ```text
/// ##.......
/// ###O#O#OO
/// ..OO.O.O.
/// ..Ff..*..
/// ```
///
/// - `#` hidden safe cell
/// - `.` revealed safe cell
/// - `O` mine
/// - `F` flagged mine
/// - `f` flagged safe cell
/// - `*` the mine that lost the game
///
/// Reading stops at the first blank line, anything below it is ignored.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    pub width: Coord,
    pub height: Coord,
    /// Mine positions in row-major order.
    pub mines: Vec<Coord2>,
    pub revealed: Array2<bool>,
    pub flagged: Array2<bool>,
    pub status: GameStatus,
    pub losing_mine: Option<Coord2>,
}

impl Scenario {
    pub fn capture(game: &Game) -> Result<Self> {
        let board = game.board();
        let layout = board.mine_layout().ok_or(GameError::NoMineLayout)?;
        let (width, height) = board.size();
        let mask = |f: fn(&Cell) -> bool| {
            Array2::from_shape_fn(board.size().to_nd_index(), |(x, y)| {
                f(&board[(x as Coord, y as Coord)])
            })
        };

        Ok(Self {
            width,
            height,
            mines: layout.mine_coords(),
            revealed: mask(|cell| cell.is_revealed),
            flagged: mask(|cell| cell.is_flagged),
            status: game.status(),
            losing_mine: game.losing_mine(),
        })
    }

    pub fn size(&self) -> Coord2 {
        (self.width, self.height)
    }

    /// Rebuilds a game from the snapshot.
    ///
    /// With `unrevealed` only the layout survives: every cell starts hidden
    /// and unflagged and the game is back in progress.
    pub fn load(&self, unrevealed: bool) -> Result<Game> {
        let layout = self.validate()?;
        let mut game = Game::with_layout(&layout)?;

        if !unrevealed {
            game.restore(
                |pos| self.revealed[pos.to_nd_index()],
                |pos| self.flagged[pos.to_nd_index()],
                self.status,
                self.losing_mine,
            );
        }

        log::debug!(
            "loaded {}x{} scenario with {} mines ({})",
            self.width,
            self.height,
            layout.mine_count(),
            if unrevealed { "unrevealed" } else { "as saved" }
        );
        Ok(game)
    }

    /// Checks internal consistency and returns the mine layout.
    pub fn validate(&self) -> Result<MineLayout> {
        let size = self.size();
        if size.0 == 0 || size.1 == 0 {
            return Err(ScenarioProblem::Empty.into());
        }

        let dim = (usize::from(size.0), usize::from(size.1));
        if self.revealed.dim() != dim || self.flagged.dim() != dim {
            return Err(ScenarioProblem::MaskShape {
                width: size.0,
                height: size.1,
            }
            .into());
        }

        let mut mine_mask: Array2<bool> = Array2::default(size.to_nd_index());
        for &(x, y) in &self.mines {
            if !in_bounds((x, y), size) {
                return Err(ScenarioProblem::MineOutOfBounds { x, y }.into());
            }
            let slot = &mut mine_mask[(x, y).to_nd_index()];
            if *slot {
                return Err(ScenarioProblem::DuplicateMine { x, y }.into());
            }
            *slot = true;
        }
        let layout = MineLayout::from_mine_mask(mine_mask);

        let mut any_mine_revealed = false;
        let mut all_mines_revealed = true;
        let mut all_safe_revealed = true;
        for pos in all_coords(size) {
            let revealed = self.revealed[pos.to_nd_index()];
            if layout[pos] {
                any_mine_revealed |= revealed;
                all_mines_revealed &= revealed;
            } else {
                if revealed && self.flagged[pos.to_nd_index()] {
                    return Err(ScenarioProblem::RevealedAndFlagged { x: pos.0, y: pos.1 }.into());
                }
                all_safe_revealed &= revealed;
            }
        }

        let consistent = match self.status {
            GameStatus::InProgress => !any_mine_revealed && self.losing_mine.is_none(),
            GameStatus::Won => {
                !any_mine_revealed && self.losing_mine.is_none() && all_safe_revealed
            }
            GameStatus::Lost => {
                all_mines_revealed && self.losing_mine.is_some_and(|pos| layout.contains_mine(pos))
            }
        };
        if !consistent {
            return Err(ScenarioProblem::InconsistentStatus.into());
        }

        Ok(layout)
    }

    /// Writes the text form; fails like [`Scenario::validate`] on an
    /// inconsistent snapshot.
    pub fn to_text(&self) -> Result<String> {
        let layout = self.validate()?;
        let row_len = usize::from(self.width) + 1;
        let mut text = String::with_capacity(row_len * usize::from(self.height));
        for y in 0..self.height {
            for x in 0..self.width {
                let pos = (x, y);
                let flagged = self.flagged[pos.to_nd_index()];
                let symbol = if layout[pos] {
                    if self.losing_mine == Some(pos) {
                        '*'
                    } else if flagged {
                        'F'
                    } else {
                        'O'
                    }
                } else if flagged {
                    'f'
                } else if self.revealed[pos.to_nd_index()] {
                    '.'
                } else {
                    '#'
                };
                text.push(symbol);
            }
            text.push('\n');
        }
        Ok(text)
    }

    pub fn from_text(text: &str) -> Result<Self> {
        let lines: Vec<&str> = text
            .trim_start()
            .lines()
            .map(str::trim_end)
            .take_while(|line| !line.is_empty())
            .collect();
        let Some(first) = lines.first() else {
            return Err(ScenarioProblem::Empty.into());
        };

        let expected = first.chars().count();
        let width = Coord::try_from(expected).map_err(|_| ScenarioProblem::TooLarge)?;
        let height = Coord::try_from(lines.len()).map_err(|_| ScenarioProblem::TooLarge)?;

        let shape = (width, height).to_nd_index();
        let mut mines = Vec::new();
        let mut revealed: Array2<bool> = Array2::default(shape);
        let mut flagged: Array2<bool> = Array2::default(shape);
        let mut losing_mine = None;

        for (y, line) in lines.iter().enumerate() {
            let found = line.chars().count();
            if found != expected {
                return Err(ScenarioProblem::RaggedRow {
                    row: y,
                    found,
                    expected,
                }
                .into());
            }

            for (x, symbol) in line.chars().enumerate() {
                let pos = (x as Coord, y as Coord);
                let (is_mine, is_revealed, is_flagged) = match symbol {
                    '#' => (false, false, false),
                    '.' => (false, true, false),
                    'f' => (false, false, true),
                    'O' => (true, false, false),
                    'F' => (true, false, true),
                    '*' => {
                        if losing_mine.replace(pos).is_some() {
                            return Err(ScenarioProblem::MultipleLosingMines.into());
                        }
                        (true, false, false)
                    }
                    symbol => return Err(ScenarioProblem::UnknownSymbol { symbol, x, y }.into()),
                };
                if is_mine {
                    mines.push(pos);
                }
                revealed[pos.to_nd_index()] = is_revealed;
                flagged[pos.to_nd_index()] = is_flagged;
            }
        }

        let status = if losing_mine.is_some() {
            for &pos in &mines {
                revealed[pos.to_nd_index()] = true;
            }
            GameStatus::Lost
        } else {
            let safe_cells = usize::from(width) * usize::from(height) - mines.len();
            let revealed_safe = revealed.iter().filter(|&&is_revealed| is_revealed).count();
            if safe_cells > 0 && revealed_safe == safe_cells {
                GameStatus::Won
            } else {
                GameStatus::InProgress
            }
        };

        let scenario = Self {
            width,
            height,
            mines,
            revealed,
            flagged,
            status,
            losing_mine,
        };
        scenario.validate()?;
        Ok(scenario)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|err| {
            log::debug!("scenario serialization failed: {}", err);
            ScenarioProblem::Json.into()
        })
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let scenario: Self = serde_json::from_str(text).map_err(|err| {
            log::debug!("scenario parsing failed: {}", err);
            GameError::from(ScenarioProblem::Json)
        })?;
        scenario.validate()?;
        Ok(scenario)
    }
}
