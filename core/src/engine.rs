use alloc::collections::VecDeque;
use alloc::vec::Vec;

use hashbrown::HashSet;
use serde::{Deserialize, Serialize};

use crate::*;

/// Valid transitions:
/// - InProgress -> Won
/// - InProgress -> Lost
///
/// Nothing leaves a terminal state; a new game replaces the old one.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    #[default]
    InProgress,
    Won,
    Lost,
}

impl GameStatus {
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// When a cascade on a numbered cell is allowed to go ahead.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChordRule {
    /// Any revealed numbered cell cascades.
    #[default]
    Unconditional,
    /// Only cascade once the flagged neighbors match the number.
    MatchFlags,
}

/// A single game session: the board plus the state machine driving it.
#[derive(Clone, Debug, PartialEq)]
pub struct Game {
    board: Board,
    config: GameConfig,
    seed: u64,
    chord_rule: ChordRule,
    status: GameStatus,
    losing_mine: Option<Coord2>,
    revealed_safe: CellCount,
    flagged: CellCount,
    history: Vec<Move>,
}

impl Game {
    /// Starts an unseeded game; mines are placed by the first reveal.
    pub fn new(config: GameConfig, seed: u64) -> Result<Self> {
        config.validate()?;
        let board = Board::new(config.size.0, config.size.1, config.mines)?;
        Ok(Self::from_board(board, config, seed))
    }

    /// Starts a game on a fixed layout, bypassing the generator.
    pub fn with_layout(layout: &MineLayout) -> Result<Self> {
        let board = Board::with_layout(layout)?;
        let config = GameConfig::new(board.size(), board.mine_count(), EmulationMode::default());
        Ok(Self::from_board(board, config, 0))
    }

    fn from_board(board: Board, config: GameConfig, seed: u64) -> Self {
        Self {
            board,
            config,
            seed,
            chord_rule: ChordRule::default(),
            status: GameStatus::InProgress,
            losing_mine: None,
            revealed_safe: 0,
            flagged: 0,
            history: Vec::new(),
        }
    }

    pub fn with_chord_rule(mut self, chord_rule: ChordRule) -> Self {
        self.chord_rule = chord_rule;
        self
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn chord_rule(&self) -> ChordRule {
        self.chord_rule
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_finished(&self) -> bool {
        self.status.is_terminal()
    }

    pub fn size(&self) -> Coord2 {
        self.board.size()
    }

    pub fn losing_mine(&self) -> Option<Coord2> {
        self.losing_mine
    }

    pub fn revealed_count(&self) -> CellCount {
        self.revealed_safe
    }

    pub fn flag_count(&self) -> CellCount {
        self.flagged
    }

    pub fn mines_left(&self) -> i64 {
        i64::from(self.board.mine_count()) - i64::from(self.flagged)
    }

    /// Every accepted move, in the order it was applied.
    pub fn history(&self) -> &[Move] {
        &self.history
    }

    pub fn view(&self) -> BoardView<'_> {
        BoardView::new(self)
    }

    pub fn save(&self) -> Result<Scenario> {
        Scenario::capture(self)
    }

    /// Translates pointer input into a move. Unmapped buttons do nothing.
    pub fn click(&mut self, x: i64, y: i64, button: Button) -> Result<MoveOutcome> {
        let Some(action) = button.action() else {
            return Ok(MoveOutcome::NoChange);
        };
        let x = Coord::try_from(x).map_err(|_| GameError::OutOfBounds)?;
        let y = Coord::try_from(y).map_err(|_| GameError::OutOfBounds)?;
        self.apply(Move::new((x, y), action))
    }

    /// Applies one move; a rejected move leaves the game untouched.
    pub fn apply(&mut self, mv: Move) -> Result<MoveOutcome> {
        let coords = self.board.validate_coords(mv.coords())?;
        self.check_in_progress()?;

        let outcome = match mv.action {
            Action::Reveal => self.reveal(coords)?,
            Action::ToggleFlag => self.toggle_flag(coords),
            Action::CascadeNeighbors => self.cascade_neighbors(coords),
        };
        self.history.push(mv);
        Ok(outcome)
    }

    fn reveal(&mut self, coords: Coord2) -> Result<MoveOutcome> {
        if !self.board[coords].is_hidden() {
            return Ok(MoveOutcome::NoChange);
        }

        if !self.board.is_seeded() {
            let layout = RandomMineGenerator::new(self.seed).generate(
                self.board.size(),
                self.board.mine_count(),
                coords,
                self.config.mode,
            )?;
            self.board.seed(&layout)?;
        }

        Ok(self.reveal_single_cell(coords))
    }

    fn toggle_flag(&mut self, coords: Coord2) -> MoveOutcome {
        let cell = self.board[coords];
        if cell.is_revealed {
            return MoveOutcome::NoChange;
        }

        self.board.set_cell(coords.0, coords.1, |cell| Cell {
            is_flagged: !cell.is_flagged,
            ..cell
        });
        if cell.is_flagged {
            self.flagged -= 1;
            MoveOutcome::Unflagged
        } else {
            self.flagged += 1;
            MoveOutcome::Flagged
        }
    }

    fn cascade_neighbors(&mut self, coords: Coord2) -> MoveOutcome {
        let cell = self.board[coords];
        if !cell.is_numbered() {
            return MoveOutcome::NoChange;
        }
        if self.chord_rule == ChordRule::MatchFlags
            && self.count_flagged_neighbors(coords) != cell.adjacent_mine_count
        {
            return MoveOutcome::NoChange;
        }

        let mut outcome = MoveOutcome::NoChange;
        for pos in self.board.neighbors(coords.0, coords.1) {
            if self.status.is_terminal() {
                break;
            }
            if self.board[pos].is_hidden() {
                outcome = outcome | self.reveal_single_cell(pos);
            }
        }
        outcome
    }

    /// Reveals a hidden cell of a seeded board, flooding out from zeros.
    fn reveal_single_cell(&mut self, coords: Coord2) -> MoveOutcome {
        let cell = self.board[coords];
        if cell.is_mine {
            self.lose(coords);
            return MoveOutcome::HitMine;
        }

        self.mark_revealed(coords);
        if cell.adjacent_mine_count == 0 {
            self.flood_fill(coords);
        }

        if self.revealed_safe == self.board.safe_cell_count() {
            self.status = GameStatus::Won;
            log::info!("won after {} moves", self.history.len() + 1);
            MoveOutcome::Won
        } else {
            MoveOutcome::Revealed
        }
    }

    fn flood_fill(&mut self, origin: Coord2) {
        let mut visited = HashSet::new();
        visited.insert(origin);
        let mut to_visit: VecDeque<Coord2> =
            self.board.neighbors(origin.0, origin.1).into_iter().collect();

        while let Some(pos) = to_visit.pop_front() {
            if !visited.insert(pos) {
                continue;
            }

            let cell = self.board[pos];
            if !cell.is_hidden() || cell.is_mine {
                continue;
            }

            self.mark_revealed(pos);
            if cell.adjacent_mine_count == 0 {
                to_visit.extend(
                    self.board
                        .neighbors(pos.0, pos.1)
                        .into_iter()
                        .filter(|next| !visited.contains(next)),
                );
            }
        }
    }

    fn mark_revealed(&mut self, coords: Coord2) {
        self.board.set_cell(coords.0, coords.1, |cell| Cell {
            is_revealed: true,
            ..cell
        });
        self.revealed_safe += 1;
    }

    fn lose(&mut self, coords: Coord2) {
        self.losing_mine = Some(coords);
        for pos in all_coords(self.board.size()) {
            if self.board[pos].is_mine {
                self.board.set_cell(pos.0, pos.1, |cell| Cell {
                    is_revealed: true,
                    ..cell
                });
            }
        }
        self.status = GameStatus::Lost;
        log::info!("hit the mine at {:?}", coords);
    }

    fn count_flagged_neighbors(&self, coords: Coord2) -> u8 {
        self.board
            .neighbors(coords.0, coords.1)
            .into_iter()
            .filter(|&pos| self.board[pos].is_flagged)
            .count() as u8
    }

    fn check_in_progress(&self) -> Result<()> {
        if self.status.is_terminal() {
            Err(GameError::GameAlreadyOver)
        } else {
            Ok(())
        }
    }

    /// Overwrites play state with a saved snapshot; callers validate first.
    pub(crate) fn restore(
        &mut self,
        revealed: impl Fn(Coord2) -> bool,
        flagged: impl Fn(Coord2) -> bool,
        status: GameStatus,
        losing_mine: Option<Coord2>,
    ) {
        for pos in all_coords(self.board.size()) {
            self.board.set_cell(pos.0, pos.1, |cell| Cell {
                is_revealed: revealed(pos),
                is_flagged: flagged(pos),
                ..cell
            });
        }
        self.revealed_safe = self.board.revealed_safe_count();
        self.flagged = self.board.flag_count();
        self.status = status;
        self.losing_mine = losing_mine;
    }
}
