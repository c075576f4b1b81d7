use alloc::boxed::Box;
use alloc::vec::Vec;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::*;
pub use attempt_one::*;
pub use random::*;

mod attempt_one;
mod random;

/// What a director is allowed to know about a cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViewCell {
    Hidden,
    Flagged,
    /// Revealed safe cell with its adjacent mine count, `0` included.
    Number(u8),
    /// Revealed mine, only visible once the game is lost.
    Mine,
}

impl ViewCell {
    const fn of(cell: &Cell) -> Self {
        match (cell.is_revealed, cell.is_flagged, cell.is_mine) {
            (true, _, true) => Self::Mine,
            (true, _, false) => Self::Number(cell.adjacent_mine_count),
            (false, true, _) => Self::Flagged,
            (false, false, _) => Self::Hidden,
        }
    }

    pub const fn is_hidden(self) -> bool {
        matches!(self, Self::Hidden)
    }

    pub const fn is_revealed(self) -> bool {
        matches!(self, Self::Number(_) | Self::Mine)
    }

    /// The clue of a revealed cell with at least one adjacent mine.
    pub const fn clue(self) -> Option<u8> {
        match self {
            Self::Number(n) if n > 0 => Some(n),
            _ => None,
        }
    }
}

/// Read-only, partially observable view of a game.
///
/// Nothing reachable from here reports a mine under an unrevealed cell.
#[derive(Copy, Clone, Debug)]
pub struct BoardView<'a> {
    board: &'a Board,
    status: GameStatus,
    mines_left: i64,
}

impl<'a> BoardView<'a> {
    pub fn new(game: &'a Game) -> Self {
        Self {
            board: game.board(),
            status: game.status(),
            mines_left: game.mines_left(),
        }
    }

    pub fn size(&self) -> Coord2 {
        self.board.size()
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn total_mines(&self) -> CellCount {
        self.board.mine_count()
    }

    /// Mines minus flags; negative when the player over-flagged.
    pub fn mines_left(&self) -> i64 {
        self.mines_left
    }

    pub fn cell(&self, x: Coord, y: Coord) -> Result<ViewCell> {
        self.board.get(x, y).map(|cell| ViewCell::of(&cell))
    }

    pub fn get(&self, coords: Coord2) -> Option<ViewCell> {
        self.cell(coords.0, coords.1).ok()
    }

    pub fn neighbors(&self, coords: Coord2) -> Neighbors {
        self.board.neighbors(coords.0, coords.1)
    }

    /// Every cell in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Coord2, ViewCell)> + 'a {
        self.board
            .cells()
            .map(|cell| (cell.coords(), ViewCell::of(cell)))
    }

    pub fn hidden_count(&self) -> usize {
        self.iter().filter(|(_, cell)| cell.is_hidden()).count()
    }

    pub fn has_revealed(&self) -> bool {
        self.iter().any(|(_, cell)| cell.is_revealed())
    }

    /// Chance that a hidden cell picked blindly is safe.
    pub fn naive_safety(&self) -> f32 {
        let hidden = self.hidden_count();
        if hidden == 0 {
            return 0.0;
        }
        let safe = (hidden as i64 - self.mines_left).clamp(0, hidden as i64);
        safe as f32 / hidden as f32
    }
}

/// A proposed move and how sure the director is about it, in `0.0..=1.0`.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DirectorMove {
    pub mv: Move,
    pub confidence: f32,
}

impl DirectorMove {
    pub const CERTAIN: f32 = 1.0;

    pub const fn certain(mv: Move) -> Self {
        Self {
            mv,
            confidence: Self::CERTAIN,
        }
    }

    pub fn guess(mv: Move, confidence: f32) -> Self {
        Self {
            mv,
            confidence: confidence.clamp(0.0, Self::CERTAIN),
        }
    }
}

pub type DirectorResult = core::result::Result<Vec<DirectorMove>, DirectorError>;

/// An automated policy that plays from the same information a human has.
pub trait Director {
    fn name(&self) -> &'static str;

    fn observe(&mut self, view: &BoardView<'_>) -> DirectorResult;
}

/// Closed registry of the directors that can be selected by name.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DirectorKind {
    /// Automated play disabled.
    None,
    Random,
    #[default]
    Attempt1,
}

impl DirectorKind {
    pub const ALL: [Self; 3] = [Self::None, Self::Random, Self::Attempt1];

    pub const fn name(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Random => "random",
            Self::Attempt1 => "attempt1",
        }
    }

    pub fn build(self, seed: u64) -> Option<Box<dyn Director>> {
        match self {
            Self::None => None,
            Self::Random => Some(Box::new(RandomDirector::new(seed))),
            Self::Attempt1 => Some(Box::new(AttemptOneDirector::new(seed))),
        }
    }
}

impl FromStr for DirectorKind {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s))
            .ok_or(ConfigProblem::UnknownName.into())
    }
}

impl core::fmt::Display for DirectorKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// Drops guesses when enabled.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LowConfidence {
    pub disabled: bool,
    pub threshold: f32,
}

impl LowConfidence {
    pub const fn admits(&self, confidence: f32) -> bool {
        !self.disabled || confidence >= self.threshold
    }
}

impl Default for LowConfidence {
    fn default() -> Self {
        Self {
            disabled: false,
            threshold: DirectorMove::CERTAIN,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// Not this step's turn.
    Throttled,
    /// The game already ended; the director was not consulted.
    GameOver,
    /// The director errored; nothing was applied.
    DirectorFailed,
    Acted {
        proposed: usize,
        dropped: usize,
        applied: usize,
        status: GameStatus,
    },
}

/// Runs a director against a game in discrete steps.
pub struct DirectorDriver {
    director: Box<dyn Director>,
    skip_frames: u32,
    low_confidence: LowConfidence,
    frame: u64,
    act_at: u64,
}

impl DirectorDriver {
    pub fn new(
        director: Box<dyn Director>,
        skip_frames: u32,
        low_confidence: LowConfidence,
    ) -> Self {
        Self {
            director,
            skip_frames,
            low_confidence,
            frame: 0,
            act_at: 0,
        }
    }

    /// `None` when the kind disables automated play.
    pub fn from_kind(
        kind: DirectorKind,
        seed: u64,
        skip_frames: u32,
        low_confidence: LowConfidence,
    ) -> Option<Self> {
        kind.build(seed)
            .map(|director| Self::new(director, skip_frames, low_confidence))
    }

    pub fn director_name(&self) -> &'static str {
        self.director.name()
    }

    /// Restarts the throttle so a fresh game gets an immediate first step.
    pub fn reset(&mut self) {
        self.act_at = self.frame;
    }

    /// Consults the director on the first step and then every `skip_frames`
    /// steps; `0` and `1` both mean every step.
    pub fn step(&mut self, game: &mut Game) -> StepOutcome {
        let frame = self.frame;
        self.frame += 1;

        if game.is_finished() {
            return StepOutcome::GameOver;
        }
        if frame < self.act_at {
            return StepOutcome::Throttled;
        }
        self.act_at = frame + u64::from(self.skip_frames.max(1));

        let moves = match self.director.observe(&game.view()) {
            Ok(moves) => moves,
            Err(err) => {
                log::warn!("{}: {}", self.director.name(), GameError::from(err));
                return StepOutcome::DirectorFailed;
            }
        };

        let proposed = moves.len();
        let admitted: Vec<Move> = moves
            .into_iter()
            .filter(|dm| {
                let keep = self.low_confidence.admits(dm.confidence);
                if !keep {
                    log::trace!("dropped {:?} at confidence {}", dm.mv, dm.confidence);
                }
                keep
            })
            .map(|dm| dm.mv)
            .collect();
        let dropped = proposed - admitted.len();

        let mut applied = 0;
        for mv in admitted {
            if game.is_finished() {
                break;
            }
            match game.apply(mv) {
                Ok(_) => applied += 1,
                Err(err) => log::warn!("{} proposed {:?}: {}", self.director.name(), mv, err),
            }
        }

        StepOutcome::Acted {
            proposed,
            dropped,
            applied,
            status: game.status(),
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::rc::Rc;
    use alloc::vec;

    use super::*;

    /// Replays a fixed script, one batch per call.
    struct Scripted {
        batches: Vec<DirectorResult>,
        calls: usize,
    }

    impl Scripted {
        fn boxed(batches: Vec<DirectorResult>) -> Box<dyn Director> {
            Box::new(Self { batches, calls: 0 })
        }
    }

    impl Director for Scripted {
        fn name(&self) -> &'static str {
            "scripted"
        }

        fn observe(&mut self, _view: &BoardView<'_>) -> DirectorResult {
            let batch = self.batches.get(self.calls).cloned().unwrap_or(Ok(Vec::new()));
            self.calls += 1;
            batch
        }
    }

    fn game(size: Coord2, mines: &[Coord2]) -> Game {
        Game::with_layout(&MineLayout::from_mine_coords(size, mines).unwrap()).unwrap()
    }

    #[test]
    fn view_hides_unrevealed_mines() {
        let mut game = game((2, 2), &[(1, 1)]);
        game.apply(Move::toggle_flag((0, 1))).unwrap();
        game.apply(Move::reveal((0, 0))).unwrap();
        let view = game.view();

        assert_eq!(view.cell(1, 1), Ok(ViewCell::Hidden));
        assert_eq!(view.cell(0, 1), Ok(ViewCell::Flagged));
        assert_eq!(view.cell(0, 0), Ok(ViewCell::Number(1)));
        assert_eq!(view.cell(2, 0), Err(GameError::OutOfBounds));
        assert_eq!(view.mines_left(), 0);
    }

    #[test]
    fn low_confidence_moves_are_dropped_when_disabled() {
        let guess = DirectorMove::guess(Move::reveal((0, 0)), 0.4);
        let filter = LowConfidence {
            disabled: true,
            threshold: 1.0,
        };
        let mut game = game((3, 3), &[(2, 2)]);
        let before = game.clone();
        let mut driver = DirectorDriver::new(Scripted::boxed(vec![Ok(vec![guess])]), 0, filter);

        let outcome = driver.step(&mut game);

        assert_eq!(
            outcome,
            StepOutcome::Acted {
                proposed: 1,
                dropped: 1,
                applied: 0,
                status: GameStatus::InProgress
            }
        );
        assert_eq!(game, before);
    }

    #[test]
    fn low_confidence_moves_apply_when_allowed() {
        let guess = DirectorMove::guess(Move::reveal((0, 0)), 0.4);
        let mut game = game((3, 3), &[(2, 2)]);
        let script = Scripted::boxed(vec![Ok(vec![guess])]);
        let mut driver = DirectorDriver::new(script, 0, LowConfidence::default());

        driver.step(&mut game);

        assert_eq!(game.status(), GameStatus::Won);
    }

    /// Counts how often it is consulted.
    struct Counter(Rc<core::cell::Cell<usize>>);

    impl Director for Counter {
        fn name(&self) -> &'static str {
            "counter"
        }

        fn observe(&mut self, _view: &BoardView<'_>) -> DirectorResult {
            self.0.set(self.0.get() + 1);
            Ok(Vec::new())
        }
    }

    fn consulted_steps(skip_frames: u32, steps: usize) -> Vec<usize> {
        let calls = Rc::new(core::cell::Cell::new(0));
        let counter = Box::new(Counter(calls.clone()));
        let mut game = game((3, 3), &[(2, 2)]);
        let mut driver = DirectorDriver::new(counter, skip_frames, LowConfidence::default());

        let mut consulted = Vec::new();
        for step in 0..steps {
            let before = calls.get();
            driver.step(&mut game);
            if calls.get() > before {
                consulted.push(step);
            }
        }
        consulted
    }

    #[test]
    fn skip_frames_consults_every_nth_step() {
        assert_eq!(consulted_steps(2, 9), vec![0, 2, 4, 6, 8]);
        assert_eq!(consulted_steps(3, 9), vec![0, 3, 6]);
        assert_eq!(consulted_steps(1, 4), vec![0, 1, 2, 3]);
        assert_eq!(consulted_steps(0, 4), vec![0, 1, 2, 3]);
    }

    #[test]
    fn throttled_steps_apply_nothing() {
        let flag = |x| Ok(vec![DirectorMove::certain(Move::toggle_flag((x, 0)))]);
        let script = vec![flag(0), flag(1), flag(2)];
        let mut game = game((4, 1), &[(3, 0)]);
        let mut driver = DirectorDriver::new(Scripted::boxed(script), 2, LowConfidence::default());

        let outcomes: Vec<_> = (0..5).map(|_| driver.step(&mut game)).collect();

        assert!(matches!(outcomes[0], StepOutcome::Acted { applied: 1, .. }));
        assert_eq!(outcomes[1], StepOutcome::Throttled);
        assert!(matches!(outcomes[2], StepOutcome::Acted { applied: 1, .. }));
        assert_eq!(outcomes[3], StepOutcome::Throttled);
        assert!(matches!(outcomes[4], StepOutcome::Acted { applied: 1, .. }));
        assert_eq!(game.flag_count(), 3);
    }

    #[test]
    fn failing_director_skips_the_step() {
        let script = vec![
            Err(DirectorError::GaveUp("no idea")),
            Ok(vec![DirectorMove::certain(Move::toggle_flag((0, 0)))]),
        ];
        let mut game = game((2, 1), &[(1, 0)]);
        let mut driver = DirectorDriver::new(Scripted::boxed(script), 2, LowConfidence::default());

        assert_eq!(driver.step(&mut game), StepOutcome::DirectorFailed);
        assert_eq!(driver.step(&mut game), StepOutcome::Throttled);
        assert!(matches!(driver.step(&mut game), StepOutcome::Acted { applied: 1, .. }));
    }

    #[test]
    fn batch_stops_once_the_game_ends() {
        let script = vec![Ok(vec![
            DirectorMove::certain(Move::reveal((0, 0))),
            DirectorMove::certain(Move::toggle_flag((1, 0))),
        ])];
        let mut game = game((2, 1), &[(0, 0)]);
        let mut driver = DirectorDriver::new(Scripted::boxed(script), 0, LowConfidence::default());

        let outcome = driver.step(&mut game);

        assert_eq!(
            outcome,
            StepOutcome::Acted {
                proposed: 2,
                dropped: 0,
                applied: 1,
                status: GameStatus::Lost
            }
        );
        assert!(!game.board().get(1, 0).unwrap().is_flagged);
        assert_eq!(driver.step(&mut game), StepOutcome::GameOver);
    }

    #[test]
    fn registry_resolves_names() {
        assert_eq!("none".parse::<DirectorKind>(), Ok(DirectorKind::None));
        assert_eq!("attempt1".parse::<DirectorKind>(), Ok(DirectorKind::Attempt1));
        assert!("attempt9".parse::<DirectorKind>().is_err());
        assert!(DirectorKind::None.build(0).is_none());
        assert_eq!(DirectorKind::Random.build(0).unwrap().name(), "random");
    }
}
