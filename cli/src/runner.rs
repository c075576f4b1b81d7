use std::fmt;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, bail};
use minedirector_core::{Board, Button, DirectorDriver, Game, GameStatus, Session, StepOutcome};

use crate::storage;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Summary {
    pub won: u32,
    pub lost: u32,
    pub unfinished: u32,
}

impl Summary {
    fn record(&mut self, status: GameStatus) {
        match status {
            GameStatus::Won => self.won += 1,
            GameStatus::Lost => self.lost += 1,
            GameStatus::InProgress => self.unfinished += 1,
        }
    }

    pub fn played(&self) -> u32 {
        self.won + self.lost + self.unfinished
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "played {}: {} won, {} lost, {} unfinished",
            self.played(),
            self.won,
            self.lost,
            self.unfinished
        )
    }
}

pub struct Runner {
    session: Session,
    driver: Option<DirectorDriver>,
    max_steps: u64,
    save_dir: Option<PathBuf>,
}

impl Runner {
    pub fn new(
        session: Session,
        driver: Option<DirectorDriver>,
        max_steps: u64,
        save_dir: Option<PathBuf>,
    ) -> Self {
        Self {
            session,
            driver,
            max_steps,
            save_dir,
        }
    }

    pub fn run(&mut self, games: u32) -> anyhow::Result<Summary> {
        let stdin = io::stdin();
        let stdout = io::stdout();
        let mut summary = Summary::default();

        for _ in 0..games {
            let mut game = self.session.next_game()?;
            let status = match &mut self.driver {
                Some(driver) => {
                    driver.reset();
                    play_directed(driver, &mut game, self.max_steps)
                }
                None => play_interactive(&mut game, stdin.lock(), stdout.lock())?,
            };

            println!("{}", render_board(game.board()));
            log::info!(
                "game {} ended {:?} after {} moves",
                self.session.games_started(),
                status,
                game.history().len()
            );
            summary.record(status);

            if let (Some(dir), true) = (&self.save_dir, status.is_terminal()) {
                storage::save_finished(dir, &game)?;
            }
            if self.driver.is_none() && !status.is_terminal() {
                // input ran out
                break;
            }
        }

        Ok(summary)
    }
}

/// Steps the director until the game ends or `max_steps` runs out.
///
/// A turn that applies nothing is not final; the director is asked again.
pub fn play_directed(driver: &mut DirectorDriver, game: &mut Game, max_steps: u64) -> GameStatus {
    for step in 0..max_steps {
        match driver.step(game) {
            StepOutcome::GameOver => break,
            StepOutcome::Acted { applied: 0, .. } => {
                log::debug!("step {}: {} applied nothing", step, driver.director_name());
            }
            _ => {}
        }
    }
    if !game.is_finished() {
        log::warn!("{} ran out of steps", driver.director_name());
    }
    game.status()
}

/// Reads `x y [l|r|m]` commands until the game ends or input runs out.
pub fn play_interactive(
    game: &mut Game,
    input: impl BufRead,
    mut output: impl Write,
) -> anyhow::Result<GameStatus> {
    writeln!(output, "{}", render_board(game.board()))?;
    for line in input.lines() {
        let line = line.context("could not read a move")?;
        if line.trim().is_empty() {
            continue;
        }

        match parse_command(&line) {
            Ok((x, y, button)) => match game.click(x, y, button) {
                Ok(outcome) => log::debug!("{:?} at ({}, {}): {:?}", button, x, y, outcome),
                Err(err) => writeln!(output, "{err}")?,
            },
            Err(err) => writeln!(output, "{err}")?,
        }

        if game.is_finished() {
            break;
        }
        writeln!(output, "{}", render_board(game.board()))?;
    }
    Ok(game.status())
}

pub fn parse_command(line: &str) -> anyhow::Result<(i64, i64, Button)> {
    let mut parts = line.split_whitespace();
    let (Some(x), Some(y)) = (parts.next(), parts.next()) else {
        bail!("expected `x y [l|r|m]`");
    };
    let x = x.parse().with_context(|| format!("bad column {x:?}"))?;
    let y = y.parse().with_context(|| format!("bad row {y:?}"))?;
    let button = match parts.next() {
        None | Some("l") => Button::Primary,
        Some("r") => Button::Secondary,
        Some("m") => Button::Middle,
        Some(other) => bail!("unknown button {other:?}, expected l, r or m"),
    };
    if parts.next().is_some() {
        bail!("expected `x y [l|r|m]`");
    }
    Ok((x, y, button))
}

pub fn render_board(board: &Board) -> String {
    board
        .image_rows()
        .into_iter()
        .map(|row| row.into_iter().map(|key| key.glyph()).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}
