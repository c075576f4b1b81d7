use rand::{Rng, SeedableRng, rngs::SmallRng};
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    pub game: GameConfig,
    pub chord_rule: ChordRule,
    pub scenario: Option<Scenario>,
    /// Load the scenario with every cell hidden on the first game.
    pub load_unrevealed: bool,
    /// Replay the scenario, unrevealed, instead of a fresh board after each game.
    pub repeat: bool,
    pub seed: u64,
}

/// Hands out games one after another, replacing each wholesale.
#[derive(Clone, Debug)]
pub struct Session {
    config: SessionConfig,
    rng: SmallRng,
    games_started: u32,
}

impl Session {
    pub fn new(config: SessionConfig) -> Result<Self> {
        config.game.validate()?;
        if let Some(scenario) = &config.scenario {
            scenario.validate()?;
        }

        let rng = SmallRng::seed_from_u64(config.seed);
        Ok(Self {
            config,
            rng,
            games_started: 0,
        })
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn games_started(&self) -> u32 {
        self.games_started
    }

    pub fn next_game(&mut self) -> Result<Game> {
        let first = self.games_started == 0;
        self.games_started += 1;

        let game = match &self.config.scenario {
            Some(scenario) if first => scenario.load(self.config.load_unrevealed)?,
            Some(scenario) if self.config.repeat => scenario.load(true)?,
            _ => Game::new(self.config.game, self.rng.random())?,
        };
        log::debug!("game {} started", self.games_started);
        Ok(game.with_chord_rule(self.config.chord_rule))
    }
}
