use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use minedirector_core::{
    ChordRule, DirectorDriver, DirectorKind, DirectorMove, EmulationMode, GameConfig,
    LowConfidence, Session, SessionConfig,
};

mod runner;
mod storage;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// Scenario or saved game to load (`.json` or the text format)
    #[arg(long)]
    scenario: Option<PathBuf>,

    /// Load the scenario with every cell hidden
    #[arg(short = 'u', long)]
    scenario_unrevealed: bool,

    /// Replay the scenario, unrevealed, after every finished game
    #[arg(long)]
    repeat: bool,

    /// Automated player, `none` to read moves from stdin
    #[arg(short, long, default_value_t = DirectorKind::default())]
    director: DirectorKind,

    /// Consult the director every Nth step (0 and 1 both mean every step)
    #[arg(long, default_value_t = 1)]
    director_skip_frames: u32,

    /// First click safety: `winxp` or `win7`
    #[arg(short, long, default_value_t = EmulationMode::default())]
    mode: EmulationMode,

    /// Drop director moves below the confidence threshold
    #[arg(long)]
    disable_low_confidence: bool,

    /// Lowest confidence still applied when low confidence moves are disabled
    #[arg(long, default_value_t = DirectorMove::CERTAIN)]
    confidence_threshold: f32,

    /// Only cascade once the flags around a number match it
    #[arg(long)]
    match_flags: bool,

    #[arg(long, default_value_t = GameConfig::EXPERT.size.0)]
    width: u16,

    #[arg(long, default_value_t = GameConfig::EXPERT.size.1)]
    height: u16,

    #[arg(long, default_value_t = GameConfig::EXPERT.mines)]
    mines: u32,

    /// Force a seed instead of random
    #[arg(short, long)]
    seed: Option<u64>,

    /// Number of games to play
    #[arg(short, long, default_value_t = 1)]
    games: u32,

    /// Give up on a game after this many steps
    #[arg(long, default_value_t = 100_000)]
    max_steps: u64,

    /// Save finished games under `wins/` and `losses/` in this directory
    #[arg(long)]
    save_dir: Option<PathBuf>,
}

impl Args {
    fn session_config(&self, seed: u64) -> anyhow::Result<SessionConfig> {
        let scenario = self
            .scenario
            .as_deref()
            .map(storage::load_scenario)
            .transpose()?;

        Ok(SessionConfig {
            game: GameConfig::new((self.width, self.height), self.mines, self.mode),
            chord_rule: if self.match_flags {
                ChordRule::MatchFlags
            } else {
                ChordRule::Unconditional
            },
            scenario,
            load_unrevealed: self.scenario_unrevealed,
            repeat: self.repeat,
            seed,
        })
    }

    fn low_confidence(&self) -> LowConfidence {
        LowConfidence {
            disabled: self.disable_low_confidence,
            threshold: self.confidence_threshold,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_max_level(args.verbose.tracing_level_filter())
        .with_writer(std::io::stderr)
        .init();

    let seed = args.seed.unwrap_or_else(rand::random);
    log::debug!("seed: {}", seed);

    let session = Session::new(args.session_config(seed)?).context("invalid game setup")?;
    let driver = DirectorDriver::from_kind(
        args.director,
        seed,
        args.director_skip_frames,
        args.low_confidence(),
    );
    log::info!(
        "playing {} game(s) with director {}",
        args.games,
        args.director
    );

    let mut runner = runner::Runner::new(session, driver, args.max_steps, args.save_dir.clone());
    let summary = runner.run(args.games)?;
    println!("{summary}");
    Ok(())
}
