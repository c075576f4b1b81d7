use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use chrono::Local;
use minedirector_core::{Game, GameStatus, Scenario};

fn is_json(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

pub fn load_scenario(path: &Path) -> anyhow::Result<Scenario> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("could not read scenario {}", path.display()))?;
    let parsed = if is_json(path) {
        Scenario::from_json(&text)
    } else {
        Scenario::from_text(&text)
    };
    let scenario = parsed.with_context(|| format!("malformed scenario {}", path.display()))?;

    log::debug!("read scenario {}", path.display());
    Ok(scenario)
}

/// Writes a finished game to `<dir>/wins` or `<dir>/losses`, next to any
/// earlier saves.
pub fn save_finished(dir: &Path, game: &Game) -> anyhow::Result<PathBuf> {
    let bucket = match game.status() {
        GameStatus::Won => "wins",
        GameStatus::Lost => "losses",
        GameStatus::InProgress => bail!("only finished games are saved"),
    };
    let dir = dir.join(bucket);
    fs::create_dir_all(&dir)
        .with_context(|| format!("could not create {}", dir.display()))?;

    let text = game.save()?.to_text()?;
    let stamp = Local::now().format("%Y-%m-%d-%H-%M-%S");
    for attempt in 0u32.. {
        let name = match attempt {
            0 => format!("{stamp}.txt"),
            n => format!("{stamp}-{n}.txt"),
        };
        let path = dir.join(name);
        match fs::OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(mut file) => {
                use std::io::Write;
                file.write_all(text.as_bytes())
                    .with_context(|| format!("could not write {}", path.display()))?;
                log::info!("saved game to {}", path.display());
                return Ok(path);
            }
            Err(err) if err.kind() == ErrorKind::AlreadyExists => continue,
            Err(err) => {
                return Err(err).with_context(|| format!("could not create {}", path.display()));
            }
        }
    }
    bail!("no free file name left in {}", dir.display())
}

#[cfg(test)]
mod tests {
    use super::*;
    use minedirector_core::{MineLayout, Move};

    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "minedirector-{}-{}",
            name,
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    fn lost_game() -> Game {
        let layout = MineLayout::from_mine_coords((3, 1), &[(2, 0)]).unwrap();
        let mut game = Game::with_layout(&layout).unwrap();
        game.apply(Move::reveal((2, 0))).unwrap();
        game
    }

    #[test]
    fn saves_never_overwrite() {
        let dir = scratch("saves");
        let game = lost_game();

        let first = save_finished(&dir, &game).unwrap();
        let second = save_finished(&dir, &game).unwrap();

        assert_ne!(first, second);
        assert!(first.starts_with(dir.join("losses")));
        let reloaded = load_scenario(&second).unwrap();
        assert_eq!(reloaded.status, GameStatus::Lost);
        assert_eq!(reloaded.losing_mine, Some((2, 0)));
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn unfinished_games_are_not_saved() {
        let dir = scratch("unfinished");
        let layout = MineLayout::from_mine_coords((3, 1), &[(2, 0)]).unwrap();
        let game = Game::with_layout(&layout).unwrap();

        assert!(save_finished(&dir, &game).is_err());
    }

    #[test]
    fn json_scenarios_are_picked_by_extension() {
        let dir = scratch("json");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("lost.JSON");
        fs::write(&path, lost_game().save().unwrap().to_json().unwrap()).unwrap();

        let scenario = load_scenario(&path).unwrap();

        assert_eq!(scenario.size(), (3, 1));
        assert!(load_scenario(&dir.join("missing.txt")).is_err());
        fs::remove_dir_all(&dir).unwrap();
    }
}
