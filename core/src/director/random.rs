use alloc::vec;
use alloc::vec::Vec;

use rand::{SeedableRng, rngs::SmallRng, seq::IndexedRandom};

use super::*;

/// Reveals a uniformly random hidden cell every step.
#[derive(Clone, Debug)]
pub struct RandomDirector {
    rng: SmallRng,
}

impl RandomDirector {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl Director for RandomDirector {
    fn name(&self) -> &'static str {
        DirectorKind::Random.name()
    }

    fn observe(&mut self, view: &BoardView<'_>) -> DirectorResult {
        let hidden: Vec<Coord2> = view
            .iter()
            .filter(|(_, cell)| cell.is_hidden())
            .map(|(coords, _)| coords)
            .collect();

        Ok(match hidden.choose(&mut self.rng) {
            Some(&coords) => vec![DirectorMove::guess(Move::reveal(coords), view.naive_safety())],
            None => Vec::new(),
        })
    }
}
