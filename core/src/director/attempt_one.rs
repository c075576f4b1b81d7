use alloc::collections::BTreeMap;
use alloc::vec;
use alloc::vec::Vec;

use rand::{SeedableRng, rngs::SmallRng, seq::IndexedRandom};

use super::*;

/// Rule-based director: a safe opening on the edge, single-clue deductions,
/// and a least-risk guess along the frontier when nothing is certain.
#[derive(Clone, Debug)]
pub struct AttemptOneDirector {
    rng: SmallRng,
}

impl AttemptOneDirector {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Edges leave more room for deductions afterwards.
    fn first_click(&mut self, view: &BoardView<'_>) -> Option<Vec<DirectorMove>> {
        let (width, height) = view.size();
        let edges: Vec<Coord2> = view
            .iter()
            .filter(|&((x, y), cell)| {
                cell.is_hidden() && (x == 0 || y == 0 || x + 1 == width || y + 1 == height)
            })
            .map(|(coords, _)| coords)
            .collect();

        edges
            .choose(&mut self.rng)
            .map(|&coords| vec![DirectorMove::certain(Move::reveal(coords))])
    }

    /// Flag when the hidden neighbors must all be mines, cascade when the
    /// flags already account for the clue.
    ///
    /// Clues the current flags contradict are skipped.
    fn obvious(&self, view: &BoardView<'_>) -> Option<Vec<DirectorMove>> {
        for (coords, clue, flagged, hidden) in consistent_clues(view) {
            if hidden.is_empty() {
                continue;
            }
            if flagged + hidden.len() == clue {
                let flags = hidden
                    .into_iter()
                    .map(|pos| DirectorMove::certain(Move::toggle_flag(pos)))
                    .collect();
                return Some(flags);
            }
            if flagged == clue {
                let cascade = Move::cascade_neighbors(coords);
                return Some(vec![DirectorMove::certain(cascade)]);
            }
        }
        None
    }

    /// Picks the frontier cell whose riskiest clue is least likely to hide a mine.
    fn guess(&mut self, view: &BoardView<'_>) -> Vec<DirectorMove> {
        let mut risks: BTreeMap<Coord2, f32> = BTreeMap::new();
        for (_, clue, flagged, hidden) in consistent_clues(view) {
            if hidden.is_empty() {
                continue;
            }
            let risk = (clue - flagged) as f32 / hidden.len() as f32;
            for pos in hidden {
                let entry = risks.entry(pos).or_insert(0.0);
                if risk > *entry {
                    *entry = risk;
                }
            }
        }

        if risks.is_empty() {
            let blind_risk = 1.0 - view.naive_safety();
            risks.extend(
                view.iter()
                    .filter(|(_, cell)| cell.is_hidden())
                    .map(|(coords, _)| (coords, blind_risk)),
            );
        }

        let Some(lowest) = risks.values().copied().reduce(f32::min) else {
            return Vec::new();
        };
        let safest: Vec<Coord2> = risks
            .iter()
            .filter(|&(_, &risk)| risk <= lowest)
            .map(|(&coords, _)| coords)
            .collect();

        match safest.choose(&mut self.rng) {
            Some(&coords) => {
                log::debug!("guessing {:?} at risk {:.3}", coords, lowest);
                vec![DirectorMove::guess(Move::reveal(coords), 1.0 - lowest)]
            }
            None => Vec::new(),
        }
    }
}

/// Every revealed clue the flags around it can still satisfy, with its
/// flagged neighbor count and hidden neighbors.
fn consistent_clues<'v>(
    view: &'v BoardView<'_>,
) -> impl Iterator<Item = (Coord2, usize, usize, Vec<Coord2>)> + 'v {
    view.iter().filter_map(move |(coords, cell)| {
        let clue = usize::from(cell.clue()?);
        let (flagged, hidden) = split_neighbors(view, coords);
        if flagged > clue || flagged + hidden.len() < clue {
            log::debug!(
                "skipping clue: {}",
                DirectorError::Contradiction {
                    x: coords.0,
                    y: coords.1
                }
            );
            return None;
        }
        Some((coords, clue, flagged, hidden))
    })
}

/// Flagged neighbor count and the hidden neighbors of `coords`.
fn split_neighbors(view: &BoardView<'_>, coords: Coord2) -> (usize, Vec<Coord2>) {
    let mut flagged = 0;
    let mut hidden = Vec::new();
    for pos in view.neighbors(coords) {
        match view.get(pos) {
            Some(ViewCell::Flagged) => flagged += 1,
            Some(ViewCell::Hidden) => hidden.push(pos),
            _ => {}
        }
    }
    (flagged, hidden)
}

impl Director for AttemptOneDirector {
    fn name(&self) -> &'static str {
        DirectorKind::Attempt1.name()
    }

    fn observe(&mut self, view: &BoardView<'_>) -> DirectorResult {
        if !view.has_revealed() {
            if let Some(opening) = self.first_click(view) {
                return Ok(opening);
            }
        }
        if let Some(plan) = self.obvious(view) {
            return Ok(plan);
        }
        Ok(self.guess(view))
    }
}
