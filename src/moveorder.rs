use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::rules::Move;

/// Orders root moves before they are searched.
///
/// The order is a uniform random permutation. It never changes which moves
/// get searched, only which of several equally good moves ends up chosen,
/// so the computer does not repeat the same opening line every game.
#[derive(Clone, Debug)]
pub struct MoveOrderer {
    rng: StdRng,
}

impl MoveOrderer {
    pub fn new() -> Self {
        MoveOrderer {
            rng: StdRng::from_entropy(),
        }
    }

    /// Orderer with a fixed seed, for reproducible games and tests.
    pub fn with_seed(seed: u64) -> Self {
        MoveOrderer {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn order_moves(&mut self, moves: &mut [Move]) {
        moves.shuffle(&mut self.rng);
    }
}

impl Default for MoveOrderer {
    fn default() -> Self {
        MoveOrderer::new()
    }
}
