//! Per-player uniform move selection.

use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

/// Uniform random picker owned by a single player thread.
///
/// Never shared, so it needs no lock. Two selectors built from the same seed
/// produce the same picks.
#[derive(Debug, Clone)]
pub struct RandomMoveSelector {
    rng: Xoshiro256PlusPlus,
}

impl RandomMoveSelector {
    /// Selector seeded from the thread-local OS-seeded generator.
    pub fn from_entropy() -> Self {
        Self {
            rng: Xoshiro256PlusPlus::from_rng(&mut rand::rng()),
        }
    }

    /// Deterministic selector for player `player_id` under a base seed.
    pub fn seeded(base_seed: u64, player_id: usize) -> Self {
        let mut seeder = Xoshiro256PlusPlus::seed_from_u64(base_seed);
        // Each player gets its own stream; jump() advances 2^128 steps.
        for _ in 0..player_id {
            seeder.jump();
        }
        Self { rng: seeder }
    }

    /// Picks an index in `0..len`. `None` when there is nothing to pick.
    pub fn pick(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            None
        } else {
            Some(self.rng.random_range(0..len))
        }
    }

    /// Picks one element of `choices` uniformly.
    pub fn choose<T: Copy>(&mut self, choices: &[T]) -> Option<T> {
        self.pick(choices.len()).map(|i| choices[i])
    }
}
