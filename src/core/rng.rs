//! Seeded randomness for deal generation.
//!
//! A deal is a pure function of its [`DealConfig`](super::DealConfig), so
//! every random draw goes through a [`GameRng`] built from the config seed.
//! Generation splits the seed into named streams: the baseline shuffle
//! reads `"shuffle"`, the Spider adjacency sweep reads `"bias"`. Retuning
//! the bias therefore never moves a card the baseline shuffle placed.
//!
//! ```
//! use rust_solitaire::core::GameRng;
//!
//! let rng = GameRng::new(42);
//! let mut shuffle = rng.for_context("shuffle");
//! let mut bias = rng.for_context("bias");
//!
//! let a: Vec<f64> = (0..4).map(|_| shuffle.roll()).collect();
//! let b: Vec<f64> = (0..4).map(|_| bias.roll()).collect();
//! assert_ne!(a, b);
//! ```

use std::hash::Hasher;

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rustc_hash::FxHasher;

/// Golden-ratio increment used to spread successive fork seeds.
const FORK_STEP: u64 = 0x9E37_79B9_7F4A_7C15;

/// ChaCha8 generator that remembers its seed.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
    forks: u64,
}

impl GameRng {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
            forks: 0,
        }
    }

    /// Seed this generator started from.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Next child generator in a reproducible sequence.
    ///
    /// Used to hand out one seed per prefilled deal; the n-th fork of a
    /// given seed is always the same.
    #[must_use]
    pub fn fork(&mut self) -> Self {
        self.forks += 1;
        Self::new(self.seed.wrapping_add(self.forks.wrapping_mul(FORK_STEP)))
    }

    /// Named stream derived from the seed.
    ///
    /// Hashed with `FxHasher`, whose output does not depend on the
    /// toolchain; deals for a seed must not change between builds.
    #[must_use]
    pub fn for_context(&self, context: &str) -> Self {
        let mut hasher = FxHasher::default();
        hasher.write_u64(self.seed);
        hasher.write(context.as_bytes());
        Self::new(hasher.finish())
    }

    /// Uniform roll in `[0, 1)`.
    pub fn roll(&mut self) -> f64 {
        self.inner.gen::<f64>()
    }

    /// Fisher-Yates shuffle in place.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut self.inner);
    }

    /// Uniform pick from `items`; `None` when it is empty.
    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        items.choose(&mut self.inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::DeckSpec;

    fn shuffled(seed: u64) -> Vec<crate::cards::Card> {
        let mut deck = DeckSpec::standard().build();
        GameRng::new(seed).for_context("shuffle").shuffle(&mut deck);
        deck
    }

    #[test]
    fn test_same_seed_same_order() {
        assert_eq!(shuffled(42), shuffled(42));
        assert_ne!(shuffled(42), shuffled(43));
    }

    #[test]
    fn test_shuffle_keeps_cards() {
        let mut deck = shuffled(9);
        assert_ne!(deck, DeckSpec::standard().build());
        deck.sort();
        let mut sorted = DeckSpec::standard().build();
        sorted.sort();
        assert_eq!(deck, sorted);
    }

    #[test]
    fn test_contexts_are_independent() {
        let rng = GameRng::new(5);
        assert_eq!(rng.for_context("bias").seed(), rng.for_context("bias").seed());
        assert_ne!(rng.for_context("bias").seed(), rng.for_context("shuffle").seed());
        assert_ne!(
            GameRng::new(6).for_context("bias").seed(),
            rng.for_context("bias").seed()
        );
    }

    #[test]
    fn test_forks_repeat_per_seed() {
        let mut a = GameRng::new(42);
        let mut b = GameRng::new(42);
        let first = a.fork().seed();
        assert_eq!(first, b.fork().seed());
        assert_ne!(first, a.fork().seed());
    }

    #[test]
    fn test_choose() {
        let candidates = [3usize, 8, 21, 34];
        let mut rng = GameRng::new(11);
        let picked = rng.choose(&candidates).copied().unwrap();
        assert!(candidates.contains(&picked));
        assert_eq!(GameRng::new(11).choose(&candidates), Some(&picked));

        let none: [usize; 0] = [];
        assert!(rng.choose(&none).is_none());
    }

    #[test]
    fn test_roll_in_unit_interval() {
        let mut rng = GameRng::new(7);
        assert!((0..1000).map(|_| rng.roll()).all(|r| (0.0..1.0).contains(&r)));
    }
}
