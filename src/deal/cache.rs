//! Deal sources for the state machine.
//!
//! The machine asks a [`DealSource`] for a deal and treats `None` as "not
//! ready yet": the caller retries later. [`DealCache`] is a prefilled
//! queue per `(variant, difficulty, param)`; [`SeededDealSource`]
//! generates on demand.

use std::collections::VecDeque;

use rustc_hash::FxHashMap;

use crate::core::{DealConfig, DealKey, Difficulty, EngineError, GameRng, Variant};

use super::{generate_deal, Deal};

/// Deal-cache collaborator.
pub trait DealSource {
    /// A deal for the request, or `None` if none is available right now.
    fn get_deal(&mut self, variant: Variant, difficulty: Difficulty, param: u8) -> Option<Deal>;
}

/// Queues of ready deals keyed by request.
#[derive(Clone, Debug, Default)]
pub struct DealCache {
    queues: FxHashMap<DealKey, VecDeque<Deal>>,
}

impl DealCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a deal under its own key.
    pub fn push(&mut self, deal: Deal) {
        self.queues.entry(deal.config.key()).or_default().push_back(deal);
    }

    /// Generate and queue `count` deals for `config`.
    ///
    /// Seeds are forked from `config.seed`, so a prefill is reproducible.
    pub fn prefill(&mut self, config: &DealConfig, count: usize) -> Result<usize, EngineError> {
        let mut seeds = GameRng::new(config.seed);
        for _ in 0..count {
            let seed = seeds.fork().seed();
            self.push(generate_deal(&config.with_seed(seed))?);
        }
        tracing::debug!(variant = %config.variant, count, "deal cache prefilled");
        Ok(count)
    }

    /// Deals waiting under a key.
    #[must_use]
    pub fn len(&self, key: &DealKey) -> usize {
        self.queues.get(key).map_or(0, VecDeque::len)
    }

    /// Is every queue empty?
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queues.values().all(VecDeque::is_empty)
    }
}

impl DealSource for DealCache {
    fn get_deal(&mut self, variant: Variant, difficulty: Difficulty, param: u8) -> Option<Deal> {
        let key = DealKey {
            variant,
            difficulty,
            param,
        };
        self.queues.get_mut(&key)?.pop_front()
    }
}

/// Generates every deal synchronously, seeds counting up from a start.
#[derive(Clone, Debug)]
pub struct SeededDealSource {
    next_seed: u64,
}

impl SeededDealSource {
    #[must_use]
    pub fn new(first_seed: u64) -> Self {
        Self { next_seed: first_seed }
    }

    /// Seed the next deal will use.
    #[must_use]
    pub fn next_seed(&self) -> u64 {
        self.next_seed
    }
}

impl DealSource for SeededDealSource {
    fn get_deal(&mut self, variant: Variant, difficulty: Difficulty, param: u8) -> Option<Deal> {
        let config = DealConfig::new(variant, self.next_seed)
            .with_difficulty(difficulty)
            .with_param(param);
        match generate_deal(&config) {
            Ok(deal) => {
                self.next_seed = self.next_seed.wrapping_add(1);
                Some(deal)
            }
            Err(err) => {
                tracing::warn!(%variant, param, error = %err, "deal generation refused");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_cache_returns_none() {
        let mut cache = DealCache::new();
        assert!(cache.is_empty());
        assert!(cache.get_deal(Variant::Klondike, Difficulty::Medium, 1).is_none());
    }

    #[test]
    fn test_prefill_and_drain() {
        let mut cache = DealCache::new();
        let config = DealConfig::new(Variant::Pyramid, 10);
        assert_eq!(cache.prefill(&config, 3), Ok(3));
        assert_eq!(cache.len(&config.key()), 3);

        let first = cache.get_deal(Variant::Pyramid, Difficulty::Medium, 0).unwrap();
        let second = cache.get_deal(Variant::Pyramid, Difficulty::Medium, 0).unwrap();
        assert_ne!(first.config.seed, second.config.seed);
        assert_eq!(cache.len(&config.key()), 1);

        // Other keys are separate queues.
        assert!(cache.get_deal(Variant::Pyramid, Difficulty::Hard, 0).is_none());
    }

    #[test]
    fn test_prefill_is_reproducible() {
        let config = DealConfig::new(Variant::Yukon, 4);
        let mut a = DealCache::new();
        let mut b = DealCache::new();
        a.prefill(&config, 2).unwrap();
        b.prefill(&config, 2).unwrap();
        assert_eq!(
            a.get_deal(Variant::Yukon, Difficulty::Medium, 0),
            b.get_deal(Variant::Yukon, Difficulty::Medium, 0)
        );
    }

    #[test]
    fn test_prefill_rejects_bad_param() {
        let mut cache = DealCache::new();
        let config = DealConfig::new(Variant::Klondike, 1).with_param(2);
        assert!(cache.prefill(&config, 1).is_err());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_seeded_source_counts_up() {
        let mut source = SeededDealSource::new(100);
        let deal = source.get_deal(Variant::Klondike, Difficulty::Easy, 3).unwrap();
        assert_eq!(deal.config.seed, 100);
        assert_eq!(deal.config.param, 3);
        assert_eq!(source.next_seed(), 101);

        assert!(source.get_deal(Variant::Spider, Difficulty::Easy, 5).is_none());
        assert_eq!(source.next_seed(), 101);
    }
}
