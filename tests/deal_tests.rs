//! Deal generation integration tests.
//!
//! These tests check every variant's deals against their deck and layout,
//! seed determinism, and the size-checked dealer.

use rust_solitaire::cards::{Card, DeckSpec, Suit, ACE};
use rust_solitaire::core::{DealConfig, Difficulty, EngineError, Variant};
use rust_solitaire::deal::{
    expected_shape, generate_deal, generator_for, DealCache, DealSource, Dealer, SeededDealSource,
};

fn all_configs(seed: u64) -> Vec<DealConfig> {
    let mut configs = Vec::new();
    for variant in Variant::ALL {
        for &param in variant.accepted_params() {
            for difficulty in Difficulty::ALL {
                configs.push(
                    DealConfig::new(variant, seed)
                        .with_param(param)
                        .with_difficulty(difficulty),
                );
            }
        }
    }
    configs
}

// =============================================================================
// Layout Tests
// =============================================================================

/// Klondike deals seven columns with only the top card of each turned up.
#[test]
fn test_klondike_columns_and_faces() {
    for seed in [0, 1, 42, 7_777] {
        let deal = generate_deal(&DealConfig::new(Variant::Klondike, seed)).unwrap();
        assert_eq!(deal.column_lengths(), vec![1, 2, 3, 4, 5, 6, 7]);

        for column in &deal.tableau {
            let (top, beneath) = column.split_last().unwrap();
            assert!(top.face_up);
            assert!(beneath.iter().all(|c| !c.face_up));
        }
        assert!(deal.stock.iter().all(|c| !c.face_up));
    }
}

/// Every valid configuration yields the variant's fixed layout and deck.
#[test]
fn test_every_config_matches_layout_and_deck() {
    for config in all_configs(11) {
        let deal = generate_deal(&config).unwrap();
        assert_eq!(deal.shape(), expected_shape(&config).unwrap(), "{config:?}");

        let deck = generator_for(config.variant).deck(config.param);
        assert_eq!(deal.len(), deck.len());
        deal.verify(&deck).unwrap();
    }
}

/// Reduced-suit Spider decks are still 104 cards of the chosen suits.
#[test]
fn test_spider_suit_restriction() {
    let one = generate_deal(&DealConfig::new(Variant::Spider, 5).with_param(1)).unwrap();
    assert_eq!(one.len(), 104);
    assert!(one.cards().all(|c| c.suit == Suit::Spades));

    let two = generate_deal(&DealConfig::new(Variant::Spider, 5).with_param(2)).unwrap();
    assert!(two.cards().all(|c| matches!(c.suit, Suit::Spades | Suit::Hearts)));
    assert_eq!(two.cards().filter(|c| c.suit == Suit::Hearts).count(), 52);
}

/// Octagon's Aces sit on the foundations and nowhere else.
#[test]
fn test_octagon_aces() {
    let deal = generate_deal(&DealConfig::new(Variant::Octagon, 3)).unwrap();
    let aces: Vec<Card> = deal.foundations.iter().flatten().map(|c| c.card).collect();
    let suits = [Suit::Spades, Suit::Hearts, Suit::Diamonds, Suit::Clubs];
    let expected: Vec<Card> = suits.iter().chain(&suits).map(|&s| Card::new(s, ACE)).collect();
    assert_eq!(aces, expected);
    assert_eq!(deal.cards().filter(|c| c.is_ace()).count(), 8);
}

// =============================================================================
// Determinism Tests
// =============================================================================

/// The same configuration always produces the same deal.
#[test]
fn test_deterministic() {
    for config in all_configs(2_024) {
        assert_eq!(generate_deal(&config).unwrap(), generate_deal(&config).unwrap());
    }
}

/// Parameters a variant does not define are refused, not clamped.
#[test]
fn test_unsupported_params() {
    let bad = [
        (Variant::Klondike, 2),
        (Variant::Spider, 3),
        (Variant::Yukon, 2),
        (Variant::Octagon, 9),
    ];
    for (variant, param) in bad {
        let err = generate_deal(&DealConfig::new(variant, 1).with_param(param)).unwrap_err();
        assert_eq!(err, EngineError::UnsupportedParam { variant, param });
    }
}

// =============================================================================
// Dealer Tests
// =============================================================================

/// A layout larger than the deck fails before anything is sliced.
#[test]
fn test_dealer_refuses_to_truncate() {
    let mut dealer = Dealer::new(DeckSpec::standard().build());
    let err = dealer.columns(&[20, 20, 20]).unwrap_err();
    assert_eq!(
        err,
        EngineError::GeneratorExhausted {
            requested: 60,
            remaining: 52
        }
    );
    assert_eq!(dealer.remaining(), 52);
}

// =============================================================================
// Deal Source Tests
// =============================================================================

/// A prefilled cache hands out distinct deals for its key only.
#[test]
fn test_cache_prefill() {
    let config = DealConfig::new(Variant::Pyramid, 77);
    let mut cache = DealCache::new();
    assert_eq!(cache.prefill(&config, 3).unwrap(), 3);
    assert_eq!(cache.len(&config.key()), 3);

    assert!(cache.get_deal(Variant::Klondike, Difficulty::Medium, 1).is_none());
    let a = cache.get_deal(Variant::Pyramid, config.difficulty, config.param).unwrap();
    let b = cache.get_deal(Variant::Pyramid, config.difficulty, config.param).unwrap();
    assert_ne!(a, b);
    assert_eq!(cache.len(&config.key()), 1);
}

/// The seeded source only advances on success.
#[test]
fn test_seeded_source_advances() {
    let mut source = SeededDealSource::new(10);
    let first = source.get_deal(Variant::Yukon, Difficulty::Easy, 0).unwrap();
    assert_eq!(first.config.seed, 10);
    assert!(source.get_deal(Variant::Yukon, Difficulty::Easy, 5).is_none());
    assert_eq!(source.next_seed(), 11);
}
