//! Deck composition rules.
//!
//! A variant's deck is described by a [`DeckSpec`]: how many 52-card packs
//! and which suits. Restricted-suit decks (1- and 2-suit Spider) repeat the
//! allowed suits so the card count stays `copies * 52`.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::card::{Card, Suit, ACE, KING};

/// Description of a deck.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckSpec {
    /// Number of 52-card packs (1 or 2).
    pub copies: u8,
    /// Suits present. Must divide 4 evenly (1, 2 or 4 suits).
    pub suits: Vec<Suit>,
}

impl DeckSpec {
    /// A single standard 52-card deck.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            copies: 1,
            suits: Suit::ALL.to_vec(),
        }
    }

    /// Two standard decks (104 cards).
    #[must_use]
    pub fn double() -> Self {
        Self {
            copies: 2,
            suits: Suit::ALL.to_vec(),
        }
    }

    /// A double deck restricted to `suit_count` suits (Spider).
    ///
    /// Returns `None` unless `suit_count` is 1, 2 or 4.
    #[must_use]
    pub fn double_with_suits(suit_count: u8) -> Option<Self> {
        let suits = match suit_count {
            1 => vec![Suit::Spades],
            2 => vec![Suit::Spades, Suit::Hearts],
            4 => Suit::ALL.to_vec(),
            _ => return None,
        };
        Some(Self { copies: 2, suits })
    }

    /// Total number of cards in the deck.
    #[must_use]
    pub fn len(&self) -> usize {
        usize::from(self.copies) * 52
    }

    /// True for a deck with no packs or no suits.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.copies == 0 || self.suits.is_empty()
    }

    /// Build the deck in canonical (unshuffled) order.
    #[must_use]
    pub fn build(&self) -> Vec<Card> {
        if self.is_empty() {
            return Vec::new();
        }
        let repeats = 4 / self.suits.len();
        let mut cards = Vec::with_capacity(self.len());
        for _ in 0..self.copies {
            for _ in 0..repeats {
                for &suit in &self.suits {
                    for rank in ACE..=KING {
                        cards.push(Card::new(suit, rank));
                    }
                }
            }
        }
        cards
    }

    /// Multiset of the cards in the deck.
    #[must_use]
    pub fn multiset(&self) -> FxHashMap<Card, usize> {
        count_cards(self.build())
    }
}

/// Count occurrences of each card.
pub fn count_cards(cards: impl IntoIterator<Item = Card>) -> FxHashMap<Card, usize> {
    let mut counts = FxHashMap::default();
    for card in cards {
        *counts.entry(card).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_deck() {
        let deck = DeckSpec::standard().build();
        assert_eq!(deck.len(), 52);
        let counts = count_cards(deck);
        assert_eq!(counts.len(), 52);
        assert!(counts.values().all(|&n| n == 1));
    }

    #[test]
    fn test_double_deck() {
        let spec = DeckSpec::double();
        assert_eq!(spec.len(), 104);
        let counts = spec.multiset();
        assert_eq!(counts.len(), 52);
        assert!(counts.values().all(|&n| n == 2));
    }

    #[test]
    fn test_one_suit_spider_deck() {
        let spec = DeckSpec::double_with_suits(1).unwrap();
        let deck = spec.build();
        assert_eq!(deck.len(), 104);
        assert!(deck.iter().all(|c| c.suit == Suit::Spades));
        let counts = count_cards(deck);
        assert_eq!(counts.len(), 13);
        assert!(counts.values().all(|&n| n == 8));
    }

    #[test]
    fn test_two_suit_spider_deck() {
        let counts = DeckSpec::double_with_suits(2).unwrap().multiset();
        assert_eq!(counts.len(), 26);
        assert!(counts.values().all(|&n| n == 4));
    }

    #[test]
    fn test_unsupported_suit_count() {
        assert!(DeckSpec::double_with_suits(3).is_none());
        assert!(DeckSpec::double_with_suits(0).is_none());
    }
}
