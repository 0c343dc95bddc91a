//! Card identity and per-deal face orientation.
//!
//! `Card` is an immutable value: suit plus rank. `CardInstance` pairs a card
//! with its face orientation while a deal is being built and while it sits
//! in a container.

use serde::{Deserialize, Serialize};

/// Highest rank (King).
pub const KING: u8 = 13;

/// Lowest rank (Ace).
pub const ACE: u8 = 1;

/// Card colour, derived from suit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    Black,
    Red,
}

/// The four suits.
///
/// The declaration order is the canonical suit order used for foundation
/// assignment and deck construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Suit {
    Spades,
    Hearts,
    Diamonds,
    Clubs,
}

impl Suit {
    /// All suits in canonical order.
    pub const ALL: [Suit; 4] = [Suit::Spades, Suit::Hearts, Suit::Diamonds, Suit::Clubs];

    /// Colour of this suit.
    #[must_use]
    pub const fn color(self) -> Color {
        match self {
            Suit::Spades | Suit::Clubs => Color::Black,
            Suit::Hearts | Suit::Diamonds => Color::Red,
        }
    }

    /// Single-letter symbol.
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Suit::Spades => 'S',
            Suit::Hearts => 'H',
            Suit::Diamonds => 'D',
            Suit::Clubs => 'C',
        }
    }

    /// Index into [`Suit::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// An immutable playing card.
///
/// Ranks run from 1 (Ace) to 13 (King).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Card {
    pub suit: Suit,
    pub rank: u8,
}

impl Card {
    /// Create a card.
    ///
    /// Panics if `rank` is outside 1..=13; card construction from literals is
    /// a programming error, not an input condition.
    #[must_use]
    pub const fn new(suit: Suit, rank: u8) -> Self {
        assert!(rank >= ACE && rank <= KING, "rank must be 1..=13");
        Self { suit, rank }
    }

    /// Colour of the card.
    #[must_use]
    pub const fn color(self) -> Color {
        self.suit.color()
    }

    /// Is this an Ace?
    #[must_use]
    pub const fn is_ace(self) -> bool {
        self.rank == ACE
    }

    /// Is this a King?
    #[must_use]
    pub const fn is_king(self) -> bool {
        self.rank == KING
    }

    /// True if `self` can rest directly on `below` in a descending build
    /// (one rank lower), ignoring suit.
    #[must_use]
    pub const fn is_one_below(self, below: Card) -> bool {
        below.rank == self.rank + 1
    }

    /// True if `self` and `other` are one rank apart.
    ///
    /// With `wrap`, King and Ace are also adjacent.
    #[must_use]
    pub const fn is_adjacent_rank(self, other: Card, wrap: bool) -> bool {
        let diff = self.rank.abs_diff(other.rank);
        diff == 1 || (wrap && diff == KING - ACE)
    }

    /// Short label such as `QH` or `10S`.
    #[must_use]
    pub fn label(self) -> String {
        let rank = match self.rank {
            1 => "A".to_string(),
            11 => "J".to_string(),
            12 => "Q".to_string(),
            13 => "K".to_string(),
            n => n.to_string(),
        };
        format!("{}{}", rank, self.suit.symbol())
    }
}

impl std::fmt::Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.label())
    }
}

/// A card together with its face orientation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CardInstance {
    pub card: Card,
    pub face_up: bool,
}

impl CardInstance {
    #[must_use]
    pub const fn new(card: Card, face_up: bool) -> Self {
        Self { card, face_up }
    }

    /// A face-down card.
    #[must_use]
    pub const fn face_down(card: Card) -> Self {
        Self { card, face_up: false }
    }

    /// A face-up card.
    #[must_use]
    pub const fn face_up(card: Card) -> Self {
        Self { card, face_up: true }
    }
}
