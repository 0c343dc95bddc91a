//! Difficulty-tunable adjacency bias.
//!
//! After a full baseline shuffle, [`BiasedShuffle`] sweeps the tableau
//! positions in deal order and, with probability `b`, swaps a "good" child
//! (one rank lower, same suit as the card it will rest on) into the
//! position. Below the adversarial ceiling a missed good match may instead
//! be replaced by a "bad" child (one rank lower, different suit), which
//! buries the parent under a run that cannot be moved as a unit.
//!
//! Swaps only ever touch indices at or after the current position, so a
//! placed card is never disturbed by a later step. The result is a
//! statistical skew; it does not make deals solvable or unsolvable.

use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::core::{Difficulty, GameRng};

/// Fixed `(suit count, difficulty) -> b` lookup.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BiasTable {
    /// Rows: 1, 2 and 4 suits. Columns: Easy, Medium, Hard.
    pub rows: [[f64; 3]; 3],
    /// Biases below this value also place bad matches.
    pub adversarial_ceiling: f64,
}

impl Default for BiasTable {
    fn default() -> Self {
        Self {
            rows: [[0.80, 0.50, 0.20], [0.70, 0.40, 0.15], [0.60, 0.30, 0.10]],
            adversarial_ceiling: 0.30,
        }
    }
}

impl BiasTable {
    /// Bias for a suit count and difficulty.
    ///
    /// Suit counts other than 1 and 2 use the four-suit row.
    #[must_use]
    pub fn lookup(&self, suit_count: u8, difficulty: Difficulty) -> f64 {
        let row = match suit_count {
            1 => 0,
            2 => 1,
            _ => 2,
        };
        let column = match difficulty {
            Difficulty::Easy => 0,
            Difficulty::Medium => 1,
            Difficulty::Hard => 2,
        };
        self.rows[row][column]
    }

    /// Probability of searching for a bad match after a missed good one.
    #[must_use]
    pub fn adversarial_chance(&self, bias: f64) -> f64 {
        if bias < self.adversarial_ceiling && self.adversarial_ceiling > 0.0 {
            (self.adversarial_ceiling - bias) / self.adversarial_ceiling
        } else {
            0.0
        }
    }
}

/// Outcome counts of one sweep.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BiasReport {
    pub good: usize,
    pub bad: usize,
}

/// The biased sweep over a shuffled deck.
#[derive(Clone, Copy, Debug)]
pub struct BiasedShuffle {
    bias: f64,
    adversarial: f64,
    /// Distance from a position to its parent (the column count).
    stride: usize,
    /// Number of leading positions that form the tableau.
    tableau_len: usize,
}

impl BiasedShuffle {
    #[must_use]
    pub fn new(table: &BiasTable, suit_count: u8, difficulty: Difficulty) -> Self {
        let bias = table.lookup(suit_count, difficulty);
        Self {
            bias,
            adversarial: table.adversarial_chance(bias),
            stride: 10,
            tableau_len: 54,
        }
    }

    /// Set the parent distance and tableau size of the raster deal.
    #[must_use]
    pub fn with_layout(mut self, stride: usize, tableau_len: usize) -> Self {
        self.stride = stride;
        self.tableau_len = tableau_len;
        self
    }

    #[must_use]
    pub fn bias(&self) -> f64 {
        self.bias
    }

    /// Sweep `cards` in place.
    ///
    /// `cards` must already be fully shuffled; position `i` of the tableau
    /// prefix rests on position `i - stride`.
    pub fn apply(&self, cards: &mut [Card], rng: &mut GameRng) -> BiasReport {
        let mut report = BiasReport::default();
        let end = self.tableau_len.min(cards.len());

        for i in self.stride..end {
            let parent = cards[i - self.stride];
            let roll = rng.roll();

            let mut swapped = false;
            if roll < self.bias {
                if let Some(j) = pick(cards, i, rng, |c| is_child(parent, c) && c.suit == parent.suit) {
                    cards.swap(i, j);
                    report.good += 1;
                    swapped = true;
                }
            }
            if !swapped && self.adversarial > 0.0 && rng.roll() < self.adversarial {
                if let Some(j) = pick(cards, i, rng, |c| is_child(parent, c) && c.suit != parent.suit) {
                    cards.swap(i, j);
                    report.bad += 1;
                }
            }
        }

        tracing::trace!(
            bias = self.bias,
            good = report.good,
            bad = report.bad,
            "bias sweep"
        );
        report
    }
}

fn is_child(parent: Card, card: Card) -> bool {
    card.is_one_below(parent)
}

/// Random index `>= from` whose card matches.
fn pick(cards: &[Card], from: usize, rng: &mut GameRng, matches: impl Fn(Card) -> bool) -> Option<usize> {
    let candidates: Vec<usize> = (from..cards.len()).filter(|&j| matches(cards[j])).collect();
    rng.choose(&candidates).copied()
}

/// Count same-suit, rank-descending seams down each column.
#[must_use]
pub fn same_suit_seams<'a>(columns: impl IntoIterator<Item = &'a [Card]>) -> usize {
    columns
        .into_iter()
        .map(|column| {
            column
                .windows(2)
                .filter(|pair| pair[1].suit == pair[0].suit && pair[1].is_one_below(pair[0]))
                .count()
        })
        .sum()
}
