//! Size-checked slicing of a shuffled deck.

use crate::cards::{Card, CardInstance};
use crate::core::EngineError;

/// Hands out cards from the front of a shuffled deck.
///
/// Every request is checked against what remains. A layout that asks for
/// too many cards fails with [`EngineError::GeneratorExhausted`]; nothing is
/// ever silently truncated.
#[derive(Clone, Debug)]
pub struct Dealer {
    cards: Vec<Card>,
    next: usize,
}

impl Dealer {
    #[must_use]
    pub fn new(cards: Vec<Card>) -> Self {
        Self { cards, next: 0 }
    }

    /// Cards not yet handed out.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.cards.len() - self.next
    }

    fn check(&self, requested: usize) -> Result<(), EngineError> {
        let remaining = self.remaining();
        if requested > remaining {
            tracing::warn!(requested, remaining, "layout exceeds deck");
            return Err(EngineError::GeneratorExhausted { requested, remaining });
        }
        Ok(())
    }

    /// Take the next `count` cards.
    pub fn take(&mut self, count: usize) -> Result<Vec<Card>, EngineError> {
        self.check(count)?;
        let taken = self.cards[self.next..self.next + count].to_vec();
        self.next += count;
        Ok(taken)
    }

    /// Slice consecutive columns of the given sizes.
    ///
    /// The whole layout is checked before any card is handed out.
    pub fn columns(&mut self, sizes: &[usize]) -> Result<Vec<Vec<Card>>, EngineError> {
        self.check(sizes.iter().sum())?;
        sizes.iter().map(|&size| self.take(size)).collect()
    }

    /// Deal row by row across the columns (position `p` goes to column
    /// `p % sizes.len()`), skipping columns that are already full.
    pub fn raster(&mut self, sizes: &[usize]) -> Result<Vec<Vec<Card>>, EngineError> {
        self.check(sizes.iter().sum())?;
        let mut columns: Vec<Vec<Card>> = sizes.iter().map(|&n| Vec::with_capacity(n)).collect();
        let rows = sizes.iter().copied().max().unwrap_or(0);
        for row in 0..rows {
            for (column, &size) in columns.iter_mut().zip(sizes) {
                if row < size {
                    column.extend(self.take(1)?);
                }
            }
        }
        Ok(columns)
    }

    /// Everything left, in deck order.
    #[must_use]
    pub fn rest(mut self) -> Vec<Card> {
        self.cards.split_off(self.next)
    }
}

/// Turn a sliced column into instances, deciding each card's face by its
/// position.
pub fn orient(cards: Vec<Card>, face_up: impl Fn(usize, usize) -> bool) -> Vec<CardInstance> {
    let len = cards.len();
    cards
        .into_iter()
        .enumerate()
        .map(|(row, card)| CardInstance::new(card, face_up(row, len)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::DeckSpec;

    #[test]
    fn test_take_and_rest() {
        let mut dealer = Dealer::new(DeckSpec::standard().build());
        assert_eq!(dealer.take(5).unwrap().len(), 5);
        assert_eq!(dealer.remaining(), 47);
        assert_eq!(dealer.rest().len(), 47);
    }

    #[test]
    fn test_columns_sizes() {
        let mut dealer = Dealer::new(DeckSpec::standard().build());
        let columns = dealer.columns(&[1, 2, 3, 4, 5, 6, 7]).unwrap();
        let lens: Vec<_> = columns.iter().map(Vec::len).collect();
        assert_eq!(lens, vec![1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(dealer.remaining(), 24);
    }

    #[test]
    fn test_oversized_layout_refused_untouched() {
        let mut dealer = Dealer::new(DeckSpec::standard().build());
        let err = dealer.columns(&[30, 30]).unwrap_err();
        assert_eq!(
            err,
            EngineError::GeneratorExhausted {
                requested: 60,
                remaining: 52
            }
        );
        assert_eq!(dealer.remaining(), 52);
    }

    #[test]
    fn test_raster_order() {
        let deck = DeckSpec::standard().build();
        let mut dealer = Dealer::new(deck.clone());
        let columns = dealer.raster(&[2, 1, 2]).unwrap();

        assert_eq!(columns[0], vec![deck[0], deck[3]]);
        assert_eq!(columns[1], vec![deck[1]]);
        assert_eq!(columns[2], vec![deck[2], deck[4]]);
    }

    #[test]
    fn test_orient_top_face_up() {
        let cards = DeckSpec::standard().build()[..3].to_vec();
        let column = orient(cards, |row, len| row + 1 == len);
        let faces: Vec<_> = column.iter().map(|c| c.face_up).collect();
        assert_eq!(faces, vec![false, false, true]);
    }
}
