//! The table: every container of one round, owned by index.
//!
//! `Table` is the single owner of all piles for a round. Piles hold no
//! reference back to it or to the state machine; callers address them by
//! [`ContainerId`]. Besides piles the table carries a small flag set
//! (completed foundations, cleared rows) and counters (recycles used,
//! TriPeaks streak) so that everything undo has to restore lives in one
//! value.
//!
//! ## Usage
//!
//! ```
//! use rust_solitaire::zones::{PileKind, Table, TableauRule};
//!
//! let mut table = Table::new();
//! let stock = table.add_pile(PileKind::Stock);
//! let column = table.add_pile(PileKind::Tableau(TableauRule::KLONDIKE));
//!
//! assert_eq!(table.stock_id(), Some(stock));
//! assert_eq!(table.tableau_ids(), vec![column]);
//! ```

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use crate::cards::Card;

use super::pile::{ContainerId, Pile, PileKind, PlacedCard};

/// Boolean table state that undo restores.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Flag {
    /// A foundation holds a complete build.
    Complete(ContainerId),
    /// A board row (Pyramid) or peak (TriPeaks) has been cleared.
    RowCleared(u8),
}

/// Numeric table state that undo restores.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Counter {
    /// Waste-to-stock recycles performed.
    Recycles,
    /// Consecutive board plays (TriPeaks).
    Streak,
}

/// All containers of one round.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    piles: Vec<Pile>,
    flags: FxHashSet<Flag>,
    counters: FxHashMap<Counter, u32>,
}

impl Table {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an empty pile and return its id.
    pub fn add_pile(&mut self, kind: PileKind) -> ContainerId {
        let id = ContainerId::new(self.piles.len() as u16);
        self.piles.push(Pile::new(id, kind));
        id
    }

    /// Add `count` piles of the same kind.
    pub fn add_piles(&mut self, kind: PileKind, count: usize) -> Vec<ContainerId> {
        (0..count).map(|_| self.add_pile(kind)).collect()
    }

    /// Place dealt cards into a pile while setting up a round.
    ///
    /// Seeding is not a move and is never recorded.
    pub(crate) fn seed(&mut self, id: ContainerId, cards: impl IntoIterator<Item = PlacedCard>) {
        if let Some(pile) = self.piles.get_mut(id.index()) {
            for card in cards {
                pile.accept_card(card);
            }
        }
    }

    /// Get a pile.
    #[must_use]
    pub fn pile(&self, id: ContainerId) -> Option<&Pile> {
        self.piles.get(id.index())
    }

    pub(crate) fn pile_mut(&mut self, id: ContainerId) -> Option<&mut Pile> {
        self.piles.get_mut(id.index())
    }

    /// Iterate over all piles in id order.
    pub fn piles(&self) -> impl Iterator<Item = &Pile> {
        self.piles.iter()
    }

    /// Number of piles.
    #[must_use]
    pub fn pile_count(&self) -> usize {
        self.piles.len()
    }

    /// Does the pile exist?
    #[must_use]
    pub fn contains(&self, id: ContainerId) -> bool {
        id.index() < self.piles.len()
    }

    /// Number of cards in a pile (0 for unknown ids).
    #[must_use]
    pub fn pile_len(&self, id: ContainerId) -> usize {
        self.pile(id).map_or(0, Pile::len)
    }

    /// Top card of a pile.
    #[must_use]
    pub fn top(&self, id: ContainerId) -> Option<PlacedCard> {
        self.pile(id)?.top().copied()
    }

    fn ids_where(&self, pred: impl Fn(PileKind) -> bool) -> Vec<ContainerId> {
        self.piles
            .iter()
            .filter(|p| pred(p.kind()))
            .map(Pile::id)
            .collect()
    }

    /// Tableau columns in id order.
    #[must_use]
    pub fn tableau_ids(&self) -> Vec<ContainerId> {
        self.ids_where(|k| matches!(k, PileKind::Tableau(_)))
    }

    /// Foundations in id order.
    #[must_use]
    pub fn foundation_ids(&self) -> Vec<ContainerId> {
        self.ids_where(|k| matches!(k, PileKind::Foundation(_)))
    }

    /// Board cells in id order (raster order for board variants).
    #[must_use]
    pub fn cell_ids(&self) -> Vec<ContainerId> {
        self.ids_where(|k| matches!(k, PileKind::Cell))
    }

    /// The stock, if the variant has one.
    #[must_use]
    pub fn stock_id(&self) -> Option<ContainerId> {
        self.ids_where(|k| matches!(k, PileKind::Stock)).first().copied()
    }

    /// The waste, if the variant has one.
    #[must_use]
    pub fn waste_id(&self) -> Option<ContainerId> {
        self.ids_where(|k| matches!(k, PileKind::Waste(_))).first().copied()
    }

    // === Flags and counters ===

    /// Is the flag raised?
    #[must_use]
    pub fn flag(&self, flag: Flag) -> bool {
        self.flags.contains(&flag)
    }

    pub(crate) fn set_flag(&mut self, flag: Flag, value: bool) {
        if value {
            self.flags.insert(flag);
        } else {
            self.flags.remove(&flag);
        }
    }

    /// Current counter value (0 when never set).
    #[must_use]
    pub fn counter(&self, counter: Counter) -> u32 {
        self.counters.get(&counter).copied().unwrap_or(0)
    }

    pub(crate) fn set_counter(&mut self, counter: Counter, value: u32) {
        if value == 0 {
            self.counters.remove(&counter);
        } else {
            self.counters.insert(counter, value);
        }
    }

    // === Whole-table queries ===

    /// Total cards on the table.
    #[must_use]
    pub fn total_cards(&self) -> usize {
        self.piles.iter().map(Pile::len).sum()
    }

    /// Every card on the table, pile by pile, bottom to top.
    pub fn all_cards(&self) -> impl Iterator<Item = Card> + '_ {
        self.piles
            .iter()
            .flat_map(|p| p.cards().iter().map(|placed| placed.card))
    }

    /// Locate the first occurrence of a card.
    #[must_use]
    pub fn find(&self, card: Card) -> Option<(ContainerId, usize)> {
        self.piles.iter().find_map(|p| {
            p.cards()
                .iter()
                .position(|placed| placed.card == card)
                .map(|i| (p.id(), i))
        })
    }

    /// Are all listed piles empty?
    #[must_use]
    pub fn all_empty(&self, ids: &[ContainerId]) -> bool {
        ids.iter().all(|&id| self.pile_len(id) == 0)
    }
}
