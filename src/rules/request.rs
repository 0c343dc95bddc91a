//! Move requests and cascade kinds.
//!
//! A request is the player's intent ("move the cards from column 3, index
//! 5, onto column 7"). Variants decide whether the request is legal and how
//! it maps onto container transfers.

use serde::{Deserialize, Serialize};

use crate::zones::ContainerId;

/// A player-initiated move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveRequest {
    /// Move the cards from `index` to the top of `from` onto `to`.
    Transfer {
        from: ContainerId,
        index: usize,
        to: ContainerId,
    },
    /// Draw from the stock (recycling the waste when the variant allows),
    /// or deal a row in Spider.
    Draw,
    /// Remove a group of cards: a single King, or two cards forming a pair
    /// under the variant's matching rule.
    Remove {
        first: ContainerId,
        second: Option<ContainerId>,
    },
}

impl MoveRequest {
    /// Shorthand for a top-card or run transfer.
    #[must_use]
    pub const fn transfer(from: ContainerId, index: usize, to: ContainerId) -> Self {
        Self::Transfer { from, index, to }
    }

    /// Shorthand for a pair removal.
    #[must_use]
    pub const fn pair(first: ContainerId, second: ContainerId) -> Self {
        Self::Remove {
            first,
            second: Some(second),
        }
    }

    /// Shorthand for a single-card removal.
    #[must_use]
    pub const fn single(card: ContainerId) -> Self {
        Self::Remove {
            first: card,
            second: None,
        }
    }
}

/// Automatic follow-on effect kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CascadeKind {
    /// A completed run flew to a foundation.
    CollectRun,
    /// A board row or peak was cleared and its bonus awarded.
    RowClear,
    /// Survivors were compacted and the gaps refilled from the stock.
    CompactAndRefill,
}
