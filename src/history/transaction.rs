//! Recording mutator for a table.
//!
//! `Transaction` is the only way engine code changes a [`Table`]. Each
//! operation checks legality first (`can_accept`, `movable_from`), fails
//! without touching anything when the check fails, and otherwise mutates
//! and appends the matching step to the record under construction.
//!
//! A transaction either commits into a [`MoveRecord`] or rolls back; a
//! rollback replays the recorded steps backwards and leaves the table and
//! score exactly as they were.

use crate::cards::Card;
use crate::core::IllegalMove;
use crate::scoring::ScoreKeeper;
use crate::zones::{ContainerId, Counter, Flag, Placement, PlacedCard, Table};

use super::record::{FlagToggle, MoveRecord, RecordOrigin, ScoreEffect, Step, SubMove};

/// An open, recording edit of a table.
pub struct Transaction<'a> {
    table: &'a mut Table,
    scorer: &'a mut dyn ScoreKeeper,
    record: MoveRecord,
    score_before: i64,
}

impl<'a> Transaction<'a> {
    /// Open a transaction.
    pub fn new(table: &'a mut Table, scorer: &'a mut dyn ScoreKeeper, origin: RecordOrigin) -> Self {
        let score_before = scorer.snapshot().total;
        Self {
            table,
            scorer,
            record: MoveRecord::new(origin),
            score_before,
        }
    }

    /// Read-only view of the table, including changes made so far.
    #[must_use]
    pub fn table(&self) -> &Table {
        self.table
    }

    /// Has anything been recorded?
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.record.is_empty()
    }

    /// Move the cards from `index` to the top of `from` onto `to`.
    ///
    /// With `Placement::Build` the source must release the cards as one
    /// movable unit. The target must accept them in either case. Returns
    /// the number of cards moved.
    pub fn transfer(
        &mut self,
        from: ContainerId,
        index: usize,
        to: ContainerId,
        placement: Placement,
    ) -> Result<usize, IllegalMove> {
        self.transfer_with_face(from, index, to, placement, None)
    }

    /// Move the top card of `from` onto `to`, optionally turning it.
    pub fn transfer_top(
        &mut self,
        from: ContainerId,
        to: ContainerId,
        placement: Placement,
        face_up: Option<bool>,
    ) -> Result<Card, IllegalMove> {
        let len = self.table.pile_len(from);
        if len == 0 {
            return Err(IllegalMove::NothingToMove(from));
        }
        self.transfer_with_face(from, len - 1, to, placement, face_up)?;
        self.table
            .top(to)
            .map(|placed| placed.card)
            .ok_or(IllegalMove::Rejected(to))
    }

    fn transfer_with_face(
        &mut self,
        from: ContainerId,
        index: usize,
        to: ContainerId,
        placement: Placement,
        face_up: Option<bool>,
    ) -> Result<usize, IllegalMove> {
        let source = self.table.pile(from).ok_or(IllegalMove::UnknownContainer(from))?;
        let target = self.table.pile(to).ok_or(IllegalMove::UnknownContainer(to))?;
        if from == to {
            return Err(IllegalMove::Rejected(to));
        }
        if index >= source.len() {
            return Err(IllegalMove::NothingToMove(from));
        }
        if placement == Placement::Build && !source.movable_from(index) {
            let blocked = source.get(index).is_some_and(|p| p.blocked);
            return Err(if blocked {
                IllegalMove::Blocked(from)
            } else {
                IllegalMove::NotMovable { container: from, index }
            });
        }
        let incoming = source.cards_from(index);
        if !target.can_accept(&incoming, placement) {
            return Err(IllegalMove::Rejected(to));
        }

        // Top card first, each inserted at the same target position, so the
        // run keeps its order and every recorded index is exact.
        let base = target.len();
        let count = incoming.len();
        for source_index in (index..index + count).rev() {
            let Some(mut placed) = self.table.pile_mut(from).and_then(|p| p.remove(source_index)) else {
                return Err(IllegalMove::NothingToMove(from));
            };
            let sub = SubMove {
                card: placed.card,
                source: from,
                source_index,
                target: to,
                target_index: base,
                prior_face_up: placed.face_up,
                prior_blocked: placed.blocked,
                face_up: face_up.unwrap_or(placed.face_up),
            };
            placed.face_up = sub.face_up;
            placed.blocked = false;
            if let Some(pile) = self.table.pile_mut(to) {
                pile.insert(base, placed);
            }
            self.record.steps.push(Step::Transfer(sub));
        }
        Ok(count)
    }

    /// Turn a card. Records nothing when the orientation is unchanged.
    ///
    /// Returns the card when it was turned face-up.
    pub fn flip(&mut self, container: ContainerId, index: usize, face_up: bool) -> Option<Card> {
        let placed = *self.table.pile(container)?.get(index)?;
        if placed.face_up == face_up {
            return None;
        }
        self.table.pile_mut(container)?.set_face_up(index, face_up);
        self.record.steps.push(Step::Flip {
            container,
            index,
            card: placed.card,
            prior_face_up: placed.face_up,
        });
        if face_up {
            self.record.revealed = Some(placed.card);
            Some(placed.card)
        } else {
            None
        }
    }

    /// Turn the top card of a pile face-up if it is face-down.
    pub fn reveal_top(&mut self, container: ContainerId) -> Option<Card> {
        let len = self.table.pile_len(container);
        if len == 0 {
            return None;
        }
        self.flip(container, len - 1, true)
    }

    /// Set a card's blocked state. Records nothing when unchanged.
    pub fn set_blocked(&mut self, container: ContainerId, index: usize, blocked: bool) -> bool {
        let Some(placed) = self.table.pile(container).and_then(|p| p.get(index)).copied() else {
            return false;
        };
        if placed.blocked == blocked {
            return false;
        }
        if let Some(pile) = self.table.pile_mut(container) {
            pile.set_blocked(index, blocked);
        }
        self.record.steps.push(Step::Block {
            container,
            index,
            card: placed.card,
            prior_blocked: placed.blocked,
        });
        true
    }

    /// Set a counter. Records nothing when unchanged.
    pub fn set_counter(&mut self, counter: Counter, value: u32) {
        let prior = self.table.counter(counter);
        if prior == value {
            return;
        }
        self.table.set_counter(counter, value);
        self.record.steps.push(Step::Counter {
            counter,
            prior,
            value,
        });
    }

    /// Raise or lower a flag. Records nothing when unchanged.
    pub fn set_flag(&mut self, flag: Flag, value: bool) {
        let prior = self.table.flag(flag);
        if prior == value {
            return;
        }
        self.table.set_flag(flag, value);
        self.record.flags.push(FlagToggle { flag, prior });
    }

    /// Sync a foundation's completion flag with its contents.
    pub fn refresh_complete(&mut self, foundation: ContainerId) {
        let complete = self.table.pile(foundation).is_some_and(|p| p.is_complete());
        self.set_flag(Flag::Complete(foundation), complete);
    }

    /// Add points through the score keeper.
    pub fn add_points(&mut self, points: i64) {
        if points != 0 {
            self.score(ScoreEffect::Points(points));
        }
    }

    /// Award a row bonus.
    pub fn add_row_bonus(&mut self) {
        self.score(ScoreEffect::RowBonus);
    }

    /// Apply a penalty.
    pub fn apply_penalty(&mut self) {
        self.score(ScoreEffect::Penalty);
    }

    fn score(&mut self, effect: ScoreEffect) {
        effect.apply(self.scorer);
        self.record.score.push(effect);
    }

    /// Finish and hand back the record.
    #[must_use]
    pub fn commit(mut self) -> MoveRecord {
        self.record.score_delta = self.scorer.snapshot().total - self.score_before;
        self.record
    }

    /// Undo everything recorded so far.
    pub fn rollback(self) {
        self.record.revert(self.table, self.scorer);
    }
}

/// The placed card at a position.
#[must_use]
pub fn placed_at(table: &Table, container: ContainerId, index: usize) -> Option<PlacedCard> {
    table.pile(container).and_then(|p| p.get(index)).copied()
}
