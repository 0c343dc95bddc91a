//! Move records: reversible descriptions of committed transitions.
//!
//! A [`MoveRecord`] lists the steps of one transition in commit order.
//! Every step stores the state it overwrote and the state it wrote, so
//! reversing the steps in reverse order restores the table exactly
//! (face orientation, blocking, counters and completion flags included),
//! and replaying them in order redoes the transition. Score effects are
//! reversed through the scoring collaborator's inverse calls.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::cards::Card;
use crate::rules::{CascadeKind, MoveRequest};
use crate::scoring::ScoreKeeper;
use crate::zones::{ContainerId, Counter, Flag, Table};

/// One card relocation.
///
/// The indices are valid at the instant the sub-move was applied, which is
/// what makes reverse-order replay exact.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubMove {
    pub card: Card,
    pub source: ContainerId,
    /// Position the card occupied in `source` (its prior sibling index).
    pub source_index: usize,
    pub target: ContainerId,
    /// Position the card was inserted at in `target`.
    pub target_index: usize,
    pub prior_face_up: bool,
    pub prior_blocked: bool,
    /// Orientation after the move.
    pub face_up: bool,
}

/// A single reversible change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Step {
    Transfer(SubMove),
    Flip {
        container: ContainerId,
        index: usize,
        card: Card,
        prior_face_up: bool,
    },
    Block {
        container: ContainerId,
        index: usize,
        card: Card,
        prior_blocked: bool,
    },
    Counter {
        counter: Counter,
        prior: u32,
        value: u32,
    },
}

/// A completion flag change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagToggle {
    pub flag: Flag,
    pub prior: bool,
}

/// A call made on the score keeper.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoreEffect {
    Points(i64),
    RowBonus,
    Penalty,
}

impl ScoreEffect {
    pub(crate) fn apply(self, scorer: &mut dyn ScoreKeeper) {
        match self {
            ScoreEffect::Points(n) => scorer.add_points(n),
            ScoreEffect::RowBonus => scorer.add_row_bonus(),
            ScoreEffect::Penalty => scorer.apply_penalty(),
        }
    }

    pub(crate) fn reverse(self, scorer: &mut dyn ScoreKeeper) {
        match self {
            ScoreEffect::Points(n) => scorer.add_points(-n),
            ScoreEffect::RowBonus => scorer.remove_row_bonus(),
            ScoreEffect::Penalty => scorer.revert_penalty(),
        }
    }
}

/// What produced a record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordOrigin {
    Player(MoveRequest),
    Cascade(CascadeKind),
}

/// An atomic, reversible state transition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    pub origin: RecordOrigin,
    /// Undo together with the record beneath it on the stack.
    pub chained: bool,
    /// Changes in commit order.
    pub steps: SmallVec<[Step; 4]>,
    /// Card turned face-up as a result of this transition.
    pub revealed: Option<Card>,
    /// Score calls made, in order.
    pub score: SmallVec<[ScoreEffect; 2]>,
    /// Net change of the score total.
    pub score_delta: i64,
    pub flags: SmallVec<[FlagToggle; 2]>,
}

impl MoveRecord {
    pub(crate) fn new(origin: RecordOrigin) -> Self {
        Self {
            origin,
            chained: matches!(origin, RecordOrigin::Cascade(_)),
            steps: SmallVec::new(),
            revealed: None,
            score: SmallVec::new(),
            score_delta: 0,
            flags: SmallVec::new(),
        }
    }

    /// Is this a cascade record?
    #[must_use]
    pub fn is_cascade(&self) -> bool {
        matches!(self.origin, RecordOrigin::Cascade(_))
    }

    /// Card relocations in commit order.
    pub fn sub_moves(&self) -> impl Iterator<Item = &SubMove> + '_ {
        self.steps.iter().filter_map(|step| match step {
            Step::Transfer(sub) => Some(sub),
            _ => None,
        })
    }

    /// Does the record change anything?
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty() && self.score.is_empty() && self.flags.is_empty()
    }

    /// Reverse every effect of this record.
    ///
    /// No legality checks are made: a record is consistent by
    /// construction, and replaying it backwards lands on the exact state
    /// it was recorded from.
    pub(crate) fn revert(&self, table: &mut Table, scorer: &mut dyn ScoreKeeper) {
        for effect in self.score.iter().rev() {
            effect.reverse(scorer);
        }
        for toggle in self.flags.iter().rev() {
            table.set_flag(toggle.flag, toggle.prior);
        }
        for step in self.steps.iter().rev() {
            revert_step(step, table);
        }
    }

    /// Apply this record again on the table it was reverted from.
    pub(crate) fn replay(&self, table: &mut Table, scorer: &mut dyn ScoreKeeper) {
        for step in &self.steps {
            replay_step(step, table);
        }
        for toggle in &self.flags {
            table.set_flag(toggle.flag, !toggle.prior);
        }
        for effect in &self.score {
            effect.apply(scorer);
        }
    }
}

fn replay_step(step: &Step, table: &mut Table) {
    match *step {
        Step::Transfer(sub) => {
            let Some(mut placed) = table
                .pile_mut(sub.source)
                .and_then(|pile| pile.remove(sub.source_index))
            else {
                debug_assert!(false, "sub-move source missing during redo: {sub:?}");
                return;
            };
            debug_assert_eq!(placed.card, sub.card);
            placed.face_up = sub.face_up;
            placed.blocked = false;
            if let Some(pile) = table.pile_mut(sub.target) {
                pile.insert(sub.target_index, placed);
            }
        }
        Step::Flip {
            container,
            index,
            prior_face_up,
            ..
        } => {
            if let Some(pile) = table.pile_mut(container) {
                pile.set_face_up(index, !prior_face_up);
            }
        }
        Step::Block {
            container,
            index,
            prior_blocked,
            ..
        } => {
            if let Some(pile) = table.pile_mut(container) {
                pile.set_blocked(index, !prior_blocked);
            }
        }
        Step::Counter { counter, value, .. } => table.set_counter(counter, value),
    }
}

fn revert_step(step: &Step, table: &mut Table) {
    match *step {
        Step::Transfer(sub) => {
            let Some(mut placed) = table
                .pile_mut(sub.target)
                .and_then(|pile| pile.remove(sub.target_index))
            else {
                debug_assert!(false, "sub-move target missing during undo: {sub:?}");
                return;
            };
            debug_assert_eq!(placed.card, sub.card);
            placed.face_up = sub.prior_face_up;
            placed.blocked = sub.prior_blocked;
            if let Some(pile) = table.pile_mut(sub.source) {
                pile.insert(sub.source_index, placed);
            }
        }
        Step::Flip {
            container,
            index,
            prior_face_up,
            ..
        } => {
            if let Some(pile) = table.pile_mut(container) {
                pile.set_face_up(index, prior_face_up);
            }
        }
        Step::Block {
            container,
            index,
            prior_blocked,
            ..
        } => {
            if let Some(pile) = table.pile_mut(container) {
                pile.set_blocked(index, prior_blocked);
            }
        }
        Step::Counter { counter, prior, .. } => table.set_counter(counter, prior),
    }
}
