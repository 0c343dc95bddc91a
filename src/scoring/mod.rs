//! Scoring collaborator.
//!
//! The engine never owns a score itself. It talks to a [`ScoreKeeper`]
//! passed in at construction, and every score-changing call has an exact
//! inverse so undo can put the score back bit for bit:
//!
//! | forward            | inverse              |
//! |--------------------|----------------------|
//! | `add_points(n)`    | `add_points(-n)`     |
//! | `add_row_bonus()`  | `remove_row_bonus()` |
//! | `apply_penalty()`  | `revert_penalty()`   |

use serde::{Deserialize, Serialize};

/// Point values used by the variants and the default score keeper.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Awarded once per cleared Pyramid row or TriPeaks peak.
    pub row_bonus: i64,
    /// Deducted per penalised action (waste recycle).
    pub penalty: i64,
    /// Any card reaching a foundation.
    pub to_foundation: i64,
    /// Waste card played to the tableau.
    pub waste_to_tableau: i64,
    /// Face-down tableau card turned up.
    pub reveal: i64,
    /// Card taken back off a foundation (negative).
    pub foundation_to_tableau: i64,
    /// Completed Spider run collected.
    pub run_collected: i64,
    /// Pair (or King) removed in a board variant.
    pub pair_removed: i64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            row_bonus: 25,
            penalty: 20,
            to_foundation: 10,
            waste_to_tableau: 5,
            reveal: 5,
            foundation_to_tableau: -15,
            run_collected: 100,
            pair_removed: 5,
        }
    }
}

impl ScoringConfig {
    /// Set the row bonus.
    #[must_use]
    pub fn with_row_bonus(mut self, bonus: i64) -> Self {
        self.row_bonus = bonus;
        self
    }

    /// Set the penalty.
    #[must_use]
    pub fn with_penalty(mut self, penalty: i64) -> Self {
        self.penalty = penalty;
        self
    }
}

/// Point-in-time view of a score.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreSnapshot {
    pub points: i64,
    pub row_bonuses: u32,
    pub penalties: u32,
    pub total: i64,
}

/// Score collaborator interface.
pub trait ScoreKeeper {
    /// Add (or with a negative value, remove) plain points.
    fn add_points(&mut self, points: i64);

    /// Award one row bonus.
    fn add_row_bonus(&mut self);

    /// Take back one row bonus.
    fn remove_row_bonus(&mut self);

    /// Apply one penalty.
    fn apply_penalty(&mut self);

    /// Take back one penalty.
    fn revert_penalty(&mut self);

    /// Current score.
    fn snapshot(&self) -> ScoreSnapshot;
}

/// Default in-memory score keeper.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBoard {
    row_bonus: i64,
    penalty: i64,
    points: i64,
    row_bonuses: u32,
    penalties: u32,
}

impl ScoreBoard {
    /// Create a board valuing bonuses and penalties per `config`.
    #[must_use]
    pub fn new(config: &ScoringConfig) -> Self {
        Self {
            row_bonus: config.row_bonus,
            penalty: config.penalty,
            ..Self::default()
        }
    }

    /// Current total.
    #[must_use]
    pub fn total(&self) -> i64 {
        self.points + i64::from(self.row_bonuses) * self.row_bonus
            - i64::from(self.penalties) * self.penalty
    }
}

impl ScoreKeeper for ScoreBoard {
    fn add_points(&mut self, points: i64) {
        self.points += points;
    }

    fn add_row_bonus(&mut self) {
        self.row_bonuses += 1;
    }

    fn remove_row_bonus(&mut self) {
        self.row_bonuses = self.row_bonuses.saturating_sub(1);
    }

    fn apply_penalty(&mut self) {
        self.penalties += 1;
    }

    fn revert_penalty(&mut self) {
        self.penalties = self.penalties.saturating_sub(1);
    }

    fn snapshot(&self) -> ScoreSnapshot {
        ScoreSnapshot {
            points: self.points,
            row_bonuses: self.row_bonuses,
            penalties: self.penalties,
            total: self.total(),
        }
    }
}
