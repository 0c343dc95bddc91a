//! Round orchestration.
//!
//! [`GameStateMachine`] owns the table of the current round and every
//! collaborator it talks to. It is the only place that opens transactions
//! for player moves and cascades, pushes records onto the undo stack and
//! decides when a round is over.
//!
//! ## Phases
//!
//! ```text
//! Dealing -> Idle <-> MoveInProgress -> CascadeInProgress -> Idle | Won | Lost
//! ```
//!
//! Input is accepted only while `Idle`. Undo is also accepted from `Won`
//! and `Lost` and always lands back in `Idle`. Undone units wait on a redo
//! stack until the next accepted request or a new round discards them.
//!
//! ## Move Pipeline
//!
//! 1. Apply the request in a transaction; an illegal request rolls back
//! 2. Commit the record, push it and emit `MoveCommitted`
//! 3. Run cascades until the rules report none, each in its own chained
//!    record (`CascadeCommitted`)
//! 4. Check for a win or a deadlock, once

use serde::{Deserialize, Serialize};

use crate::core::{DealKey, EngineError, IllegalMove};
use crate::deal::{expected_shape, generator_for, Deal, DealSource};
use crate::events::{EventSink, NullSink};
use crate::history::{MoveRecord, RecordOrigin, Transaction, UndoStack};
use crate::rules::{GameResult, MoveRequest, VariantRules};
use crate::scoring::{ScoreBoard, ScoreKeeper, ScoreSnapshot, ScoringConfig};
use crate::zones::Table;

/// Default bound on cascades run after one player move.
pub const DEFAULT_CASCADE_LIMIT: usize = 64;

/// Machine state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Waiting for a deal.
    Dealing,
    /// Accepting input.
    Idle,
    MoveInProgress,
    CascadeInProgress,
    Won,
    Lost,
}

impl Phase {
    /// Has the round ended?
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::Won | Phase::Lost)
    }
}

/// Result of asking for a new round.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoundStart {
    /// The round is dealt and accepting input.
    Started,
    /// The deal source had nothing ready; ask again later.
    Pending,
}

/// Everything one accepted request produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoveOutcome {
    /// The player move.
    pub record: MoveRecord,
    /// Follow-on effects, in the order they ran.
    pub cascades: Vec<MoveRecord>,
    /// Set when the move ended the round.
    pub result: Option<GameResult>,
}

/// Drives rounds of one variant.
pub struct GameStateMachine<R: VariantRules> {
    rules: R,
    scorer: Box<dyn ScoreKeeper>,
    sink: Box<dyn EventSink>,
    phase: Phase,
    table: Option<Table>,
    deal: Option<Deal>,
    history: UndoStack,
    /// Undone units, newest record first within each unit.
    redo: Vec<Vec<MoveRecord>>,
    moves: u32,
    cascade_limit: usize,
}

impl<R: VariantRules> GameStateMachine<R> {
    /// Create a machine with its collaborators.
    pub fn new(rules: R, scorer: Box<dyn ScoreKeeper>, sink: Box<dyn EventSink>) -> Self {
        Self {
            rules,
            scorer,
            sink,
            phase: Phase::Dealing,
            table: None,
            deal: None,
            history: UndoStack::new(),
            redo: Vec::new(),
            moves: 0,
            cascade_limit: DEFAULT_CASCADE_LIMIT,
        }
    }

    /// A machine with a default score board and no event subscriber.
    pub fn with_rules(rules: R) -> Self {
        Self::new(
            rules,
            Box::new(ScoreBoard::new(&ScoringConfig::default())),
            Box::new(NullSink),
        )
    }

    /// Set the cascade bound.
    #[must_use]
    pub fn with_cascade_limit(mut self, limit: usize) -> Self {
        self.cascade_limit = limit;
        self
    }

    // === Accessors ===

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn rules(&self) -> &R {
        &self.rules
    }

    /// The table of the current round.
    #[must_use]
    pub fn table(&self) -> Option<&Table> {
        self.table.as_ref()
    }

    /// The deal the current round started from.
    #[must_use]
    pub fn deal(&self) -> Option<&Deal> {
        self.deal.as_ref()
    }

    #[must_use]
    pub fn history(&self) -> &UndoStack {
        &self.history
    }

    /// Player moves made and not undone.
    #[must_use]
    pub fn moves(&self) -> u32 {
        self.moves
    }

    #[must_use]
    pub fn score(&self) -> ScoreSnapshot {
        self.scorer.snapshot()
    }

    #[must_use]
    pub fn is_accepting_input(&self) -> bool {
        self.phase == Phase::Idle
    }

    // === Rounds ===

    /// Ask `source` for a deal and start a round with it.
    ///
    /// Returns `Pending`, leaving the machine in `Dealing`, when the source
    /// has nothing ready.
    pub fn start_round(&mut self, source: &mut dyn DealSource, key: DealKey) -> Result<RoundStart, EngineError> {
        if key.variant != self.rules.variant() {
            return Err(EngineError::LayoutMismatch {
                variant: self.rules.variant(),
                detail: format!("requested a {} deal", key.variant),
            });
        }
        self.phase = Phase::Dealing;
        match source.get_deal(key.variant, key.difficulty, key.param) {
            Some(deal) => {
                self.start_with_deal(deal)?;
                Ok(RoundStart::Started)
            }
            None => {
                tracing::debug!(variant = %key.variant, param = key.param, "no deal ready");
                Ok(RoundStart::Pending)
            }
        }
    }

    /// Start a round from an explicit deal.
    ///
    /// The deal must hold exactly its configured deck in the variant's
    /// layout. On error the previous round, if any, is left untouched.
    pub fn start_with_deal(&mut self, deal: Deal) -> Result<(), EngineError> {
        let config = deal.config;
        if config.variant != self.rules.variant() {
            return Err(EngineError::LayoutMismatch {
                variant: self.rules.variant(),
                detail: format!("deal is for {}", config.variant),
            });
        }
        let expected = expected_shape(&config)?;
        if deal.shape() != expected {
            return Err(EngineError::LayoutMismatch {
                variant: config.variant,
                detail: format!("expected {expected:?}, found {:?}", deal.shape()),
            });
        }
        deal.verify(&generator_for(config.variant).deck(config.param))?;

        self.rules.configure(&config);
        let table = self.rules.build_table(&deal)?;

        self.table = Some(table);
        self.deal = Some(deal);
        self.history.clear();
        self.redo.clear();
        self.moves = 0;
        self.phase = Phase::Idle;
        tracing::info!(
            variant = %config.variant,
            seed = config.seed,
            difficulty = ?config.difficulty,
            param = config.param,
            "round started"
        );
        Ok(())
    }

    /// Undo every move of the round and forget the history.
    pub fn restart(&mut self) -> Result<(), EngineError> {
        if self.table.is_none() {
            return Err(EngineError::NoRound);
        }
        let undone = self.undo_all();
        self.history.clear();
        self.redo.clear();
        self.moves = 0;
        self.phase = Phase::Idle;
        tracing::info!(undone = undone.len(), "round restarted");
        Ok(())
    }

    // === Moves ===

    /// Apply a player request and everything that follows from it.
    pub fn request(&mut self, request: MoveRequest) -> Result<MoveOutcome, IllegalMove> {
        if self.phase != Phase::Idle {
            return Err(IllegalMove::NotAcceptingInput);
        }
        let Some(table) = self.table.as_mut() else {
            return Err(IllegalMove::NotAcceptingInput);
        };

        self.phase = Phase::MoveInProgress;
        let mut tx = Transaction::new(table, self.scorer.as_mut(), RecordOrigin::Player(request));
        let applied = self.rules.apply(&mut tx, request);
        let record = match applied {
            Ok(()) if !tx.is_empty() => tx.commit(),
            Ok(()) => {
                tx.rollback();
                self.phase = Phase::Idle;
                return Err(IllegalMove::Unsupported);
            }
            Err(err) => {
                tx.rollback();
                self.phase = Phase::Idle;
                tracing::debug!(?request, error = %err, "move rejected");
                return Err(err);
            }
        };

        self.moves += 1;
        self.redo.clear();
        self.history.push(record.clone());
        self.sink.on_move_committed(&record);
        tracing::debug!(?request, score_delta = record.score_delta, "move committed");

        self.phase = Phase::CascadeInProgress;
        let cascades = self.run_cascades();
        let result = self.check_game_state();
        Ok(MoveOutcome {
            record,
            cascades,
            result,
        })
    }

    fn run_cascades(&mut self) -> Vec<MoveRecord> {
        let mut committed = Vec::new();
        let Some(table) = self.table.as_mut() else {
            return committed;
        };

        for _ in 0..self.cascade_limit {
            let Some(kind) = self.rules.next_cascade(table) else {
                return committed;
            };
            let mut tx = Transaction::new(table, self.scorer.as_mut(), RecordOrigin::Cascade(kind));
            match self.rules.run_cascade(&mut tx, kind) {
                Ok(()) if !tx.is_empty() => {
                    let record = tx.commit();
                    self.history.push(record.clone());
                    self.sink.on_cascade_committed(&record);
                    tracing::debug!(?kind, "cascade committed");
                    committed.push(record);
                }
                Ok(()) => {
                    tx.rollback();
                    tracing::warn!(?kind, "cascade reported but changed nothing");
                    return committed;
                }
                Err(err) => {
                    tx.rollback();
                    tracing::warn!(?kind, error = %err, "cascade failed");
                    return committed;
                }
            }
        }
        if self.rules.next_cascade(table).is_some() {
            tracing::warn!(limit = self.cascade_limit, "cascade limit reached");
        }
        committed
    }

    /// Settle the phase after a move and report a result once.
    fn check_game_state(&mut self) -> Option<GameResult> {
        let result = self.table.as_ref().and_then(|table| self.rules.check(table));
        match result {
            Some(GameResult::Won) => {
                self.phase = Phase::Won;
                let score = self.scorer.snapshot();
                self.sink.on_game_won(score, self.moves);
                tracing::info!(moves = self.moves, score = score.total, "round won");
            }
            Some(GameResult::Lost) => {
                self.phase = Phase::Lost;
                self.sink.on_game_lost();
                tracing::info!(moves = self.moves, "round lost");
            }
            None => self.phase = Phase::Idle,
        }
        result
    }

    // === History ===

    /// Undo the most recent logical move, cascades included.
    ///
    /// Returns the reverted records newest first, or `None` when there is
    /// nothing to undo.
    pub fn undo(&mut self) -> Option<Vec<MoveRecord>> {
        if matches!(self.phase, Phase::MoveInProgress | Phase::CascadeInProgress) {
            return None;
        }
        let table = self.table.as_mut()?;
        let unit = self.history.pop_unit();
        if unit.is_empty() {
            return None;
        }

        for record in &unit {
            record.revert(table, self.scorer.as_mut());
            self.sink.on_move_undone(record);
        }
        self.moves = self.moves.saturating_sub(1);
        self.phase = Phase::Idle;
        tracing::debug!(records = unit.len(), "move undone");
        self.redo.push(unit.clone());
        Some(unit)
    }

    /// Re-apply the most recently undone logical move.
    ///
    /// Returns the replayed records oldest first (the player move, then its
    /// cascades), or `None` when nothing is waiting to be redone.
    pub fn redo(&mut self) -> Option<Vec<MoveRecord>> {
        if matches!(self.phase, Phase::MoveInProgress | Phase::CascadeInProgress) {
            return None;
        }
        let table = self.table.as_mut()?;
        let mut unit = self.redo.pop()?;
        unit.reverse();

        for record in &unit {
            record.replay(table, self.scorer.as_mut());
            self.history.push(record.clone());
            if record.is_cascade() {
                self.sink.on_cascade_committed(record);
            } else {
                self.sink.on_move_committed(record);
            }
        }
        self.moves += 1;
        tracing::debug!(records = unit.len(), "move redone");
        self.check_game_state();
        Some(unit)
    }

    /// Can [`redo`](Self::redo) replay anything?
    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    /// Undo everything, newest first.
    pub fn undo_all(&mut self) -> Vec<MoveRecord> {
        let mut undone = Vec::new();
        while let Some(unit) = self.undo() {
            undone.extend(unit);
        }
        undone
    }

    // === Queries ===

    /// Every legal move on the current table.
    #[must_use]
    pub fn legal_moves(&self) -> Vec<MoveRequest> {
        self.table
            .as_ref()
            .map(|table| self.rules.legal_moves(table))
            .unwrap_or_default()
    }

    /// Legal moves that can make progress.
    #[must_use]
    pub fn useful_moves(&self) -> Vec<MoveRequest> {
        self.table
            .as_ref()
            .map(|table| self.rules.useful_moves(table))
            .unwrap_or_default()
    }

    /// A move worth suggesting, if any.
    #[must_use]
    pub fn hint(&self) -> Option<MoveRequest> {
        if !self.is_accepting_input() {
            return None;
        }
        self.useful_moves().into_iter().next()
    }
}
