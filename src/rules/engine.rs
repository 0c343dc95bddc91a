//! Variant rules trait.
//!
//! Variants implement `VariantRules` to define:
//! - How a deal seeds the table
//! - How a player request maps onto container transfers
//! - Which automatic follow-on effects run after a move
//! - Win conditions and the "useful move" filter used for deadlock detection

use crate::core::{DealConfig, EngineError, IllegalMove, Variant};
use crate::deal::Deal;
use crate::history::{RecordOrigin, Transaction};
use crate::scoring::ScoreBoard;
use crate::zones::Table;

use super::request::{CascadeKind, MoveRequest};

/// Terminal state of a round.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameResult {
    Won,
    Lost,
}

/// Rules of one solitaire variant.
///
/// ## Implementation Notes
///
/// - `apply`: Mutate only through the transaction. Returning `Err` makes
///   the caller roll back whatever was recorded.
/// - `next_cascade` / `run_cascade`: Called in a loop after every player
///   move until `next_cascade` returns `None`.
/// - `candidate_moves`: May over-approximate; legality is re-checked by a
///   dry run.
/// - `is_useful`: A heuristic. Legal moves that cannot make progress are
///   filtered out so that deadlock can be detected.
/// - `has_supply`: While the stock can still put new cards in play the
///   round is never lost, whatever `is_useful` says.
pub trait VariantRules {
    /// Which variant these rules play.
    fn variant(&self) -> Variant;

    /// Adopt the per-round parameters of a deal (draw count and the like).
    fn configure(&mut self, _config: &DealConfig) {}

    /// Create the table of a round from a deal.
    fn build_table(&self, deal: &Deal) -> Result<Table, EngineError>;

    /// Apply a player request.
    fn apply(&self, tx: &mut Transaction<'_>, request: MoveRequest) -> Result<(), IllegalMove>;

    /// The next automatic effect due on `table`, if any.
    fn next_cascade(&self, _table: &Table) -> Option<CascadeKind> {
        None
    }

    /// Run one automatic effect.
    fn run_cascade(&self, _tx: &mut Transaction<'_>, _kind: CascadeKind) -> Result<(), IllegalMove> {
        Err(IllegalMove::Unsupported)
    }

    /// Does the table meet the clear condition?
    fn is_won(&self, table: &Table) -> bool;

    /// Moves worth checking for legality.
    fn candidate_moves(&self, table: &Table) -> Vec<MoveRequest>;

    /// Can the move make progress? Defaults to every legal move.
    fn is_useful(&self, _table: &Table, _request: &MoveRequest) -> bool {
        true
    }

    /// Can the stock, directly or after a recycle, still bring cards into
    /// play? Defaults to a non-empty stock.
    fn has_supply(&self, table: &Table) -> bool {
        table.stock_id().is_some_and(|stock| table.pile_len(stock) > 0)
    }

    // === Convenience Methods ===

    /// Would `request` succeed on `table`?
    ///
    /// Dry-runs the request on a snapshot; `table` is never touched.
    fn is_legal(&self, table: &Table, request: MoveRequest) -> bool {
        let mut scratch = table.clone();
        let mut scorer = ScoreBoard::default();
        let mut tx = Transaction::new(&mut scratch, &mut scorer, RecordOrigin::Player(request));
        self.apply(&mut tx, request).is_ok() && !tx.is_empty()
    }

    /// Every legal move.
    fn legal_moves(&self, table: &Table) -> Vec<MoveRequest> {
        self.candidate_moves(table)
            .into_iter()
            .filter(|&request| self.is_legal(table, request))
            .collect()
    }

    /// Legal moves that pass the usefulness filter.
    fn useful_moves(&self, table: &Table) -> Vec<MoveRequest> {
        self.legal_moves(table)
            .into_iter()
            .filter(|request| self.is_useful(table, request))
            .collect()
    }

    /// Terminal state, if any.
    ///
    /// Lost needs the supply to be spent as well as no useful move left.
    fn check(&self, table: &Table) -> Option<GameResult> {
        if self.is_won(table) {
            Some(GameResult::Won)
        } else if !self.has_supply(table) && self.useful_moves(table).is_empty() {
            Some(GameResult::Lost)
        } else {
            None
        }
    }
}
