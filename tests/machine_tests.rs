//! State machine integration tests.
//!
//! Small wrappers around Klondike's rules force the end states and
//! cascade chains that random deals rarely reach.

use std::sync::mpsc::Receiver;

use rust_solitaire::core::{DealConfig, EngineError, IllegalMove, Variant};
use rust_solitaire::deal::{generate_deal, Deal};
use rust_solitaire::events::{ChannelSink, EngineEvent};
use rust_solitaire::games::Klondike;
use rust_solitaire::history::Transaction;
use rust_solitaire::machine::{GameStateMachine, Phase};
use rust_solitaire::rules::{CascadeKind, GameResult, MoveRequest, VariantRules};
use rust_solitaire::scoring::{ScoreBoard, ScoringConfig};
use rust_solitaire::zones::{Counter, Table};

/// Klondike, but the round counts as won once anything is on the waste,
/// and every move is followed by `cascades` streak bumps.
#[derive(Default)]
struct Forced {
    inner: Klondike,
    win_on_waste: bool,
    cascades: u32,
}

impl VariantRules for Forced {
    fn variant(&self) -> Variant {
        Variant::Klondike
    }

    fn build_table(&self, deal: &Deal) -> Result<Table, EngineError> {
        self.inner.build_table(deal)
    }

    fn apply(&self, tx: &mut Transaction<'_>, request: MoveRequest) -> Result<(), IllegalMove> {
        self.inner.apply(tx, request)
    }

    fn next_cascade(&self, table: &Table) -> Option<CascadeKind> {
        (table.counter(Counter::Streak) < self.cascades).then_some(CascadeKind::RowClear)
    }

    fn run_cascade(&self, tx: &mut Transaction<'_>, _kind: CascadeKind) -> Result<(), IllegalMove> {
        let streak = tx.table().counter(Counter::Streak);
        tx.set_counter(Counter::Streak, streak + 1);
        tx.add_points(1);
        Ok(())
    }

    fn is_won(&self, table: &Table) -> bool {
        self.win_on_waste && table.waste_id().is_some_and(|id| table.pile_len(id) > 0)
    }

    fn candidate_moves(&self, table: &Table) -> Vec<MoveRequest> {
        self.inner.candidate_moves(table)
    }
}

fn machine(rules: Forced, seed: u64) -> (GameStateMachine<Forced>, Receiver<EngineEvent>) {
    let (sink, events) = ChannelSink::channel();
    let mut machine = GameStateMachine::new(rules, Box::new(ScoreBoard::new(&ScoringConfig::default())), Box::new(sink));
    machine
        .start_with_deal(generate_deal(&DealConfig::new(Variant::Klondike, seed)).unwrap())
        .unwrap();
    (machine, events)
}

// =============================================================================
// End States
// =============================================================================

/// A winning move reports once, locks input, and can still be undone.
#[test]
fn test_won_then_undo() {
    let rules = Forced {
        win_on_waste: true,
        ..Forced::default()
    };
    let (mut machine, events) = machine(rules, 1);

    let outcome = machine.request(MoveRequest::Draw).unwrap();
    assert_eq!(outcome.result, Some(GameResult::Won));
    assert_eq!(machine.phase(), Phase::Won);
    assert!(machine.phase().is_terminal());
    assert_eq!(machine.request(MoveRequest::Draw), Err(IllegalMove::NotAcceptingInput));
    assert!(machine.hint().is_none());

    let received: Vec<EngineEvent> = events.try_iter().collect();
    assert_eq!(received.len(), 2);
    assert!(matches!(received[1], EngineEvent::GameWon { moves: 1, .. }));

    machine.undo().unwrap();
    assert_eq!(machine.phase(), Phase::Idle);
    assert!(!machine.phase().is_terminal());
    assert!(machine.request(MoveRequest::Draw).is_ok());
}

/// Undo on an empty history changes nothing.
#[test]
fn test_empty_undo_is_noop() {
    let (mut machine, events) = machine(Forced::default(), 2);
    let before = machine.table().unwrap().clone();
    assert!(machine.undo().is_none());
    assert!(machine.undo_all().is_empty());
    assert_eq!(machine.table().unwrap(), &before);
    assert!(machine.history().is_empty());
    assert_eq!(events.try_iter().count(), 0);
}

// =============================================================================
// Cascades
// =============================================================================

/// Each cascade is its own chained record and all of them undo with the
/// move that triggered them.
#[test]
fn test_cascades_chain_into_one_undo_unit() {
    let rules = Forced {
        cascades: 3,
        ..Forced::default()
    };
    let (mut machine, events) = machine(rules, 3);
    let before = machine.table().unwrap().clone();
    let score_before = machine.score();

    let outcome = machine.request(MoveRequest::Draw).unwrap();
    assert_eq!(outcome.cascades.len(), 3);
    assert!(outcome.cascades.iter().all(|record| record.chained));
    assert_eq!(machine.history().len(), 4);
    assert_eq!(machine.score().points, score_before.points + 3);

    let undone = machine.undo().unwrap();
    assert_eq!(undone.len(), 4);
    assert_eq!(undone[3], outcome.record);
    assert_eq!(machine.table().unwrap(), &before);
    assert_eq!(machine.score(), score_before);

    let kinds: Vec<&'static str> = events
        .try_iter()
        .map(|event| match event {
            EngineEvent::MoveCommitted(_) => "move",
            EngineEvent::CascadeCommitted(_) => "cascade",
            EngineEvent::MoveUndone(_) => "undo",
            EngineEvent::GameWon { .. } => "won",
            EngineEvent::GameLost => "lost",
        })
        .collect();
    assert_eq!(
        kinds,
        vec!["move", "cascade", "cascade", "cascade", "undo", "undo", "undo", "undo"]
    );
}

/// Redo brings back the move and its cascades as one unit, in commit order.
#[test]
fn test_redo_replays_cascades() {
    let rules = Forced {
        cascades: 2,
        ..Forced::default()
    };
    let (mut machine, events) = machine(rules, 6);
    let outcome = machine.request(MoveRequest::Draw).unwrap();
    let after = machine.table().unwrap().clone();
    let score_after = machine.score();

    machine.undo().unwrap();
    let _ = events.try_iter().count();

    let redone = machine.redo().unwrap();
    assert_eq!(redone.len(), 3);
    assert_eq!(redone[0], outcome.record);
    assert_eq!(&redone[1..], &outcome.cascades[..]);
    assert_eq!(machine.table().unwrap(), &after);
    assert_eq!(machine.score(), score_after);
    assert_eq!(machine.history().len(), 3);

    let kinds: Vec<bool> = events
        .try_iter()
        .map(|event| matches!(event, EngineEvent::CascadeCommitted(_)))
        .collect();
    assert_eq!(kinds, vec![false, true, true]);

    // Undo after redo takes the whole unit back again.
    assert_eq!(machine.undo().unwrap().len(), 3);
    assert_eq!(machine.moves(), 0);
}

/// A runaway cascade stops at the configured bound.
#[test]
fn test_cascade_bound() {
    let rules = Forced {
        cascades: u32::MAX,
        ..Forced::default()
    };
    let (machine, _events) = machine(rules, 4);
    let mut machine = machine.with_cascade_limit(5);

    let outcome = machine.request(MoveRequest::Draw).unwrap();
    assert_eq!(outcome.cascades.len(), 5);
    assert_eq!(machine.table().unwrap().counter(Counter::Streak), 5);
}

// =============================================================================
// Restart
// =============================================================================

/// Restart puts the freshly dealt table back and empties the history.
#[test]
fn test_restart() {
    let (mut machine, _events) = machine(Forced::default(), 5);
    let dealt = machine.table().unwrap().clone();
    for _ in 0..30 {
        machine.request(MoveRequest::Draw).unwrap();
    }
    assert_eq!(machine.moves(), 30);

    machine.restart().unwrap();
    assert_eq!(machine.table().unwrap(), &dealt);
    assert!(machine.history().is_empty());
    assert_eq!(machine.moves(), 0);
    assert_eq!(machine.phase(), Phase::Idle);
}
