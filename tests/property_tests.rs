//! Property tests over generated deals and random play.
//!
//! Random play picks among the legal moves with proptest-chosen indices,
//! snapshotting table and score before every move, then unwinds with undo
//! and compares each intermediate state before redoing the whole game.

use proptest::prelude::*;

use rust_solitaire::core::{DealConfig, Difficulty, Variant};
use rust_solitaire::deal::{generate_deal, generator_for};
use rust_solitaire::games::{Klondike, MonteCarlo, Octagon, Pyramid, Spider, TriPeaks, Yukon};
use rust_solitaire::machine::{GameStateMachine, Phase};
use rust_solitaire::rules::VariantRules;
use rust_solitaire::scoring::ScoreSnapshot;
use rust_solitaire::zones::Table;

fn variant_strategy() -> impl Strategy<Value = Variant> {
    prop::sample::select(Variant::ALL.to_vec())
}

fn difficulty_strategy() -> impl Strategy<Value = Difficulty> {
    prop::sample::select(Difficulty::ALL.to_vec())
}

/// Play up to `picks.len()` legal moves, undo them one by one, then redo
/// them all.
fn play_and_unwind<R: VariantRules>(rules: R, variant: Variant, seed: u64, picks: &[usize]) -> Result<(), TestCaseError> {
    let mut machine = GameStateMachine::with_rules(rules);
    machine
        .start_with_deal(generate_deal(&DealConfig::new(variant, seed)).unwrap())
        .unwrap();
    let dealt = machine.table().unwrap().clone();
    let dealt_score = machine.score();

    let mut snapshots: Vec<(Table, ScoreSnapshot)> = Vec::new();
    for &pick in picks {
        if machine.phase() != Phase::Idle {
            break;
        }
        let moves = machine.legal_moves();
        if moves.is_empty() {
            break;
        }
        snapshots.push((machine.table().unwrap().clone(), machine.score()));
        let request = moves[pick % moves.len()];
        prop_assert!(machine.request(request).is_ok(), "legal move {:?} refused", request);
        assert_tableau_sound(machine.table().unwrap())?;
    }

    let played = machine.table().unwrap().clone();
    let played_score = machine.score();
    let played_moves = machine.moves();

    while let Some((table, score)) = snapshots.pop() {
        prop_assert!(machine.undo().is_some());
        prop_assert_eq!(machine.table().unwrap(), &table);
        prop_assert_eq!(machine.score(), score);
        assert_tableau_sound(machine.table().unwrap())?;
    }
    prop_assert!(machine.undo().is_none());
    prop_assert_eq!(machine.table().unwrap(), &dealt);
    prop_assert_eq!(machine.score(), dealt_score);
    prop_assert_eq!(machine.moves(), 0);

    while machine.redo().is_some() {}
    prop_assert_eq!(machine.table().unwrap(), &played);
    prop_assert_eq!(machine.score(), played_score);
    prop_assert_eq!(machine.moves(), played_moves);
    Ok(())
}

/// No face-up card rests on a face-down one.
fn assert_tableau_sound(table: &Table) -> Result<(), TestCaseError> {
    for id in table.tableau_ids() {
        let pile = table.pile(id).unwrap();
        let faces: Vec<bool> = pile.cards().iter().map(|p| p.face_up).collect();
        prop_assert!(
            faces.windows(2).all(|w| !w[0] || w[1]),
            "face-down card above a face-up one in {}",
            id
        );
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Every deal holds exactly its deck, for any seed and difficulty.
    #[test]
    fn prop_deal_is_exact_deck(variant in variant_strategy(), difficulty in difficulty_strategy(), seed in any::<u64>(), param_pick in 0usize..3) {
        let params = variant.accepted_params();
        let param = params[param_pick % params.len()];
        let config = DealConfig::new(variant, seed).with_param(param).with_difficulty(difficulty);
        let deal = generate_deal(&config).unwrap();
        let generator = generator_for(variant);
        prop_assert!(deal.verify(&generator.deck(param)).is_ok());
        prop_assert_eq!(deal.shape(), generator.shape(param));
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn prop_klondike_undo_restores(seed in any::<u64>(), picks in prop::collection::vec(any::<usize>(), 0..40)) {
        play_and_unwind(Klondike::default(), Variant::Klondike, seed, &picks)?;
    }

    #[test]
    fn prop_spider_undo_restores(seed in any::<u64>(), picks in prop::collection::vec(any::<usize>(), 0..40)) {
        play_and_unwind(Spider::default(), Variant::Spider, seed, &picks)?;
    }

    #[test]
    fn prop_yukon_undo_restores(seed in any::<u64>(), picks in prop::collection::vec(any::<usize>(), 0..40)) {
        play_and_unwind(Yukon::default(), Variant::Yukon, seed, &picks)?;
    }

    #[test]
    fn prop_pyramid_undo_restores(seed in any::<u64>(), picks in prop::collection::vec(any::<usize>(), 0..60)) {
        play_and_unwind(Pyramid::default(), Variant::Pyramid, seed, &picks)?;
    }

    #[test]
    fn prop_tripeaks_undo_restores(seed in any::<u64>(), picks in prop::collection::vec(any::<usize>(), 0..60)) {
        play_and_unwind(TriPeaks::default(), Variant::TriPeaks, seed, &picks)?;
    }

    #[test]
    fn prop_montecarlo_undo_restores(seed in any::<u64>(), picks in prop::collection::vec(any::<usize>(), 0..30)) {
        play_and_unwind(MonteCarlo::default(), Variant::MonteCarlo, seed, &picks)?;
    }

    #[test]
    fn prop_octagon_undo_restores(seed in any::<u64>(), picks in prop::collection::vec(any::<usize>(), 0..40)) {
        play_and_unwind(Octagon::default(), Variant::Octagon, seed, &picks)?;
    }
}
