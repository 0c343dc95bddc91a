//! Yukon.
//!
//! Seven columns and no stock: column 0 is a single face-up card, column
//! `i` holds `i` face-down cards under five face-up ones. Any face-up card
//! moves together with everything above it onto a card one rank higher of
//! the other colour; Kings go to empty columns.

use serde::{Deserialize, Serialize};

use crate::core::{EngineError, IllegalMove, Variant};
use crate::deal::{Deal, DealGenerator, LayoutShape};
use crate::history::Transaction;
use crate::rules::{MoveRequest, VariantRules};
use crate::scoring::ScoringConfig;
use crate::zones::{FoundationRule, PileKind, Placement, Table, TableauRule};

use super::common;

const COLUMNS: [usize; 7] = [1, 6, 7, 8, 9, 10, 11];
const FACE_UP_TAIL: usize = 5;

/// Yukon options.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct YukonOptions {
    pub scoring: ScoringConfig,
}

/// Yukon rules and deal generator.
#[derive(Clone, Debug, Default)]
pub struct Yukon {
    options: YukonOptions,
}

impl Yukon {
    #[must_use]
    pub fn new(options: YukonOptions) -> Self {
        Self { options }
    }
}

impl DealGenerator for Yukon {
    fn variant(&self) -> Variant {
        Variant::Yukon
    }

    fn shape(&self, _param: u8) -> LayoutShape {
        LayoutShape {
            columns: COLUMNS.to_vec(),
            stock: 0,
            foundations: Vec::new(),
        }
    }

    fn face_up(&self, column: usize, row: usize, len: usize) -> bool {
        column == 0 || row + FACE_UP_TAIL >= len
    }
}

impl VariantRules for Yukon {
    fn variant(&self) -> Variant {
        Variant::Yukon
    }

    fn build_table(&self, deal: &Deal) -> Result<Table, EngineError> {
        common::expect_columns(Variant::Yukon, deal, &COLUMNS)?;
        if !deal.stock.is_empty() {
            return Err(EngineError::LayoutMismatch {
                variant: Variant::Yukon,
                detail: format!("stock must be empty, found {} cards", deal.stock.len()),
            });
        }

        let mut table = Table::new();
        table.add_piles(PileKind::Foundation(FoundationRule::SuitUp), 4);
        let columns = table.add_piles(PileKind::Tableau(TableauRule::YUKON), COLUMNS.len());
        common::seed_columns(&mut table, &columns, &deal.tableau);
        Ok(table)
    }

    fn apply(&self, tx: &mut Transaction<'_>, request: MoveRequest) -> Result<(), IllegalMove> {
        let MoveRequest::Transfer { from, index, to } = request else {
            return Err(IllegalMove::Unsupported);
        };
        let from_kind = tx.table().pile(from).ok_or(IllegalMove::UnknownContainer(from))?.kind();
        let to_kind = tx.table().pile(to).ok_or(IllegalMove::UnknownContainer(to))?.kind();

        tx.transfer(from, index, to, Placement::Build)?;

        let scoring = &self.options.scoring;
        match (from_kind, to_kind) {
            (PileKind::Foundation(_), PileKind::Tableau(_)) => tx.add_points(scoring.foundation_to_tableau),
            (_, PileKind::Foundation(_)) => {
                tx.add_points(scoring.to_foundation);
                tx.refresh_complete(to);
            }
            _ => {}
        }
        if matches!(from_kind, PileKind::Foundation(_)) {
            tx.refresh_complete(from);
        }
        if matches!(from_kind, PileKind::Tableau(_)) && tx.reveal_top(from).is_some() {
            tx.add_points(scoring.reveal);
        }
        Ok(())
    }

    fn is_won(&self, table: &Table) -> bool {
        common::all_complete(table, &table.foundation_ids())
    }

    fn candidate_moves(&self, table: &Table) -> Vec<MoveRequest> {
        let columns = table.tableau_ids();
        let foundations = table.foundation_ids();
        let mut sources = columns.clone();
        sources.extend(&foundations);
        let mut targets = foundations;
        targets.extend(&columns);
        common::transfer_candidates(table, &sources, &targets)
    }

    /// Cards only move forward: off a foundation never counts, and a unit
    /// already resting on a valid parent gains nothing by switching to
    /// another one unless that exposes or frees something.
    fn is_useful(&self, table: &Table, request: &MoveRequest) -> bool {
        let MoveRequest::Transfer { from, index, to } = *request else {
            return false;
        };
        let Some(source) = table.pile(from) else {
            return false;
        };
        match source.kind() {
            PileKind::Foundation(_) => false,
            PileKind::Tableau(rule) if table.tableau_ids().contains(&to) => {
                let (Some(moving), Some(beneath)) = (
                    source.get(index),
                    index.checked_sub(1).and_then(|i| source.get(i)),
                ) else {
                    return false;
                };
                !beneath.face_up
                    || !rule.build.allows(beneath.card, moving.card)
                    || common::any_playable(table, [beneath.card], &table.foundation_ids())
            }
            _ => true,
        }
    }
}
