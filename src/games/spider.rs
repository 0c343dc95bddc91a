//! Spider.
//!
//! Two packs restricted to 1, 2 or 4 suits. Ten columns dealt row by row
//! (6,6,6,6,5,5,5,5,5,5) with the top card face-up, 50-card stock. Build
//! down in any suit; only same-suit sequences move together; any card may
//! go to an empty column. Drawing deals one face-up card onto every column.
//! A completed King-to-Ace run in one suit is collected automatically.
//!
//! The deal is skewed by [`BiasedShuffle`]: easier settings place more
//! same-suit children directly on their parents.

use serde::{Deserialize, Serialize};

use crate::cards::{Card, DeckSpec, KING};
use crate::core::{DealConfig, EngineError, GameRng, IllegalMove, Variant};
use crate::deal::{BiasTable, BiasedShuffle, Deal, DealGenerator, Dealer, LayoutShape};
use crate::history::Transaction;
use crate::rules::{CascadeKind, MoveRequest, VariantRules};
use crate::scoring::ScoringConfig;
use crate::zones::{ContainerId, FoundationRule, PileKind, Placement, Table, TableauRule};

use super::common;

const COLUMNS: [usize; 10] = [6, 6, 6, 6, 5, 5, 5, 5, 5, 5];
const RUN: usize = KING as usize;

/// Spider options.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SpiderOptions {
    pub bias: BiasTable,
    pub scoring: ScoringConfig,
}

/// Spider rules and deal generator.
#[derive(Clone, Debug, Default)]
pub struct Spider {
    options: SpiderOptions,
}

impl Spider {
    #[must_use]
    pub fn new(options: SpiderOptions) -> Self {
        Self { options }
    }

    /// Column whose top thirteen cards form a complete face-up run.
    fn completed_column(table: &Table) -> Option<ContainerId> {
        table.tableau_ids().into_iter().find(|&id| {
            table.pile(id).is_some_and(|pile| {
                pile.len() >= RUN
                    && pile.movable_from(pile.len() - RUN)
                    && crate::zones::is_full_run(&pile.cards_from(pile.len() - RUN))
            })
        })
    }

    /// Does moving the unit at `from[index]` onto `to` only swap one
    /// equal-rank parent for another?
    fn is_equal_rank_relocation(table: &Table, from: ContainerId, index: usize, to: ContainerId) -> bool {
        let (Some(source), Some(target)) = (table.pile(from), table.pile(to)) else {
            return false;
        };
        let (Some(moving), Some(beneath), Some(target_top)) = (
            source.get(index),
            index.checked_sub(1).and_then(|i| source.get(i)),
            target.top(),
        ) else {
            return false;
        };
        if !beneath.face_up || beneath.card.rank != target_top.card.rank {
            return false;
        }
        // Still worth it if it joins a suit the current parent breaks.
        let joins_suit = target_top.card.suit == moving.card.suit && beneath.card.suit != moving.card.suit;
        !joins_suit
    }
}

impl DealGenerator for Spider {
    fn variant(&self) -> Variant {
        Variant::Spider
    }

    fn deck(&self, param: u8) -> DeckSpec {
        DeckSpec::double_with_suits(param).unwrap_or_else(DeckSpec::double)
    }

    fn shape(&self, _param: u8) -> LayoutShape {
        LayoutShape {
            columns: COLUMNS.to_vec(),
            stock: 50,
            foundations: Vec::new(),
        }
    }

    fn arrange(&self, config: &DealConfig, cards: &mut [Card], rng: &GameRng) {
        let tableau_len = COLUMNS.iter().sum();
        BiasedShuffle::new(&self.options.bias, config.param, config.difficulty)
            .with_layout(COLUMNS.len(), tableau_len)
            .apply(cards, &mut rng.for_context("bias"));
    }

    fn slice(&self, dealer: &mut Dealer, shape: &LayoutShape) -> Result<Vec<Vec<Card>>, EngineError> {
        dealer.raster(&shape.columns)
    }
}

impl VariantRules for Spider {
    fn variant(&self) -> Variant {
        Variant::Spider
    }

    fn build_table(&self, deal: &Deal) -> Result<Table, EngineError> {
        common::expect_columns(Variant::Spider, deal, &COLUMNS)?;

        let mut table = Table::new();
        let stock = table.add_pile(PileKind::Stock);
        let columns = table.add_piles(PileKind::Tableau(TableauRule::SPIDER), COLUMNS.len());
        table.add_piles(PileKind::Foundation(FoundationRule::FullRun), 8);

        common::seed_stock(&mut table, stock, &deal.stock);
        common::seed_columns(&mut table, &columns, &deal.tableau);
        Ok(table)
    }

    fn apply(&self, tx: &mut Transaction<'_>, request: MoveRequest) -> Result<(), IllegalMove> {
        let columns = tx.table().tableau_ids();
        match request {
            MoveRequest::Transfer { from, index, to } => {
                if !columns.contains(&from) || !columns.contains(&to) {
                    return Err(IllegalMove::Unsupported);
                }
                tx.transfer(from, index, to, Placement::Build)?;
                tx.reveal_top(from);
                Ok(())
            }
            MoveRequest::Draw => {
                let stock = tx.table().stock_id().ok_or(IllegalMove::Unsupported)?;
                if tx.table().pile_len(stock) == 0 {
                    return Err(IllegalMove::StockEmpty);
                }
                if let Some(&empty) = columns.iter().find(|&&id| tx.table().pile_len(id) == 0) {
                    return Err(IllegalMove::EmptyColumn(empty));
                }
                for &column in &columns {
                    if tx.table().pile_len(stock) == 0 {
                        break;
                    }
                    tx.transfer_top(stock, column, Placement::Supply, Some(true))?;
                }
                Ok(())
            }
            MoveRequest::Remove { .. } => Err(IllegalMove::Unsupported),
        }
    }

    fn next_cascade(&self, table: &Table) -> Option<CascadeKind> {
        Self::completed_column(table).map(|_| CascadeKind::CollectRun)
    }

    fn run_cascade(&self, tx: &mut Transaction<'_>, kind: CascadeKind) -> Result<(), IllegalMove> {
        if kind != CascadeKind::CollectRun {
            return Err(IllegalMove::Unsupported);
        }
        let column = Self::completed_column(tx.table()).ok_or(IllegalMove::Unsupported)?;
        let foundation = tx
            .table()
            .foundation_ids()
            .into_iter()
            .find(|&id| tx.table().pile_len(id) == 0)
            .ok_or(IllegalMove::Unsupported)?;

        let start = tx.table().pile_len(column) - RUN;
        tx.transfer(column, start, foundation, Placement::Supply)?;
        tx.reveal_top(column);
        tx.add_points(self.options.scoring.run_collected);
        tx.refresh_complete(foundation);
        Ok(())
    }

    fn is_won(&self, table: &Table) -> bool {
        common::all_complete(table, &table.foundation_ids())
    }

    fn candidate_moves(&self, table: &Table) -> Vec<MoveRequest> {
        let columns = table.tableau_ids();
        let mut moves = Vec::new();
        if table.stock_id().is_some_and(|stock| table.pile_len(stock) > 0) {
            moves.push(MoveRequest::Draw);
        }
        moves.extend(common::transfer_candidates(table, &columns, &columns));
        moves
    }

    /// Heuristic filter.
    ///
    /// Excludes moves to an empty column that expose nothing, unless they
    /// fill the last gap while the stock can still deal, and moves that
    /// only trade one face-up parent for another of the same rank. It is
    /// not a complete characterisation of dead positions.
    fn is_useful(&self, table: &Table, request: &MoveRequest) -> bool {
        match *request {
            MoveRequest::Draw => true,
            MoveRequest::Transfer { from, index, to } => {
                if table.pile_len(to) == 0 {
                    let Some(beneath) = index.checked_sub(1).and_then(|i| table.pile(from)?.get(i)) else {
                        return false;
                    };
                    let last_gap = table
                        .tableau_ids()
                        .into_iter()
                        .filter(|&id| table.pile_len(id) == 0)
                        .count()
                        == 1;
                    return !beneath.face_up || (last_gap && self.has_supply(table));
                }
                !Self::is_equal_rank_relocation(table, from, index, to)
            }
            MoveRequest::Remove { .. } => false,
        }
    }
}
