//! Klondike.
//!
//! Seven columns of 1..7 cards, top card face-up, 24-card stock. Build
//! down in alternating colours, Kings to empty columns, suits up on four
//! foundations. Draw one or three; the waste may be recycled (unlimited by
//! default), each recycle costing a penalty.

use serde::{Deserialize, Serialize};

use crate::core::{DealConfig, EngineError, IllegalMove, Variant};
use crate::deal::{Deal, DealGenerator, LayoutShape};
use crate::history::Transaction;
use crate::rules::{MoveRequest, VariantRules};
use crate::scoring::ScoringConfig;
use crate::zones::{ContainerId, FoundationRule, PileKind, Placement, Table, TableauRule, WasteRule};

use super::common;

const COLUMNS: [usize; 7] = [1, 2, 3, 4, 5, 6, 7];

/// Klondike options.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KlondikeOptions {
    /// Cards turned per draw (1 or 3).
    pub draw_count: u8,
    /// Recycles allowed per round; `None` is unlimited.
    pub recycle_limit: Option<u32>,
    pub scoring: ScoringConfig,
}

impl Default for KlondikeOptions {
    fn default() -> Self {
        Self {
            draw_count: 1,
            recycle_limit: None,
            scoring: ScoringConfig::default(),
        }
    }
}

impl KlondikeOptions {
    #[must_use]
    pub fn with_draw_count(mut self, draw_count: u8) -> Self {
        self.draw_count = draw_count;
        self
    }

    #[must_use]
    pub fn with_recycle_limit(mut self, limit: Option<u32>) -> Self {
        self.recycle_limit = limit;
        self
    }
}

/// Klondike rules and deal generator.
#[derive(Clone, Debug, Default)]
pub struct Klondike {
    options: KlondikeOptions,
}

/// Container ids of a Klondike table, in creation order.
struct Layout {
    stock: ContainerId,
    waste: ContainerId,
    foundations: Vec<ContainerId>,
    columns: Vec<ContainerId>,
}

impl Layout {
    fn of(table: &Table) -> Option<Self> {
        Some(Self {
            stock: table.stock_id()?,
            waste: table.waste_id()?,
            foundations: table.foundation_ids(),
            columns: table.tableau_ids(),
        })
    }
}

impl Klondike {
    #[must_use]
    pub fn new(options: KlondikeOptions) -> Self {
        Self { options }
    }

    #[must_use]
    pub fn options(&self) -> &KlondikeOptions {
        &self.options
    }

    fn transfer(&self, tx: &mut Transaction<'_>, from: ContainerId, index: usize, to: ContainerId) -> Result<(), IllegalMove> {
        let table = tx.table();
        let from_kind = table.pile(from).ok_or(IllegalMove::UnknownContainer(from))?.kind();
        let to_kind = table.pile(to).ok_or(IllegalMove::UnknownContainer(to))?.kind();
        if matches!(from_kind, PileKind::Stock) || matches!(to_kind, PileKind::Stock | PileKind::Waste(_)) {
            return Err(IllegalMove::Unsupported);
        }

        tx.transfer(from, index, to, Placement::Build)?;

        let scoring = &self.options.scoring;
        match (from_kind, to_kind) {
            (PileKind::Foundation(_), PileKind::Tableau(_)) => tx.add_points(scoring.foundation_to_tableau),
            (_, PileKind::Foundation(_)) => tx.add_points(scoring.to_foundation),
            (PileKind::Waste(_), PileKind::Tableau(_)) => tx.add_points(scoring.waste_to_tableau),
            _ => {}
        }
        if matches!(from_kind, PileKind::Tableau(_)) && tx.reveal_top(from).is_some() {
            tx.add_points(scoring.reveal);
        }
        for id in [from, to] {
            if matches!(tx.table().pile(id).map(|p| p.kind()), Some(PileKind::Foundation(_))) {
                tx.refresh_complete(id);
            }
        }
        Ok(())
    }
}

impl DealGenerator for Klondike {
    fn variant(&self) -> Variant {
        Variant::Klondike
    }

    fn shape(&self, _param: u8) -> LayoutShape {
        LayoutShape {
            columns: COLUMNS.to_vec(),
            stock: 24,
            foundations: Vec::new(),
        }
    }
}

impl VariantRules for Klondike {
    fn variant(&self) -> Variant {
        Variant::Klondike
    }

    fn configure(&mut self, config: &DealConfig) {
        if Variant::Klondike.accepted_params().contains(&config.param) {
            self.options.draw_count = config.param;
        }
    }

    fn build_table(&self, deal: &Deal) -> Result<Table, EngineError> {
        common::expect_columns(Variant::Klondike, deal, &COLUMNS)?;

        let mut table = Table::new();
        let stock = table.add_pile(PileKind::Stock);
        table.add_pile(PileKind::Waste(WasteRule::Closed));
        table.add_piles(PileKind::Foundation(FoundationRule::SuitUp), 4);
        let columns = table.add_piles(PileKind::Tableau(TableauRule::KLONDIKE), COLUMNS.len());

        common::seed_stock(&mut table, stock, &deal.stock);
        common::seed_columns(&mut table, &columns, &deal.tableau);
        Ok(table)
    }

    fn apply(&self, tx: &mut Transaction<'_>, request: MoveRequest) -> Result<(), IllegalMove> {
        let layout = Layout::of(tx.table()).ok_or(IllegalMove::Unsupported)?;
        match request {
            MoveRequest::Transfer { from, index, to } => self.transfer(tx, from, index, to),
            MoveRequest::Draw => {
                if tx.table().pile_len(layout.stock) > 0 {
                    common::draw(tx, layout.stock, layout.waste, usize::from(self.options.draw_count))?;
                } else {
                    common::recycle(tx, layout.stock, layout.waste, self.options.recycle_limit)?;
                    tx.apply_penalty();
                }
                Ok(())
            }
            MoveRequest::Remove { .. } => Err(IllegalMove::Unsupported),
        }
    }

    fn is_won(&self, table: &Table) -> bool {
        common::all_complete(table, &table.foundation_ids())
    }

    fn candidate_moves(&self, table: &Table) -> Vec<MoveRequest> {
        let Some(layout) = Layout::of(table) else {
            return Vec::new();
        };
        let mut moves = Vec::new();
        if table.pile_len(layout.stock) > 0 || table.pile_len(layout.waste) > 0 {
            moves.push(MoveRequest::Draw);
        }

        let mut sources = vec![layout.waste];
        sources.extend(&layout.columns);
        sources.extend(&layout.foundations);
        let mut targets = layout.foundations.clone();
        targets.extend(&layout.columns);
        moves.extend(common::transfer_candidates(table, &sources, &targets));
        moves
    }

    fn is_useful(&self, table: &Table, request: &MoveRequest) -> bool {
        let Some(layout) = Layout::of(table) else {
            return false;
        };
        let mut targets = layout.foundations.clone();
        targets.extend(&layout.columns);

        match *request {
            MoveRequest::Draw => {
                // Worth drawing only if some card still reachable through
                // the stock could be played somewhere now.
                let stock = table.pile(layout.stock).map(|p| p.cards().clone()).unwrap_or_default();
                let mut reachable: Vec<_> = stock.iter().map(|p| p.card).collect();
                if common::can_recycle(table, self.options.recycle_limit) {
                    if let Some(waste) = table.pile(layout.waste) {
                        reachable.extend(waste.cards().iter().rev().skip(1).map(|p| p.card));
                    }
                }
                common::any_playable(table, reachable, &targets)
            }
            MoveRequest::Transfer { from, index, to } => {
                let Some(source) = table.pile(from) else {
                    return false;
                };
                let to_tableau = layout.columns.contains(&to);
                match source.kind() {
                    PileKind::Foundation(_) => false,
                    PileKind::Tableau(_) if to_tableau => {
                        let Some(beneath) = index.checked_sub(1).and_then(|i| source.get(i)) else {
                            // Whole column relocation: a King hopping between
                            // empty columns goes nowhere.
                            return false;
                        };
                        !beneath.face_up || common::any_playable(table, [beneath.card], &layout.foundations)
                    }
                    _ => true,
                }
            }
            MoveRequest::Remove { .. } => false,
        }
    }

    fn has_supply(&self, table: &Table) -> bool {
        Layout::of(table)
            .is_some_and(|layout| common::supply_left(table, layout.stock, layout.waste, self.options.recycle_limit))
    }
}
