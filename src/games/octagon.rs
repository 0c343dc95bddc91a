//! Octagon.
//!
//! Two decks. The eight Aces start on the foundations (Spades, Hearts,
//! Diamonds, Clubs, twice over); the remaining 96 cards form eight columns
//! of five, top card face-up, over a 56-card stock. Build down in suit,
//! any card or same-suit run to an empty column. The stock turns one card
//! at a time and may be recycled once.

use serde::{Deserialize, Serialize};

use crate::cards::{Card, CardInstance, DeckSpec, Suit, ACE};
use crate::core::{EngineError, IllegalMove, Variant};
use crate::deal::{Deal, DealGenerator, LayoutShape};
use crate::history::Transaction;
use crate::rules::{MoveRequest, VariantRules};
use crate::scoring::ScoringConfig;
use crate::zones::{ContainerId, FoundationRule, PileKind, Placement, PlacedCard, Table, TableauRule, WasteRule};

use super::common;

const COLUMNS: [usize; 8] = [5; 8];
const FOUNDATIONS: usize = 8;

/// Octagon options.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OctagonOptions {
    pub recycle_limit: u32,
    pub scoring: ScoringConfig,
}

impl Default for OctagonOptions {
    fn default() -> Self {
        Self {
            recycle_limit: 1,
            scoring: ScoringConfig::default(),
        }
    }
}

/// Octagon rules and deal generator.
#[derive(Clone, Debug, Default)]
pub struct Octagon {
    options: OctagonOptions,
}

/// Suit of each foundation, in table order.
#[must_use]
pub fn foundation_suits() -> impl Iterator<Item = Suit> {
    Suit::ALL.into_iter().cycle().take(FOUNDATIONS)
}

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

impl Octagon {
    #[must_use]
    pub fn new(options: OctagonOptions) -> Self {
        Self { options }
    }

    fn transfer(&self, tx: &mut Transaction<'_>, from: ContainerId, index: usize, to: ContainerId) -> Result<(), IllegalMove> {
        let from_kind = tx.table().pile(from).ok_or(IllegalMove::UnknownContainer(from))?.kind();
        let to_kind = tx.table().pile(to).ok_or(IllegalMove::UnknownContainer(to))?.kind();
        if matches!(from_kind, PileKind::Stock) || matches!(to_kind, PileKind::Stock | PileKind::Waste(_)) {
            return Err(IllegalMove::Unsupported);
        }

        tx.transfer(from, index, to, Placement::Build)?;

        let scoring = &self.options.scoring;
        match (from_kind, to_kind) {
            (PileKind::Foundation(_), _) => {
                tx.add_points(scoring.foundation_to_tableau);
                tx.refresh_complete(from);
            }
            (_, PileKind::Foundation(_)) => {
                tx.add_points(scoring.to_foundation);
                tx.refresh_complete(to);
            }
            (PileKind::Waste(_), _) => tx.add_points(scoring.waste_to_tableau),
            _ => {}
        }
        if matches!(from_kind, PileKind::Tableau(_)) && tx.reveal_top(from).is_some() {
            tx.add_points(scoring.reveal);
        }
        Ok(())
    }
}

impl DealGenerator for Octagon {
    fn variant(&self) -> Variant {
        Variant::Octagon
    }

    fn deck(&self, _param: u8) -> DeckSpec {
        DeckSpec::double()
    }

    fn shape(&self, _param: u8) -> LayoutShape {
        LayoutShape {
            columns: COLUMNS.to_vec(),
            stock: 56,
            foundations: vec![1; FOUNDATIONS],
        }
    }

    /// Strip one Ace per foundation, in foundation suit order.
    fn pre_place(&self, cards: &mut Vec<Card>) -> Vec<Vec<CardInstance>> {
        foundation_suits()
            .filter_map(|suit| {
                let ace = Card::new(suit, ACE);
                let position = cards.iter().position(|&card| card == ace)?;
                Some(vec![CardInstance::face_up(cards.remove(position))])
            })
            .collect()
    }
}

impl VariantRules for Octagon {
    fn variant(&self) -> Variant {
        Variant::Octagon
    }

    fn build_table(&self, deal: &Deal) -> Result<Table, EngineError> {
        common::expect_columns(Variant::Octagon, deal, &COLUMNS)?;
        let aces_in_order = deal.foundations.len() == FOUNDATIONS
            && deal
                .foundations
                .iter()
                .zip(foundation_suits())
                .all(|(pile, suit)| matches!(pile.as_slice(), [only] if only.card == Card::new(suit, ACE)));
        if !aces_in_order {
            return Err(EngineError::LayoutMismatch {
                variant: Variant::Octagon,
                detail: "foundations must start with one Ace each in suit order".to_owned(),
            });
        }

        let mut table = Table::new();
        let stock = table.add_pile(PileKind::Stock);
        table.add_pile(PileKind::Waste(WasteRule::Closed));
        let foundations = table.add_piles(PileKind::Foundation(FoundationRule::SuitUp), FOUNDATIONS);
        let columns = table.add_piles(PileKind::Tableau(TableauRule::OCTAGON), COLUMNS.len());

        common::seed_stock(&mut table, stock, &deal.stock);
        for (&id, pile) in foundations.iter().zip(&deal.foundations) {
            table.seed(id, pile.iter().map(|ace| PlacedCard::new(ace.card, true)));
        }
        common::seed_columns(&mut table, &columns, &deal.tableau);
        Ok(table)
    }

    fn apply(&self, tx: &mut Transaction<'_>, request: MoveRequest) -> Result<(), IllegalMove> {
        let layout = Layout::of(tx.table()).ok_or(IllegalMove::Unsupported)?;
        match request {
            MoveRequest::Transfer { from, index, to } => self.transfer(tx, from, index, to),
            MoveRequest::Draw => {
                if tx.table().pile_len(layout.stock) > 0 {
                    common::draw(tx, layout.stock, layout.waste, 1)?;
                } else {
                    common::recycle(tx, layout.stock, layout.waste, Some(self.options.recycle_limit))?;
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

    /// Drawing counts while the stock or a permitted recycle remains.
    /// Foundation cards never come back usefully, and a column-to-column
    /// move must expose a hidden card, a foundation play, or split a run
    /// onto a new parent.
    fn is_useful(&self, table: &Table, request: &MoveRequest) -> bool {
        let Some(layout) = Layout::of(table) else {
            return false;
        };
        match *request {
            MoveRequest::Draw => self.has_supply(table),
            MoveRequest::Transfer { from, index, to } => {
                let Some(source) = table.pile(from) else {
                    return false;
                };
                match source.kind() {
                    PileKind::Foundation(_) => false,
                    PileKind::Tableau(rule) if layout.columns.contains(&to) => {
                        let (Some(moving), Some(beneath)) = (
                            source.get(index),
                            index.checked_sub(1).and_then(|i| source.get(i)),
                        ) else {
                            return false;
                        };
                        !beneath.face_up
                            || !rule.build.allows(beneath.card, moving.card)
                            || common::any_playable(table, [beneath.card], &layout.foundations)
                    }
                    _ => true,
                }
            }
            MoveRequest::Remove { .. } => false,
        }
    }

    fn has_supply(&self, table: &Table) -> bool {
        Layout::of(table).is_some_and(|layout| {
            common::supply_left(table, layout.stock, layout.waste, Some(self.options.recycle_limit))
        })
    }
}
