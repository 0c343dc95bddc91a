//! Monte Carlo.
//!
//! A 5x5 board of face-up cards over a 27-card stock. Remove two
//! equal-rank cards that touch horizontally, vertically or diagonally.
//! After each removal the survivors close up in reading order and the
//! vacated cells at the end are refilled from the stock. The round is won
//! when board and stock are both empty.

use serde::{Deserialize, Serialize};

use crate::core::{EngineError, IllegalMove, Variant};
use crate::deal::{Deal, DealGenerator, LayoutShape};
use crate::history::Transaction;
use crate::rules::{CascadeKind, MoveRequest, VariantRules};
use crate::scoring::ScoringConfig;
use crate::zones::{ContainerId, FoundationRule, PileKind, Placement, Table};

use super::common;

const SIDE: usize = 5;
const ROWS: [usize; SIDE] = [SIDE; SIDE];
const CELLS: usize = SIDE * SIDE;

/// Monte Carlo options.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonteCarloOptions {
    pub scoring: ScoringConfig,
}

/// Monte Carlo rules and deal generator.
#[derive(Clone, Debug, Default)]
pub struct MonteCarlo {
    options: MonteCarloOptions,
}

/// Do two raster cells touch, diagonals included?
#[must_use]
pub fn touching(a: usize, b: usize) -> bool {
    let (ra, ca) = (a / SIDE, a % SIDE);
    let (rb, cb) = (b / SIDE, b % SIDE);
    a != b && ra.abs_diff(rb) <= 1 && ca.abs_diff(cb) <= 1
}

struct Layout {
    stock: ContainerId,
    discard: ContainerId,
    cells: Vec<ContainerId>,
}

impl Layout {
    fn of(table: &Table) -> Option<Self> {
        let cells = table.cell_ids();
        if cells.len() != CELLS {
            return None;
        }
        Some(Self {
            stock: table.stock_id()?,
            discard: *table.foundation_ids().first()?,
            cells,
        })
    }

    fn cell_index(&self, id: ContainerId) -> Option<usize> {
        self.cells.iter().position(|&cell| cell == id)
    }

    /// Is there a gap before an occupied cell, or a refillable gap?
    fn needs_settling(&self, table: &Table) -> bool {
        let occupied: Vec<bool> = self.cells.iter().map(|&id| table.pile_len(id) > 0).collect();
        let gap_before_card = occupied.windows(2).any(|pair| !pair[0] && pair[1]);
        let refillable = occupied.iter().any(|&o| !o) && table.pile_len(self.stock) > 0;
        gap_before_card || refillable
    }
}

impl MonteCarlo {
    #[must_use]
    pub fn new(options: MonteCarloOptions) -> Self {
        Self { options }
    }

    fn remove(&self, tx: &mut Transaction<'_>, layout: &Layout, first: ContainerId, second: ContainerId) -> Result<(), IllegalMove> {
        let mut picked = Vec::with_capacity(2);
        for id in [first, second] {
            let index = match layout.cell_index(id) {
                Some(index) => index,
                None if tx.table().contains(id) => return Err(IllegalMove::Unsupported),
                None => return Err(IllegalMove::UnknownContainer(id)),
            };
            let top = tx.table().top(id).ok_or(IllegalMove::NothingToMove(id))?;
            picked.push((index, top.card));
        }
        let ((a, card_a), (b, card_b)) = (picked[0], picked[1]);
        if !touching(a, b) || card_a.rank != card_b.rank {
            return Err(IllegalMove::NotAPair);
        }

        tx.transfer_top(first, layout.discard, Placement::Supply, None)?;
        tx.transfer_top(second, layout.discard, Placement::Supply, None)?;
        tx.add_points(self.options.scoring.pair_removed);
        Ok(())
    }

    /// Close the gaps in reading order, then refill the tail from the stock.
    fn compact_and_refill(tx: &mut Transaction<'_>, layout: &Layout) -> Result<(), IllegalMove> {
        let mut write = 0;
        for read in 0..layout.cells.len() {
            if tx.table().pile_len(layout.cells[read]) == 0 {
                continue;
            }
            if read != write {
                tx.transfer_top(layout.cells[read], layout.cells[write], Placement::Supply, None)?;
            }
            write += 1;
        }
        for &cell in &layout.cells[write..] {
            if tx.table().pile_len(layout.stock) == 0 {
                break;
            }
            tx.transfer_top(layout.stock, cell, Placement::Supply, Some(true))?;
        }
        Ok(())
    }
}

impl DealGenerator for MonteCarlo {
    fn variant(&self) -> Variant {
        Variant::MonteCarlo
    }

    fn shape(&self, _param: u8) -> LayoutShape {
        LayoutShape {
            columns: ROWS.to_vec(),
            stock: 27,
            foundations: Vec::new(),
        }
    }

    fn face_up(&self, _column: usize, _row: usize, _len: usize) -> bool {
        true
    }
}

impl VariantRules for MonteCarlo {
    fn variant(&self) -> Variant {
        Variant::MonteCarlo
    }

    fn build_table(&self, deal: &Deal) -> Result<Table, EngineError> {
        common::expect_columns(Variant::MonteCarlo, deal, &ROWS)?;

        let mut table = Table::new();
        let stock = table.add_pile(PileKind::Stock);
        table.add_pile(PileKind::Foundation(FoundationRule::Discard));
        let cells = table.add_piles(PileKind::Cell, CELLS);

        common::seed_stock(&mut table, stock, &deal.stock);
        common::seed_cells(&mut table, &cells, &deal.tableau);
        Ok(table)
    }

    fn apply(&self, tx: &mut Transaction<'_>, request: MoveRequest) -> Result<(), IllegalMove> {
        let layout = Layout::of(tx.table()).ok_or(IllegalMove::Unsupported)?;
        match request {
            MoveRequest::Remove {
                first,
                second: Some(second),
            } => self.remove(tx, &layout, first, second),
            MoveRequest::Remove { second: None, .. } => Err(IllegalMove::NotAPair),
            MoveRequest::Transfer { .. } | MoveRequest::Draw => Err(IllegalMove::Unsupported),
        }
    }

    fn next_cascade(&self, table: &Table) -> Option<CascadeKind> {
        Layout::of(table)?
            .needs_settling(table)
            .then_some(CascadeKind::CompactAndRefill)
    }

    fn run_cascade(&self, tx: &mut Transaction<'_>, kind: CascadeKind) -> Result<(), IllegalMove> {
        if kind != CascadeKind::CompactAndRefill {
            return Err(IllegalMove::Unsupported);
        }
        let layout = Layout::of(tx.table()).ok_or(IllegalMove::Unsupported)?;
        Self::compact_and_refill(tx, &layout)
    }

    fn is_won(&self, table: &Table) -> bool {
        Layout::of(table).is_some_and(|layout| {
            table.all_empty(&layout.cells) && table.pile_len(layout.stock) == 0
        })
    }

    fn candidate_moves(&self, table: &Table) -> Vec<MoveRequest> {
        let Some(layout) = Layout::of(table) else {
            return Vec::new();
        };
        let occupied: Vec<(usize, ContainerId, u8)> = layout
            .cells
            .iter()
            .enumerate()
            .filter_map(|(index, &id)| table.top(id).map(|top| (index, id, top.card.rank)))
            .collect();

        let mut moves = Vec::new();
        for (i, &(a, id_a, rank_a)) in occupied.iter().enumerate() {
            for &(b, id_b, rank_b) in &occupied[i + 1..] {
                if rank_a == rank_b && touching(a, b) {
                    moves.push(MoveRequest::pair(id_a, id_b));
                }
            }
        }
        moves
    }

    /// The stock only refills the board after a pair is taken.
    fn has_supply(&self, _table: &Table) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{Card, Suit};
    use crate::core::DealConfig;
    use crate::history::{RecordOrigin, Step};
    use crate::rules::GameResult;
    use crate::zones::PlacedCard;
    use crate::scoring::ScoreBoard;

    fn setup(seed: u64) -> (MonteCarlo, Deal) {
        let montecarlo = MonteCarlo::default();
        let deal = montecarlo.generate(&DealConfig::new(Variant::MonteCarlo, seed)).unwrap();
        (montecarlo, deal)
    }

    #[test]
    fn test_touching() {
        assert!(touching(0, 1));
        assert!(touching(0, 6));
        assert!(touching(12, 18));
        assert!(!touching(4, 5));
        assert!(!touching(0, 2));
        assert!(!touching(7, 7));
    }

    #[test]
    fn test_pair_rules() {
        let (montecarlo, mut deal) = setup(21);
        common::place_card(&mut deal, Card::new(Suit::Hearts, 5), 0, 0);
        common::place_card(&mut deal, Card::new(Suit::Clubs, 5), 1, 1);
        common::place_card(&mut deal, Card::new(Suit::Spades, 5), 0, 2);
        let table = montecarlo.build_table(&deal).unwrap();
        let cells = table.cell_ids();

        assert!(montecarlo.is_legal(&table, MoveRequest::pair(cells[0], cells[6])));
        assert!(!montecarlo.is_legal(&table, MoveRequest::pair(cells[0], cells[2])));
        assert!(!montecarlo.is_legal(&table, MoveRequest::single(cells[0])));
        assert!(montecarlo.candidate_moves(&table).contains(&MoveRequest::pair(cells[0], cells[6])));
    }

    #[test]
    fn test_compaction_precedes_refill() {
        let (montecarlo, mut deal) = setup(22);
        common::place_card(&mut deal, Card::new(Suit::Hearts, 9), 2, 2);
        common::place_card(&mut deal, Card::new(Suit::Diamonds, 9), 2, 3);
        let mut table = montecarlo.build_table(&deal).unwrap();
        let cells = table.cell_ids();
        let stock = table.stock_id().unwrap();
        let survivors: Vec<Card> = cells
            .iter()
            .enumerate()
            .filter(|&(i, _)| i != 12 && i != 13)
            .map(|(_, &id)| table.top(id).unwrap().card)
            .collect();

        let mut scorer = ScoreBoard::default();
        let request = MoveRequest::pair(cells[12], cells[13]);
        let mut tx = Transaction::new(&mut table, &mut scorer, RecordOrigin::Player(request));
        montecarlo.apply(&mut tx, request).unwrap();
        let _ = tx.commit();

        assert_eq!(montecarlo.next_cascade(&table), Some(CascadeKind::CompactAndRefill));
        let mut tx = Transaction::new(&mut table, &mut scorer, RecordOrigin::Cascade(CascadeKind::CompactAndRefill));
        montecarlo.run_cascade(&mut tx, CascadeKind::CompactAndRefill).unwrap();
        let record = tx.commit();

        let moved: Vec<Card> = cells[..23].iter().map(|&id| table.top(id).unwrap().card).collect();
        assert_eq!(moved, survivors);
        assert_eq!(table.pile_len(stock), 25);
        assert!(table.top(cells[24]).unwrap().face_up);

        // Every compaction step comes before the first stock refill.
        let from_stock: Vec<bool> = record
            .steps
            .iter()
            .filter_map(|step| match step {
                Step::Transfer(sub) => Some(sub.source == stock),
                _ => None,
            })
            .collect();
        let first_refill = from_stock.iter().position(|&s| s).unwrap();
        assert_eq!(first_refill, 23 - 12);
        assert!(from_stock[first_refill..].iter().all(|&s| s));
        assert!(montecarlo.next_cascade(&table).is_none());
    }

    #[test]
    fn test_no_pairs_is_lost_despite_stock() {
        // Equal ranks sit thirteen cells apart, never touching.
        let montecarlo = MonteCarlo::default();
        let mut table = Table::new();
        let stock = table.add_pile(PileKind::Stock);
        table.add_pile(PileKind::Foundation(FoundationRule::Discard));
        let cells = table.add_piles(PileKind::Cell, CELLS);
        for (index, &cell) in cells.iter().enumerate() {
            let rank = u8::try_from(index % 13).unwrap() + 1;
            table.seed(cell, [PlacedCard::new(Card::new(Suit::Hearts, rank), true)]);
        }
        table.seed(stock, [PlacedCard::new(Card::new(Suit::Clubs, 5), false)]);

        assert!(montecarlo.candidate_moves(&table).is_empty());
        assert!(!montecarlo.has_supply(&table));
        assert_eq!(montecarlo.check(&table), Some(GameResult::Lost));
    }
}
