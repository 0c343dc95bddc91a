//! TriPeaks.
//!
//! Three overlapping peaks of 28 cells in rows of 3, 6, 9 and 10. Only the
//! bottom row starts face-up; a card turns up once both cards covering it
//! are gone. Play an uncovered card onto the waste when it is one rank
//! above or below the waste top (King and Ace connect). Consecutive plays
//! build a streak worth increasing points; drawing from the stock breaks
//! it. There is no recycle.

use serde::{Deserialize, Serialize};

use crate::core::{EngineError, IllegalMove, Variant};
use crate::deal::{Deal, DealGenerator, LayoutShape};
use crate::history::Transaction;
use crate::rules::{CascadeKind, MoveRequest, VariantRules};
use crate::scoring::ScoringConfig;
use crate::zones::{ContainerId, Counter, Flag, PileKind, Placement, PlacedCard, Table, WasteRule};

use super::common;

/// Cards per board row, top row first.
pub const ROWS: [usize; 4] = [3, 6, 9, 10];
const CELLS: usize = 28;
const PEAKS: u8 = 3;
const ROW_STARTS: [usize; 4] = [0, 3, 9, 18];

/// TriPeaks options.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriPeaksOptions {
    pub scoring: ScoringConfig,
}

/// TriPeaks rules and deal generator.
#[derive(Clone, Debug, Default)]
pub struct TriPeaks {
    options: TriPeaksOptions,
}

/// The two cells covering cell `index`, if it is not on the bottom row.
#[must_use]
pub fn children(index: usize) -> Option<[usize; 2]> {
    let row = ROW_STARTS.iter().rposition(|&start| start <= index)?;
    let i = index - ROW_STARTS[row];
    let next = *ROW_STARTS.get(row + 1)?;
    let first = match row {
        0 => 2 * i,
        1 => i + i / 2,
        _ => i,
    };
    Some([next + first, next + first + 1])
}

/// The cells resting on cell `index`.
#[must_use]
pub fn parents(index: usize) -> Vec<usize> {
    (0..ROW_STARTS[3])
        .filter(|&cell| children(cell).is_some_and(|kids| kids.contains(&index)))
        .collect()
}

/// Cells belonging to peak `peak` above the shared bottom row.
fn peak_cells(peak: usize) -> [usize; 6] {
    [
        peak,
        ROW_STARTS[1] + 2 * peak,
        ROW_STARTS[1] + 2 * peak + 1,
        ROW_STARTS[2] + 3 * peak,
        ROW_STARTS[2] + 3 * peak + 1,
        ROW_STARTS[2] + 3 * peak + 2,
    ]
}

struct Layout {
    stock: ContainerId,
    waste: ContainerId,
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
            waste: table.waste_id()?,
            cells,
        })
    }
}

impl TriPeaks {
    #[must_use]
    pub fn new(options: TriPeaksOptions) -> Self {
        Self { options }
    }

    fn play(&self, tx: &mut Transaction<'_>, layout: &Layout, from: ContainerId, index: usize) -> Result<(), IllegalMove> {
        let Some(cell) = layout.cells.iter().position(|&id| id == from) else {
            return Err(IllegalMove::Unsupported);
        };
        tx.transfer(from, index, layout.waste, Placement::Build)?;

        for parent in parents(cell) {
            let uncovered = children(parent)
                .is_some_and(|kids| kids.iter().all(|&kid| tx.table().pile_len(layout.cells[kid]) == 0));
            if uncovered {
                tx.flip(layout.cells[parent], 0, true);
            }
        }

        let streak = tx.table().counter(Counter::Streak) + 1;
        tx.set_counter(Counter::Streak, streak);
        tx.add_points(self.options.scoring.pair_removed * i64::from(streak));
        Ok(())
    }

    /// Peaks that are empty but not yet rewarded.
    fn unrewarded_peaks(table: &Table, layout: &Layout) -> Vec<u8> {
        (0..PEAKS)
            .filter(|&peak| {
                let ids: Vec<ContainerId> = peak_cells(usize::from(peak))
                    .iter()
                    .map(|&cell| layout.cells[cell])
                    .collect();
                table.all_empty(&ids) && !table.flag(Flag::RowCleared(peak))
            })
            .collect()
    }
}

impl DealGenerator for TriPeaks {
    fn variant(&self) -> Variant {
        Variant::TriPeaks
    }

    fn shape(&self, _param: u8) -> LayoutShape {
        LayoutShape {
            columns: ROWS.to_vec(),
            stock: 24,
            foundations: Vec::new(),
        }
    }

    /// Only the bottom board row starts face-up.
    fn face_up(&self, column: usize, _row: usize, _len: usize) -> bool {
        column + 1 == ROWS.len()
    }
}

impl VariantRules for TriPeaks {
    fn variant(&self) -> Variant {
        Variant::TriPeaks
    }

    /// The top stock card starts face-up on the waste.
    fn build_table(&self, deal: &Deal) -> Result<Table, EngineError> {
        common::expect_columns(Variant::TriPeaks, deal, &ROWS)?;

        let mut table = Table::new();
        let stock = table.add_pile(PileKind::Stock);
        let waste = table.add_pile(PileKind::Waste(WasteRule::AdjacentRank { wrap: true }));
        let cells = table.add_piles(PileKind::Cell, CELLS);

        let (top, rest) = deal.stock.split_last().ok_or_else(|| EngineError::LayoutMismatch {
            variant: Variant::TriPeaks,
            detail: "stock is empty".to_owned(),
        })?;
        common::seed_stock(&mut table, stock, rest);
        table.seed(waste, [PlacedCard::new(top.card, true)]);
        common::seed_cells(&mut table, &cells, &deal.tableau);
        Ok(table)
    }

    fn apply(&self, tx: &mut Transaction<'_>, request: MoveRequest) -> Result<(), IllegalMove> {
        let layout = Layout::of(tx.table()).ok_or(IllegalMove::Unsupported)?;
        match request {
            MoveRequest::Transfer { from, index, to } => {
                if to != layout.waste {
                    return Err(IllegalMove::Rejected(to));
                }
                self.play(tx, &layout, from, index)
            }
            MoveRequest::Draw => {
                common::draw(tx, layout.stock, layout.waste, 1)?;
                tx.set_counter(Counter::Streak, 0);
                Ok(())
            }
            MoveRequest::Remove { .. } => Err(IllegalMove::Unsupported),
        }
    }

    fn next_cascade(&self, table: &Table) -> Option<CascadeKind> {
        let layout = Layout::of(table)?;
        (!Self::unrewarded_peaks(table, &layout).is_empty()).then_some(CascadeKind::RowClear)
    }

    fn run_cascade(&self, tx: &mut Transaction<'_>, kind: CascadeKind) -> Result<(), IllegalMove> {
        if kind != CascadeKind::RowClear {
            return Err(IllegalMove::Unsupported);
        }
        let layout = Layout::of(tx.table()).ok_or(IllegalMove::Unsupported)?;
        for peak in Self::unrewarded_peaks(tx.table(), &layout) {
            tx.set_flag(Flag::RowCleared(peak), true);
            tx.add_row_bonus();
        }
        Ok(())
    }

    fn is_won(&self, table: &Table) -> bool {
        Layout::of(table).is_some_and(|layout| table.all_empty(&layout.cells))
    }

    fn candidate_moves(&self, table: &Table) -> Vec<MoveRequest> {
        let Some(layout) = Layout::of(table) else {
            return Vec::new();
        };
        let mut moves: Vec<MoveRequest> = layout
            .cells
            .iter()
            .filter(|&&id| table.top(id).is_some_and(|top| top.is_reachable()))
            .map(|&id| MoveRequest::transfer(id, 0, layout.waste))
            .collect();
        if table.pile_len(layout.stock) > 0 {
            moves.push(MoveRequest::Draw);
        }
        moves
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{Card, Suit, KING};
    use crate::core::DealConfig;
    use crate::history::RecordOrigin;
    use crate::rules::GameResult;
    use crate::scoring::{ScoreBoard, ScoreKeeper};

    fn setup(seed: u64) -> (TriPeaks, Deal) {
        let tripeaks = TriPeaks::default();
        let deal = tripeaks.generate(&DealConfig::new(Variant::TriPeaks, seed)).unwrap();
        (tripeaks, deal)
    }

    fn next_rank(rank: u8) -> u8 {
        rank % KING + 1
    }

    fn run(tripeaks: &TriPeaks, table: &mut Table, scorer: &mut ScoreBoard, request: MoveRequest) {
        let mut tx = Transaction::new(table, scorer, RecordOrigin::Player(request));
        tripeaks.apply(&mut tx, request).unwrap();
        let _ = tx.commit();
    }

    #[test]
    fn test_geometry() {
        assert_eq!(children(0), Some([3, 4]));
        assert_eq!(children(2), Some([7, 8]));
        assert_eq!(children(3), Some([9, 10]));
        assert_eq!(children(5), Some([12, 13]));
        assert_eq!(children(17), Some([26, 27]));
        assert_eq!(children(18), None);
        assert_eq!(parents(19), vec![9, 10]);
        assert_eq!(parents(10), vec![3, 4]);
        assert_eq!(parents(12), vec![5]);
    }

    #[test]
    fn test_opening_table() {
        let (tripeaks, deal) = setup(2);
        let table = tripeaks.build_table(&deal).unwrap();
        assert_eq!(table.pile_len(table.stock_id().unwrap()), 23);
        assert_eq!(table.pile_len(table.waste_id().unwrap()), 1);

        let cells = table.cell_ids();
        for (index, &cell) in cells.iter().enumerate() {
            assert_eq!(table.top(cell).unwrap().face_up, index >= 18, "cell {index}");
        }
    }

    #[test]
    fn test_streak_and_uncover() {
        let (tripeaks, mut deal) = setup(8);
        let waste_card = deal.stock.last().unwrap().card;
        let first = Card::new(Suit::Hearts, next_rank(waste_card.rank));
        let second = Card::new(Suit::Clubs, next_rank(first.rank));
        common::place_card(&mut deal, first, 3, 0);
        common::place_card(&mut deal, second, 3, 1);

        let mut table = tripeaks.build_table(&deal).unwrap();
        let cells = table.cell_ids();
        let waste = table.waste_id().unwrap();
        let mut scorer = ScoreBoard::default();

        run(&tripeaks, &mut table, &mut scorer, MoveRequest::transfer(cells[18], 0, waste));
        assert!(!table.top(cells[9]).unwrap().face_up);
        run(&tripeaks, &mut table, &mut scorer, MoveRequest::transfer(cells[19], 0, waste));
        assert!(table.top(cells[9]).unwrap().face_up);
        assert!(!table.top(cells[10]).unwrap().face_up);

        let pair = ScoringConfig::default().pair_removed;
        assert_eq!(scorer.snapshot().points, pair + 2 * pair);
        assert_eq!(table.counter(Counter::Streak), 2);

        run(&tripeaks, &mut table, &mut scorer, MoveRequest::Draw);
        assert_eq!(table.counter(Counter::Streak), 0);
    }

    #[test]
    fn test_rank_gap_rejected() {
        let (tripeaks, mut deal) = setup(9);
        let waste_card = deal.stock.last().unwrap().card;
        let far = Card::new(Suit::Spades, next_rank(next_rank(waste_card.rank)));
        common::place_card(&mut deal, far, 3, 4);
        let table = tripeaks.build_table(&deal).unwrap();
        let request = MoveRequest::transfer(table.cell_ids()[22], 0, table.waste_id().unwrap());
        assert!(!tripeaks.is_legal(&table, request));
    }

    #[test]
    fn test_no_recycle() {
        let (tripeaks, deal) = setup(10);
        let mut table = tripeaks.build_table(&deal).unwrap();
        let mut scorer = ScoreBoard::default();
        for _ in 0..23 {
            run(&tripeaks, &mut table, &mut scorer, MoveRequest::Draw);
        }
        assert!(!tripeaks.is_legal(&table, MoveRequest::Draw));
        assert!(!tripeaks.candidate_moves(&table).contains(&MoveRequest::Draw));
    }

    /// Sevens on every cell, face-up on the bottom row, a King on the
    /// waste and `stock` cards left.
    fn stuck_table(stock: u8) -> Table {
        let mut table = Table::new();
        let stock_id = table.add_pile(PileKind::Stock);
        let waste = table.add_pile(PileKind::Waste(WasteRule::AdjacentRank { wrap: true }));
        let cells = table.add_piles(PileKind::Cell, CELLS);
        for (index, &cell) in cells.iter().enumerate() {
            table.seed(cell, [PlacedCard::new(Card::new(Suit::Clubs, 7), index >= ROW_STARTS[3])]);
        }
        table.seed(waste, [PlacedCard::new(Card::new(Suit::Hearts, KING), true)]);
        table.seed(
            stock_id,
            (1..=stock).map(|rank| PlacedCard::new(Card::new(Suit::Spades, rank), false)),
        );
        table
    }

    #[test]
    fn test_lost_once_stock_is_spent() {
        let tripeaks = TriPeaks::default();
        assert_eq!(tripeaks.check(&stuck_table(1)), None);

        let table = stuck_table(0);
        assert!(tripeaks.legal_moves(&table).is_empty());
        assert_eq!(tripeaks.check(&table), Some(GameResult::Lost));
    }
}
