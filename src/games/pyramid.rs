//! Pyramid.
//!
//! Twenty-eight face-up cells in rows of 1..7; a cell is blocked while
//! either of the two cells below it is occupied. Remove a King alone, or
//! two uncovered cards (board cells or the waste top) whose ranks sum to
//! 13. The stock turns one card at a time onto the waste and may be
//! recycled twice. Clearing a row earns a bonus; clearing the board wins.

use serde::{Deserialize, Serialize};

use crate::cards::{Card, KING};
use crate::core::{EngineError, IllegalMove, Variant};
use crate::deal::{Deal, DealGenerator, LayoutShape};
use crate::history::Transaction;
use crate::rules::{CascadeKind, MoveRequest, VariantRules};
use crate::scoring::ScoringConfig;
use crate::zones::{ContainerId, Flag, FoundationRule, PileKind, Placement, Table, WasteRule};

use super::common;

/// Cards per board row, top row first.
pub const ROWS: [usize; 7] = [1, 2, 3, 4, 5, 6, 7];
const CELLS: usize = 28;
const PAIR_SUM: u8 = KING;

/// Pyramid options.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PyramidOptions {
    /// Recycles allowed per round.
    pub recycle_limit: u32,
    pub scoring: ScoringConfig,
}

impl Default for PyramidOptions {
    fn default() -> Self {
        Self {
            recycle_limit: 2,
            scoring: ScoringConfig::default(),
        }
    }
}

/// Pyramid rules and deal generator.
#[derive(Clone, Debug, Default)]
pub struct Pyramid {
    options: PyramidOptions,
}

/// Row and column of a raster cell index.
fn position(index: usize) -> (usize, usize) {
    let mut row = 0;
    let mut start = 0;
    while start + ROWS[row] <= index {
        start += ROWS[row];
        row += 1;
    }
    (row, index - start)
}

fn index_of(row: usize, column: usize) -> usize {
    row * (row + 1) / 2 + column
}

/// The two cells covering cell `index`, if it is not on the bottom row.
#[must_use]
pub fn children(index: usize) -> Option<[usize; 2]> {
    let (row, column) = position(index);
    (row + 1 < ROWS.len()).then(|| [index_of(row + 1, column), index_of(row + 1, column + 1)])
}

/// The cells resting on cell `index` (zero, one or two).
#[must_use]
pub fn parents(index: usize) -> Vec<usize> {
    let (row, column) = position(index);
    if row == 0 {
        return Vec::new();
    }
    let mut parents = Vec::with_capacity(2);
    if column > 0 {
        parents.push(index_of(row - 1, column - 1));
    }
    if column < row {
        parents.push(index_of(row - 1, column));
    }
    parents
}

struct Layout {
    stock: ContainerId,
    waste: ContainerId,
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
            waste: table.waste_id()?,
            discard: *table.foundation_ids().first()?,
            cells,
        })
    }

    fn cell_index(&self, id: ContainerId) -> Option<usize> {
        self.cells.iter().position(|&cell| cell == id)
    }
}

impl Pyramid {
    #[must_use]
    pub fn new(options: PyramidOptions) -> Self {
        Self { options }
    }

    /// The uncovered card a removal would take from `id`.
    fn removable(table: &Table, layout: &Layout, id: ContainerId) -> Result<Card, IllegalMove> {
        let pile = table.pile(id).ok_or(IllegalMove::UnknownContainer(id))?;
        if id != layout.waste && !matches!(pile.kind(), PileKind::Cell) {
            return Err(IllegalMove::Unsupported);
        }
        let top = pile.top().ok_or(IllegalMove::NothingToMove(id))?;
        if !top.is_reachable() {
            return Err(IllegalMove::Blocked(id));
        }
        Ok(top.card)
    }

    fn remove(&self, tx: &mut Transaction<'_>, layout: &Layout, first: ContainerId, second: Option<ContainerId>) -> Result<(), IllegalMove> {
        let a = Self::removable(tx.table(), layout, first)?;
        let group = match second {
            None if a.is_king() => vec![first],
            None => return Err(IllegalMove::NotAPair),
            Some(second) => {
                let b = Self::removable(tx.table(), layout, second)?;
                if second == first || a.rank + b.rank != PAIR_SUM {
                    return Err(IllegalMove::NotAPair);
                }
                vec![first, second]
            }
        };

        for &id in &group {
            tx.transfer_top(id, layout.discard, Placement::Supply, None)?;
        }
        for &id in &group {
            let Some(index) = layout.cell_index(id) else {
                continue;
            };
            for parent in parents(index) {
                let uncovered = children(parent)
                    .is_some_and(|kids| kids.iter().all(|&kid| tx.table().pile_len(layout.cells[kid]) == 0));
                if uncovered {
                    tx.set_blocked(layout.cells[parent], 0, false);
                }
            }
        }
        tx.add_points(self.options.scoring.pair_removed);
        Ok(())
    }

    /// Rows that are empty but not yet rewarded.
    fn unrewarded_rows(table: &Table, layout: &Layout) -> Vec<u8> {
        common::rows_of(&layout.cells, &ROWS)
            .iter()
            .enumerate()
            .filter(|(row, cells)| {
                table.all_empty(cells) && !table.flag(Flag::RowCleared(*row as u8))
            })
            .map(|(row, _)| row as u8)
            .collect()
    }
}

impl DealGenerator for Pyramid {
    fn variant(&self) -> Variant {
        Variant::Pyramid
    }

    fn shape(&self, _param: u8) -> LayoutShape {
        LayoutShape {
            columns: ROWS.to_vec(),
            stock: 24,
            foundations: Vec::new(),
        }
    }

    fn face_up(&self, _column: usize, _row: usize, _len: usize) -> bool {
        true
    }
}

impl VariantRules for Pyramid {
    fn variant(&self) -> Variant {
        Variant::Pyramid
    }

    fn build_table(&self, deal: &Deal) -> Result<Table, EngineError> {
        common::expect_columns(Variant::Pyramid, deal, &ROWS)?;

        let mut table = Table::new();
        let stock = table.add_pile(PileKind::Stock);
        table.add_pile(PileKind::Waste(WasteRule::Closed));
        table.add_pile(PileKind::Foundation(FoundationRule::Discard));
        let cells = table.add_piles(PileKind::Cell, CELLS);

        common::seed_stock(&mut table, stock, &deal.stock);
        common::seed_cells(&mut table, &cells, &deal.tableau);
        for (index, &cell) in cells.iter().enumerate() {
            if children(index).is_some() {
                if let Some(pile) = table.pile_mut(cell) {
                    pile.set_blocked(0, true);
                }
            }
        }
        Ok(table)
    }

    fn apply(&self, tx: &mut Transaction<'_>, request: MoveRequest) -> Result<(), IllegalMove> {
        let layout = Layout::of(tx.table()).ok_or(IllegalMove::Unsupported)?;
        match request {
            MoveRequest::Remove { first, second } => self.remove(tx, &layout, first, second),
            MoveRequest::Draw => {
                if tx.table().pile_len(layout.stock) > 0 {
                    common::draw(tx, layout.stock, layout.waste, 1)?;
                } else {
                    common::recycle(tx, layout.stock, layout.waste, Some(self.options.recycle_limit))?;
                }
                Ok(())
            }
            MoveRequest::Transfer { .. } => Err(IllegalMove::Unsupported),
        }
    }

    fn next_cascade(&self, table: &Table) -> Option<CascadeKind> {
        let layout = Layout::of(table)?;
        (!Self::unrewarded_rows(table, &layout).is_empty()).then_some(CascadeKind::RowClear)
    }

    fn run_cascade(&self, tx: &mut Transaction<'_>, kind: CascadeKind) -> Result<(), IllegalMove> {
        if kind != CascadeKind::RowClear {
            return Err(IllegalMove::Unsupported);
        }
        let layout = Layout::of(tx.table()).ok_or(IllegalMove::Unsupported)?;
        for row in Self::unrewarded_rows(tx.table(), &layout) {
            tx.set_flag(Flag::RowCleared(row), true);
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
        let mut moves = Vec::new();
        if table.pile_len(layout.stock) > 0 || table.pile_len(layout.waste) > 0 {
            moves.push(MoveRequest::Draw);
        }

        let open: Vec<(ContainerId, Card)> = layout
            .cells
            .iter()
            .chain(std::iter::once(&layout.waste))
            .filter_map(|&id| Self::removable(table, &layout, id).ok().map(|card| (id, card)))
            .collect();
        for (i, &(a, card_a)) in open.iter().enumerate() {
            if card_a.is_king() {
                moves.push(MoveRequest::single(a));
            }
            for &(b, card_b) in &open[i + 1..] {
                if card_a.rank + card_b.rank == PAIR_SUM {
                    moves.push(MoveRequest::pair(a, b));
                }
            }
        }
        moves
    }

    fn is_useful(&self, table: &Table, request: &MoveRequest) -> bool {
        match request {
            MoveRequest::Draw => self.has_supply(table),
            _ => true,
        }
    }

    fn has_supply(&self, table: &Table) -> bool {
        Layout::of(table).is_some_and(|layout| {
            common::supply_left(table, layout.stock, layout.waste, Some(self.options.recycle_limit))
        })
    }
}
