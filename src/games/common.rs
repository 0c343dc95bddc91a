//! Building blocks shared by the variants.

use crate::cards::CardInstance;
use crate::core::{EngineError, IllegalMove, Variant};
use crate::deal::Deal;
use crate::history::Transaction;
use crate::zones::{ContainerId, Counter, PileKind, Placement, PlacedCard, Table};

/// Fail unless the deal has exactly the expected column lengths.
pub(crate) fn expect_columns(variant: Variant, deal: &Deal, lengths: &[usize]) -> Result<(), EngineError> {
    if deal.config.variant != variant {
        return Err(EngineError::LayoutMismatch {
            variant,
            detail: format!("deal is for {}", deal.config.variant),
        });
    }
    let actual = deal.column_lengths();
    if actual != lengths {
        return Err(EngineError::LayoutMismatch {
            variant,
            detail: format!("expected columns {lengths:?}, found {actual:?}"),
        });
    }
    Ok(())
}

/// Seed one pile per dealt column.
pub(crate) fn seed_columns(table: &mut Table, ids: &[ContainerId], columns: &[Vec<CardInstance>]) {
    for (&id, column) in ids.iter().zip(columns) {
        table.seed(id, column.iter().copied().map(PlacedCard::from));
    }
}

/// Seed board cells from dealt rows, in raster order.
pub(crate) fn seed_cells(table: &mut Table, cells: &[ContainerId], rows: &[Vec<CardInstance>]) {
    for (&id, &instance) in cells.iter().zip(rows.iter().flatten()) {
        table.seed(id, [PlacedCard::from(instance)]);
    }
}

/// Seed the stock (deal order, top last), face-down.
pub(crate) fn seed_stock(table: &mut Table, stock: ContainerId, cards: &[CardInstance]) {
    table.seed(
        stock,
        cards.iter().map(|instance| PlacedCard::new(instance.card, false)),
    );
}

/// Turn up to `count` cards from stock to waste.
pub(crate) fn draw(
    tx: &mut Transaction<'_>,
    stock: ContainerId,
    waste: ContainerId,
    count: usize,
) -> Result<usize, IllegalMove> {
    let available = tx.table().pile_len(stock).min(count);
    if available == 0 {
        return Err(IllegalMove::StockEmpty);
    }
    for _ in 0..available {
        tx.transfer_top(stock, waste, Placement::Supply, Some(true))?;
    }
    Ok(available)
}

/// Turn the waste back over onto the stock.
///
/// `limit` is the number of recycles allowed per round; `None` is
/// unlimited.
pub(crate) fn recycle(
    tx: &mut Transaction<'_>,
    stock: ContainerId,
    waste: ContainerId,
    limit: Option<u32>,
) -> Result<(), IllegalMove> {
    if tx.table().pile_len(waste) == 0 {
        return Err(IllegalMove::StockEmpty);
    }
    let used = tx.table().counter(Counter::Recycles);
    if limit.is_some_and(|limit| used >= limit) {
        return Err(IllegalMove::RecycleLimit);
    }
    while tx.table().pile_len(waste) > 0 {
        tx.transfer_top(waste, stock, Placement::Supply, Some(false))?;
    }
    tx.set_counter(Counter::Recycles, used + 1);
    Ok(())
}

/// Can the waste still be recycled?
pub(crate) fn can_recycle(table: &Table, limit: Option<u32>) -> bool {
    limit.map_or(true, |limit| table.counter(Counter::Recycles) < limit)
}

/// Cards left in the stock, or a waste that may still be turned over.
pub(crate) fn supply_left(table: &Table, stock: ContainerId, waste: ContainerId, limit: Option<u32>) -> bool {
    table.pile_len(stock) > 0 || (table.pile_len(waste) > 0 && can_recycle(table, limit))
}

/// Transfer candidates from every source to every other target: each
/// movable index of a tableau column, the top card of anything else.
pub(crate) fn transfer_candidates(
    table: &Table,
    sources: &[ContainerId],
    targets: &[ContainerId],
) -> Vec<crate::rules::MoveRequest> {
    let mut moves = Vec::new();
    for &from in sources {
        let Some(pile) = table.pile(from) else {
            continue;
        };
        let indices: Vec<usize> = match pile.kind() {
            PileKind::Tableau(_) => (0..pile.len()).filter(|&i| pile.movable_from(i)).collect(),
            _ => pile.len().checked_sub(1).into_iter().collect(),
        };
        for index in indices {
            for &to in targets {
                if to != from {
                    moves.push(crate::rules::MoveRequest::transfer(from, index, to));
                }
            }
        }
    }
    moves
}

/// Is any of `cards` playable on a tableau or foundation top right now?
pub(crate) fn any_playable(
    table: &Table,
    cards: impl IntoIterator<Item = crate::cards::Card>,
    targets: &[ContainerId],
) -> bool {
    cards.into_iter().any(|card| {
        targets.iter().any(|&id| {
            table
                .pile(id)
                .is_some_and(|pile| pile.can_accept(&[card], Placement::Build))
        })
    })
}

/// Does every listed foundation hold a complete build?
pub(crate) fn all_complete(table: &Table, foundations: &[ContainerId]) -> bool {
    !foundations.is_empty()
        && foundations
            .iter()
            .all(|&id| table.pile(id).is_some_and(|pile| pile.is_complete()))
}

/// Cell ids grouped by board row.
pub(crate) fn rows_of(cells: &[ContainerId], row_lengths: &[usize]) -> Vec<Vec<ContainerId>> {
    let mut rows = Vec::with_capacity(row_lengths.len());
    let mut start = 0;
    for &len in row_lengths {
        rows.push(cells[start..(start + len).min(cells.len())].to_vec());
        start += len;
    }
    rows
}

/// Swap `card` into `deal.tableau[column][row]`, keeping the deck intact.
#[cfg(test)]
pub(crate) fn place_card(deal: &mut Deal, card: crate::cards::Card, column: usize, row: usize) {
    let displaced = deal.tableau[column][row].card;
    let slot = deal
        .tableau
        .iter_mut()
        .flatten()
        .chain(deal.stock.iter_mut())
        .find(|slot| slot.card == card);
    if let Some(slot) = slot {
        slot.card = displaced;
        deal.tableau[column][row].card = card;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{Card, Suit};
    use crate::history::RecordOrigin;
    use crate::rules::MoveRequest;
    use crate::scoring::ScoreBoard;
    use crate::zones::WasteRule;

    fn stock_and_waste(cards: u8) -> (Table, ContainerId, ContainerId) {
        let mut table = Table::new();
        let stock = table.add_pile(PileKind::Stock);
        let waste = table.add_pile(PileKind::Waste(WasteRule::Closed));
        table.seed(
            stock,
            (1..=cards).map(|rank| PlacedCard::new(Card::new(Suit::Hearts, rank), false)),
        );
        (table, stock, waste)
    }

    #[test]
    fn test_draw_three_from_short_stock() {
        let (mut table, stock, waste) = stock_and_waste(2);
        let mut scorer = ScoreBoard::default();
        let mut tx = Transaction::new(&mut table, &mut scorer, RecordOrigin::Player(MoveRequest::Draw));
        assert_eq!(draw(&mut tx, stock, waste, 3), Ok(2));
        tx.commit();

        assert_eq!(table.pile_len(stock), 0);
        assert_eq!(table.top(waste).map(|p| (p.card.rank, p.face_up)), Some((1, true)));
    }

    #[test]
    fn test_recycle_restores_stock_order() {
        let (mut table, stock, waste) = stock_and_waste(3);
        let original = table.pile(stock).unwrap().cards().clone();
        let mut scorer = ScoreBoard::default();

        let mut tx = Transaction::new(&mut table, &mut scorer, RecordOrigin::Player(MoveRequest::Draw));
        draw(&mut tx, stock, waste, 3).unwrap();
        recycle(&mut tx, stock, waste, Some(1)).unwrap();
        assert_eq!(recycle(&mut tx, stock, waste, Some(1)), Err(IllegalMove::StockEmpty));
        tx.commit();

        assert_eq!(table.pile(stock).unwrap().cards(), &original);
        assert_eq!(table.counter(Counter::Recycles), 1);
    }

    #[test]
    fn test_recycle_limit() {
        let (mut table, stock, waste) = stock_and_waste(1);
        table.set_counter(Counter::Recycles, 2);
        let mut scorer = ScoreBoard::default();
        let mut tx = Transaction::new(&mut table, &mut scorer, RecordOrigin::Player(MoveRequest::Draw));
        draw(&mut tx, stock, waste, 1).unwrap();
        assert_eq!(recycle(&mut tx, stock, waste, Some(2)), Err(IllegalMove::RecycleLimit));
        assert!(recycle(&mut tx, stock, waste, None).is_ok());
    }

    #[test]
    fn test_supply_left() {
        let (mut table, stock, waste) = stock_and_waste(1);
        assert!(supply_left(&table, stock, waste, Some(0)));

        let mut scorer = ScoreBoard::default();
        let mut tx = Transaction::new(&mut table, &mut scorer, RecordOrigin::Player(MoveRequest::Draw));
        draw(&mut tx, stock, waste, 1).unwrap();
        tx.commit();
        assert!(supply_left(&table, stock, waste, Some(1)));
        assert!(supply_left(&table, stock, waste, None));
        assert!(!supply_left(&table, stock, waste, Some(0)));

        table.set_counter(Counter::Recycles, 1);
        assert!(!supply_left(&table, stock, waste, Some(1)));
    }

    #[test]
    fn test_rows_of() {
        let cells: Vec<ContainerId> = (0..6).map(ContainerId::new).collect();
        let rows = rows_of(&cells, &[1, 2, 3]);
        assert_eq!(rows[2], vec![ContainerId::new(3), ContainerId::new(4), ContainerId::new(5)]);
    }
}
