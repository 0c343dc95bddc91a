//! Containers and their legality rules.
//!
//! A [`Pile`] is an ordered card sequence (index 0 = bottom, last = top)
//! with a [`PileKind`] that decides what it accepts and what may leave it.
//!
//! `can_accept` and `movable_from` are pure queries. The mutators are
//! crate-private: only a `Transaction` calls them, and only after a
//! successful `can_accept`.

use im::Vector;
use serde::{Deserialize, Serialize};

use crate::cards::{Card, CardInstance, KING};

/// Container identifier, an index into the owning `Table`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ContainerId(pub u16);

impl ContainerId {
    /// Create a new container ID.
    #[must_use]
    pub const fn new(id: u16) -> Self {
        Self(id)
    }

    /// Index into the table's pile list.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for ContainerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Container({})", self.0)
    }
}

/// A card resting in a container.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlacedCard {
    pub card: Card,
    pub face_up: bool,
    /// Covered by other cards (Pyramid/TriPeaks cells); cannot be played.
    pub blocked: bool,
}

impl PlacedCard {
    #[must_use]
    pub const fn new(card: Card, face_up: bool) -> Self {
        Self {
            card,
            face_up,
            blocked: false,
        }
    }

    /// Is this card available to the player?
    #[must_use]
    pub const fn is_reachable(&self) -> bool {
        self.face_up && !self.blocked
    }
}

impl From<CardInstance> for PlacedCard {
    fn from(instance: CardInstance) -> Self {
        Self::new(instance.card, instance.face_up)
    }
}

/// How a descending tableau build relates suits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Build {
    /// Red on black, black on red.
    AlternateColor,
    /// Same suit only.
    SameSuit,
    /// Any suit.
    AnySuit,
}

impl Build {
    /// Does `upper` build on `lower` (one rank below, suit relation holds)?
    #[must_use]
    pub fn allows(self, lower: Card, upper: Card) -> bool {
        if !upper.is_one_below(lower) {
            return false;
        }
        match self {
            Build::AlternateColor => upper.color() != lower.color(),
            Build::SameSuit => upper.suit == lower.suit,
            Build::AnySuit => true,
        }
    }
}

/// What an empty tableau column accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EmptyRule {
    Any,
    KingOnly,
    Never,
}

/// Which cards may leave a tableau column together.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunRule {
    /// Only the top card.
    TopOnly,
    /// A face-up suffix that is itself a valid build.
    Sequence,
    /// A face-up suffix in one suit, descending by one (Spider).
    SameSuitSequence,
    /// Any face-up card together with everything above it (Yukon).
    AnyFaceUp,
}

/// Legality rule for a tableau column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableauRule {
    pub build: Build,
    pub empty: EmptyRule,
    pub run: RunRule,
}

impl TableauRule {
    /// Klondike: alternate colours, Kings to empty, sequences move.
    pub const KLONDIKE: TableauRule = TableauRule {
        build: Build::AlternateColor,
        empty: EmptyRule::KingOnly,
        run: RunRule::Sequence,
    };

    /// Spider: any suit builds, anything to empty, same-suit runs move.
    pub const SPIDER: TableauRule = TableauRule {
        build: Build::AnySuit,
        empty: EmptyRule::Any,
        run: RunRule::SameSuitSequence,
    };

    /// Yukon: alternate colours, Kings to empty, any face-up card moves.
    pub const YUKON: TableauRule = TableauRule {
        build: Build::AlternateColor,
        empty: EmptyRule::KingOnly,
        run: RunRule::AnyFaceUp,
    };

    /// Octagon: same suit, anything to empty, same-suit runs move.
    pub const OCTAGON: TableauRule = TableauRule {
        build: Build::SameSuit,
        empty: EmptyRule::Any,
        run: RunRule::Sequence,
    };
}

/// Legality rule for a foundation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FoundationRule {
    /// Ace first, then the same suit one rank up.
    SuitUp,
    /// Accepts a whole King-to-Ace same-suit run at once (Spider).
    FullRun,
    /// Accepts anything; removed cards (Pyramid, TriPeaks, MonteCarlo).
    Discard,
}

/// Legality rule for a waste pile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum WasteRule {
    /// The player never places cards here.
    Closed,
    /// A card one rank away from the top may be played here (TriPeaks).
    AdjacentRank { wrap: bool },
}

/// Container kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PileKind {
    Stock,
    Waste(WasteRule),
    Tableau(TableauRule),
    Foundation(FoundationRule),
    /// A single-card board position.
    Cell,
}

/// Who is placing the cards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Placement {
    /// A player placement; the full building rules apply.
    Build,
    /// An engine placement (deal, refill, recycle, compaction, discard);
    /// only capacity and foundation ordering apply.
    Supply,
}

/// An ordered card container.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pile {
    id: ContainerId,
    kind: PileKind,
    cards: Vector<PlacedCard>,
}

impl Pile {
    /// Create an empty pile.
    #[must_use]
    pub fn new(id: ContainerId, kind: PileKind) -> Self {
        Self {
            id,
            kind,
            cards: Vector::new(),
        }
    }

    #[must_use]
    pub fn id(&self) -> ContainerId {
        self.id
    }

    #[must_use]
    pub fn kind(&self) -> PileKind {
        self.kind
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Cards bottom to top.
    #[must_use]
    pub fn cards(&self) -> &Vector<PlacedCard> {
        &self.cards
    }

    /// Card at `index` (0 = bottom).
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&PlacedCard> {
        self.cards.get(index)
    }

    /// Top card.
    #[must_use]
    pub fn top(&self) -> Option<&PlacedCard> {
        self.cards.last()
    }

    /// Cards from `index` to the top.
    #[must_use]
    pub fn cards_from(&self, index: usize) -> Vec<Card> {
        self.cards.iter().skip(index).map(|p| p.card).collect()
    }

    /// Can this pile take `incoming` (bottom card first)?
    ///
    /// Pure; never mutates.
    #[must_use]
    pub fn can_accept(&self, incoming: &[Card], placement: Placement) -> bool {
        let Some(&base) = incoming.first() else {
            return false;
        };

        match (self.kind, placement) {
            (PileKind::Foundation(rule), _) => self.foundation_accepts(rule, incoming),
            (PileKind::Cell, Placement::Supply) => self.is_empty() && incoming.len() == 1,
            (PileKind::Cell, Placement::Build) => false,
            (_, Placement::Supply) => true,
            (PileKind::Stock, Placement::Build) => false,
            (PileKind::Waste(WasteRule::Closed), Placement::Build) => false,
            (PileKind::Waste(WasteRule::AdjacentRank { wrap }), Placement::Build) => {
                incoming.len() == 1
                    && self
                        .top()
                        .is_some_and(|top| top.face_up && top.card.is_adjacent_rank(base, wrap))
            }
            (PileKind::Tableau(rule), Placement::Build) => match self.top() {
                None => match rule.empty {
                    EmptyRule::Any => true,
                    EmptyRule::KingOnly => base.is_king(),
                    EmptyRule::Never => false,
                },
                Some(top) => top.face_up && rule.build.allows(top.card, base),
            },
        }
    }

    fn foundation_accepts(&self, rule: FoundationRule, incoming: &[Card]) -> bool {
        match rule {
            FoundationRule::Discard => true,
            FoundationRule::SuitUp => {
                if incoming.len() != 1 {
                    return false;
                }
                let card = incoming[0];
                match self.top() {
                    None => card.is_ace(),
                    Some(top) => top.card.suit == card.suit && top.card.rank + 1 == card.rank,
                }
            }
            FoundationRule::FullRun => self.is_empty() && is_full_run(incoming),
        }
    }

    /// Can the cards from `index` to the top leave together?
    #[must_use]
    pub fn movable_from(&self, index: usize) -> bool {
        let Some(first) = self.cards.get(index) else {
            return false;
        };
        if !first.is_reachable() {
            return false;
        }
        let is_top = index + 1 == self.cards.len();

        match self.kind {
            PileKind::Stock | PileKind::Waste(_) | PileKind::Cell => is_top,
            PileKind::Foundation(FoundationRule::SuitUp) => is_top,
            PileKind::Foundation(_) => false,
            PileKind::Tableau(rule) => match rule.run {
                RunRule::TopOnly => is_top,
                RunRule::AnyFaceUp => self.cards.iter().skip(index).all(|p| p.face_up),
                RunRule::Sequence => self.is_chain_from(index, |lower, upper| rule.build.allows(lower, upper)),
                RunRule::SameSuitSequence => {
                    self.is_chain_from(index, |lower, upper| Build::SameSuit.allows(lower, upper))
                }
            },
        }
    }

    fn is_chain_from(&self, index: usize, links: impl Fn(Card, Card) -> bool) -> bool {
        let suffix: Vec<&PlacedCard> = self.cards.iter().skip(index).collect();
        suffix.iter().all(|p| p.face_up)
            && suffix.windows(2).all(|pair| links(pair[0].card, pair[1].card))
    }

    /// Lowest index whose suffix can move, i.e. the maximal movable unit.
    #[must_use]
    pub fn movable_run_start(&self) -> Option<usize> {
        if self.cards.is_empty() {
            return None;
        }
        let top = self.cards.len() - 1;
        if !self.movable_from(top) {
            return None;
        }
        let mut start = top;
        while start > 0 && self.movable_from(start - 1) {
            start -= 1;
        }
        Some(start)
    }

    /// Does this foundation hold a complete 13-card build?
    #[must_use]
    pub fn is_complete(&self) -> bool {
        match self.kind {
            PileKind::Foundation(FoundationRule::SuitUp | FoundationRule::FullRun) => {
                self.cards.len() == usize::from(KING)
            }
            _ => false,
        }
    }

    // === Mutation (Transaction only) ===

    /// Place a card on top; the pile's `AcceptCard`.
    pub(crate) fn accept_card(&mut self, card: PlacedCard) {
        self.cards.push_back(card);
    }

    pub(crate) fn insert(&mut self, index: usize, card: PlacedCard) {
        let idx = index.min(self.cards.len());
        self.cards.insert(idx, card);
    }

    pub(crate) fn remove(&mut self, index: usize) -> Option<PlacedCard> {
        if index < self.cards.len() {
            Some(self.cards.remove(index))
        } else {
            None
        }
    }

    pub(crate) fn set_face_up(&mut self, index: usize, face_up: bool) {
        if let Some(card) = self.cards.get_mut(index) {
            card.face_up = face_up;
        }
    }

    pub(crate) fn set_blocked(&mut self, index: usize, blocked: bool) {
        if let Some(card) = self.cards.get_mut(index) {
            card.blocked = blocked;
        }
    }
}

/// Is `cards` a King-to-Ace run in one suit?
#[must_use]
pub fn is_full_run(cards: &[Card]) -> bool {
    cards.len() == usize::from(KING)
        && cards
            .iter()
            .enumerate()
            .all(|(i, c)| c.suit == cards[0].suit && usize::from(c.rank) == usize::from(KING) - i)
}
