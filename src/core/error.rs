//! Engine error kinds.
//!
//! Two families:
//! - [`EngineError`]: unrecoverable configuration or integration failures
//!   (a generator asked for more cards than remain, a deal that does not
//!   match its deck).
//! - [`IllegalMove`]: an ordinary rejection of a player request. It is
//!   returned by value, and the table is untouched when it is returned.
//!
//! An undo on an empty history is neither; it is a no-op.

use crate::core::config::Variant;
use crate::zones::ContainerId;

/// Fatal engine errors.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EngineError {
    /// A layout asked for more cards than the dealer still holds.
    GeneratorExhausted { requested: usize, remaining: usize },

    /// The variant does not define this parameter value.
    UnsupportedParam { variant: Variant, param: u8 },

    /// The cards of a deal differ from the configured deck.
    DeckMismatch(String),

    /// A deal's shape does not fit the variant's table.
    LayoutMismatch { variant: Variant, detail: String },

    /// An operation needs a dealt round.
    NoRound,
}

/// Why a move request was rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IllegalMove {
    /// The machine is not idle (dealing, or the game is over).
    NotAcceptingInput,

    /// The request names a container that does not exist.
    UnknownContainer(ContainerId),

    /// The source holds no card at the requested position.
    NothingToMove(ContainerId),

    /// The cards from the requested position do not form a movable unit.
    NotMovable { container: ContainerId, index: usize },

    /// The target refused the cards.
    Rejected(ContainerId),

    /// A card involved is covered by other cards.
    Blocked(ContainerId),

    /// Drawing from an empty stock with nothing to recycle.
    StockEmpty,

    /// The waste may not be recycled again.
    RecycleLimit,

    /// The selected cards do not form a removable group.
    NotAPair,

    /// A Spider row cannot be dealt while a column is empty.
    EmptyColumn(ContainerId),

    /// The variant has no move of this shape.
    Unsupported,
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineError::GeneratorExhausted { requested, remaining } => {
                write!(f, "layout requested {requested} cards but only {remaining} remain")
            }
            EngineError::UnsupportedParam { variant, param } => {
                write!(f, "{variant} does not accept parameter {param}")
            }
            EngineError::DeckMismatch(detail) => write!(f, "deal does not match the configured deck: {detail}"),
            EngineError::LayoutMismatch { variant, detail } => {
                write!(f, "deal does not fit the {variant} layout: {detail}")
            }
            EngineError::NoRound => f.write_str("no round has been dealt"),
        }
    }
}

impl std::error::Error for EngineError {}

impl std::fmt::Display for IllegalMove {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IllegalMove::NotAcceptingInput => f.write_str("the game is not accepting input"),
            IllegalMove::UnknownContainer(id) => write!(f, "unknown container {id}"),
            IllegalMove::NothingToMove(id) => write!(f, "nothing to move from {id}"),
            IllegalMove::NotMovable { container, index } => {
                write!(f, "cards from {container} index {index} cannot be moved together")
            }
            IllegalMove::Rejected(id) => write!(f, "{id} cannot accept the cards"),
            IllegalMove::Blocked(id) => write!(f, "card in {id} is blocked"),
            IllegalMove::StockEmpty => f.write_str("the stock is empty"),
            IllegalMove::RecycleLimit => f.write_str("the recycle limit has been reached"),
            IllegalMove::NotAPair => f.write_str("the selected cards do not form a removable group"),
            IllegalMove::EmptyColumn(id) => write!(f, "cannot deal while {id} is empty"),
            IllegalMove::Unsupported => f.write_str("this variant does not support the requested move"),
        }
    }
}

impl std::error::Error for IllegalMove {}
