//! Card model: identity, orientation and deck composition.
//!
//! ## Key Types
//!
//! - `Card`: Immutable suit + rank value
//! - `CardInstance`: Card plus face orientation, used while dealing
//! - `DeckSpec`: How many packs and which suits a variant plays with

pub mod card;
pub mod deck;

pub use card::{Card, CardInstance, Color, Suit, ACE, KING};
pub use deck::{count_cards, DeckSpec};
