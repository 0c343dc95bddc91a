//! Rules engine interface.
//!
//! Variants implement [`VariantRules`]; the state machine drives them with
//! [`MoveRequest`]s and runs their cascades.

pub mod engine;
pub mod request;

pub use engine::{GameResult, VariantRules};
pub use request::{CascadeKind, MoveRequest};
