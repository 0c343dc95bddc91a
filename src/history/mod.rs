//! Move history: reversible records, the recording transaction, and the
//! undo stack.
//!
//! ## Key Types
//!
//! - `Transaction`: The only mutator of a `Table`; validates then records
//! - `MoveRecord`: A committed, reversible transition
//! - `UndoStack`: Records grouped into undo units

pub mod record;
pub mod stack;
pub mod transaction;

pub use record::{FlagToggle, MoveRecord, RecordOrigin, ScoreEffect, Step, SubMove};
pub use stack::UndoStack;
pub use transaction::{placed_at, Transaction};
