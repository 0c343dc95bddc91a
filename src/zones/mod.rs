//! Container system.
//!
//! Containers are polymorphic over stock, waste, tableau column, foundation
//! and single-card board cell. Each kind carries its own legality rule.
//!
//! ## Key Types
//!
//! - `ContainerId`: Index of a container in its table
//! - `PileKind`: Container kind with its legality rule
//! - `Pile`: Ordered card sequence with `can_accept` / `movable_from`
//! - `Table`: Owner of every container of a round

pub mod pile;
pub mod table;

pub use pile::{
    is_full_run, Build, ContainerId, EmptyRule, FoundationRule, Pile, PileKind, Placement,
    PlacedCard, RunRule, TableauRule, WasteRule,
};
pub use table::{Counter, Flag, Table};
