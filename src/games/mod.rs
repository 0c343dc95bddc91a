//! Variant implementations.
//!
//! Each variant is one type implementing both [`DealGenerator`] (how a
//! round is dealt) and [`VariantRules`] (how it is played), configured by
//! its own options struct.
//!
//! | Variant      | Play                                         |
//! |--------------|----------------------------------------------|
//! | [`Klondike`] | alternate colours down, suits up             |
//! | [`Spider`]   | any suit down, same-suit runs collected      |
//! | [`Yukon`]    | any face-up card moves with its cover        |
//! | [`Pyramid`]  | pairs summing to 13 removed from a triangle  |
//! | [`TriPeaks`] | uncovered cards played onto the waste ±1     |
//! | [`MonteCarlo`] | touching equal ranks removed, board closes up |
//! | [`Octagon`]  | two decks, same suit down, Aces pre-placed   |
//!
//! [`DealGenerator`]: crate::deal::DealGenerator
//! [`VariantRules`]: crate::rules::VariantRules

pub(crate) mod common;
pub mod klondike;
pub mod montecarlo;
pub mod octagon;
pub mod pyramid;
pub mod spider;
pub mod tripeaks;
pub mod yukon;

pub use klondike::{Klondike, KlondikeOptions};
pub use montecarlo::{MonteCarlo, MonteCarloOptions};
pub use octagon::{Octagon, OctagonOptions};
pub use pyramid::{Pyramid, PyramidOptions};
pub use spider::{Spider, SpiderOptions};
pub use tripeaks::{TriPeaks, TriPeaksOptions};
pub use yukon::{Yukon, YukonOptions};
