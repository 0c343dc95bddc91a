//! # rust-solitaire
//!
//! Deal generation and a reversible move engine shared by a family of
//! solitaire variants.
//!
//! ## Design Principles
//!
//! 1. **Deterministic Deals**: A deal is a pure function of an explicit
//!    `DealConfig` (variant, difficulty, parameter, seed). No global
//!    settings are read.
//!
//! 2. **One Mutator**: Every change to a table goes through a
//!    `Transaction`, which records it. Undo replays records backwards, so
//!    flips, blocked cells, counters, flags and score all come back, not
//!    just card positions.
//!
//! 3. **Injected Collaborators**: Scoring, deal caching and event
//!    subscribers are handed to the state machine at construction.
//!
//! ## Architecture
//!
//! - **Containers Own Nothing Else**: The `Table` owns every pile by index;
//!   piles answer legality queries and hold no back-reference.
//!
//! - **Persistent Data Structures**: Piles are `im` vectors, so a dry-run
//!   legality check on a table clone is cheap.
//!
//! - **Commit, Then Announce**: The machine finishes a transition before an
//!   `EventSink` hears about it; presentation replays committed state.
//!
//! ## Modules
//!
//! - `core`: Variant and deal configuration, errors, RNG
//! - `cards`: Cards and deck composition
//! - `deal`: Deal generation, Spider bias, deal caching
//! - `zones`: Containers and the table
//! - `history`: Transactions, move records, undo stack
//! - `scoring`: Score collaborator
//! - `rules`: `VariantRules` trait and move requests
//! - `games`: The variants
//! - `events`: Event sinks
//! - `machine`: `GameStateMachine`

pub mod core;
pub mod cards;
pub mod deal;
pub mod zones;
pub mod history;
pub mod scoring;
pub mod rules;
pub mod games;
pub mod events;
pub mod machine;

// Re-export commonly used types
pub use crate::core::{DealConfig, DealKey, Difficulty, EngineError, GameRng, IllegalMove, Variant};

pub use crate::cards::{Card, CardInstance, Color, DeckSpec, Suit};

pub use crate::deal::{
    generate_deal, generator_for, BiasTable, Deal, DealCache, DealGenerator, DealSource,
    LayoutShape, SeededDealSource,
};

pub use crate::zones::{ContainerId, Counter, Flag, Pile, PileKind, PlacedCard, Placement, Table};

pub use crate::history::{MoveRecord, RecordOrigin, Transaction, UndoStack};

pub use crate::scoring::{ScoreBoard, ScoreKeeper, ScoreSnapshot, ScoringConfig};

pub use crate::rules::{CascadeKind, GameResult, MoveRequest, VariantRules};

pub use crate::games::{Klondike, MonteCarlo, Octagon, Pyramid, Spider, TriPeaks, Yukon};

pub use crate::events::{ChannelSink, EngineEvent, EventLog, EventSink, NullSink};

pub use crate::machine::{GameStateMachine, MoveOutcome, Phase, RoundStart};
