//! Core engine types: configuration, errors, RNG.
//!
//! These are variant-agnostic. Variants configure themselves through
//! `DealConfig` and their own option structs rather than modifying the core.

pub mod config;
pub mod error;
pub mod rng;

pub use config::{DealConfig, DealKey, Difficulty, Variant};
pub use error::{EngineError, IllegalMove};
pub use rng::GameRng;
