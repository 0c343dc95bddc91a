//! Round configuration types.
//!
//! Every deal is generated from an explicit, immutable [`DealConfig`]:
//! - `Variant`: Which solitaire is being dealt
//! - `Difficulty`: Selects the adjacency bias where the variant uses one
//! - `param`: Variant-specific knob (Klondike draw count, Spider suit count)
//! - `seed`: Makes the deal reproducible
//!
//! Nothing is read from global settings; callers pass the value per call.

use serde::{Deserialize, Serialize};

use crate::core::error::EngineError;

/// The supported solitaire variants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Variant {
    Klondike,
    Spider,
    Yukon,
    Pyramid,
    TriPeaks,
    MonteCarlo,
    Octagon,
}

impl Variant {
    /// Every variant, in declaration order.
    pub const ALL: [Variant; 7] = [
        Variant::Klondike,
        Variant::Spider,
        Variant::Yukon,
        Variant::Pyramid,
        Variant::TriPeaks,
        Variant::MonteCarlo,
        Variant::Octagon,
    ];

    /// Stable lowercase identifier.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Variant::Klondike => "klondike",
            Variant::Spider => "spider",
            Variant::Yukon => "yukon",
            Variant::Pyramid => "pyramid",
            Variant::TriPeaks => "tripeaks",
            Variant::MonteCarlo => "montecarlo",
            Variant::Octagon => "octagon",
        }
    }

    /// Values of `param` this variant accepts.
    #[must_use]
    pub const fn accepted_params(self) -> &'static [u8] {
        match self {
            Variant::Klondike => &[1, 3],
            Variant::Spider => &[1, 2, 4],
            _ => &[0, 1],
        }
    }

    /// Default `param` for this variant.
    #[must_use]
    pub const fn default_param(self) -> u8 {
        match self {
            Variant::Klondike => 1,
            Variant::Spider => 1,
            _ => 0,
        }
    }
}

impl std::fmt::Display for Variant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

/// Difficulty level.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];
}

/// Complete configuration for one deal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DealConfig {
    pub variant: Variant,
    pub difficulty: Difficulty,
    /// Variant parameter: draw count for Klondike, suit count for Spider.
    pub param: u8,
    pub seed: u64,
}

impl DealConfig {
    /// Create a config with the variant's default parameter.
    #[must_use]
    pub fn new(variant: Variant, seed: u64) -> Self {
        Self {
            variant,
            difficulty: Difficulty::default(),
            param: variant.default_param(),
            seed,
        }
    }

    /// Set the difficulty.
    #[must_use]
    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    /// Set the variant parameter.
    #[must_use]
    pub fn with_param(mut self, param: u8) -> Self {
        self.param = param;
        self
    }

    /// Set the seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Reject parameters the variant does not define.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.variant.accepted_params().contains(&self.param) {
            Ok(())
        } else {
            Err(EngineError::UnsupportedParam {
                variant: self.variant,
                param: self.param,
            })
        }
    }

    /// Key used by deal caches (everything but the seed).
    #[must_use]
    pub fn key(&self) -> DealKey {
        DealKey {
            variant: self.variant,
            difficulty: self.difficulty,
            param: self.param,
        }
    }
}

/// Seedless identity of a deal request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DealKey {
    pub variant: Variant,
    pub difficulty: Difficulty,
    pub param: u8,
}
