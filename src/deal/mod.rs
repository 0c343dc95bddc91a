//! Deal generation.
//!
//! A [`Deal`] is the initial card partition of one round: tableau columns
//! (or board rows), the stock, and any foundation cards a variant places
//! before play. It is produced by a variant's [`DealGenerator`] from an
//! explicit [`DealConfig`], consumed to seed a table, and then discarded.
//!
//! ## Generation
//!
//! 1. Validate the config and build the variant's deck
//! 2. Pull out pre-placed cards (Octagon Aces)
//! 3. Fisher-Yates shuffle on the `"shuffle"` stream of the seed
//! 4. Optional rearrangement (Spider adjacency bias, `"bias"` stream)
//! 5. Slice through a size-checked [`Dealer`]; the rest is the stock
//! 6. Verify the multiset against the deck
//!
//! ```
//! use rust_solitaire::core::{DealConfig, Variant};
//! use rust_solitaire::deal::generate_deal;
//!
//! let deal = generate_deal(&DealConfig::new(Variant::Klondike, 42)).unwrap();
//! assert_eq!(deal.column_lengths(), vec![1, 2, 3, 4, 5, 6, 7]);
//! assert_eq!(deal.stock.len(), 24);
//! ```

pub mod bias;
pub mod cache;
pub mod dealer;

use serde::{Deserialize, Serialize};

use crate::cards::{count_cards, Card, CardInstance, DeckSpec};
use crate::core::{DealConfig, EngineError, GameRng, Variant};

pub use bias::{same_suit_seams, BiasReport, BiasTable, BiasedShuffle};
pub use cache::{DealCache, DealSource, SeededDealSource};
pub use dealer::{orient, Dealer};

/// The initial card partition of a round.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deal {
    /// The configuration this deal was generated from.
    pub config: DealConfig,
    /// Columns (or board rows), each bottom to top.
    pub tableau: Vec<Vec<CardInstance>>,
    /// Draw pile; the last element is the top.
    pub stock: Vec<CardInstance>,
    /// Foundations with cards placed before play (empty for most variants).
    pub foundations: Vec<Vec<CardInstance>>,
}

impl Deal {
    /// Every card of the deal: tableau, then stock, then foundations.
    pub fn cards(&self) -> impl Iterator<Item = Card> + '_ {
        self.tableau
            .iter()
            .flatten()
            .chain(&self.stock)
            .chain(self.foundations.iter().flatten())
            .map(|instance| instance.card)
    }

    /// Total number of cards.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards().count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Length of each tableau column (or board row).
    #[must_use]
    pub fn column_lengths(&self) -> Vec<usize> {
        self.tableau.iter().map(Vec::len).collect()
    }

    /// The deal's layout shape.
    #[must_use]
    pub fn shape(&self) -> LayoutShape {
        LayoutShape {
            columns: self.column_lengths(),
            stock: self.stock.len(),
            foundations: self.foundations.iter().map(Vec::len).collect(),
        }
    }

    /// Check that the deal holds exactly the cards of `deck`.
    pub fn verify(&self, deck: &DeckSpec) -> Result<(), EngineError> {
        let expected = deck.multiset();
        let actual = count_cards(self.cards());
        if actual == expected {
            return Ok(());
        }

        let mut cards: Vec<Card> = expected.keys().chain(actual.keys()).copied().collect();
        cards.sort();
        cards.dedup();
        let detail = cards
            .into_iter()
            .find_map(|card| {
                let want = expected.get(&card).copied().unwrap_or(0);
                let have = actual.get(&card).copied().unwrap_or(0);
                (want != have).then(|| format!("{card}: expected {want}, found {have}"))
            })
            .unwrap_or_default();
        Err(EngineError::DeckMismatch(detail))
    }

    /// Same-suit, rank-descending seams across the tableau columns.
    #[must_use]
    pub fn same_suit_seams(&self) -> usize {
        let columns: Vec<Vec<Card>> = self
            .tableau
            .iter()
            .map(|column| column.iter().map(|c| c.card).collect())
            .collect();
        same_suit_seams(columns.iter().map(Vec::as_slice))
    }
}

/// Card counts of a layout: column sizes, stock size, foundation sizes.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutShape {
    pub columns: Vec<usize>,
    pub stock: usize,
    pub foundations: Vec<usize>,
}

impl LayoutShape {
    /// Cards in the tableau.
    #[must_use]
    pub fn tableau_cards(&self) -> usize {
        self.columns.iter().sum()
    }

    /// Cards in the whole layout.
    #[must_use]
    pub fn total(&self) -> usize {
        self.tableau_cards() + self.stock + self.foundations.iter().sum::<usize>()
    }
}

/// Per-variant deal generator.
///
/// The provided [`DealGenerator::generate`] runs the common pipeline; a
/// variant fills in the hooks it needs.
pub trait DealGenerator {
    /// Which variant this generator deals.
    fn variant(&self) -> Variant;

    /// Deck for a variant parameter.
    fn deck(&self, _param: u8) -> DeckSpec {
        DeckSpec::standard()
    }

    /// Fixed layout for a variant parameter.
    fn shape(&self, param: u8) -> LayoutShape;

    /// Face orientation of the card at `row` of `column` (of `len` cards).
    ///
    /// Board variants deal one board row per column, so `column` is the
    /// board row there.
    fn face_up(&self, _column: usize, row: usize, len: usize) -> bool {
        row + 1 == len
    }

    /// Remove cards that are placed before the shuffle and return the
    /// foundations they start on.
    fn pre_place(&self, _cards: &mut Vec<Card>) -> Vec<Vec<CardInstance>> {
        Vec::new()
    }

    /// Rearrange the shuffled deck before slicing.
    fn arrange(&self, _config: &DealConfig, _cards: &mut [Card], _rng: &GameRng) {}

    /// Slice the tableau columns off the arranged deck.
    fn slice(&self, dealer: &mut Dealer, shape: &LayoutShape) -> Result<Vec<Vec<Card>>, EngineError> {
        dealer.columns(&shape.columns)
    }

    /// Generate a deal.
    ///
    /// Fails with `UnsupportedParam` for parameters the variant does not
    /// define and with `GeneratorExhausted` if the layout does not fit the
    /// deck.
    fn generate(&self, config: &DealConfig) -> Result<Deal, EngineError> {
        config.validate()?;
        if config.variant != self.variant() {
            return Err(EngineError::LayoutMismatch {
                variant: self.variant(),
                detail: format!("config is for {}", config.variant),
            });
        }

        let deck = self.deck(config.param);
        let shape = self.shape(config.param);
        let mut cards = deck.build();
        let foundations = self.pre_place(&mut cards);

        let rng = GameRng::new(config.seed);
        rng.for_context("shuffle").shuffle(&mut cards);
        self.arrange(config, &mut cards, &rng);

        let mut dealer = Dealer::new(cards);
        let columns = self.slice(&mut dealer, &shape)?;
        dealer_stock_check(&dealer, &shape)?;

        let tableau = columns
            .into_iter()
            .enumerate()
            .map(|(column, cards)| orient(cards, |row, len| self.face_up(column, row, len)))
            .collect();
        let stock = dealer.rest().into_iter().map(CardInstance::face_down).collect();

        let deal = Deal {
            config: *config,
            tableau,
            stock,
            foundations,
        };
        deal.verify(&deck)?;

        tracing::debug!(
            variant = %config.variant,
            seed = config.seed,
            param = config.param,
            stock = deal.stock.len(),
            "deal generated"
        );
        Ok(deal)
    }
}

fn dealer_stock_check(dealer: &Dealer, shape: &LayoutShape) -> Result<(), EngineError> {
    if dealer.remaining() < shape.stock {
        return Err(EngineError::GeneratorExhausted {
            requested: shape.stock,
            remaining: dealer.remaining(),
        });
    }
    Ok(())
}

/// The default generator for a variant.
#[must_use]
pub fn generator_for(variant: Variant) -> Box<dyn DealGenerator> {
    use crate::games::{Klondike, MonteCarlo, Octagon, Pyramid, Spider, TriPeaks, Yukon};

    match variant {
        Variant::Klondike => Box::new(Klondike::default()),
        Variant::Spider => Box::new(Spider::default()),
        Variant::Yukon => Box::new(Yukon::default()),
        Variant::Pyramid => Box::new(Pyramid::default()),
        Variant::TriPeaks => Box::new(TriPeaks::default()),
        Variant::MonteCarlo => Box::new(MonteCarlo::default()),
        Variant::Octagon => Box::new(Octagon::default()),
    }
}

/// Generate a deal with the variant's default generator.
pub fn generate_deal(config: &DealConfig) -> Result<Deal, EngineError> {
    generator_for(config.variant).generate(config)
}

/// The layout every deal for `config` must have.
pub fn expected_shape(config: &DealConfig) -> Result<LayoutShape, EngineError> {
    config.validate()?;
    Ok(generator_for(config.variant).shape(config.param))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::Suit;
    use crate::core::Difficulty;

    #[test]
    fn test_klondike_layout() {
        let deal = generate_deal(&DealConfig::new(Variant::Klondike, 1)).unwrap();
        assert_eq!(deal.column_lengths(), vec![1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(deal.stock.len(), 24);
        assert!(deal.foundations.is_empty());
    }

    #[test]
    fn test_same_config_same_deal() {
        let config = DealConfig::new(Variant::Spider, 99).with_difficulty(Difficulty::Hard);
        assert_eq!(generate_deal(&config).unwrap(), generate_deal(&config).unwrap());
    }

    #[test]
    fn test_different_seeds_differ() {
        let a = generate_deal(&DealConfig::new(Variant::Klondike, 1)).unwrap();
        let b = generate_deal(&DealConfig::new(Variant::Klondike, 2)).unwrap();
        assert_ne!(a.tableau, b.tableau);
    }

    #[test]
    fn test_unsupported_param() {
        let config = DealConfig::new(Variant::Spider, 1).with_param(3);
        assert_eq!(
            generate_deal(&config),
            Err(EngineError::UnsupportedParam {
                variant: Variant::Spider,
                param: 3
            })
        );
    }

    #[test]
    fn test_verify_reports_mismatch() {
        let mut deal = generate_deal(&DealConfig::new(Variant::Klondike, 5)).unwrap();
        deal.stock.pop();
        deal.stock.push(CardInstance::face_down(deal.tableau[0][0].card));

        let err = deal.verify(&DeckSpec::standard()).unwrap_err();
        assert!(matches!(err, EngineError::DeckMismatch(_)));
    }

    #[test]
    fn test_shape_matches_expected() {
        for variant in Variant::ALL {
            for &param in variant.accepted_params() {
                let config = DealConfig::new(variant, 3).with_param(param);
                let deal = generate_deal(&config).unwrap();
                assert_eq!(deal.shape(), expected_shape(&config).unwrap(), "{variant} {param}");
            }
        }
    }

    #[test]
    fn test_seams_counted_per_column() {
        let mut deal = generate_deal(&DealConfig::new(Variant::Klondike, 5)).unwrap();
        deal.tableau = vec![
            vec![
                CardInstance::face_down(Card::new(Suit::Clubs, 5)),
                CardInstance::face_up(Card::new(Suit::Clubs, 4)),
            ],
            vec![CardInstance::face_up(Card::new(Suit::Clubs, 3))],
        ];
        assert_eq!(deal.same_suit_seams(), 1);
    }
}
