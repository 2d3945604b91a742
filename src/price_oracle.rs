//! # Price Oracle Module
//!
//! Produces one price quote for every (ingredient, store) pair.
//!
//! Unit prices come from a [`PriceSource`]. The default source synthesizes
//! them from category price ranges with a small per-store variation; a real
//! vendor integration can be routed in per chain without touching the
//! quoting logic. Quantities are normalized through
//! [`crate::unit_conversion`] before the total is computed.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use rand::{Rng, RngCore};
use tracing::{debug, info};

use crate::config::PricingConfig;
use crate::store_types::{Ingredient, Store, StoreChain, StorePrice};
use crate::unit_conversion::{normalize, parse_quantity, round_cents};

/// Display unit used when an ingredient has none
pub const PER_ITEM_UNIT: &str = "per item";

/// Supplies unit prices and stock status for one or more chains
pub trait PriceSource: Send + Sync {
    /// Price per canonical unit (per pound or per item)
    fn unit_price(&self, ingredient: &Ingredient, store: &Store, rng: &mut dyn RngCore) -> f64;

    fn is_available(&self, ingredient: &Ingredient, store: &Store, rng: &mut dyn RngCore) -> bool;
}

/// Category-based synthetic prices
#[derive(Debug, Clone, Default)]
pub struct SyntheticPriceSource {
    config: PricingConfig,
}

impl SyntheticPriceSource {
    pub fn new(config: PricingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PricingConfig {
        &self.config
    }

    /// Draw a base price from the ingredient's category range
    fn base_price(&self, ingredient_name: &str, rng: &mut dyn RngCore) -> f64 {
        let (min, max) = self.config.range_for(ingredient_name);
        let (min, max) = (min.max(0.0), max.max(0.0));
        if max > min {
            rng.gen_range(min..max)
        } else {
            min
        }
    }

    /// Relative store variation in `[-store_variation, store_variation)`
    fn variation(&self, rng: &mut dyn RngCore) -> f64 {
        let spread = self.config.store_variation.abs();
        if spread > 0.0 {
            rng.gen_range(-spread..spread)
        } else {
            0.0
        }
    }
}

impl PriceSource for SyntheticPriceSource {
    fn unit_price(&self, ingredient: &Ingredient, _store: &Store, rng: &mut dyn RngCore) -> f64 {
        let base = self.base_price(&ingredient.name, rng);
        let varied = base * (1.0 + self.variation(rng));
        round_cents(varied.max(0.0))
    }

    fn is_available(
        &self,
        _ingredient: &Ingredient,
        _store: &Store,
        rng: &mut dyn RngCore,
    ) -> bool {
        rng.gen_bool(self.config.availability_rate.clamp(0.0, 1.0))
    }
}

/// Quotes ingredients across stores
pub struct PriceOracle {
    default_source: Arc<dyn PriceSource>,
    chain_sources: HashMap<StoreChain, Arc<dyn PriceSource>>,
}

impl PriceOracle {
    /// An oracle pricing every chain from the given synthetic configuration
    pub fn new(config: PricingConfig) -> Self {
        Self::with_default_source(Arc::new(SyntheticPriceSource::new(config)))
    }

    pub fn with_default_source(source: Arc<dyn PriceSource>) -> Self {
        Self {
            default_source: source,
            chain_sources: HashMap::new(),
        }
    }

    /// Route one chain to its own price source
    pub fn with_chain_source(mut self, chain: StoreChain, source: Arc<dyn PriceSource>) -> Self {
        self.chain_sources.insert(chain, source);
        self
    }

    fn source_for(&self, chain: StoreChain) -> &dyn PriceSource {
        self.chain_sources
            .get(&chain)
            .unwrap_or(&self.default_source)
            .as_ref()
    }

    /// Quote every ingredient at every store
    ///
    /// Returns exactly `ingredients.len() * stores.len()` quotes, ingredient
    /// major. Unavailable quotes keep their price and are only flagged.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use mealwise::config::PricingConfig;
    /// use mealwise::price_oracle::PriceOracle;
    /// use mealwise::store_types::{Ingredient, Store, StoreChain};
    /// use rand::{rngs::StdRng, SeedableRng};
    ///
    /// let oracle = PriceOracle::new(PricingConfig::default());
    /// let store = Store {
    ///     id: "kroger1".to_string(),
    ///     name: "Kroger".to_string(),
    ///     address: "123 Main St".to_string(),
    ///     chain: StoreChain::Kroger,
    ///     distance: 1.2,
    ///     latitude: 33.75,
    ///     longitude: -84.39,
    /// };
    /// let ingredients = vec![Ingredient::new("rice", "1", "bag")];
    ///
    /// let quotes = oracle.quote(&ingredients, &[store], &mut StdRng::seed_from_u64(1));
    /// assert_eq!(quotes.len(), 1);
    /// assert!(quotes[0].price >= 0.0);
    /// ```
    pub fn quote(
        &self,
        ingredients: &[Ingredient],
        stores: &[Store],
        rng: &mut dyn RngCore,
    ) -> Vec<StorePrice> {
        let quoted_at = Utc::now();
        let mut prices = Vec::with_capacity(ingredients.len() * stores.len());

        for ingredient in ingredients {
            let normalized = normalize(&ingredient.quantity, &ingredient.unit);
            let quantity = parse_quantity(&ingredient.quantity);
            let unit = if ingredient.unit.is_empty() {
                PER_ITEM_UNIT.to_string()
            } else {
                ingredient.unit.clone()
            };

            for store in stores {
                let source = self.source_for(store.chain);
                let unit_price = round_cents(source.unit_price(ingredient, store, rng).max(0.0));
                let price = normalized.total_price(unit_price).max(0.0);
                let availability = source.is_available(ingredient, store, rng);

                debug!(
                    "Quoted {} at {}: ${:.2} (unit ${:.2}, available={})",
                    ingredient.name, store.id, price, unit_price, availability
                );
                prices.push(StorePrice {
                    store_id: store.id.clone(),
                    store_name: store.name.clone(),
                    chain: store.chain,
                    ingredient: ingredient.name.clone(),
                    price,
                    unit_price,
                    unit: unit.clone(),
                    quantity,
                    availability,
                    last_updated: quoted_at,
                });
            }
        }

        info!(
            "Generated {} quotes for {} ingredients at {} stores",
            prices.len(),
            ingredients.len(),
            stores.len()
        );
        prices
    }
}

impl Default for PriceOracle {
    fn default() -> Self {
        Self::new(PricingConfig::default())
    }
}
