//! # Unit Conversion Module
//!
//! Normalizes a raw (quantity, unit) pair into the canonical quantity used for
//! pricing. Synthetic prices are quoted per pound for weights and per item for
//! everything else, with volumetric units priced as a fraction of a unit.

use lazy_static::lazy_static;
use regex::Regex;
use tracing::trace;

pub const GRAMS_PER_POUND: f64 = 453.592;
pub const POUNDS_PER_KILOGRAM: f64 = 2.20462;
pub const OUNCES_PER_POUND: f64 = 16.0;

pub const CUP_PRICE_FACTOR: f64 = 0.5;
pub const TABLESPOON_PRICE_FACTOR: f64 = 0.1;
pub const TEASPOON_PRICE_FACTOR: f64 = 0.05;

/// Largest quantity taken at face value, keeping every adjusted quantity finite
pub const MAX_QUANTITY: f64 = 1_000_000.0;

lazy_static! {
    static ref LEADING_NUMBER: Regex =
        Regex::new(r"^\s*\+?(\d+(?:\.\d*)?|\.\d+)")
            .expect("Leading number pattern should be valid");
}

/// Pricing rule selected for a raw unit string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PricingUnit {
    Grams,
    Kilograms,
    Ounces,
    Cups,
    Tablespoons,
    Teaspoons,
    /// Counts, packages and anything unrecognized, priced per item
    Other,
}

impl PricingUnit {
    /// Classify a raw unit string, first matching rule wins
    ///
    /// # Examples
    ///
    /// ```rust
    /// use mealwise::unit_conversion::PricingUnit;
    ///
    /// assert_eq!(PricingUnit::classify("Grams"), PricingUnit::Grams);
    /// assert_eq!(PricingUnit::classify("kg"), PricingUnit::Kilograms);
    /// assert_eq!(PricingUnit::classify("bag"), PricingUnit::Other);
    /// ```
    pub fn classify(unit: &str) -> Self {
        let unit = unit.trim().to_lowercase();
        let is_kilogram = unit == "kg" || unit.contains("kilogram");

        if unit == "g" || (unit.contains("gram") && !is_kilogram) {
            PricingUnit::Grams
        } else if is_kilogram {
            PricingUnit::Kilograms
        } else if unit.contains("oz") || unit.contains("ounce") {
            PricingUnit::Ounces
        } else if unit.contains("cup") {
            PricingUnit::Cups
        } else if unit.contains("tablespoon") || unit.contains("tbsp") {
            PricingUnit::Tablespoons
        } else if unit.contains("teaspoon") || unit.contains("tsp") {
            PricingUnit::Teaspoons
        } else {
            PricingUnit::Other
        }
    }

    /// Convert a quantity in this unit to the pricing quantity
    pub fn adjust(&self, quantity: f64) -> f64 {
        match self {
            PricingUnit::Grams => quantity / GRAMS_PER_POUND,
            PricingUnit::Kilograms => quantity * POUNDS_PER_KILOGRAM,
            PricingUnit::Ounces => quantity / OUNCES_PER_POUND,
            _ => quantity,
        }
    }

    /// Fraction of the unit price charged per unit of adjusted quantity
    pub fn price_scale_factor(&self) -> f64 {
        match self {
            PricingUnit::Cups => CUP_PRICE_FACTOR,
            PricingUnit::Tablespoons => TABLESPOON_PRICE_FACTOR,
            PricingUnit::Teaspoons => TEASPOON_PRICE_FACTOR,
            _ => 1.0,
        }
    }
}

/// Result of normalizing a raw quantity and unit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedQuantity {
    /// Quantity in pricing units (pounds for weights, unchanged otherwise)
    pub adjusted_quantity: f64,
    /// Multiplier applied to the unit price
    pub price_scale_factor: f64,
}

impl NormalizedQuantity {
    /// Total price for this quantity at the given unit price, rounded to cents
    pub fn total_price(&self, unit_price: f64) -> f64 {
        round_cents(unit_price * self.price_scale_factor * self.adjusted_quantity)
    }
}

/// Read the numeric part of a raw quantity, defaulting to one
///
/// A leading number is honoured ("2.5lbs" reads as 2.5). Missing, negative
/// or unparseable quantities are read as 1, as are quantities above
/// [`MAX_QUANTITY`].
pub fn parse_quantity(raw: &str) -> f64 {
    LEADING_NUMBER
        .captures(raw)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .filter(|q| q.is_finite() && *q <= MAX_QUANTITY)
        .unwrap_or(1.0)
}

/// Normalize a raw quantity and unit for pricing
///
/// # Examples
///
/// ```rust
/// use mealwise::unit_conversion::normalize;
///
/// let normalized = normalize("32", "oz");
/// assert_eq!(normalized.adjusted_quantity, 2.0);
/// assert_eq!(normalized.price_scale_factor, 1.0);
///
/// let normalized = normalize("2", "cups");
/// assert_eq!(normalized.adjusted_quantity, 2.0);
/// assert_eq!(normalized.price_scale_factor, 0.5);
/// ```
pub fn normalize(quantity_raw: &str, unit: &str) -> NormalizedQuantity {
    let quantity = parse_quantity(quantity_raw);
    let pricing_unit = PricingUnit::classify(unit);

    let normalized = NormalizedQuantity {
        adjusted_quantity: pricing_unit.adjust(quantity),
        price_scale_factor: pricing_unit.price_scale_factor(),
    };
    trace!(
        "Normalized '{}' '{}' as {:?}: {:?}",
        quantity_raw,
        unit,
        pricing_unit,
        normalized
    );
    normalized
}

/// Round a money amount to two decimal places
pub fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}
