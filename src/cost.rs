//! # Cost Module
//!
//! Estimates what a shopping list costs when every ingredient is bought
//! wherever it is cheapest. Only available quotes are considered, and an
//! ingredient nobody stocks adds nothing to the total.

use tracing::debug;

use crate::store_types::{Ingredient, StorePrice};
use crate::unit_conversion::round_cents;

/// Cheapest available quote for each ingredient, in ingredient order
///
/// Ingredients without an available quote are skipped. Ties keep the
/// earliest quote.
///
/// # Examples
///
/// ```rust
/// use mealwise::cost::cheapest_per_ingredient;
/// use mealwise::store_types::Ingredient;
///
/// let cheapest = cheapest_per_ingredient(&[], &[Ingredient::bare("salt")]);
/// assert!(cheapest.is_empty());
/// ```
pub fn cheapest_per_ingredient<'a>(
    prices: &'a [StorePrice],
    ingredients: &[Ingredient],
) -> Vec<&'a StorePrice> {
    ingredients
        .iter()
        .filter_map(|ingredient| {
            let best = prices
                .iter()
                .filter(|q| q.availability && q.ingredient == ingredient.name)
                .fold(None, |best: Option<&StorePrice>, q| match best {
                    Some(b) if b.price <= q.price => Some(b),
                    _ => Some(q),
                });
            if best.is_none() {
                debug!("No available price for {}", ingredient.name);
            }
            best
        })
        .collect()
}

/// Sum of the cheapest available price of each ingredient, rounded to cents
///
/// # Examples
///
/// ```rust
/// use mealwise::cost::aggregate;
/// use mealwise::store_types::Ingredient;
///
/// assert_eq!(aggregate(&[], &[Ingredient::bare("salt")]), 0.0);
/// ```
pub fn aggregate(prices: &[StorePrice], ingredients: &[Ingredient]) -> f64 {
    let total: f64 = cheapest_per_ingredient(prices, ingredients)
        .iter()
        .map(|quote| quote.price)
        .sum();
    round_cents(total)
}
