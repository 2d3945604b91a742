//! # Store Types Module
//!
//! This module defines the core types that flow through the store search
//! pipeline: parsed ingredients, nearby stores, price quotes and the final
//! search result.
//!
//! All types serialize with camelCase field names so a web client can
//! consume them unchanged.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Represents an ingredient parsed out of free-form notes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    /// Lowercased, trimmed name (e.g., "ground beef"). Unique within one extraction.
    pub name: String,
    /// The raw quantity text (e.g., "2", "1.5"). Bare-name matches use "1".
    #[serde(default = "default_quantity")]
    pub quantity: String,
    /// The raw unit text (e.g., "lbs", "cups"), empty when none was given
    #[serde(default)]
    pub unit: String,
}

fn default_quantity() -> String {
    "1".to_string()
}

impl Ingredient {
    /// Create an ingredient with an explicit quantity and unit
    pub fn new(name: &str, quantity: &str, unit: &str) -> Self {
        Self {
            name: name.to_string(),
            quantity: quantity.to_string(),
            unit: unit.to_string(),
        }
    }

    /// Create an ingredient with the default quantity of one and no unit
    pub fn bare(name: &str) -> Self {
        Self::new(name, "1", "")
    }
}

impl fmt::Display for Ingredient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.unit.is_empty() {
            write!(f, "{} {}", self.quantity, self.name)
        } else {
            write!(f, "{} {} {}", self.quantity, self.unit, self.name)
        }
    }
}

/// Supported retail grocery chains
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreChain {
    Kroger,
    Walmart,
}

impl StoreChain {
    /// Every chain the locator knows how to search for
    pub const ALL: [StoreChain; 2] = [StoreChain::Kroger, StoreChain::Walmart];

    /// Lowercase identifier, used as the store id prefix
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreChain::Kroger => "kroger",
            StoreChain::Walmart => "walmart",
        }
    }

    /// Display name, used as the places-search keyword
    pub fn keyword(&self) -> &'static str {
        match self {
            StoreChain::Kroger => "Kroger",
            StoreChain::Walmart => "Walmart",
        }
    }
}

impl fmt::Display for StoreChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// A nearby store of a supported chain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Store {
    /// Chain-prefixed identifier (e.g., "kroger_ChIJ...")
    pub id: String,
    pub name: String,
    pub address: String,
    pub chain: StoreChain,
    /// Great-circle distance in miles from the query location
    pub distance: f64,
    pub latitude: f64,
    pub longitude: f64,
}

/// A synthesized price for one ingredient at one store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorePrice {
    pub store_id: String,
    pub store_name: String,
    pub chain: StoreChain,
    /// Name key matching `Ingredient::name`
    pub ingredient: String,
    /// Total price for the requested quantity
    pub price: f64,
    /// Price per canonical unit (per pound or per item)
    pub unit_price: f64,
    /// Display unit, "per item" when the ingredient had none
    pub unit: String,
    /// Parsed numeric quantity
    pub quantity: f64,
    pub availability: bool,
    pub last_updated: DateTime<Utc>,
}

/// Aggregate output of one full search
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreSearchResult {
    pub stores: Vec<Store>,
    pub prices: Vec<StorePrice>,
    pub total_estimated_cost: f64,
}

impl StoreSearchResult {
    /// The zero result: no stores, no prices, nothing to pay
    pub fn empty() -> Self {
        Self::default()
    }

    /// All quotes for one ingredient, in quote order
    pub fn prices_for_ingredient<'a>(
        &'a self,
        name: &'a str,
    ) -> impl Iterator<Item = &'a StorePrice> + 'a {
        self.prices.iter().filter(move |p| p.ingredient == name)
    }

    /// All quotes at one store
    pub fn prices_for_store<'a>(
        &'a self,
        store_id: &'a str,
    ) -> impl Iterator<Item = &'a StorePrice> + 'a {
        self.prices.iter().filter(move |p| p.store_id == store_id)
    }

    /// Distinct ingredient names in the order they first appear in the quotes
    pub fn priced_ingredients(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for price in &self.prices {
            if !names.contains(&price.ingredient.as_str()) {
                names.push(&price.ingredient);
            }
        }
        names
    }

    /// The cheapest available quote for an ingredient, if any store has it
    pub fn cheapest_available(&self, name: &str) -> Option<&StorePrice> {
        self.prices
            .iter()
            .filter(|p| p.availability && p.ingredient == name)
            .fold(None, |best: Option<&StorePrice>, p| match best {
                Some(b) if b.price <= p.price => Some(b),
                _ => Some(p),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quote(store_id: &str, ingredient: &str, price: f64, availability: bool) -> StorePrice {
        StorePrice {
            store_id: store_id.to_string(),
            store_name: format!("Store {store_id}"),
            chain: StoreChain::Kroger,
            ingredient: ingredient.to_string(),
            price,
            unit_price: price,
            unit: "per item".to_string(),
            quantity: 1.0,
            availability,
            last_updated: Utc::now(),
        }
    }

    #[test]
    fn test_ingredient_display() {
        assert_eq!(Ingredient::new("ground beef", "1", "lb").to_string(), "1 lb ground beef");
        assert_eq!(Ingredient::bare("rice").to_string(), "1 rice");
    }

    #[test]
    fn test_chain_names() {
        assert_eq!(StoreChain::Kroger.as_str(), "kroger");
        assert_eq!(StoreChain::Walmart.keyword(), "Walmart");
        assert_eq!(
            serde_json::to_string(&StoreChain::Walmart).unwrap(),
            "\"walmart\""
        );
    }

    #[test]
    fn test_search_result_serializes_camel_case() {
        let result = StoreSearchResult {
            stores: vec![],
            prices: vec![quote("kroger_1", "rice", 1.5, true)],
            total_estimated_cost: 1.5,
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["totalEstimatedCost"], 1.5);
        assert_eq!(json["prices"][0]["storeId"], "kroger_1");
        assert!(json["prices"][0].get("unitPrice").is_some());
        assert!(json["prices"][0].get("lastUpdated").is_some());
    }

    #[test]
    fn test_ingredient_deserializes_with_defaults() {
        let ingredient: Ingredient = serde_json::from_str(r#"{"name":"salt"}"#).unwrap();
        assert_eq!(ingredient, Ingredient::bare("salt"));
    }

    #[test]
    fn test_result_queries() {
        let result = StoreSearchResult {
            stores: vec![],
            prices: vec![
                quote("a", "rice", 2.0, true),
                quote("b", "rice", 1.0, false),
                quote("c", "rice", 1.5, true),
                quote("a", "milk", 3.0, true),
            ],
            total_estimated_cost: 4.5,
        };

        assert_eq!(result.prices_for_ingredient("rice").count(), 3);
        assert_eq!(result.prices_for_store("a").count(), 2);
        assert_eq!(result.priced_ingredients(), vec!["rice", "milk"]);

        let cheapest = result.cheapest_available("rice").unwrap();
        assert_eq!(cheapest.store_id, "c");
        assert!(result.cheapest_available("eggs").is_none());
    }

    #[test]
    fn test_cheapest_available_outlives_name() {
        let result = StoreSearchResult {
            stores: vec![],
            prices: vec![quote("a", "rice", 2.0, true), quote("b", "rice", 1.0, true)],
            total_estimated_cost: 1.0,
        };

        let cheapest = {
            let name = String::from("rice");
            result.cheapest_available(&name)
        };
        assert_eq!(cheapest.map(|p| p.store_id.as_str()), Some("b"));
    }

    #[test]
    fn test_empty_result() {
        let result = StoreSearchResult::empty();
        assert!(result.stores.is_empty());
        assert!(result.prices.is_empty());
        assert_eq!(result.total_estimated_cost, 0.0);
    }
}
