#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use mealwise::config::{PriceCategory, PricingConfig};
    use mealwise::cost::{aggregate, cheapest_per_ingredient};
    use mealwise::price_oracle::{PriceOracle, PriceSource, SyntheticPriceSource};
    use mealwise::store_types::{Ingredient, Store, StoreChain, StoreSearchResult};
    use mealwise::text_processing::extract_ingredients;
    use rand::rngs::StdRng;
    use rand::{RngCore, SeedableRng};

    fn create_stores(count: usize) -> Vec<Store> {
        (0..count)
            .map(|i| Store {
                id: format!("store{i}"),
                name: format!("Store {i}"),
                address: format!("{i} Main St"),
                chain: if i % 2 == 0 { StoreChain::Kroger } else { StoreChain::Walmart },
                distance: i as f64,
                latitude: 33.7,
                longitude: -84.4,
            })
            .collect()
    }

    fn shopping_list() -> Vec<Ingredient> {
        vec![
            Ingredient::new("chicken breast", "2", "lbs"),
            Ingredient::new("rice", "1", "bag"),
            Ingredient::new("olive oil", "2", "tbsp"),
            Ingredient::new("parmesan", "200", "g"),
            Ingredient::bare("eggs"),
        ]
    }

    /// Flat price, out of stock at store ids ending in 1
    struct FlatPrice(f64);

    impl PriceSource for FlatPrice {
        fn unit_price(&self, _: &Ingredient, _: &Store, _: &mut dyn RngCore) -> f64 {
            self.0
        }

        fn is_available(&self, _: &Ingredient, store: &Store, _: &mut dyn RngCore) -> bool {
            !store.id.ends_with('1')
        }
    }

    #[test]
    fn test_quote_covers_every_pair() {
        let oracle = PriceOracle::default();
        let ingredients = shopping_list();
        let stores = create_stores(4);

        let prices = oracle.quote(&ingredients, &stores, &mut StdRng::seed_from_u64(2024));

        assert_eq!(prices.len(), ingredients.len() * stores.len());
        for ingredient in &ingredients {
            for store in &stores {
                assert_eq!(
                    prices
                        .iter()
                        .filter(|p| p.ingredient == ingredient.name && p.store_id == store.id)
                        .count(),
                    1
                );
            }
        }
        assert!(prices.iter().all(|p| p.price >= 0.0 && p.unit_price >= 0.0));
    }

    #[test]
    fn test_total_matches_cheapest_available_sum() {
        let oracle = PriceOracle::default();
        let ingredients = shopping_list();
        let stores = create_stores(6);
        let prices = oracle.quote(&ingredients, &stores, &mut StdRng::seed_from_u64(7));

        let cheapest = cheapest_per_ingredient(&prices, &ingredients);
        let expected: f64 = cheapest.iter().map(|p| p.price).sum();
        assert!(cheapest
            .windows(2)
            .all(|w| {
                let position = |name: &str| ingredients.iter().position(|i| i.name == name);
                position(&w[0].ingredient) < position(&w[1].ingredient)
            }));

        let total = aggregate(&prices, &ingredients);
        assert!((total - expected).abs() < 0.005);
        assert!(total >= 0.0);
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let oracle = PriceOracle::default();
        let ingredients = shopping_list();
        let stores = create_stores(3);

        let first = oracle.quote(&ingredients, &stores, &mut StdRng::seed_from_u64(31));
        let second = oracle.quote(&ingredients, &stores, &mut StdRng::seed_from_u64(31));

        assert_eq!(aggregate(&first, &ingredients), aggregate(&second, &ingredients));
        for (a, b) in first.iter().zip(&second) {
            assert_eq!(a.price, b.price);
            assert_eq!(a.availability, b.availability);
        }
    }

    #[test]
    fn test_custom_category_table() {
        let config = PricingConfig {
            categories: vec![PriceCategory::new("truffles", &["truffle"], 40.0, 40.0)],
            default_range: (1.0, 1.0),
            store_variation: 0.0,
            availability_rate: 1.0,
        };
        let oracle = PriceOracle::new(config);
        let ingredients = vec![
            Ingredient::new("black truffle", "8", "oz"),
            Ingredient::bare("salt"),
        ];

        let stores = create_stores(1);
        let prices = oracle.quote(&ingredients, &stores, &mut StdRng::seed_from_u64(0));

        assert_eq!(prices[0].unit_price, 40.0);
        assert_eq!(prices[0].price, 20.0);
        assert_eq!(prices[1].price, 1.0);
        assert_eq!(aggregate(&prices, &ingredients), 21.0);
    }

    #[test]
    fn test_unavailable_quotes_are_not_counted() {
        let oracle = PriceOracle::with_default_source(Arc::new(FlatPrice(5.0)))
            .with_chain_source(StoreChain::Walmart, Arc::new(FlatPrice(1.0)));
        let ingredients = vec![Ingredient::bare("eggs")];
        // store1 is the only Walmart and is unavailable
        let stores = create_stores(2);
        let prices = oracle.quote(&ingredients, &stores, &mut StdRng::seed_from_u64(0));

        assert_eq!(prices[1].price, 1.0);
        assert!(!prices[1].availability);
        assert_eq!(aggregate(&prices, &ingredients), 5.0);
    }

    #[test]
    fn test_oversized_quantity_from_notes_prices_finitely() {
        let notes = format!("17{} kg of beef", "0".repeat(307));
        let ingredients = extract_ingredients(&notes);
        assert!(!ingredients.is_empty());

        let prices = PriceOracle::default().quote(
            &ingredients,
            &create_stores(2),
            &mut StdRng::seed_from_u64(4),
        );

        assert!(prices.iter().all(|p| p.price.is_finite() && p.price >= 0.0));
        assert!(aggregate(&prices, &ingredients).is_finite());
    }

    #[test]
    fn test_synthetic_source_direct_use() {
        let source = SyntheticPriceSource::default();
        let stores = create_stores(1);
        let store = &stores[0];
        let mut rng = StdRng::seed_from_u64(8);
        for _ in 0..100 {
            let price = source.unit_price(&Ingredient::bare("shrimp"), store, &mut rng);
            assert!((5.40..=9.90).contains(&price), "{price}");
        }
    }

    #[test]
    fn test_result_helpers() {
        let oracle = PriceOracle::default();
        let ingredients = shopping_list();
        let stores = create_stores(3);
        let prices = oracle.quote(&ingredients, &stores, &mut StdRng::seed_from_u64(12));
        let result = StoreSearchResult {
            total_estimated_cost: aggregate(&prices, &ingredients),
            stores,
            prices,
        };

        assert_eq!(result.prices_for_ingredient("rice").count(), 3);
        assert_eq!(result.prices_for_store("store0").count(), ingredients.len());
        assert_eq!(result.priced_ingredients().len(), ingredients.len());
        if let Some(best) = result.cheapest_available("rice") {
            assert!(best.availability);
            assert!(result
                .prices_for_ingredient("rice")
                .filter(|p| p.availability)
                .all(|p| p.price >= best.price));
        }
    }
}
