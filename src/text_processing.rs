//! # Text Processing Module
//!
//! This module recovers a structured ingredient list from free-form meal notes
//! and shopping lists.
//!
//! ## Features
//!
//! - Several competing grammars, each an independent matcher strategy:
//!   - `"Ground beef (1 lb)"`: name before a parenthesized quantity
//!   - `"2 lbs chicken breast"`: quantity and unit before the name
//!   - `"3 lbs of rice"`: natural-language "of" form
//!   - `"2 cups of milk"`: "of" form restricted to volumetric units
//!   - `"salmon"`: a closed vocabulary of bare ingredient names
//! - All matchers run over the full text and their candidates are pooled
//! - Names are cleaned, short noise matches dropped, duplicates removed
//!   (first occurrence wins)

use regex::Regex;
use std::collections::HashSet;
use tracing::{debug, info, trace};

use crate::measurement_patterns::{
    BARE_NAME_REGEX, LEADING_QUANTITY_REGEX, PARENTHESIZED_QUANTITY_REGEX, QUANTITY_OF_REGEX,
    VOLUMETRIC_OF_REGEX,
};
use crate::store_types::Ingredient;

/// One grammar used to find ingredient mentions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatcherKind {
    /// "Ground beef (1 lb)"
    ParenthesizedQuantity,
    /// "2 lbs chicken breast"
    LeadingQuantity,
    /// "3 lbs of rice"
    QuantityOf,
    /// "2 cups of milk"
    VolumetricOf,
    /// "salmon"
    BareName,
}

impl MatcherKind {
    /// Every matcher, in extraction order
    pub const ALL: [MatcherKind; 5] = [
        MatcherKind::ParenthesizedQuantity,
        MatcherKind::LeadingQuantity,
        MatcherKind::QuantityOf,
        MatcherKind::VolumetricOf,
        MatcherKind::BareName,
    ];

    fn regex(&self) -> &'static Regex {
        match self {
            MatcherKind::ParenthesizedQuantity => &PARENTHESIZED_QUANTITY_REGEX,
            MatcherKind::LeadingQuantity => &LEADING_QUANTITY_REGEX,
            MatcherKind::QuantityOf => &QUANTITY_OF_REGEX,
            MatcherKind::VolumetricOf => &VOLUMETRIC_OF_REGEX,
            MatcherKind::BareName => &BARE_NAME_REGEX,
        }
    }

    /// Run this matcher over the text, yielding raw candidates in position order
    fn candidates(&self, text: &str) -> Vec<Candidate> {
        self.regex()
            .captures_iter(text)
            .filter_map(|caps| {
                let group = |i: usize| caps.get(i).map(|m| m.as_str()).unwrap_or("");
                let offset = caps.get(0).map(|m| m.start()).unwrap_or(0);
                let (name, quantity, unit) = match self {
                    MatcherKind::ParenthesizedQuantity => (group(1), group(2), group(3)),
                    MatcherKind::LeadingQuantity
                    | MatcherKind::QuantityOf
                    | MatcherKind::VolumetricOf => (group(3), group(1), group(2)),
                    MatcherKind::BareName => (group(1), "1", ""),
                };
                if name.is_empty() {
                    return None;
                }
                Some(Candidate {
                    kind: *self,
                    name: name.to_string(),
                    quantity: quantity.to_string(),
                    unit: unit.to_string(),
                    offset,
                })
            })
            .collect()
    }
}

/// A raw ingredient mention before cleaning and deduplication
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    /// The matcher that produced this mention
    pub kind: MatcherKind,
    /// The name exactly as it appeared in the text
    pub name: String,
    pub quantity: String,
    pub unit: String,
    /// Byte offset of the match in the notes
    pub offset: usize,
}

/// Configuration options for ingredient extraction
#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    /// Names shorter than this many characters are treated as noise
    pub min_name_length: usize,
    /// Matchers to run, in extraction order
    pub enabled_matchers: Vec<MatcherKind>,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            min_name_length: 3,
            enabled_matchers: MatcherKind::ALL.to_vec(),
        }
    }
}

/// Ingredient extractor for meal notes
#[derive(Debug, Clone, Default)]
pub struct IngredientExtractor {
    config: ExtractorConfig,
}

impl IngredientExtractor {
    /// Create an extractor running every matcher
    ///
    /// # Examples
    ///
    /// ```rust
    /// use mealwise::text_processing::IngredientExtractor;
    ///
    /// let extractor = IngredientExtractor::new();
    /// let ingredients = extractor.extract("Ground beef (1 lb)");
    ///
    /// assert_eq!(ingredients.len(), 1);
    /// assert_eq!(ingredients[0].name, "ground beef");
    /// assert_eq!(ingredients[0].quantity, "1");
    /// assert_eq!(ingredients[0].unit, "lb");
    /// ```
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an extractor with custom configuration
    pub fn with_config(config: ExtractorConfig) -> Self {
        debug!(
            "Creating IngredientExtractor: min_name_length={}, matchers={:?}",
            config.min_name_length, config.enabled_matchers
        );
        Self { config }
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Run every enabled matcher and pool the raw candidates
    ///
    /// Candidates are ordered by matcher, then by position in the text.
    /// Nothing is cleaned or deduplicated.
    pub fn extract_candidates(&self, notes: &str) -> Vec<Candidate> {
        self.config
            .enabled_matchers
            .iter()
            .flat_map(|kind| {
                let found = kind.candidates(notes);
                trace!("Matcher {:?} produced {} candidates", kind, found.len());
                found
            })
            .collect()
    }

    /// Extract a deduplicated ingredient list from notes
    ///
    /// Names are trimmed, whitespace-collapsed and lowercased. Names of two
    /// characters or fewer are dropped. When several mentions share a name,
    /// the first one in extraction order is kept.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use mealwise::text_processing::IngredientExtractor;
    ///
    /// let extractor = IngredientExtractor::new();
    /// let ingredients = extractor.extract("2 cups of milk");
    ///
    /// let milk = ingredients.iter().find(|i| i.name == "milk").unwrap();
    /// assert_eq!(milk.quantity, "2");
    /// assert_eq!(milk.unit, "cups");
    ///
    /// assert!(extractor.extract("").is_empty());
    /// ```
    pub fn extract(&self, notes: &str) -> Vec<Ingredient> {
        let mut seen: HashSet<String> = HashSet::new();
        let mut ingredients = Vec::new();

        for candidate in self.extract_candidates(notes) {
            let name = clean_name(&candidate.name);
            if name.chars().count() < self.config.min_name_length {
                trace!("Dropping short candidate '{}'", candidate.name);
                continue;
            }
            if !seen.insert(name.clone()) {
                trace!("Dropping duplicate '{}' from {:?}", name, candidate.kind);
                continue;
            }

            let ingredient = Ingredient {
                name,
                quantity: candidate.quantity,
                unit: candidate.unit,
            };
            debug!("Extracted ingredient via {:?}: {}", candidate.kind, ingredient);
            ingredients.push(ingredient);
        }

        info!("Extracted {} ingredients from notes", ingredients.len());
        ingredients
    }
}

/// Extract ingredients with the default configuration
pub fn extract_ingredients(notes: &str) -> Vec<Ingredient> {
    IngredientExtractor::new().extract(notes)
}

/// Trim, collapse inner whitespace and lowercase a raw name
fn clean_name(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<&str>>()
        .join(" ")
        .to_lowercase()
}
