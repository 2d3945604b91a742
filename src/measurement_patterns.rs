//! # Measurement Patterns Module
//!
//! This module contains regex patterns and vocabularies used for ingredient
//! extraction from free-form notes.

use lazy_static::lazy_static;
use regex::Regex;

/// Units recognized after a quantity, as a regex alternation
pub const UNIT_ALTERNATION: &str = concat!(
    r"lbs?|pounds?|oz|ounces?|kg|kilograms?|g|grams?|",
    r"bags?|box(?:es)?|cans?|jars?|bottles?|packages?|pkg|pieces?|slices?|",
    r"cups?|tablespoons?|tsp|teaspoons?|tbsp|",
    r"cloves?|large|medium|small|packet|pinch|block|head|bunch"
);

/// Volumetric units allowed in the "<qty> <unit> of <name>" form
pub const VOLUMETRIC_UNIT_ALTERNATION: &str = r"cups?|tablespoons?|tsp|teaspoons?|tbsp";

/// Integer or decimal quantity
const QUANTITY: &str = r"(\d+(?:\.\d+)?)";

/// Ingredient name: letters and spaces, never crossing a line break
const NAME: &str = r"([a-zA-Z \t]+)";

/// Ingredient names recognized without any quantity
pub const BARE_INGREDIENT_VOCABULARY: &[&str] = &[
    // Proteins
    "chicken breast", "chicken thigh", "chicken wing", "chicken drumstick", "ground chicken",
    "ground beef", "beef steak", "beef roast", "pork chop", "pork tenderloin", "ground pork",
    "turkey breast", "ground turkey", "lamb chop", "lamb leg", "ground lamb", "bacon", "sausage",
    "tofu", "tempeh", "eggs",
    // Seafood
    "salmon", "tuna", "cod", "tilapia", "shrimp", "lobster", "crab", "scallops",
    // Grains and pasta
    "rice", "brown rice", "pasta", "spaghetti", "noodles", "quinoa", "barley", "oats", "couscous",
    "polenta", "grits", "bulgur", "bread", "tortillas", "bread crumbs", "panko", "flour",
    // Legumes
    "beans", "black beans", "kidney beans", "pinto beans", "navy beans", "garbanzo beans",
    "chickpeas", "lentils", "split peas", "green beans", "edamame",
    // Vegetables
    "garlic", "onion", "red onion", "green onion", "scallion", "shallot", "leek", "tomato",
    "cherry tomatoes", "potato", "sweet potato", "carrot", "celery", "broccoli", "cauliflower",
    "spinach", "lettuce", "kale", "cabbage", "red cabbage", "bok choy", "arugula", "cucumber",
    "zucchini", "butternut squash", "pumpkin", "asparagus", "artichoke", "avocado",
    "bell pepper", "jalapeno", "mushrooms", "portobello", "shiitake", "corn", "peas",
    "brussels sprouts", "beet", "radish", "eggplant",
    // Dairy
    "milk", "whole milk", "almond milk", "oat milk", "soy milk", "coconut milk", "buttermilk",
    "butter", "cream", "heavy cream", "sour cream", "cream cheese", "cheese", "cheddar",
    "mozzarella", "parmesan", "feta", "ricotta", "goat cheese", "yogurt", "greek yogurt",
    // Oils and condiments
    "oil", "olive oil", "vegetable oil", "canola oil", "sesame oil", "vinegar",
    "balsamic vinegar", "apple cider vinegar", "red wine vinegar", "soy sauce", "hot sauce",
    "tomato sauce", "ketchup", "mustard", "mayonnaise", "salsa", "honey", "maple syrup",
    "lemon juice", "lime juice",
    // Herbs and spices
    "salt", "sea salt", "kosher salt", "pepper", "black pepper", "red pepper flakes", "ginger",
    "basil", "oregano", "thyme", "rosemary", "parsley", "cilantro", "mint", "sage",
    "bay leaves", "paprika", "cumin", "coriander", "turmeric", "curry", "chili powder",
    "cayenne", "cinnamon", "nutmeg", "saffron",
    // Baking
    "sugar", "brown sugar", "powdered sugar", "baking powder", "baking soda", "cornstarch",
    "yeast", "vanilla extract", "chocolate chips",
    // Nuts and seeds
    "almonds", "walnuts", "pecans", "cashews", "peanuts", "peanut butter", "sunflower seeds",
    "chia seeds", "flax seeds",
    // Fruits
    "apples", "bananas", "oranges", "lemons", "limes", "grapes", "strawberries", "blueberries",
    "raspberries", "pineapple", "mango", "peaches", "pears", "raisins",
];

/// Build the bare-name alternation, preferring longer phrases over their prefixes
fn bare_name_alternation() -> String {
    let mut names: Vec<&str> = BARE_INGREDIENT_VOCABULARY.to_vec();
    names.sort_by(|a, b| b.len().cmp(&a.len()));
    names
        .iter()
        .map(|name| {
            name.split_whitespace()
                .map(regex::escape)
                .collect::<Vec<_>>()
                .join(r"\s+")
        })
        .collect::<Vec<_>>()
        .join("|")
}

lazy_static! {
    /// "Ground beef (1 lb)"
    pub static ref PARENTHESIZED_QUANTITY_REGEX: Regex = Regex::new(&format!(
        r"(?i){NAME}\s*\({QUANTITY}\s*({UNIT_ALTERNATION})\)"
    ))
    .expect("Parenthesized quantity pattern should be valid");

    /// "2 lbs chicken breast"
    pub static ref LEADING_QUANTITY_REGEX: Regex = Regex::new(&format!(
        r"(?i){QUANTITY}\s*({UNIT_ALTERNATION})\s+{NAME}"
    ))
    .expect("Leading quantity pattern should be valid");

    /// "3lbs of rice"
    pub static ref QUANTITY_OF_REGEX: Regex = Regex::new(&format!(
        r"(?i){QUANTITY}\s*({UNIT_ALTERNATION})\s+of\s+{NAME}"
    ))
    .expect("Quantity-of pattern should be valid");

    /// "2 cups of milk"
    pub static ref VOLUMETRIC_OF_REGEX: Regex = Regex::new(&format!(
        r"(?i){QUANTITY}\s*({VOLUMETRIC_UNIT_ALTERNATION})\s+of\s+{NAME}"
    ))
    .expect("Volumetric-of pattern should be valid");

    /// "chicken breast" with no quantity
    pub static ref BARE_NAME_REGEX: Regex = Regex::new(&format!(
        r"(?i)(?:^|,|\s)({})",
        bare_name_alternation()
    ))
    .expect("Bare ingredient name pattern should be valid");
}
