//! Default category, supplier and case size for items the operator has not
//! configured yet
//!
//! Categories come from keyword matching on the product name. Groups are
//! tested in order and the first hit wins, so overlapping keywords resolve
//! to the earlier group (a "Gin & Soda" is a spirit, a "Rosemount Shiraz" is
//! a red).

use crate::models::{Category, SupplierDefaults};

/// Ordered keyword groups, first match wins
const CATEGORY_KEYWORDS: &[(&[&str], Category)] = &[
    (
        &["nip", "rum", " gin", "vodka", "whisky", "whiskey", "bourbon", "brandy"],
        Category::Spirits,
    ),
    (&["port", "baileys", "liqueur"], Category::FortifiedLiqueurs),
    (&["cider"], Category::Cider),
    (&["sauv", "pinot gri", "chardon", "riesling"], Category::WhiteWine),
    (&["shiraz", "cabernet", "merlot", "pinot noir"], Category::RedWine),
    (&["rose", "rosé"], Category::Rose),
    (&["prosecco", "sparkling", "brut", "piccolo"], Category::Sparkling),
    (&["& dry", "canadian club"], Category::PreMix),
    (
        &["bundaberg", "ginger ale", "coke", "soda", "tonic", "lemon", "lemonade"],
        Category::SoftDrinks,
    ),
    (&["chip", "nut", "snack", "nobby", "smith", "samboy"], Category::Snacks),
];

/// Category used when no keyword matches
pub const FALLBACK_CATEGORY: Category = Category::Beer;

/// Guess a category from the product name
pub fn infer_category(name: &str) -> Category {
    let name = name.to_lowercase();
    CATEGORY_KEYWORDS
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|kw| name.contains(kw)))
        .map(|(_, category)| *category)
        .unwrap_or(FALLBACK_CATEGORY)
}

/// Default supplier for a category
pub fn infer_supplier(category: Category, suppliers: &SupplierDefaults) -> String {
    match category {
        Category::Snacks => suppliers.snacks.clone(),
        Category::SoftDrinks => suppliers.soft_drinks.clone(),
        _ => suppliers.general.clone(),
    }
}

/// Default case size for a category
pub fn infer_pack(category: Category) -> u32 {
    match category {
        Category::Beer | Category::Cider | Category::PreMix | Category::SoftDrinks => 24,
        Category::WhiteWine | Category::RedWine | Category::Rose | Category::Sparkling => 6,
        Category::Snacks => 18,
        Category::Spirits | Category::FortifiedLiqueurs => 1,
    }
}
