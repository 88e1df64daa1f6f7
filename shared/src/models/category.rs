//! Product categories and their canonical display order

use serde::{Deserialize, Serialize};

/// Product category
///
/// Declaration order is the canonical display/sort order used by order
/// sheets and reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Beer,
    Cider,
    PreMix,
    #[serde(rename = "White Wine")]
    WhiteWine,
    #[serde(rename = "Red Wine")]
    RedWine,
    Rose,
    Sparkling,
    #[serde(rename = "Fortified & Liqueurs")]
    FortifiedLiqueurs,
    Spirits,
    #[serde(rename = "Soft Drinks")]
    SoftDrinks,
    Snacks,
}

/// Sort rank given to labels that are not one of the fixed categories
pub const UNKNOWN_CATEGORY_RANK: usize = Category::ALL.len();

impl Category {
    /// All categories in canonical order
    pub const ALL: [Category; 11] = [
        Category::Beer,
        Category::Cider,
        Category::PreMix,
        Category::WhiteWine,
        Category::RedWine,
        Category::Rose,
        Category::Sparkling,
        Category::FortifiedLiqueurs,
        Category::Spirits,
        Category::SoftDrinks,
        Category::Snacks,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Category::Beer => "Beer",
            Category::Cider => "Cider",
            Category::PreMix => "PreMix",
            Category::WhiteWine => "White Wine",
            Category::RedWine => "Red Wine",
            Category::Rose => "Rose",
            Category::Sparkling => "Sparkling",
            Category::FortifiedLiqueurs => "Fortified & Liqueurs",
            Category::Spirits => "Spirits",
            Category::SoftDrinks => "Soft Drinks",
            Category::Snacks => "Snacks",
        }
    }

    /// Parse a stored label. Matching is exact, as labels are written by the
    /// settings UI from the fixed list.
    pub fn from_label(label: &str) -> Option<Category> {
        Category::ALL.into_iter().find(|c| c.label() == label)
    }

    /// Position in the canonical order (0..=10)
    pub fn rank(&self) -> usize {
        *self as usize
    }

    /// Spirit-class items are sold and counted in nips, not bottles
    pub fn is_spirit_class(&self) -> bool {
        matches!(self, Category::Spirits | Category::FortifiedLiqueurs)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Sort rank for a free-form category label; unknown labels sort last.
pub fn category_rank(label: &str) -> usize {
    Category::from_label(label)
        .map(|c| c.rank())
        .unwrap_or(UNKNOWN_CATEGORY_RANK)
}
