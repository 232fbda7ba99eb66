//! Extensible option catalogs
//!
//! Each category offers a fixed list of ingredient names which the user can
//! grow with custom entries. Entries are unique under case-insensitive
//! comparison and are never removed for the life of the catalog.

use std::collections::HashMap;

use tracing::debug;

use crate::ledger::SelectionQuantityLedger;
use crate::model::Category;

const SPIRITS: &[&str] = &["Vodka", "Gin", "Rum", "Tequila", "Whiskey"];
const NA_BASES: &[&str] = &["Soda Water", "Tonic", "Ginger Beer", "Lemonade", "Iced Tea", "Juice"];
const MIXERS: &[&str] = &[
    "Lime Juice",
    "Lemon Juice",
    "Simple Syrup",
    "Pineapple",
    "Orange",
    "Cranberry",
];
const LIQUEURS: &[&str] = &[
    "Triple Sec",
    "Aperol",
    "Amaretto",
    "Midori",
    "Peach Schnapps",
    "Coffee Liqueur",
];
const GARNISHES: &[&str] = &["Lime", "Lemon Twist", "Lime/Lemon Wedge", "Orange Peel", "Mint", "Cherry"];

/// Default option names for a category
pub fn default_options(category: Category) -> &'static [&'static str] {
    match category {
        Category::Spirit => SPIRITS,
        Category::NonAlcoholicBase => NA_BASES,
        Category::Mixer => MIXERS,
        Category::Liqueur => LIQUEURS,
        Category::Garnish => GARNISHES,
    }
}

/// Ordered, case-insensitively unique list of selectable names for one category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionCatalog {
    category: Category,
    options: Vec<String>,
}

impl OptionCatalog {
    pub fn new(category: Category) -> Self {
        Self {
            category,
            options: Vec::new(),
        }
    }

    /// Catalog seeded with the category's default options
    pub fn with_defaults(category: Category) -> Self {
        let mut catalog = Self::new(category);
        for name in default_options(category) {
            catalog.add(name);
        }
        catalog
    }

    pub fn category(&self) -> Category {
        self.category
    }

    /// Append a trimmed name.
    ///
    /// Returns `false` (and changes nothing) when the trimmed name is empty or
    /// already present under case-insensitive comparison.
    pub fn add(&mut self, raw_name: &str) -> bool {
        let name = raw_name.trim();
        if name.is_empty() || self.find(name).is_some() {
            debug!(category = %self.category, raw_name, "Rejected catalog entry");
            return false;
        }
        self.options.push(name.to_string());
        true
    }

    /// Add a custom entry and select it in `ledger`.
    ///
    /// A case-insensitive duplicate selects the existing spelling instead of
    /// adding a new one. Returns `false` only for blank input.
    pub fn add_and_select(&mut self, raw_name: &str, ledger: &mut SelectionQuantityLedger) -> bool {
        let name = raw_name.trim();
        if name.is_empty() {
            return false;
        }
        self.add(name);
        let canonical = self.find(name).unwrap_or(name).to_string();
        ledger.select(&canonical);
        true
    }

    /// Stored spelling of `name`, if present
    pub fn find(&self, name: &str) -> Option<&str> {
        let wanted = name.trim().to_lowercase();
        self.options
            .iter()
            .find(|opt| opt.to_lowercase() == wanted)
            .map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    /// Names in insertion order
    pub fn list(&self) -> &[String] {
        &self.options
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }
}

/// One catalog per category for an editing session
#[derive(Debug, Clone)]
pub struct CatalogSet {
    catalogs: HashMap<Category, OptionCatalog>,
}

impl CatalogSet {
    pub fn with_defaults() -> Self {
        let catalogs = Category::ALL
            .into_iter()
            .map(|c| (c, OptionCatalog::with_defaults(c)))
            .collect();
        Self { catalogs }
    }

    pub fn get(&self, category: Category) -> &OptionCatalog {
        &self.catalogs[&category]
    }

    pub fn get_mut(&mut self, category: Category) -> &mut OptionCatalog {
        self.catalogs
            .entry(category)
            .or_insert_with(|| OptionCatalog::new(category))
    }
}

impl Default for CatalogSet {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_trims_and_appends() {
        let mut catalog = OptionCatalog::new(Category::Garnish);
        assert!(catalog.add("  Basil "));
        assert_eq!(catalog.list(), ["Basil".to_string()]);
    }

    #[test]
    fn test_add_rejects_case_insensitive_duplicate() {
        let mut catalog = OptionCatalog::new(Category::Garnish);
        assert!(catalog.add("Lime"));
        assert!(!catalog.add("lime "));
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.list()[0], "Lime");
    }

    #[test]
    fn test_add_rejects_blank() {
        let mut catalog = OptionCatalog::with_defaults(Category::Mixer);
        let before = catalog.len();
        assert!(!catalog.add(""));
        assert!(!catalog.add("   \t\n"));
        assert_eq!(catalog.len(), before);
    }

    #[test]
    fn test_defaults_keep_insertion_order() {
        let catalog = OptionCatalog::with_defaults(Category::Spirit);
        assert_eq!(catalog.list(), ["Vodka", "Gin", "Rum", "Tequila", "Whiskey"]);
    }

    #[test]
    fn test_add_and_select_new_entry() {
        let mut catalog = OptionCatalog::with_defaults(Category::Liqueur);
        let mut ledger = SelectionQuantityLedger::new(Category::Liqueur);
        assert!(catalog.add_and_select(" Chartreuse ", &mut ledger));
        assert!(catalog.contains("chartreuse"));
        assert_eq!(ledger.selected(), vec!["Chartreuse"]);
        assert_eq!(ledger.quantity("Chartreuse"), Some(1));
    }

    #[test]
    fn test_add_and_select_duplicate_selects_existing_spelling() {
        let mut catalog = OptionCatalog::with_defaults(Category::Spirit);
        let mut ledger = SelectionQuantityLedger::new(Category::Spirit);
        let before = catalog.len();
        assert!(catalog.add_and_select("tequila", &mut ledger));
        assert_eq!(catalog.len(), before);
        assert_eq!(ledger.selected(), vec!["Tequila"]);
    }

    #[test]
    fn test_add_and_select_blank_changes_nothing() {
        let mut catalog = OptionCatalog::with_defaults(Category::Spirit);
        let mut ledger = SelectionQuantityLedger::new(Category::Spirit);
        assert!(!catalog.add_and_select("  ", &mut ledger));
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_catalog_set_has_every_category() {
        let mut set = CatalogSet::with_defaults();
        for category in Category::ALL {
            assert!(!set.get(category).is_empty(), "{category} should have defaults");
        }
        assert!(set.get_mut(Category::Garnish).add("Basil"));
        assert!(set.get(Category::Garnish).contains("BASIL"));
    }
}
