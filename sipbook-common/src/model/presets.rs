//! Built-in preset drinks

use super::{DrinkKind, PresetDrink};

const BUILTIN: &[(&str, DrinkKind, &str)] = &[
    ("Margarita", DrinkKind::Cocktail, "margarita"),
    ("Mojito", DrinkKind::Cocktail, "mojito"),
    ("Moscow Mule", DrinkKind::Cocktail, "moscowmule"),
    ("Martini", DrinkKind::Cocktail, "martini"),
    ("Whiskey Sour", DrinkKind::Cocktail, "whiskeysour"),
    ("Daiquiri", DrinkKind::Cocktail, "daiquiri"),
    ("Shirley Temple", DrinkKind::Mocktail, "shirleytemple"),
    ("Arnold Palmer", DrinkKind::Mocktail, "arnoldpalmer"),
    ("Virgin Margarita", DrinkKind::Mocktail, "virginmarg"),
    ("Virgin Mojito", DrinkKind::Mocktail, "virginmoj"),
];

/// Read-only list of presets a composition can start from
#[derive(Debug, Clone)]
pub struct PresetCatalog {
    presets: Vec<PresetDrink>,
}

impl PresetCatalog {
    pub fn new(presets: Vec<PresetDrink>) -> Self {
        Self { presets }
    }

    pub fn builtin() -> Self {
        let presets = BUILTIN
            .iter()
            .map(|(name, kind, image)| PresetDrink::new(*name, *kind, Some(image)))
            .collect();
        Self { presets }
    }

    pub fn all(&self) -> &[PresetDrink] {
        &self.presets
    }

    /// Presets of `kind` whose name starts with the trimmed search text (case-insensitive).
    /// Blank search text keeps every preset of that kind.
    pub fn filter(&self, kind: DrinkKind, search: &str) -> Vec<&PresetDrink> {
        let query = search.trim().to_lowercase();
        self.presets
            .iter()
            .filter(|p| p.kind == kind)
            .filter(|p| query.is_empty() || p.name.to_lowercase().starts_with(&query))
            .collect()
    }

    pub fn find(&self, name: &str) -> Option<&PresetDrink> {
        let wanted = name.trim().to_lowercase();
        self.presets.iter().find(|p| p.name.to_lowercase() == wanted)
    }
}

impl Default for PresetCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(presets: Vec<&PresetDrink>) -> Vec<&str> {
        presets.into_iter().map(|p| p.name.as_str()).collect()
    }

    #[test]
    fn test_builtin_has_both_kinds() {
        let catalog = PresetCatalog::builtin();
        assert_eq!(catalog.filter(DrinkKind::Cocktail, "").len(), 6);
        assert_eq!(catalog.filter(DrinkKind::Mocktail, "").len(), 4);
    }

    #[test]
    fn test_filter_is_prefix_and_case_insensitive() {
        let catalog = PresetCatalog::builtin();
        assert_eq!(
            names(catalog.filter(DrinkKind::Cocktail, "  m ")),
            vec!["Margarita", "Mojito", "Moscow Mule", "Martini"]
        );
        assert_eq!(
            names(catalog.filter(DrinkKind::Mocktail, "VIRGIN m")),
            vec!["Virgin Margarita", "Virgin Mojito"]
        );
    }

    #[test]
    fn test_filter_does_not_match_inner_words() {
        let catalog = PresetCatalog::builtin();
        assert!(catalog.filter(DrinkKind::Cocktail, "sour").is_empty());
    }

    #[test]
    fn test_find_by_name() {
        let catalog = PresetCatalog::builtin();
        let preset = catalog.find("shirley temple").expect("preset");
        assert_eq!(preset.kind, DrinkKind::Mocktail);
        assert_eq!(preset.image.as_deref(), Some("shirleytemple"));
        assert!(catalog.find("Long Island").is_none());
    }
}
