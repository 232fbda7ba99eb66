//! Reference types shared by the composition engine
//!
//! Drink kinds, ingredient categories, rim choices and the read-only preset
//! drinks a composition starts from.

pub mod presets;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

pub use presets::PresetCatalog;

/// Preset kind, fixed for the life of a composition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DrinkKind {
    #[serde(alias = "Cocktail")]
    Cocktail,
    #[serde(alias = "Mocktail")]
    Mocktail,
}

impl DrinkKind {
    pub const ALL: [DrinkKind; 2] = [DrinkKind::Cocktail, DrinkKind::Mocktail];

    pub fn as_str(&self) -> &'static str {
        match self {
            DrinkKind::Cocktail => "cocktail",
            DrinkKind::Mocktail => "mocktail",
        }
    }

    /// Base category used by this kind; the other base category is never populated
    pub fn base_category(&self) -> Category {
        match self {
            DrinkKind::Cocktail => Category::Spirit,
            DrinkKind::Mocktail => Category::NonAlcoholicBase,
        }
    }

    /// Categories a composition of this kind carries, in display order
    pub fn categories(&self) -> &'static [Category] {
        match self {
            DrinkKind::Cocktail => &[
                Category::Spirit,
                Category::Mixer,
                Category::Liqueur,
                Category::Garnish,
            ],
            DrinkKind::Mocktail => &[
                Category::NonAlcoholicBase,
                Category::Mixer,
                Category::Garnish,
            ],
        }
    }

    pub fn applies_to(&self, category: Category) -> bool {
        self.categories().contains(&category)
    }
}

impl fmt::Display for DrinkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DrinkKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cocktail" => Ok(DrinkKind::Cocktail),
            "mocktail" => Ok(DrinkKind::Mocktail),
            other => Err(format!("unknown drink kind: {other:?}")),
        }
    }
}

/// Ingredient category tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Spirit,
    NonAlcoholicBase,
    Mixer,
    Liqueur,
    Garnish,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Spirit,
        Category::NonAlcoholicBase,
        Category::Mixer,
        Category::Liqueur,
        Category::Garnish,
    ];

    /// Quantity unit, `None` for categories that track selection only
    pub fn unit(&self) -> Option<Unit> {
        match self {
            Category::Spirit => Some(Unit::Shot),
            Category::NonAlcoholicBase | Category::Mixer | Category::Liqueur => Some(Unit::Part),
            Category::Garnish => None,
        }
    }

    pub fn is_quantified(&self) -> bool {
        self.unit().is_some()
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::Spirit => "Spirits",
            Category::NonAlcoholicBase => "Bases",
            Category::Mixer => "Mixers",
            Category::Liqueur => "Liqueurs",
            Category::Garnish => "Garnishes",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "spirit" | "spirits" => Ok(Category::Spirit),
            "base" | "bases" | "na-base" | "nabase" | "non-alcoholic-base" => {
                Ok(Category::NonAlcoholicBase)
            }
            "mixer" | "mixers" => Ok(Category::Mixer),
            "liqueur" | "liqueurs" => Ok(Category::Liqueur),
            "garnish" | "garnishes" => Ok(Category::Garnish),
            other => Err(format!("unknown category: {other:?}")),
        }
    }
}

/// Quantity unit: shots for spirits, parts for everything else
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    Shot,
    Part,
}

impl Unit {
    /// "1 shot", "2 shots", "0 parts"
    pub fn format(&self, n: u8) -> String {
        let word = match self {
            Unit::Shot => "shot",
            Unit::Part => "part",
        };
        if n == 1 {
            format!("{n} {word}")
        } else {
            format!("{n} {word}s")
        }
    }
}

/// Single-choice rim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Rim {
    #[default]
    #[serde(rename = "None")]
    None,
    #[serde(rename = "Salt Rim")]
    Salt,
    #[serde(rename = "Sugar Rim")]
    Sugar,
    #[serde(rename = "Tajin Rim")]
    Tajin,
}

impl Rim {
    pub const ALL: [Rim; 4] = [Rim::None, Rim::Salt, Rim::Sugar, Rim::Tajin];

    pub fn label(&self) -> &'static str {
        match self {
            Rim::None => "None",
            Rim::Salt => "Salt Rim",
            Rim::Sugar => "Sugar Rim",
            Rim::Tajin => "Tajin Rim",
        }
    }

    /// Full label or short name ("Salt Rim", "salt"), case-insensitive
    pub fn parse(label: &str) -> Option<Rim> {
        let wanted = label.trim().to_lowercase();
        Rim::ALL.into_iter().find(|rim| {
            let full = rim.label().to_lowercase();
            full == wanted || full.trim_end_matches(" rim") == wanted
        })
    }

    /// Lenient parse of a stored label; unknown text means no rim
    pub fn from_label(label: &str) -> Rim {
        Rim::parse(label).unwrap_or_default()
    }
}

impl fmt::Display for Rim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Fixed starting drink, owned by the preset catalog
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PresetDrink {
    pub id: Uuid,
    pub name: String,
    pub kind: DrinkKind,
    pub image: Option<String>,
}

impl PresetDrink {
    pub fn new(name: impl Into<String>, kind: DrinkKind, image: Option<&str>) -> Self {
        Self {
            id: crate::uuid_utils::generate(),
            name: name.into(),
            kind,
            image: image.map(str::to_string),
        }
    }
}
