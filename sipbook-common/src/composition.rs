//! Drink composition aggregate
//!
//! A [`Composition`] starts transiently from a preset, is edited through
//! explicit mutators, and becomes durable on its first [`Composition::commit`].
//! Category applicability is structural: the base ledger is chosen by kind
//! at creation, and liqueurs exist only on cocktails. Touching an
//! inapplicable category is an error, never a silent no-op.
//!
//! [`SavedDrink`] is the persisted shape handed to a [`CompositionStore`].

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::ledger::SelectionQuantityLedger;
use crate::model::{Category, DrinkKind, PresetDrink, Rim};
use crate::store::CompositionStore;
use crate::{time, uuid_utils, Error, Result};

/// Persisted entity shape
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedDrink {
    pub id: Uuid,
    pub name: String,
    pub kind: DrinkKind,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub spirits: Vec<String>,
    #[serde(default)]
    pub na_bases: Vec<String>,
    #[serde(default)]
    pub mixers: Vec<String>,
    #[serde(default)]
    pub liqueurs: Vec<String>,
    #[serde(default)]
    pub rim: Rim,
    #[serde(default)]
    pub garnishes: Vec<String>,
    #[serde(default)]
    pub shots_per_spirit: BTreeMap<String, u8>,
    #[serde(default)]
    pub parts_per_base: BTreeMap<String, u8>,
    #[serde(default)]
    pub parts_per_mixer: BTreeMap<String, u8>,
    #[serde(default)]
    pub parts_per_liqueur: BTreeMap<String, u8>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SavedDrink {
    /// Selected names for a category (empty for inapplicable ones)
    pub fn names(&self, category: Category) -> &[String] {
        match category {
            Category::Spirit => &self.spirits,
            Category::NonAlcoholicBase => &self.na_bases,
            Category::Mixer => &self.mixers,
            Category::Liqueur => &self.liqueurs,
            Category::Garnish => &self.garnishes,
        }
    }

    /// Quantity map for a category; `None` for garnishes
    pub fn quantities(&self, category: Category) -> Option<&BTreeMap<String, u8>> {
        match category {
            Category::Spirit => Some(&self.shots_per_spirit),
            Category::NonAlcoholicBase => Some(&self.parts_per_base),
            Category::Mixer => Some(&self.parts_per_mixer),
            Category::Liqueur => Some(&self.parts_per_liqueur),
            Category::Garnish => None,
        }
    }
}

/// Editable drink composition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Composition {
    id: Uuid,
    name: String,
    preset_name: String,
    kind: DrinkKind,
    base: SelectionQuantityLedger,
    mixers: SelectionQuantityLedger,
    liqueurs: Option<SelectionQuantityLedger>,
    garnishes: SelectionQuantityLedger,
    rim: Rim,
    notes: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    durable: bool,
}

impl Composition {
    /// Fresh, unsaved composition named after `preset`
    pub fn create_from(preset: &PresetDrink) -> Self {
        let now = time::now();
        let kind = preset.kind;
        debug!(preset = %preset.name, %kind, "Creating composition from preset");
        Self {
            id: uuid_utils::generate(),
            name: preset.name.clone(),
            preset_name: preset.name.clone(),
            kind,
            base: SelectionQuantityLedger::new(kind.base_category()),
            mixers: SelectionQuantityLedger::new(Category::Mixer),
            liqueurs: match kind {
                DrinkKind::Cocktail => Some(SelectionQuantityLedger::new(Category::Liqueur)),
                DrinkKind::Mocktail => None,
            },
            garnishes: SelectionQuantityLedger::new(Category::Garnish),
            rim: Rim::None,
            notes: String::new(),
            created_at: now,
            updated_at: now,
            durable: false,
        }
    }

    /// Editable model for a stored record. Quantities are reconciled against
    /// the stored selections; populated inapplicable categories are rejected.
    pub fn from_record(record: SavedDrink) -> Result<Self> {
        let kind = record.kind;
        for category in Category::ALL {
            if !kind.applies_to(category) && !record.names(category).is_empty() {
                return Err(Error::InvalidInput(format!(
                    "{} {:?} has {} stored",
                    kind,
                    record.name,
                    category.label().to_lowercase()
                )));
            }
        }

        let preset = PresetDrink {
            id: record.id,
            name: record.name.clone(),
            kind,
            image: None,
        };
        let mut composition = Self::create_from(&preset);
        composition.id = record.id;
        composition.rim = record.rim;
        composition.notes = record.notes.clone();
        composition.created_at = record.created_at;
        composition.updated_at = record.updated_at;
        composition.durable = true;

        for &category in kind.categories() {
            let ledger = composition.ledger_mut(category)?;
            ledger.replace_selection(record.names(category).iter().cloned());
            if let Some(quantities) = record.quantities(category) {
                for (name, &value) in quantities {
                    if ledger.is_selected(name) {
                        ledger.set_quantity(name, i32::from(value))?;
                    }
                }
            }
            ledger.reconcile();
        }
        Ok(composition)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    /// Name used when a commit is given a blank name
    pub fn preset_name(&self) -> &str {
        &self.preset_name
    }

    pub fn kind(&self) -> DrinkKind {
        self.kind
    }

    pub fn rim(&self) -> Rim {
        self.rim
    }

    pub fn set_rim(&mut self, rim: Rim) {
        self.rim = rim;
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    pub fn set_notes(&mut self, notes: &str) {
        self.notes = notes.to_string();
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Whether the composition has been saved at least once
    pub fn is_durable(&self) -> bool {
        self.durable
    }

    /// Categories shown for this composition, in display order
    pub fn categories(&self) -> &'static [Category] {
        self.kind.categories()
    }

    pub fn ledger(&self, category: Category) -> Result<&SelectionQuantityLedger> {
        match category {
            Category::Mixer => Ok(&self.mixers),
            Category::Garnish => Ok(&self.garnishes),
            Category::Liqueur => self.liqueurs.as_ref().ok_or(self.not_applicable(category)),
            c if c == self.base.category() => Ok(&self.base),
            c => Err(self.not_applicable(c)),
        }
    }

    pub fn ledger_mut(&mut self, category: Category) -> Result<&mut SelectionQuantityLedger> {
        let not_applicable = self.not_applicable(category);
        match category {
            Category::Mixer => Ok(&mut self.mixers),
            Category::Garnish => Ok(&mut self.garnishes),
            Category::Liqueur => self.liqueurs.as_mut().ok_or(not_applicable),
            c if c == self.base.category() => Ok(&mut self.base),
            _ => Err(not_applicable),
        }
    }

    /// Base ledger: spirits for cocktails, non-alcoholic bases for mocktails
    pub fn base(&self) -> &SelectionQuantityLedger {
        &self.base
    }

    pub fn toggle(&mut self, category: Category, name: &str) -> Result<()> {
        self.ledger_mut(category)?.toggle(name);
        Ok(())
    }

    pub fn set_quantity(&mut self, category: Category, name: &str, value: i32) -> Result<()> {
        self.ledger_mut(category)?.set_quantity(name, value)?;
        Ok(())
    }

    /// Replace a category's whole selection and reconcile its quantities
    pub fn replace_selection<I, S>(&mut self, category: Category, names: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let ledger = self.ledger_mut(category)?;
        ledger.replace_selection(names);
        ledger.reconcile();
        Ok(())
    }

    /// Reconcile every applicable ledger
    pub fn reconcile_all(&mut self) {
        self.base.reconcile();
        self.mixers.reconcile();
        if let Some(liqueurs) = self.liqueurs.as_mut() {
            liqueurs.reconcile();
        }
        self.garnishes.reconcile();
    }

    /// Persisted shape of the current state
    pub fn to_record(&self) -> SavedDrink {
        let names = |ledger: Option<&SelectionQuantityLedger>| -> Vec<String> {
            ledger
                .map(|l| l.selected().into_iter().map(str::to_string).collect())
                .unwrap_or_default()
        };
        let quantities = |ledger: Option<&SelectionQuantityLedger>| -> BTreeMap<String, u8> {
            ledger.map(|l| l.quantities().clone()).unwrap_or_default()
        };
        let spirits = self.ledger(Category::Spirit).ok();
        let na_bases = self.ledger(Category::NonAlcoholicBase).ok();
        let liqueurs = self.liqueurs.as_ref();

        SavedDrink {
            id: self.id,
            name: self.name.clone(),
            kind: self.kind,
            notes: self.notes.clone(),
            spirits: names(spirits),
            na_bases: names(na_bases),
            mixers: names(Some(&self.mixers)),
            liqueurs: names(liqueurs),
            rim: self.rim,
            garnishes: names(Some(&self.garnishes)),
            shots_per_spirit: quantities(spirits),
            parts_per_base: quantities(na_bases),
            parts_per_mixer: quantities(Some(&self.mixers)),
            parts_per_liqueur: quantities(liqueurs),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    /// Save under `final_name` (the preset's name if blank), stamping `updated_at`.
    ///
    /// Creates the record on first commit and updates it afterwards. On a
    /// store failure the in-memory edits are kept so the commit can be retried.
    pub async fn commit(&mut self, final_name: &str, store: &dyn CompositionStore) -> Result<SavedDrink> {
        let trimmed = final_name.trim();
        self.name = if trimmed.is_empty() {
            self.preset_name.clone()
        } else {
            trimmed.to_string()
        };
        self.reconcile_all();
        self.updated_at = time::now().max(self.created_at);

        let record = self.to_record();
        if self.durable {
            store.update(&record).await?;
        } else {
            store.create(&record).await?;
            self.durable = true;
        }
        info!(id = %self.id, name = %self.name, "Committed composition");
        Ok(record)
    }

    /// Remove a saved composition; irreversible
    pub async fn delete(self, store: &dyn CompositionStore) -> Result<()> {
        if self.durable {
            store.delete(self.id).await?;
            info!(id = %self.id, name = %self.name, "Deleted composition");
        }
        Ok(())
    }

    fn not_applicable(&self, category: Category) -> Error {
        Error::NotApplicable {
            category,
            kind: self.kind,
        }
    }
}
