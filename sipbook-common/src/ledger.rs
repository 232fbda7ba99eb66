//! Selection/quantity ledger for one ingredient category
//!
//! A ledger keeps the set of selected names and the name → quantity map in
//! lockstep: after `toggle`, `select`, `deselect` or `reconcile` the map's
//! key set equals the selection set exactly. Garnish-style categories carry
//! no quantities, so their map stays empty.
//!
//! `replace_selection` swaps the whole selection at once and deliberately
//! skips the quantity pass; callers must follow it with `reconcile`.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::model::Category;

/// Default quantity for a newly selected item
pub const DEFAULT_QUANTITY: u8 = 1;
/// Largest accepted quantity
pub const MAX_QUANTITY: u8 = 10;

/// Rejected ledger mutation; the ledger is left unchanged
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("quantity {value} for {name:?} is outside 0..={max}", max = MAX_QUANTITY)]
    OutOfRange { name: String, value: i32 },

    #[error("{0} do not carry quantities")]
    Unquantified(Category),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionQuantityLedger {
    category: Category,
    selected: BTreeSet<String>,
    quantities: BTreeMap<String, u8>,
}

impl SelectionQuantityLedger {
    pub fn new(category: Category) -> Self {
        Self {
            category,
            selected: BTreeSet::new(),
            quantities: BTreeMap::new(),
        }
    }

    pub fn category(&self) -> Category {
        self.category
    }

    /// Select `name` if unselected, otherwise deselect it and drop its quantity
    pub fn toggle(&mut self, name: &str) {
        if self.selected.contains(name) {
            self.deselect(name);
        } else {
            self.select(name);
        }
    }

    /// Select `name`, keeping any existing quantity (default 1)
    pub fn select(&mut self, name: &str) {
        self.selected.insert(name.to_string());
        if self.category.is_quantified() {
            self.quantities
                .entry(name.to_string())
                .or_insert(DEFAULT_QUANTITY);
        }
        debug!(category = %self.category, name, "Selected");
    }

    pub fn deselect(&mut self, name: &str) {
        self.selected.remove(name);
        self.quantities.remove(name);
        debug!(category = %self.category, name, "Deselected");
    }

    /// Set the quantity for `name` without touching the selection set.
    ///
    /// An entry written for an unselected name is dropped by the next `reconcile`.
    pub fn set_quantity(&mut self, name: &str, value: i32) -> Result<(), LedgerError> {
        if !self.category.is_quantified() {
            return Err(LedgerError::Unquantified(self.category));
        }
        let quantity = u8::try_from(value)
            .ok()
            .filter(|q| *q <= MAX_QUANTITY)
            .ok_or_else(|| LedgerError::OutOfRange {
                name: name.to_string(),
                value,
            })?;
        self.quantities.insert(name.to_string(), quantity);
        Ok(())
    }

    /// Replace the whole selection set. Quantities are not adjusted: call
    /// [`reconcile`](Self::reconcile) before the ledger is read again.
    pub fn replace_selection<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selected = names.into_iter().map(Into::into).collect();
    }

    /// Restore the invariant: default missing quantities to 1 and drop
    /// quantities of names that are no longer selected.
    pub fn reconcile(&mut self) {
        if !self.category.is_quantified() {
            self.quantities.clear();
            return;
        }
        let selected = &self.selected;
        self.quantities.retain(|name, _| selected.contains(name));
        for name in selected {
            self.quantities
                .entry(name.clone())
                .or_insert(DEFAULT_QUANTITY);
        }
    }

    pub fn is_selected(&self, name: &str) -> bool {
        self.selected.contains(name)
    }

    /// Selected names in ascending lexicographic order
    pub fn selected(&self) -> Vec<&str> {
        self.selected.iter().map(String::as_str).collect()
    }

    pub fn quantity(&self, name: &str) -> Option<u8> {
        self.quantities.get(name).copied()
    }

    pub fn quantities(&self) -> &BTreeMap<String, u8> {
        &self.quantities
    }

    /// Selected names with their quantities, ascending by name
    pub fn entries(&self) -> impl Iterator<Item = (&str, Option<u8>)> + '_ {
        self.selected
            .iter()
            .map(move |name| (name.as_str(), self.quantities.get(name).copied()))
    }

    /// "None" when empty, otherwise the sorted selection joined by ", "
    pub fn summary(&self) -> String {
        if self.selected.is_empty() {
            "None".to_string()
        } else {
            self.selected().join(", ")
        }
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Whether the quantity map's keys equal the selection set
    pub fn is_consistent(&self) -> bool {
        if !self.category.is_quantified() {
            return self.quantities.is_empty();
        }
        self.quantities.len() == self.selected.len()
            && self.quantities.keys().all(|k| self.selected.contains(k))
    }
}
