//! # SipBook Common Library
//!
//! Drink composition engine shared by the SipBook front ends:
//! - Option catalogs and per-category selection/quantity ledgers
//! - The composition aggregate and its persisted record shape
//! - Original-recipe lookup (remote API for cocktails, bundled dataset for mocktails)
//! - Composition storage (SQLite and in-memory)
//! - Configuration loading and plain-text share export

pub mod catalog;
pub mod composition;
pub mod config;
pub mod error;
pub mod export;
pub mod ledger;
pub mod lookup;
pub mod model;
pub mod store;
pub mod time;
pub mod uuid_utils;

pub use catalog::{CatalogSet, OptionCatalog};
pub use composition::{Composition, SavedDrink};
pub use config::TomlConfig;
pub use error::{Error, Result};
pub use ledger::{LedgerError, SelectionQuantityLedger};
pub use lookup::{RecipeLookupError, RecipeLookupService};
pub use model::{Category, DrinkKind, PresetDrink, Rim};
pub use store::{CompositionStore, MemoryCompositionStore, SqliteCompositionStore};
