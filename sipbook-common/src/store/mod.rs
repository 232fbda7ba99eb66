//! Composition persistence
//!
//! [`CompositionStore`] is the seam between the composition aggregate and
//! durable storage. Two implementations ship: [`SqliteCompositionStore`] for
//! the CLI and [`MemoryCompositionStore`] for tests and ephemeral sessions.

use async_trait::async_trait;
use uuid::Uuid;

use crate::composition::SavedDrink;
use crate::Result;

pub mod memory;
pub mod sqlite;

pub use memory::MemoryCompositionStore;
pub use sqlite::{init_database, SqliteCompositionStore};

/// Durable collection of saved compositions
#[async_trait]
pub trait CompositionStore: Send + Sync {
    /// Insert a new record; `Error::Conflict` if the id is already stored
    async fn create(&self, record: &SavedDrink) -> Result<()>;

    /// Replace an existing record; `Error::NotFound` if the id is unknown
    async fn update(&self, record: &SavedDrink) -> Result<()>;

    /// Remove a record; `Error::NotFound` if the id is unknown
    async fn delete(&self, id: Uuid) -> Result<()>;

    async fn get(&self, id: Uuid) -> Result<Option<SavedDrink>>;

    /// Every record, most recently updated first
    async fn list_all(&self) -> Result<Vec<SavedDrink>>;

    /// Remove every record, returning how many were removed
    async fn delete_all(&self) -> Result<usize>;
}

/// Most recently updated first; id breaks ties so the order is total
pub(crate) fn sort_newest_first(records: &mut [SavedDrink]) {
    records.sort_by(|a, b| {
        b.updated_at
            .cmp(&a.updated_at)
            .then_with(|| a.id.cmp(&b.id))
    });
}
