//! In-memory composition store

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{sort_newest_first, CompositionStore};
use crate::composition::SavedDrink;
use crate::{Error, Result};

#[derive(Debug, Default)]
pub struct MemoryCompositionStore {
    records: RwLock<HashMap<Uuid, SavedDrink>>,
}

impl MemoryCompositionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CompositionStore for MemoryCompositionStore {
    async fn create(&self, record: &SavedDrink) -> Result<()> {
        let mut records = self.records.write().await;
        if records.contains_key(&record.id) {
            return Err(Error::Conflict(format!("composition {} already exists", record.id)));
        }
        records.insert(record.id, record.clone());
        Ok(())
    }

    async fn update(&self, record: &SavedDrink) -> Result<()> {
        let mut records = self.records.write().await;
        match records.get_mut(&record.id) {
            Some(existing) => {
                *existing = record.clone();
                Ok(())
            }
            None => Err(Error::NotFound(format!("composition {}", record.id))),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        self.records
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| Error::NotFound(format!("composition {id}")))
    }

    async fn get(&self, id: Uuid) -> Result<Option<SavedDrink>> {
        Ok(self.records.read().await.get(&id).cloned())
    }

    async fn list_all(&self) -> Result<Vec<SavedDrink>> {
        let mut all: Vec<SavedDrink> = self.records.read().await.values().cloned().collect();
        sort_newest_first(&mut all);
        Ok(all)
    }

    async fn delete_all(&self) -> Result<usize> {
        let mut records = self.records.write().await;
        let count = records.len();
        records.clear();
        Ok(count)
    }
}
