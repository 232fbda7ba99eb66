//! Bundled mocktail dataset
//!
//! The dataset is a JSON array of `{name, ingredients}` records. It is read
//! and indexed on first use and then shared read-only. A failed load leaves
//! the source unloaded so the next lookup tries again.

use std::collections::HashMap;
use std::path::PathBuf;

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use super::{RecipeLookupError, RecipeRecord, RecipeSource};

/// Copy of the dataset compiled into the binary
pub const BUNDLED_MOCKTAILS: &str = include_str!("../../data/mocktails.json");

/// Where the dataset is read from
#[derive(Debug, Clone)]
pub enum DatasetResource {
    Bundled,
    File(PathBuf),
}

struct Dataset {
    records: Vec<RecipeRecord>,
    by_name: HashMap<String, usize>,
}

impl Dataset {
    fn index(records: Vec<RecipeRecord>) -> Self {
        let mut by_name = HashMap::with_capacity(records.len());
        for (i, record) in records.iter().enumerate() {
            // First record wins on duplicate names
            by_name.entry(record.name.to_lowercase()).or_insert(i);
        }
        Self { records, by_name }
    }

    fn search(&self, query: &str) -> Vec<RecipeRecord> {
        let wanted = query.to_lowercase();
        if let Some(&i) = self.by_name.get(&wanted) {
            return vec![self.records[i].clone()];
        }
        self.records
            .iter()
            .filter(|r| r.name.to_lowercase().contains(&wanted))
            .cloned()
            .collect()
    }
}

/// Local recipe source for mocktails
pub struct LocalRecipeSource {
    resource: DatasetResource,
    dataset: OnceCell<Dataset>,
}

impl LocalRecipeSource {
    pub fn new(resource: DatasetResource) -> Self {
        Self {
            resource,
            dataset: OnceCell::new(),
        }
    }

    pub fn bundled() -> Self {
        Self::new(DatasetResource::Bundled)
    }

    pub fn is_loaded(&self) -> bool {
        self.dataset.initialized()
    }

    async fn dataset(&self) -> Result<&Dataset, RecipeLookupError> {
        self.dataset.get_or_try_init(|| self.load()).await
    }

    async fn load(&self) -> Result<Dataset, RecipeLookupError> {
        let text = match &self.resource {
            DatasetResource::Bundled => BUNDLED_MOCKTAILS.to_string(),
            DatasetResource::File(path) => tokio::fs::read_to_string(path).await.map_err(|e| {
                warn!(path = %path.display(), error = %e, "Mocktail dataset unavailable");
                RecipeLookupError::MissingDataset(format!("{}: {}", path.display(), e))
            })?,
        };

        let records: Vec<RecipeRecord> = serde_json::from_str(&text)
            .map_err(|e| RecipeLookupError::DecodeError(e.to_string()))?;

        info!(records = records.len(), resource = ?self.resource, "Loaded mocktail dataset");
        Ok(Dataset::index(records))
    }
}

#[async_trait]
impl RecipeSource for LocalRecipeSource {
    fn name(&self) -> &'static str {
        "local"
    }

    /// Exact case-insensitive match as a single record, otherwise every
    /// record whose name contains the query (possibly none)
    async fn search(&self, query: &str) -> Result<Vec<RecipeRecord>, RecipeLookupError> {
        let dataset = self.dataset().await?;
        let matches = dataset.search(query);
        debug!(query, matches = matches.len(), "Searched mocktail dataset");
        Ok(matches)
    }
}
