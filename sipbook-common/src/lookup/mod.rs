//! Original-recipe lookup
//!
//! Resolves a preset's canonical ingredient list from one of two sources
//! behind a single contract:
//! - [`RemoteRecipeSource`]: cocktail API over HTTP (needs an API key)
//! - [`LocalRecipeSource`]: bundled mocktail dataset, loaded lazily once
//!
//! Routing is a pure function of [`DrinkKind`]: cocktails go remote,
//! mocktails go local. Per-consumer caching lives in [`LookupSession`].

pub mod local;
pub mod remote;
pub mod session;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::model::DrinkKind;

pub use local::{DatasetResource, LocalRecipeSource};
pub use remote::RemoteRecipeSource;
pub use session::{LookupSession, SessionLoad};

/// Lookup failures; all are recoverable and render a user-facing message
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RecipeLookupError {
    #[error("missing API key")]
    MissingCredential,

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("server error ({0})")]
    ServerError(u16),

    #[error("parse error: {0}")]
    DecodeError(String),

    #[error("empty response")]
    EmptyResponse,

    #[error("no matching recipe found")]
    NoMatch,

    #[error("missing recipe dataset: {0}")]
    MissingDataset(String),

    /// Transport failure before any HTTP status was received
    #[error("network error: {0}")]
    Network(String),
}

/// One `{name, ingredients}` record, as returned by either source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeRecord {
    pub name: String,
    pub ingredients: Vec<String>,
}

/// A searchable recipe source
#[async_trait]
pub trait RecipeSource: Send + Sync {
    /// Short identifier for logs
    fn name(&self) -> &'static str;

    /// Candidate records for `query`, in the source's preferred order
    async fn search(&self, query: &str) -> Result<Vec<RecipeRecord>, RecipeLookupError>;
}

/// Which source serves a kind of drink
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Remote,
    Local,
}

/// Fixed routing policy
pub fn source_for(kind: DrinkKind) -> SourceKind {
    match kind {
        DrinkKind::Cocktail => SourceKind::Remote,
        DrinkKind::Mocktail => SourceKind::Local,
    }
}

/// First record whose name equals `query` case-insensitively, else the first record
pub fn best_match<'a>(
    query: &str,
    records: &'a [RecipeRecord],
) -> Result<&'a RecipeRecord, RecipeLookupError> {
    let wanted = query.to_lowercase();
    records
        .iter()
        .find(|r| r.name.to_lowercase() == wanted)
        .or_else(|| records.first())
        .ok_or(RecipeLookupError::NoMatch)
}

/// Dispatches lookups to the remote or local source by drink kind
#[derive(Clone)]
pub struct RecipeLookupService {
    remote: Arc<dyn RecipeSource>,
    local: Arc<dyn RecipeSource>,
}

impl RecipeLookupService {
    pub fn new(remote: Arc<dyn RecipeSource>, local: Arc<dyn RecipeSource>) -> Self {
        Self { remote, local }
    }

    pub fn source(&self, kind: DrinkKind) -> &dyn RecipeSource {
        match source_for(kind) {
            SourceKind::Remote => self.remote.as_ref(),
            SourceKind::Local => self.local.as_ref(),
        }
    }

    /// Canonical ingredient list for the preset `name` of `kind`
    pub async fn lookup(&self, name: &str, kind: DrinkKind) -> Result<Vec<String>, RecipeLookupError> {
        if name.trim().is_empty() {
            return Err(RecipeLookupError::InvalidRequest(
                "preset name is empty".to_string(),
            ));
        }
        let source = self.source(kind);
        debug!(source = source.name(), name, %kind, "Looking up original recipe");

        let records = source.search(name).await?;
        let record = best_match(name, &records)?;
        debug!(
            source = source.name(),
            matched = %record.name,
            candidates = records.len(),
            "Original recipe resolved"
        );
        Ok(record.ingredients.clone())
    }
}

impl std::fmt::Debug for RecipeLookupService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecipeLookupService")
            .field("remote", &self.remote.name())
            .field("local", &self.local.name())
            .finish()
    }
}
