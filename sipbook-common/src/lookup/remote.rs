//! Cocktail API client
//!
//! One GET per lookup against the API Ninjas cocktail endpoint
//! (`?name=<preset>` with the key in `X-Api-Key`). No retries; the
//! transport's default behaviour applies.

use async_trait::async_trait;
use reqwest::Url;
use tracing::{debug, info, warn};

use super::{RecipeLookupError, RecipeRecord, RecipeSource};

pub const DEFAULT_BASE_URL: &str = "https://api.api-ninjas.com/v1/cocktail";
const API_KEY_HEADER: &str = "X-Api-Key";
const USER_AGENT: &str = concat!("SipBook/", env!("CARGO_PKG_VERSION"));

/// Remote recipe source for cocktails
pub struct RemoteRecipeSource {
    http_client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl RemoteRecipeSource {
    /// Client against the public endpoint. A blank key counts as missing.
    pub fn new(api_key: Option<String>) -> Result<Self, RecipeLookupError> {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Client against `base_url`. Connect and request timeouts are the
    /// transport defaults.
    pub fn with_base_url(
        api_key: Option<String>,
        base_url: impl Into<String>,
    ) -> Result<Self, RecipeLookupError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| RecipeLookupError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.into(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
        })
    }

    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    fn request_url(&self, query: &str) -> Result<Url, RecipeLookupError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| RecipeLookupError::InvalidRequest(format!("{}: {}", self.base_url, e)))?;
        url.query_pairs_mut().append_pair("name", query);
        Ok(url)
    }
}

#[async_trait]
impl RecipeSource for RemoteRecipeSource {
    fn name(&self) -> &'static str {
        "remote"
    }

    async fn search(&self, query: &str) -> Result<Vec<RecipeRecord>, RecipeLookupError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(RecipeLookupError::MissingCredential)?;
        let url = self.request_url(query)?;

        debug!(query, "Querying cocktail API");

        let response = self
            .http_client
            .get(url)
            .header(API_KEY_HEADER, api_key)
            .send()
            .await
            .map_err(|e| {
                if e.is_builder() {
                    RecipeLookupError::InvalidRequest(e.to_string())
                } else {
                    RecipeLookupError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(status_code = status.as_u16(), query, "Cocktail API returned an error status");
            return Err(RecipeLookupError::ServerError(status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| RecipeLookupError::Network(e.to_string()))?;
        if body.iter().all(u8::is_ascii_whitespace) {
            return Err(RecipeLookupError::EmptyResponse);
        }

        let records: Vec<RecipeRecord> = serde_json::from_slice(&body)
            .map_err(|e| RecipeLookupError::DecodeError(e.to_string()))?;

        info!(query, results = records.len(), "Cocktail API lookup complete");
        Ok(records)
    }
}
