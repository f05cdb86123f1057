//! HTTP client for `places:searchText`.
//!
//! One search runs every [`SearchQuery::variations`] phrasing in turn and
//! merges the hits. A variation that fails is logged and skipped so one bad
//! phrasing does not lose the others.

use std::future::Future;
use std::time::Duration;

use leadgen_core::{AppConfig, BusinessRecord, SearchQuery};
use reqwest::{Client, Url};

use crate::error::PlacesError;
use crate::types::{TextSearchRequest, TextSearchResponse};

const DEFAULT_BASE_URL: &str = "https://places.googleapis.com/";
const FIELD_MASK: &str = "places.displayName,places.formattedAddress,places.internationalPhoneNumber,places.websiteUri";
const LANGUAGE_CODE: &str = "pt-BR";
const REGION_CODE: &str = "BR";
const DEFAULT_VARIATION_PAUSE: Duration = Duration::from_secs(1);

/// Source of candidate businesses for a (niche, city) query.
pub trait PlacesSearch {
    fn search(
        &self,
        query: &SearchQuery,
    ) -> impl Future<Output = Result<Vec<BusinessRecord>, PlacesError>> + Send;
}

/// Client for the Places API (New) text search endpoint.
///
/// Use [`PlacesClient::new`] for production or [`PlacesClient::with_base_url`]
/// to point at a mock server in tests.
#[derive(Debug, Clone)]
pub struct PlacesClient {
    client: Client,
    api_key: String,
    base_url: Url,
    max_results: u32,
    variation_pause: Duration,
}

impl PlacesClient {
    /// Creates a client pointed at the production Places API.
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, timeout_secs: u64, max_results: u32) -> Result<Self, PlacesError> {
        Self::with_base_url(api_key, timeout_secs, max_results, DEFAULT_BASE_URL)
    }

    /// Creates a client from the application config.
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::MissingApiKey`] when no key is configured, or
    /// [`PlacesError::Http`] if the HTTP client cannot be built.
    pub fn from_config(config: &AppConfig) -> Result<Self, PlacesError> {
        let api_key = config
            .places_api_key
            .as_deref()
            .ok_or(PlacesError::MissingApiKey)?;
        Self::new(
            api_key,
            config.places_timeout_secs,
            config.places_max_results,
        )
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`PlacesError::InvalidBaseUrl`] if
    /// `base_url` does not parse.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        max_results: u32,
        base_url: &str,
    ) -> Result<Self, PlacesError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url =
            Url::parse(&normalised).map_err(|e| PlacesError::InvalidBaseUrl(format!("{base_url}: {e}")))?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url,
            max_results: max_results.clamp(1, 20),
            variation_pause: DEFAULT_VARIATION_PAUSE,
        })
    }

    /// Overrides the pause between query variations.
    #[must_use]
    pub fn with_variation_pause(mut self, pause: Duration) -> Self {
        self.variation_pause = pause;
        self
    }

    /// Runs a single text query and returns the mapped records.
    ///
    /// # Errors
    ///
    /// - [`PlacesError::Http`] on network failure.
    /// - [`PlacesError::Status`] on a non-2xx response.
    /// - [`PlacesError::Deserialize`] if the body does not match the expected shape.
    pub async fn text_search(&self, text_query: &str) -> Result<Vec<BusinessRecord>, PlacesError> {
        let url = self.endpoint()?;
        let body = TextSearchRequest {
            text_query,
            language_code: LANGUAGE_CODE,
            region_code: REGION_CODE,
            max_result_count: self.max_results,
        };

        let response = self
            .client
            .post(url)
            .header("X-Goog-Api-Key", &self.api_key)
            .header("X-Goog-FieldMask", FIELD_MASK)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(PlacesError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        let parsed: TextSearchResponse =
            serde_json::from_str(&text).map_err(|e| PlacesError::Deserialize {
                context: format!("searchText(textQuery={text_query})"),
                source: e,
            })?;

        Ok(parsed
            .places
            .into_iter()
            .filter_map(crate::types::Place::into_business)
            .collect())
    }

    fn endpoint(&self) -> Result<Url, PlacesError> {
        self.base_url
            .join("v1/places:searchText")
            .map_err(|e| PlacesError::InvalidBaseUrl(format!("{}: {e}", self.base_url)))
    }
}

impl PlacesSearch for PlacesClient {
    /// Runs every variation of `query` and merges the results, first
    /// occurrence wins on a case-insensitive name collision.
    ///
    /// Fails only when every variation failed, returning the last error.
    async fn search(&self, query: &SearchQuery) -> Result<Vec<BusinessRecord>, PlacesError> {
        let variations = query.variations();
        let total = variations.len();
        let mut merged: Vec<BusinessRecord> = Vec::new();
        let mut last_error = None;
        let mut succeeded = 0_usize;

        for (i, text_query) in variations.iter().enumerate() {
            if i > 0 && !self.variation_pause.is_zero() {
                tokio::time::sleep(self.variation_pause).await;
            }

            match self.text_search(text_query).await {
                Ok(found) => {
                    succeeded += 1;
                    let before = merged.len();
                    merge_unique(&mut merged, found);
                    tracing::debug!(
                        query = %text_query,
                        added = merged.len() - before,
                        "places variation done"
                    );
                }
                Err(e) => {
                    tracing::warn!(query = %text_query, error = %e, "places variation failed; skipping");
                    last_error = Some(e);
                }
            }
        }

        if succeeded == 0 {
            if let Some(e) = last_error {
                return Err(e);
            }
        }

        tracing::info!(
            niche = %query.niche,
            city = %query.city,
            variations = total,
            found = merged.len(),
            "places search finished"
        );
        Ok(merged)
    }
}

fn merge_unique(merged: &mut Vec<BusinessRecord>, found: Vec<BusinessRecord>) {
    for record in found {
        let key = record.name.trim().to_lowercase();
        if !merged.iter().any(|m| m.name.trim().to_lowercase() == key) {
            merged.push(record);
        }
    }
}
