//! Yelp Fusion business search as a [`CandidateSource`].
//!
//! Calls `GET /v3/businesses/search` with a bearer token and keeps only the
//! `id` and `name` of each business, in the order the API returns them.

use serde::Deserialize;
use url::Url;

use super::{CandidateSource, DirectoryQuery};
use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::http;
use crate::types::Candidate;

const SEARCH_PATH: &str = "/v3/businesses/search";

/// Directory lookup against the Yelp Fusion API.
pub struct YelpDirectory {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl YelpDirectory {
    /// Create a directory client from `config.directory` and the shared
    /// HTTP settings.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Fetch`] if the HTTP client cannot be built.
    pub fn new(config: &SearchConfig) -> Result<Self, SearchError> {
        Ok(Self {
            client: http::build_client(config)?,
            base_url: config.directory.api_base_url.clone(),
            token: config.directory.api_token.clone(),
        })
    }

    fn search_url(&self, query: &DirectoryQuery) -> Result<Url, SearchError> {
        let limit = query.limit.to_string();
        let radius = query.radius_meters.to_string();
        Url::parse_with_params(
            &http::join_url(&self.base_url, SEARCH_PATH),
            [
                ("term", query.term.as_str()),
                ("location", query.location.as_str()),
                ("limit", limit.as_str()),
                ("categories", query.category.as_str()),
                ("radius", radius.as_str()),
            ],
        )
        .map_err(|e| SearchError::Config(format!("invalid directory URL: {e}")))
    }
}

impl CandidateSource for YelpDirectory {
    async fn search_candidates(
        &self,
        query: &DirectoryQuery,
    ) -> Result<Vec<Candidate>, SearchError> {
        tracing::trace!(term = %query.term, "directory search");

        let url = self.search_url(query)?;
        let mut request = self.client.get(url);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| http::request_error("directory", e))?
            .error_for_status()
            .map_err(|e| SearchError::Fetch(format!("directory HTTP error: {e}")))?;

        let body = response
            .text()
            .await
            .map_err(|e| http::request_error("directory response", e))?;

        tracing::trace!(bytes = body.len(), "directory response received");

        parse_search_response(&body)
    }
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    total: u64,
    #[serde(default)]
    businesses: Vec<BusinessEntry>,
}

#[derive(Deserialize)]
struct BusinessEntry {
    id: String,
    name: String,
}

/// Parse a business search response body into candidates.
///
/// A `total` below 1 short-circuits to an empty list.
pub(crate) fn parse_search_response(body: &str) -> Result<Vec<Candidate>, SearchError> {
    let response: SearchResponse = serde_json::from_str(body)
        .map_err(|e| SearchError::Fetch(format!("malformed directory response: {e}")))?;

    if response.total < 1 {
        tracing::debug!("directory returned no businesses");
        return Ok(Vec::new());
    }

    let candidates: Vec<Candidate> = response
        .businesses
        .into_iter()
        .map(|b| Candidate::new(b.id, b.name))
        .collect();

    tracing::debug!(count = candidates.len(), "directory candidates parsed");
    Ok(candidates)
}
