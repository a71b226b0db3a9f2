//! Search configuration with sensible defaults.
//!
//! [`SearchConfig`] carries everything the pipeline used to read from
//! process-wide constants: match thresholds, the suggestion limit, the
//! directory filters, and the page/HTTP settings. It is passed explicitly
//! into every stage so a single request can override any of it.

use serde::{Deserialize, Serialize};

use crate::error::SearchError;

/// User-Agent sent to the directory API and business pages by default.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (compatible; Googlebot/2.1; +http://www.google.com/bot.html)";

/// Confidence bands used by the matcher's decision policy (0-100 scale).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchThresholds {
    /// A top score strictly above this is a confident match.
    pub high: u8,
    /// A top score strictly above this (and not above `high`) is probable.
    pub medium: u8,
    /// Candidates must score strictly above this to be suggested.
    pub floor: u8,
}

impl Default for MatchThresholds {
    fn default() -> Self {
        Self {
            high: 90,
            medium: 75,
            floor: 50,
        }
    }
}

/// Matcher settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// How many of the best-scoring candidates the policy considers.
    pub top_k: usize,
    pub thresholds: MatchThresholds,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            top_k: 4,
            thresholds: MatchThresholds::default(),
        }
    }
}

/// Directory API settings used by the candidate fetcher.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectoryConfig {
    /// Base URL of the directory API, without a trailing slash.
    pub api_base_url: String,
    /// Bearer token. Usually supplied from the environment, not the file.
    #[serde(skip_serializing)]
    pub api_token: Option<String>,
    /// Location filter, e.g. `"New York, NY"`.
    pub location: String,
    /// Search radius around `location`, in meters.
    pub radius_meters: u32,
    /// Directory category filter, e.g. `"pizza"`.
    pub category: String,
    /// Maximum number of candidates requested from the directory.
    pub limit: usize,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://api.yelp.com".to_owned(),
            api_token: None,
            location: "New York, NY".to_owned(),
            // 5 miles
            radius_meters: 8000,
            category: "pizza".to_owned(),
            limit: 10,
        }
    }
}

// Hand-written so the token never reaches a log line.
impl std::fmt::Debug for DirectoryConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirectoryConfig")
            .field("api_base_url", &self.api_base_url)
            .field("api_token", &self.api_token.as_ref().map(|_| "<redacted>"))
            .field("location", &self.location)
            .field("radius_meters", &self.radius_meters)
            .field("category", &self.category)
            .field("limit", &self.limit)
            .finish()
    }
}

/// Public business page settings used by the review scraper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    /// Base URL of the public site, without a trailing slash.
    pub site_base_url: String,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            site_base_url: "https://www.yelp.com".to_owned(),
        }
    }
}

/// Configuration for a business search.
///
/// Use [`Default::default()`] for the stock behaviour, or construct with
/// field overrides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub matching: MatchConfig,
    pub directory: DirectoryConfig,
    pub pages: PageConfig,
    /// Reviews requested when the caller does not say how many.
    pub default_review_count: usize,
    /// Per-HTTP-request timeout in seconds.
    pub timeout_seconds: u64,
    /// Deadline for a whole search or lookup, in seconds.
    pub request_timeout_seconds: u64,
    /// User-Agent header for every outgoing request.
    pub user_agent: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            matching: MatchConfig::default(),
            directory: DirectoryConfig::default(),
            pages: PageConfig::default(),
            default_review_count: 1,
            timeout_seconds: 8,
            request_timeout_seconds: 20,
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }
}

impl SearchConfig {
    /// Validates this configuration, returning an error if any field is invalid.
    ///
    /// Checks:
    /// - `matching.top_k` must be greater than 0
    /// - thresholds must satisfy `floor <= medium <= high <= 100`
    /// - `directory.limit` must be greater than 0
    /// - base URLs must not be empty
    /// - `default_review_count` must be greater than 0
    /// - both timeouts must be greater than 0
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.matching.top_k == 0 {
            return Err(SearchError::Config("top_k must be greater than 0".into()));
        }
        let t = &self.matching.thresholds;
        if t.high > 100 {
            return Err(SearchError::Config(
                "thresholds must not exceed 100".into(),
            ));
        }
        if t.floor > t.medium || t.medium > t.high {
            return Err(SearchError::Config(
                "thresholds must satisfy floor <= medium <= high".into(),
            ));
        }
        if self.directory.limit == 0 {
            return Err(SearchError::Config(
                "directory limit must be greater than 0".into(),
            ));
        }
        if self.directory.api_base_url.trim().is_empty() {
            return Err(SearchError::Config(
                "directory api_base_url must not be empty".into(),
            ));
        }
        if self.pages.site_base_url.trim().is_empty() {
            return Err(SearchError::Config(
                "pages site_base_url must not be empty".into(),
            ));
        }
        if self.default_review_count == 0 {
            return Err(SearchError::Config(
                "default_review_count must be greater than 0".into(),
            ));
        }
        if self.timeout_seconds == 0 {
            return Err(SearchError::Config(
                "timeout_seconds must be greater than 0".into(),
            ));
        }
        if self.request_timeout_seconds == 0 {
            return Err(SearchError::Config(
                "request_timeout_seconds must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}
