//! Core types flowing through the search pipeline.
//!
//! Everything handed to presentation ([`SearchResult`] and its parts)
//! serializes with camelCase field names.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::SearchError;
use crate::normalize::normalize;

/// A directory search result eligible for matching against the query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// Directory identifier, used to build the business page URL.
    pub id: String,
    /// Name as returned by the directory.
    pub display_name: String,
    /// [`normalize`]d display name, the string the matcher scores.
    pub normalized_name: String,
}

impl Candidate {
    /// Build a candidate, deriving `normalized_name` from `display_name`.
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        let display_name = display_name.into();
        let normalized_name = normalize(&display_name);
        Self {
            id: id.into(),
            display_name,
            normalized_name,
        }
    }
}

/// Similarity of one candidate to the raw query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchScore {
    /// Position of the candidate in the list handed to the matcher.
    pub candidate_index: usize,
    /// 0-100.
    pub score: u8,
}

/// Confidence band the top score fell into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tier {
    /// Top score above the high threshold.
    Confident,
    /// Top score above the medium threshold.
    Probable,
    /// Nothing confident enough to show as primary.
    Uncertain,
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Confident => "confident",
            Self::Probable => "probable",
            Self::Uncertain => "uncertain",
        })
    }
}

/// Outcome of ranking: zero or one primary match plus suggestions.
///
/// `suggestions` never contains `primary`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchDecision {
    pub primary: Option<Candidate>,
    pub suggestions: Vec<Candidate>,
}

/// Business details taken from the page's structured data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessSummary {
    pub name: String,
    /// `"<street>, <locality>, <region> <postal>"`.
    pub address: String,
    /// Aggregate rating.
    pub rating: f64,
    /// Total reviews the business has, not the number returned.
    pub review_count: u64,
    /// How many reviews the caller asked for.
    pub requested_review_count: usize,
    /// Business page URL, without query parameters.
    pub source_url: String,
}

/// A single review, in the order the page lists it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub published_date: String,
    pub rating: f64,
    pub text: String,
}

/// Summary plus the bounded review list for one business.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessReviews {
    pub summary: BusinessSummary,
    pub reviews: Vec<Review>,
}

/// An alternative candidate offered to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub name: String,
    /// Re-entry link carrying the business id and requested review count.
    pub link: String,
}

/// Why the primary match came back without reviews.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewFailure {
    /// One of [`SearchError::kind`]'s values.
    pub kind: String,
    pub message: String,
    pub retryable: bool,
}

impl From<&SearchError> for ReviewFailure {
    fn from(err: &SearchError) -> Self {
        Self {
            kind: err.kind().to_owned(),
            message: err.to_string(),
            retryable: err.is_retryable(),
        }
    }
}

/// The payload handed to presentation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<BusinessSummary>,
    pub reviews: Vec<Review>,
    pub suggestions: Vec<Suggestion>,
    /// Set when a primary match was chosen but its reviews could not be fetched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review_error: Option<ReviewFailure>,
}

impl SearchResult {
    /// True when there is neither a summary nor any suggestion to show.
    pub fn is_empty(&self) -> bool {
        self.summary.is_none() && self.suggestions.is_empty()
    }
}
