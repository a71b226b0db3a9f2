//! Candidate fetcher: the directory lookup behind a pluggable trait.
//!
//! The core only needs an ordered candidate list per call. [`YelpDirectory`]
//! is the HTTP-backed implementation; tests substitute their own.

pub mod yelp;

pub use yelp::YelpDirectory;

use crate::config::DirectoryConfig;
use crate::error::SearchError;
use crate::types::Candidate;

/// Filters sent with a directory lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryQuery {
    /// Normalized search term.
    pub term: String,
    pub location: String,
    pub radius_meters: u32,
    pub category: String,
    pub limit: usize,
}

impl DirectoryQuery {
    /// Build a query for `term` with the filters from `config`.
    pub fn new(term: impl Into<String>, config: &DirectoryConfig) -> Self {
        Self {
            term: term.into(),
            location: config.location.clone(),
            radius_meters: config.radius_meters,
            category: config.category.clone(),
            limit: config.limit,
        }
    }
}

/// A directory of businesses that can be searched by name.
///
/// Implementations must return candidates in a stable order for a given
/// call; the matcher breaks score ties by that order.
pub trait CandidateSource: Send + Sync {
    /// Look up businesses matching `query`.
    ///
    /// An empty result is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Fetch`] or [`SearchError::Timeout`] if the
    /// directory cannot be reached or answers with an error status.
    fn search_candidates(
        &self,
        query: &DirectoryQuery,
    ) -> impl std::future::Future<Output = Result<Vec<Candidate>, SearchError>> + Send;
}
