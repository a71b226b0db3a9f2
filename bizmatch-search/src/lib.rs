//! # bizmatch-search
//!
//! Resolve a free-text business name into a primary match with recent
//! reviews, a set of suggestions, or both.
//!
//! ## Pipeline
//!
//! 1. [`normalize`](normalize::normalize) the query into a directory search term
//! 2. Fetch candidates from a [`CandidateSource`] (Yelp Fusion by default)
//! 3. [`rank`](matcher::rank) candidates against the raw query with a
//!    token-set similarity score and a tiered decision policy
//! 4. For a primary match, fetch its page through a [`PageSource`] and parse
//!    the embedded JSON-LD with a [`PageParser`]
//! 5. [`assemble`](assemble::assemble) the [`SearchResult`]
//!
//! Each search is independent and stateless. The two network stages run
//! under a per-request deadline.
//!
//! ## Failure model
//!
//! - [`SearchError::Fetch`] / [`SearchError::Timeout`]: transient, retryable
//! - [`SearchError::PageFormat`]: the business page no longer matches the
//!   expected structure; the scraper needs updating
//! - A directory returning nothing is an empty result, not an error
//! - A failed review fetch keeps the suggestions and sets
//!   [`SearchResult::review_error`]

pub mod assemble;
pub mod config;
pub mod directory;
pub mod error;
pub mod http;
pub mod matcher;
pub mod normalize;
pub mod resolver;
pub mod reviews;
pub mod types;

pub use assemble::{parse_suggestion_link, suggestion_link};
pub use config::{MatchConfig, MatchThresholds, SearchConfig};
pub use directory::{CandidateSource, DirectoryQuery, YelpDirectory};
pub use error::{Result, SearchError};
pub use resolver::Resolver;
pub use reviews::{FetchedPage, LdJsonParser, PageParser, PageSource, YelpPages};
pub use types::{
    BusinessReviews, BusinessSummary, Candidate, MatchDecision, Review, SearchResult, Suggestion,
};

/// Resolve `query` against the Yelp directory and business pages.
///
/// Builds a [`Resolver`] from `config` for this one call. Reuse a
/// [`Resolver`] directly when running many searches.
///
/// # Errors
///
/// Returns [`SearchError::Config`] for an invalid config, and propagates
/// directory lookup failures. Review failures are reported inside the
/// result.
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> bizmatch_search::Result<()> {
/// let config = bizmatch_search::SearchConfig::default();
/// let result = bizmatch_search::search("Joe's Pizza", Some(3), &config).await?;
/// if let Some(summary) = &result.summary {
///     println!("{} ({})", summary.name, summary.address);
/// }
/// for suggestion in &result.suggestions {
///     println!("did you mean {}? {}", suggestion.name, suggestion.link);
/// }
/// # Ok(())
/// # }
/// ```
pub async fn search(
    query: &str,
    review_count: Option<usize>,
    config: &SearchConfig,
) -> Result<SearchResult> {
    Resolver::from_config(config.clone())?
        .search(query, review_count)
        .await
}

/// Fetch reviews for a known business id, skipping the directory.
///
/// # Errors
///
/// Returns [`SearchError::Config`] for an invalid config, and propagates
/// page fetch and parse failures.
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> bizmatch_search::Result<()> {
/// let config = bizmatch_search::SearchConfig::default();
/// let result = bizmatch_search::lookup("joes-pizza-new-york", Some(2), &config).await?;
/// for review in &result.reviews {
///     println!("{} ({}): {}", review.published_date, review.rating, review.text);
/// }
/// # Ok(())
/// # }
/// ```
pub async fn lookup(
    business_id: &str,
    review_count: Option<usize>,
    config: &SearchConfig,
) -> Result<SearchResult> {
    Resolver::from_config(config.clone())?
        .lookup(business_id, review_count)
        .await
}
