//! Search pipeline: normalize, fetch candidates, rank, fetch reviews, assemble.
//!
//! Stages run strictly in sequence. The two network stages run under the
//! request deadline; when it expires the stage is dropped and
//! [`SearchError::Timeout`] is returned, never a partial result.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;

use crate::assemble::assemble;
use crate::config::SearchConfig;
use crate::directory::{CandidateSource, DirectoryQuery, YelpDirectory};
use crate::error::SearchError;
use crate::matcher;
use crate::normalize::normalize;
use crate::reviews::{fetch_reviews, LdJsonParser, PageParser, PageSource, YelpPages};
use crate::types::SearchResult;

/// Resolves business queries with a fixed configuration and collaborators.
///
/// Holds no per-request state; one resolver can serve any number of
/// independent searches.
pub struct Resolver<D, P> {
    config: SearchConfig,
    directory: D,
    pages: P,
    parser: Box<dyn PageParser>,
}

impl Resolver<YelpDirectory, YelpPages> {
    /// Build a resolver backed by the Yelp directory API and business pages.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] if `config` is invalid, or
    /// [`SearchError::Fetch`] if an HTTP client cannot be built.
    pub fn from_config(config: SearchConfig) -> Result<Self, SearchError> {
        config.validate()?;
        let directory = YelpDirectory::new(&config)?;
        let pages = YelpPages::new(&config)?;
        Self::new(config, directory, pages)
    }
}

impl<D, P> Resolver<D, P>
where
    D: CandidateSource,
    P: PageSource,
{
    /// Build a resolver over custom collaborators, parsing pages as JSON-LD.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] if `config` is invalid.
    pub fn new(config: SearchConfig, directory: D, pages: P) -> Result<Self, SearchError> {
        config.validate()?;
        Ok(Self {
            config,
            directory,
            pages,
            parser: Box::new(LdJsonParser),
        })
    }

    /// Replace the page parser.
    pub fn with_parser(mut self, parser: impl PageParser + 'static) -> Self {
        self.parser = Box::new(parser);
        self
    }

    /// The validated configuration this resolver runs with.
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Resolve `query` under the configured request deadline.
    ///
    /// `review_count` defaults to `config.default_review_count`.
    ///
    /// # Errors
    ///
    /// Fails only if the directory lookup fails or times out. A failed
    /// review fetch still returns the suggestions, with
    /// [`SearchResult::review_error`] set.
    pub async fn search(
        &self,
        query: &str,
        review_count: Option<usize>,
    ) -> Result<SearchResult, SearchError> {
        self.search_until(query, review_count, self.default_deadline())
            .await
    }

    /// [`search`](Self::search) with an explicit deadline.
    ///
    /// # Errors
    ///
    /// Same as [`search`](Self::search).
    pub async fn search_until(
        &self,
        query: &str,
        review_count: Option<usize>,
        deadline: Instant,
    ) -> Result<SearchResult, SearchError> {
        let review_count = review_count.unwrap_or(self.config.default_review_count);
        let term = normalize(query);
        tracing::trace!(query, term = %term, "resolving query");

        let directory_query = DirectoryQuery::new(term, &self.config.directory);
        let candidates = within(
            deadline,
            "directory search",
            self.directory.search_candidates(&directory_query),
        )
        .await?;

        let decision = matcher::rank(query, &candidates, &self.config.matching);

        let result = assemble(&decision, review_count, |business_id| async move {
            within(
                deadline,
                "review fetch",
                fetch_reviews(&self.pages, self.parser.as_ref(), &business_id, review_count),
            )
            .await
        })
        .await;

        tracing::info!(
            candidates = candidates.len(),
            primary = result.summary.is_some(),
            reviews = result.reviews.len(),
            suggestions = result.suggestions.len(),
            review_error = result.review_error.is_some(),
            "search resolved"
        );
        Ok(result)
    }

    /// Fetch reviews for a known business id, as when a suggestion is picked.
    ///
    /// The result has no suggestions. `review_count` defaults to
    /// `config.default_review_count`.
    ///
    /// # Errors
    ///
    /// Propagates the review fetch failure, since there is nothing else to
    /// return.
    pub async fn lookup(
        &self,
        business_id: &str,
        review_count: Option<usize>,
    ) -> Result<SearchResult, SearchError> {
        self.lookup_until(business_id, review_count, self.default_deadline())
            .await
    }

    /// [`lookup`](Self::lookup) with an explicit deadline.
    ///
    /// # Errors
    ///
    /// Same as [`lookup`](Self::lookup).
    pub async fn lookup_until(
        &self,
        business_id: &str,
        review_count: Option<usize>,
        deadline: Instant,
    ) -> Result<SearchResult, SearchError> {
        let review_count = review_count.unwrap_or(self.config.default_review_count);
        let found = within(
            deadline,
            "review fetch",
            fetch_reviews(&self.pages, self.parser.as_ref(), business_id, review_count),
        )
        .await?;

        tracing::info!(business_id, reviews = found.reviews.len(), "lookup resolved");
        Ok(SearchResult {
            summary: Some(found.summary),
            reviews: found.reviews,
            ..Default::default()
        })
    }

    fn default_deadline(&self) -> Instant {
        Instant::now() + Duration::from_secs(self.config.request_timeout_seconds)
    }
}

/// Run `stage` until `deadline`, mapping expiry to [`SearchError::Timeout`].
async fn within<T>(
    deadline: Instant,
    stage: &str,
    fut: impl Future<Output = Result<T, SearchError>>,
) -> Result<T, SearchError> {
    tokio::time::timeout_at(deadline, fut).await.map_err(|_| {
        tracing::warn!(stage, "deadline expired");
        SearchError::Timeout(format!("{stage} exceeded deadline"))
    })?
}
