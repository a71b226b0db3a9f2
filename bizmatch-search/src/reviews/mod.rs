//! Review scraper: fetch a business page and extract its structured data.
//!
//! Fetching and parsing sit behind separate traits. [`PageSource`] is the
//! network side ([`YelpPages`] by default); [`PageParser`] owns the
//! page-format contract ([`LdJsonParser`] by default), so a redesigned page
//! only needs a new parser.

pub mod ld_json;
pub mod yelp;

pub use ld_json::LdJsonParser;
pub use yelp::YelpPages;

use crate::error::SearchError;
use crate::types::BusinessReviews;

/// Raw business page as fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    /// Canonical page URL, recorded as the summary's source URL.
    pub url: String,
    /// Response body.
    pub body: String,
}

/// Fetches a business's public page by directory id.
pub trait PageSource: Send + Sync {
    /// Fetch the page for `business_id`.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Fetch`] or [`SearchError::Timeout`] on
    /// transport failure or an error status.
    fn fetch_page(
        &self,
        business_id: &str,
    ) -> impl std::future::Future<Output = Result<FetchedPage, SearchError>> + Send;
}

/// Turns a fetched page into a business summary and its first reviews.
///
/// Implementations must be all-or-nothing: any contract violation is a
/// [`SearchError::PageFormat`], never a partially filled result.
pub trait PageParser: Send + Sync {
    /// Parse `page`, keeping at most `requested` reviews in source order.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::PageFormat`] if the page does not match the
    /// expected structure.
    fn parse(&self, page: &FetchedPage, requested: usize) -> Result<BusinessReviews, SearchError>;
}

/// Fetch `business_id`'s page and parse up to `requested` reviews from it.
///
/// # Errors
///
/// Propagates [`PageSource`] failures unchanged, and [`PageParser`]
/// failures as [`SearchError::PageFormat`].
pub async fn fetch_reviews<P: PageSource>(
    pages: &P,
    parser: &dyn PageParser,
    business_id: &str,
    requested: usize,
) -> Result<BusinessReviews, SearchError> {
    tracing::trace!(business_id, requested, "fetching reviews");

    let page = pages.fetch_page(business_id).await?;
    let parsed = parser.parse(&page, requested).inspect_err(|e| {
        tracing::debug!(business_id, error = %e, "business page did not match expected format");
    })?;

    tracing::debug!(
        business_id,
        requested,
        returned = parsed.reviews.len(),
        "reviews parsed"
    );
    Ok(parsed)
}
