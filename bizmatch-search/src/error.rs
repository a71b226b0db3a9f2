//! Error types for the bizmatch-search crate.
//!
//! Messages are stable strings suitable for display. The API token never
//! appears in an error message.

/// Errors that can occur while resolving a business query.
///
/// Normalization and ranking never fail; only the network-bound stages
/// (directory lookup, page fetch) and configuration validation produce
/// errors.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// Transport or availability failure against an external service.
    /// Recoverable by retrying at the caller.
    #[error("fetch error: {0}")]
    Fetch(String),

    /// The business page no longer matches the embedded-data contract:
    /// zero or several structured-data blocks, or missing fields.
    #[error("page format error: {0}")]
    PageFormat(String),

    /// A network stage did not finish before the caller's deadline.
    #[error("timed out: {0}")]
    Timeout(String),

    /// Invalid search configuration.
    #[error("config error: {0}")]
    Config(String),
}

impl SearchError {
    /// Short machine-readable name of this error's kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Fetch(_) => "fetch",
            Self::PageFormat(_) => "page_format",
            Self::Timeout(_) => "timeout",
            Self::Config(_) => "config",
        }
    }

    /// Whether retrying the same request could succeed.
    ///
    /// A stale page contract or a bad config will fail the same way again.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Fetch(_) | Self::Timeout(_))
    }
}

/// Convenience type alias for bizmatch-search results.
pub type Result<T> = std::result::Result<T, SearchError>;
