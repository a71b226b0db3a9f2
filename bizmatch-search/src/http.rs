//! Shared HTTP client for the directory API and business pages.
//!
//! Provides a [`reqwest::Client`] with the configured User-Agent, timeout and
//! decompression, plus the mapping from transport errors to [`SearchError`].

use crate::config::SearchConfig;
use crate::error::SearchError;
use std::time::Duration;

/// Build a [`reqwest::Client`] configured for directory and page requests.
///
/// The client has:
/// - Per-request timeout from `config.timeout_seconds`
/// - User-Agent from `config.user_agent`
/// - Brotli and gzip decompression
///
/// # Errors
///
/// Returns [`SearchError::Fetch`] if the client cannot be constructed.
pub fn build_client(config: &SearchConfig) -> Result<reqwest::Client, SearchError> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_seconds))
        .user_agent(config.user_agent.clone())
        .redirect(reqwest::redirect::Policy::limited(10))
        .build()
        .map_err(|e| SearchError::Fetch(format!("failed to build HTTP client: {e}")))
}

/// Map a failed request to [`SearchError`], keeping timeouts distinct.
pub(crate) fn request_error(target: &str, err: reqwest::Error) -> SearchError {
    if err.is_timeout() {
        SearchError::Timeout(format!("{target} request timed out"))
    } else {
        SearchError::Fetch(format!("{target} request failed: {err}"))
    }
}

/// Join a base URL and a path without doubling or dropping the slash.
pub(crate) fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
