//! Public Yelp business pages as a [`PageSource`].
//!
//! Pages are requested newest-reviews-first (`sort_by=date_desc`) so the
//! reviews embedded in the page are the most recent ones.

use url::Url;

use super::{FetchedPage, PageSource};
use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::http;

/// Fetches `{site_base_url}/biz/{id}`.
pub struct YelpPages {
    client: reqwest::Client,
    base_url: String,
}

impl YelpPages {
    /// Create a page fetcher from `config.pages` and the shared HTTP settings.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Fetch`] if the HTTP client cannot be built.
    pub fn new(config: &SearchConfig) -> Result<Self, SearchError> {
        Ok(Self {
            client: http::build_client(config)?,
            base_url: config.pages.site_base_url.clone(),
        })
    }

    /// Canonical page URL for `business_id`, without query parameters.
    pub fn page_url(&self, business_id: &str) -> Result<Url, SearchError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| SearchError::Config(format!("invalid site URL: {e}")))?;
        url.path_segments_mut()
            .map_err(|()| SearchError::Config("site URL cannot be a base".into()))?
            .pop_if_empty()
            .push("biz")
            .push(business_id);
        Ok(url)
    }
}

impl PageSource for YelpPages {
    async fn fetch_page(&self, business_id: &str) -> Result<FetchedPage, SearchError> {
        let source_url = self.page_url(business_id)?;
        let mut request_url = source_url.clone();
        request_url
            .query_pairs_mut()
            .append_pair("start", "0")
            .append_pair("sort_by", "date_desc");

        tracing::trace!(business_id, "fetching business page");

        let response = self
            .client
            .get(request_url)
            .header("Accept-Language", "en-US,en;q=0.9")
            .send()
            .await
            .map_err(|e| http::request_error("business page", e))?
            .error_for_status()
            .map_err(|e| SearchError::Fetch(format!("business page HTTP error: {e}")))?;

        let body = response
            .text()
            .await
            .map_err(|e| http::request_error("business page body", e))?;

        tracing::trace!(bytes = body.len(), "business page received");

        Ok(FetchedPage {
            url: source_url.to_string(),
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_url_appends_biz_and_id() {
        let pages = YelpPages::new(&SearchConfig::default()).expect("client");
        let url = pages.page_url("joes-pizza-new-york").expect("url");
        assert_eq!(url.as_str(), "https://www.yelp.com/biz/joes-pizza-new-york");
    }

    #[test]
    fn page_url_encodes_id() {
        let pages = YelpPages::new(&SearchConfig::default()).expect("client");
        let url = pages.page_url("café/../x").expect("url");
        assert_eq!(url.path(), "/biz/caf%C3%A9%2F..%2Fx");
    }

    #[test]
    fn page_url_respects_base_path() {
        let mut config = SearchConfig::default();
        config.pages.site_base_url = "http://127.0.0.1:9000/mirror/".into();
        let pages = YelpPages::new(&config).expect("client");
        let url = pages.page_url("joes").expect("url");
        assert_eq!(url.as_str(), "http://127.0.0.1:9000/mirror/biz/joes");
    }

    #[test]
    fn invalid_base_is_config_error() {
        let mut config = SearchConfig::default();
        config.pages.site_base_url = "not a url".into();
        let pages = YelpPages::new(&config).expect("client");
        assert!(matches!(
            pages.page_url("joes").unwrap_err(),
            SearchError::Config(_)
        ));
    }

    #[test]
    fn is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<YelpPages>();
    }
}
