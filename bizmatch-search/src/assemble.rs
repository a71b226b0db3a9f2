//! Result assembly: a [`MatchDecision`] plus one review lookup becomes a
//! [`SearchResult`].
//!
//! Suggestions carry a re-entry link (`/search?id=<id>&n=<count>`) so that
//! picking one goes straight to the review scraper without re-ranking.

use std::future::Future;

use url::form_urlencoded;

use crate::error::SearchError;
use crate::types::{BusinessReviews, MatchDecision, ReviewFailure, SearchResult, Suggestion};

/// Path of the suggestion re-entry link.
pub const SEARCH_LINK_PATH: &str = "/search";

/// Review count used when a link carries none, or an unreadable one.
pub const DEFAULT_LINK_REVIEW_COUNT: usize = 1;

/// Build the re-entry link for a suggested business.
pub fn suggestion_link(business_id: &str, review_count: usize) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("id", business_id)
        .append_pair("n", &review_count.to_string())
        .finish();
    format!("{SEARCH_LINK_PATH}?{query}")
}

/// Recover `(business_id, review_count)` from a suggestion link.
///
/// Accepts either the full link or just its query string. Returns `None`
/// when there is no non-empty `id`.
pub fn parse_suggestion_link(link: &str) -> Option<(String, usize)> {
    let query = link.split_once('?').map_or(link, |(_, q)| q);

    let mut id = None;
    let mut count = None;
    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        match key.as_ref() {
            "id" => id = Some(value.into_owned()),
            "n" => count = value.parse().ok(),
            _ => {}
        }
    }

    let id = id.filter(|id| !id.is_empty())?;
    Some((id, count.unwrap_or(DEFAULT_LINK_REVIEW_COUNT)))
}

/// Combine `decision` with the reviews of its primary match.
///
/// `lookup` is called at most once, with the primary candidate's id. If it
/// fails, the result keeps its suggestions and records the failure in
/// [`SearchResult::review_error`] instead of a summary.
pub async fn assemble<F, Fut>(
    decision: &MatchDecision,
    review_count: usize,
    lookup: F,
) -> SearchResult
where
    F: FnOnce(String) -> Fut,
    Fut: Future<Output = Result<BusinessReviews, SearchError>>,
{
    let suggestions: Vec<Suggestion> = decision
        .suggestions
        .iter()
        .map(|candidate| Suggestion {
            name: candidate.display_name.clone(),
            link: suggestion_link(&candidate.id, review_count),
        })
        .collect();

    let Some(primary) = &decision.primary else {
        return SearchResult {
            suggestions,
            ..Default::default()
        };
    };

    match lookup(primary.id.clone()).await {
        Ok(found) => SearchResult {
            summary: Some(found.summary),
            reviews: found.reviews,
            suggestions,
            review_error: None,
        },
        Err(err) => {
            tracing::warn!(
                business_id = %primary.id,
                error = %err,
                retryable = err.is_retryable(),
                "review fetch failed, returning suggestions only"
            );
            SearchResult {
                summary: None,
                reviews: Vec::new(),
                suggestions,
                review_error: Some(ReviewFailure::from(&err)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BusinessSummary, Candidate, Review};
    use std::cell::Cell;
    use std::future::ready;

    fn reviews_for(id: &str, count: usize) -> BusinessReviews {
        BusinessReviews {
            summary: BusinessSummary {
                name: format!("name of {id}"),
                address: "7 Carmine St, New York, NY 10014".into(),
                rating: 4.0,
                review_count: 100,
                requested_review_count: count,
                source_url: format!("https://www.yelp.com/biz/{id}"),
            },
            reviews: vec![
                Review {
                    published_date: "2024-03-02".into(),
                    rating: 5.0,
                    text: "Classic.".into(),
                };
                count
            ],
        }
    }

    fn decision(primary: Option<(&str, &str)>, suggestions: &[(&str, &str)]) -> MatchDecision {
        MatchDecision {
            primary: primary.map(|(id, name)| Candidate::new(id, name)),
            suggestions: suggestions
                .iter()
                .map(|(id, name)| Candidate::new(*id, *name))
                .collect(),
        }
    }

    #[tokio::test]
    async fn primary_gets_summary_reviews_and_suggestions() {
        let decision = decision(
            Some(("joes-pizza", "Joe's Pizza")),
            &[("joes-pizzeria", "Joe's Pizzeria")],
        );
        let calls = Cell::new(0);

        let result = assemble(&decision, 3, |id| {
            calls.set(calls.get() + 1);
            ready(Ok(reviews_for(&id, 3)))
        })
        .await;

        assert_eq!(calls.get(), 1);
        let summary = result.summary.expect("summary");
        assert_eq!(summary.name, "name of joes-pizza");
        assert_eq!(result.reviews.len(), 3);
        assert_eq!(
            result.suggestions,
            vec![Suggestion {
                name: "Joe's Pizzeria".into(),
                link: "/search?id=joes-pizzeria&n=3".into(),
            }]
        );
        assert!(result.review_error.is_none());
    }

    #[tokio::test]
    async fn no_primary_never_calls_lookup() {
        let decision = decision(None, &[("a", "A Pizza"), ("b", "B Pizza")]);
        let calls = Cell::new(0);

        let result = assemble(&decision, 2, |id| {
            calls.set(calls.get() + 1);
            ready(Ok(reviews_for(&id, 2)))
        })
        .await;

        assert_eq!(calls.get(), 0);
        assert!(result.summary.is_none());
        assert!(result.reviews.is_empty());
        assert_eq!(result.suggestions.len(), 2);
        assert_eq!(result.suggestions[1].link, "/search?id=b&n=2");
    }

    #[tokio::test]
    async fn empty_decision_gives_empty_result() {
        let result = assemble(&MatchDecision::default(), 1, |id| {
            ready(Ok(reviews_for(&id, 1)))
        })
        .await;
        assert!(result.is_empty());
        assert!(result.reviews.is_empty());
    }

    #[tokio::test]
    async fn review_failure_keeps_suggestions() {
        let decision = decision(Some(("joes", "Joe's Pizza")), &[("marios", "Mario's Pizza")]);

        let result = assemble(&decision, 1, |_id| {
            ready(Err(SearchError::PageFormat("found 2 blocks".into())))
        })
        .await;

        assert!(result.summary.is_none());
        assert!(result.reviews.is_empty());
        assert_eq!(result.suggestions.len(), 1);
        let failure = result.review_error.expect("review error");
        assert_eq!(failure.kind, "page_format");
        assert!(!failure.retryable);
    }

    #[test]
    fn link_encodes_id() {
        assert_eq!(
            suggestion_link("joe's pizza&co", 4),
            "/search?id=joe%27s+pizza%26co&n=4"
        );
    }

    #[test]
    fn link_parses_back() {
        let link = suggestion_link("joe's pizza&co", 4);
        assert_eq!(
            parse_suggestion_link(&link),
            Some(("joe's pizza&co".to_owned(), 4))
        );
    }

    #[test]
    fn parse_link_accepts_bare_query() {
        assert_eq!(
            parse_suggestion_link("id=joes&n=5"),
            Some(("joes".to_owned(), 5))
        );
    }

    #[test]
    fn parse_link_defaults_count() {
        assert_eq!(
            parse_suggestion_link("/search?id=joes"),
            Some(("joes".to_owned(), 1))
        );
        assert_eq!(
            parse_suggestion_link("/search?id=joes&n=lots"),
            Some(("joes".to_owned(), 1))
        );
    }

    #[test]
    fn parse_link_requires_id() {
        assert_eq!(parse_suggestion_link("/search?n=3"), None);
        assert_eq!(parse_suggestion_link("/search?id=&n=3"), None);
    }
}
