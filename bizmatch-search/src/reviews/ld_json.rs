//! [`PageParser`] for pages embedding schema.org data as JSON-LD.
//!
//! The page must contain exactly one `<script type="application/ld+json">`
//! block. Zero or several means the page was redesigned and the scraper
//! needs updating, so both are [`SearchError::PageFormat`].

use scraper::{Html, Selector};
use serde::Deserialize;

use super::{FetchedPage, PageParser};
use crate::error::SearchError;
use crate::types::{BusinessReviews, BusinessSummary, Review};

/// Content type of the structured-data block.
pub const LD_JSON_TYPE: &str = "application/ld+json";

/// Parses the single JSON-LD block of a business page.
#[derive(Debug, Clone, Copy, Default)]
pub struct LdJsonParser;

impl PageParser for LdJsonParser {
    fn parse(&self, page: &FetchedPage, requested: usize) -> Result<BusinessReviews, SearchError> {
        let block = single_ld_json_block(&page.body)?;
        let business: LdBusiness = serde_json::from_str(&block)
            .map_err(|e| SearchError::PageFormat(format!("invalid {LD_JSON_TYPE} block: {e}")))?;

        let summary = BusinessSummary {
            name: business.name,
            address: format!(
                "{}, {}, {} {}",
                business.address.street_address,
                business.address.address_locality,
                business.address.address_region,
                business.address.postal_code
            ),
            rating: business
                .aggregate_rating
                .rating_value
                .to_f64("aggregateRating.ratingValue")?,
            review_count: business
                .aggregate_rating
                .review_count
                .to_u64("aggregateRating.reviewCount")?,
            requested_review_count: requested,
            source_url: page.url.clone(),
        };

        let effective = requested.min(business.review.len());
        let reviews = business
            .review
            .into_iter()
            .take(effective)
            .enumerate()
            .map(|(i, raw)| parse_review(i, raw))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(BusinessReviews { summary, reviews })
    }
}

/// Return the text of the page's only JSON-LD block.
fn single_ld_json_block(html: &str) -> Result<String, SearchError> {
    let document = Html::parse_document(html);
    let selector = Selector::parse(&format!(r#"script[type="{LD_JSON_TYPE}"]"#))
        .map_err(|e| SearchError::PageFormat(format!("invalid block selector: {e:?}")))?;

    let blocks: Vec<String> = document
        .select(&selector)
        .map(|el| el.text().collect::<String>())
        .collect();

    match <[String; 1]>::try_from(blocks) {
        Ok([block]) => Ok(block),
        Err(blocks) => Err(SearchError::PageFormat(format!(
            "expected exactly one {LD_JSON_TYPE} block, found {}",
            blocks.len()
        ))),
    }
}

/// Only the first `requested` entries are decoded; later ones may be anything.
fn parse_review(index: usize, raw: serde_json::Value) -> Result<Review, SearchError> {
    let review: LdReview = serde_json::from_value(raw)
        .map_err(|e| SearchError::PageFormat(format!("invalid review {index}: {e}")))?;
    Ok(Review {
        published_date: review.date_published,
        rating: review
            .review_rating
            .rating_value
            .to_f64("review.reviewRating.ratingValue")?,
        text: review.description,
    })
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LdBusiness {
    name: String,
    address: LdAddress,
    aggregate_rating: LdAggregateRating,
    review: Vec<serde_json::Value>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LdAddress {
    street_address: String,
    address_locality: String,
    address_region: String,
    postal_code: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LdAggregateRating {
    rating_value: LdNumber,
    review_count: LdNumber,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LdReview {
    date_published: String,
    review_rating: LdRating,
    description: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LdRating {
    rating_value: LdNumber,
}

/// schema.org numbers show up both as JSON numbers and as strings.
#[derive(Deserialize)]
#[serde(untagged)]
enum LdNumber {
    Number(serde_json::Number),
    Text(String),
}

impl LdNumber {
    fn to_f64(&self, field: &str) -> Result<f64, SearchError> {
        let value = match self {
            Self::Number(n) => n.as_f64(),
            Self::Text(s) => s.trim().parse().ok(),
        };
        value.ok_or_else(|| SearchError::PageFormat(format!("{field} is not a number")))
    }

    fn to_u64(&self, field: &str) -> Result<u64, SearchError> {
        let value = match self {
            Self::Number(n) => n.as_u64(),
            Self::Text(s) => s.trim().parse().ok(),
        };
        value.ok_or_else(|| SearchError::PageFormat(format!("{field} is not a count")))
    }
}
