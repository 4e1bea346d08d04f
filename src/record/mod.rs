//! The extracted-article record model
//!
//! A [`Record`] is the structured output of one article-page visit. It is
//! built once by the extractor, handed to the persistence sink by value, and
//! never mutated afterwards.

mod extract;

pub use extract::Extractor;

use serde::{Deserialize, Serialize};

/// One extracted fact-check article.
///
/// String fields may be empty when the page carried no matching content;
/// `tags` and `sources` default to empty vectors, never to an absent value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Unique key, the trailing non-empty path segment of `url`.
    pub identifier: String,

    /// The article URL that was fetched.
    pub url: String,

    /// Article headline.
    pub title: String,

    /// Byline author.
    pub author: String,

    /// Date the article was published, as shown on the page.
    pub published_date: String,

    /// The quoted statement under evaluation, whitespace-trimmed.
    pub claim: String,

    /// Date the claim was made, parsed out of the statement description.
    /// Empty when the description has no date-shaped substring.
    pub claim_date: String,

    /// Verdict label, e.g. "true", "mostly-false", "pants-fire".
    pub rating: String,

    /// Category labels in document order.
    pub tags: Vec<String>,

    /// Citation texts in document order.
    pub sources: Vec<String>,
}

/// Derives the stable record identifier from an article URL.
///
/// Splits the URL on `/` and returns the last non-empty segment, so a
/// trailing slash does not change the result. Returns an empty string when
/// the URL has no non-empty segment at all; callers store such records
/// anyway and flag them as a data-quality concern.
pub fn derive_identifier(url: &str) -> String {
    url.rsplit('/')
        .find(|segment| !segment.is_empty())
        .unwrap_or_default()
        .to_string()
}
