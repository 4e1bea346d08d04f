//! Field extraction for fact-check article pages
//!
//! Extraction is scoped to the page's main content region: a page without
//! one is not an article and yields no record. Within the region every field
//! is optional; a selector that matches nothing produces an empty string or
//! an empty vector, never an error.

use crate::record::{derive_identifier, Record};
use crate::FactsweepError;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

const MAIN_REGION: &str = "main";
const TITLE: &str = "h2.c-title";
const AUTHOR: &str = ".m-author__content > a";
const PUBLISHED_DATE: &str = ".m-author__date";
const CLAIM: &str = ".m-statement__quote-wrap > .m-statement__quote";
const STATEMENT_DESC: &str = ".m-statement__desc";
const RATING: &str = ".m-statement__meter .c-image__original";
const TAGS: &str = "ul.m-list.m-list--horizontal a.c-tag";
const TAG_LABEL: &str = "span";
const SOURCES: &str = "#sources article p";

/// Matches a date-shaped substring such as " March 3, 2021 " inside the
/// statement description ("stated on March 3, 2021 in a speech:").
const CLAIM_DATE_PATTERN: &str = r"\s(\w+\s\d+,\s\d+)\s";

/// Turns a parsed article page into a [`Record`].
///
/// Selectors and the claim-date pattern are compiled once at construction;
/// one extractor is shared across all article-stage workers.
pub struct Extractor {
    main_region: Selector,
    title: Selector,
    author: Selector,
    published_date: Selector,
    claim: Selector,
    statement_desc: Selector,
    rating: Selector,
    tags: Selector,
    tag_label: Selector,
    sources: Selector,
    claim_date: Regex,
}

impl Extractor {
    pub fn new() -> crate::Result<Self> {
        Ok(Self {
            main_region: parse_selector(MAIN_REGION)?,
            title: parse_selector(TITLE)?,
            author: parse_selector(AUTHOR)?,
            published_date: parse_selector(PUBLISHED_DATE)?,
            claim: parse_selector(CLAIM)?,
            statement_desc: parse_selector(STATEMENT_DESC)?,
            rating: parse_selector(RATING)?,
            tags: parse_selector(TAGS)?,
            tag_label: parse_selector(TAG_LABEL)?,
            sources: parse_selector(SOURCES)?,
            claim_date: Regex::new(CLAIM_DATE_PATTERN)?,
        })
    }

    /// Extracts a record from an article page.
    ///
    /// Returns `None` when the document has no main content region, which
    /// marks the page as not-an-article. Otherwise extraction is total:
    /// every missing field comes back empty.
    pub fn extract_article(&self, document: &Html, source_url: &str) -> Option<Record> {
        let region = document.select(&self.main_region).next()?;
        Some(self.extract_fields(region, source_url))
    }

    fn extract_fields(&self, region: ElementRef<'_>, source_url: &str) -> Record {
        let description = child_text(region, &self.statement_desc);
        let claim_date = self
            .claim_date
            .captures(&description)
            .and_then(|captures| captures.get(1))
            .map(|group| group.as_str().to_string())
            .unwrap_or_default();

        let tags = region
            .select(&self.tags)
            .map(|tag| child_text(tag, &self.tag_label))
            .collect();
        let sources = region.select(&self.sources).map(element_text).collect();

        Record {
            identifier: derive_identifier(source_url),
            url: source_url.to_string(),
            title: child_text(region, &self.title),
            author: child_text(region, &self.author),
            published_date: child_text(region, &self.published_date),
            claim: first_text(region, &self.claim),
            claim_date,
            rating: child_attr(region, &self.rating, "alt"),
            tags,
            sources,
        }
    }
}

fn parse_selector(selector: &str) -> crate::Result<Selector> {
    Selector::parse(selector).map_err(|e| FactsweepError::Selector {
        selector: selector.to_string(),
        message: e.to_string(),
    })
}

/// Concatenated, trimmed text of every descendant matching the selector.
fn child_text(region: ElementRef<'_>, selector: &Selector) -> String {
    region
        .select(selector)
        .flat_map(|element| element.text())
        .collect::<String>()
        .trim()
        .to_string()
}

/// Trimmed text of the first descendant matching the selector.
fn first_text(region: ElementRef<'_>, selector: &Selector) -> String {
    region
        .select(selector)
        .next()
        .map(element_text)
        .unwrap_or_default()
}

/// Trimmed attribute value of the first descendant matching the selector.
fn child_attr(region: ElementRef<'_>, selector: &Selector, attr: &str) -> String {
    region
        .select(selector)
        .next()
        .and_then(|element| element.value().attr(attr))
        .map(|value| value.trim().to_string())
        .unwrap_or_default()
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}
