//! HTML parser for listing and content pages
//!
//! This module handles parsing HTML content to extract:
//! - Listing rows (title and relative link) from index pages
//! - Body paragraphs and the date field from content pages

use crate::config::SiteConfig;
use crate::HarvestError;
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Compiled CSS selectors for the archive's page templates
#[derive(Debug, Clone)]
pub struct Selectors {
    row: Selector,
    link: Selector,
    content: Selector,
    meta_row: Selector,
    th: Selector,
    td: Selector,
}

impl Selectors {
    /// Compiles the selectors named in the site configuration
    pub fn from_config(config: &SiteConfig) -> Result<Self, HarvestError> {
        Ok(Self {
            row: compile(&config.row_selector)?,
            link: compile(&config.link_selector)?,
            content: compile(&config.content_selector)?,
            meta_row: compile(&config.meta_row_selector)?,
            th: compile("th")?,
            td: compile("td")?,
        })
    }
}

fn compile(selector: &str) -> Result<Selector, HarvestError> {
    Selector::parse(selector).map_err(|e| HarvestError::Selector {
        selector: selector.to_string(),
        message: format!("{:?}", e),
    })
}

/// One row of a listing page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    pub title: String,
    /// The link target exactly as written in the page
    pub href: String,
}

/// Extracted information from a listing page
#[derive(Debug, Clone, Default)]
pub struct ParsedListing {
    /// Number of rows matched, including rows without a usable link
    pub row_count: usize,

    /// Rows that carried a link, in document order
    pub entries: Vec<ListingEntry>,
}

/// Extracted information from a content page
#[derive(Debug, Clone, Default)]
pub struct ParsedDocument {
    /// Non-empty, trimmed lines of the body region
    pub paragraphs: Vec<String>,

    /// Value of the date row, if one was found
    pub date: Option<String>,
}

/// Parses a listing page into rows
///
/// # Example
///
/// ```no_run
/// use speech_harvest::config::SiteConfig;
/// use speech_harvest::crawler::{parse_listing, Selectors};
///
/// let selectors = Selectors::from_config(&SiteConfig::default()).unwrap();
/// let html = r#"<table class="board-list"><tbody>
///     <tr><td class="subject"><a href="?seq=1">Address</a></td></tr>
/// </tbody></table>"#;
/// let listing = parse_listing(html, &selectors);
/// assert_eq!(listing.entries[0].href, "?seq=1");
/// ```
pub fn parse_listing(html: &str, selectors: &Selectors) -> ParsedListing {
    let document = Html::parse_document(html);
    let mut listing = ParsedListing::default();

    for row in document.select(&selectors.row) {
        listing.row_count += 1;

        let Some(anchor) = row.select(&selectors.link).next() else {
            continue;
        };
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        if href.trim().is_empty() {
            continue;
        }

        listing.entries.push(ListingEntry {
            title: stripped_text(anchor),
            href: href.trim().to_string(),
        });
    }

    listing
}

/// Parses a content page into paragraphs and an optional date
///
/// Paragraphs are the text of the first element matching the content
/// selector, split at element and line boundaries, trimmed, with empty
/// lines dropped. The date is the `td` of the first metadata row whose `th`
/// contains `date_label`.
pub fn parse_document(html: &str, selectors: &Selectors, date_label: &str) -> ParsedDocument {
    let document = Html::parse_document(html);

    let paragraphs = document
        .select(&selectors.content)
        .next()
        .map(|content| {
            content
                .text()
                .flat_map(|chunk| chunk.split('\n'))
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    let date = document.select(&selectors.meta_row).find_map(|row| {
        let th = row.select(&selectors.th).next()?;
        let td = row.select(&selectors.td).next()?;
        if stripped_text(th).contains(date_label) {
            Some(stripped_text(td))
        } else {
            None
        }
    });

    ParsedDocument { paragraphs, date }
}

/// Concatenates the element's text nodes, each trimmed
fn stripped_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("")
}

/// Resolves a listing href against the listing endpoint and re-appends the
/// target parameter, which the site's links omit
///
/// The target value is appended verbatim, not percent-encoded, so stored
/// URLs stay byte-identical across runs and with collections written by
/// earlier tooling. Returns None for empty, fragment-only, `javascript:` and
/// non-http(s) links.
pub fn resolve_link(base: &Url, href: &str, target_param: &str, query: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') || href.starts_with("javascript:") {
        return None;
    }

    let mut url = base.join(href).ok()?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return None;
    }
    url.set_fragment(None);

    Some(append_raw_param(&url, target_param, query))
}

/// Appends `name=value` to the URL's query without encoding `value`
pub fn append_raw_param(url: &Url, name: &str, value: &str) -> String {
    let separator = match url.query() {
        Some(query) if !query.is_empty() => "&",
        Some(_) => "",
        None => "?",
    };
    format!("{}{}{}={}", url, separator, name, value)
}
