//! Crawler module for the two scrape phases
//!
//! This module contains the scraping logic, including:
//! - HTTP fetching and failure classification
//! - HTML parsing of listing and content pages
//! - Link collection with pagination, dedup and checkpointing
//! - Content extraction with resume by already-seen URL

mod fetcher;
mod links;
mod parser;
mod texts;

pub use fetcher::{build_http_client, fetch_listing, fetch_page, FetchResult};
pub use links::{CollectOutcome, LinkCollector, StopReason};
pub use parser::{
    parse_document, parse_listing, resolve_link, ListingEntry, ParsedDocument, ParsedListing,
    Selectors,
};
pub use texts::{ContentExtractor, ExtractOutcome};

use crate::config::{Config, Target};
use crate::HarvestError;

/// Runs the link collection phase for one target
///
/// # Example
///
/// ```no_run
/// use speech_harvest::config::{load_config, Target};
/// use speech_harvest::crawler::collect_links;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("config.json"))?;
/// let outcome = collect_links(&config, &Target::new("Lee_Seung_Man")).await?;
/// println!("{} links", outcome.total_records);
/// # Ok(())
/// # }
/// ```
pub async fn collect_links(config: &Config, target: &Target) -> Result<CollectOutcome, HarvestError> {
    LinkCollector::new(config.site.clone())?.collect(target).await
}

/// Runs the content extraction phase for one target
pub async fn extract_texts(config: &Config, target: &Target) -> Result<ExtractOutcome, HarvestError> {
    ContentExtractor::new(config.site.clone())?.extract(target).await
}
