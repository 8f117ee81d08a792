//! Link collection phase
//!
//! Pages through the archive index for one target and accumulates a
//! deduplicated link collection, resuming from whatever an earlier run left
//! on disk.

use crate::config::{SiteConfig, Target};
use crate::crawler::fetcher::{build_http_client, fetch_listing};
use crate::crawler::parser::{append_raw_param, parse_listing, resolve_link, Selectors};
use crate::storage::{LinkCollection, LinkRecord, StorageError};
use crate::HarvestError;
use reqwest::Client;
use url::Url;

/// Why pagination ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The page had no listing rows
    EmptyPage(u32),

    /// The page had rows, but every link was already known
    NoNewRecords(u32),

    /// The configured page ceiling was reached
    PageLimit,
}

/// Summary of one link collection run
#[derive(Debug, Clone)]
pub struct CollectOutcome {
    pub pages_visited: u32,
    pub failed_pages: Vec<u32>,
    pub new_records: usize,
    pub total_records: usize,
    pub stop_reason: StopReason,
}

/// Collects listing links for targets of one archive
pub struct LinkCollector {
    config: SiteConfig,
    client: Client,
    selectors: Selectors,
    base_url: Url,
}

impl LinkCollector {
    /// Creates a collector for the configured archive
    pub fn new(config: SiteConfig) -> Result<Self, HarvestError> {
        let client = build_http_client(&config)?;
        let selectors = Selectors::from_config(&config)?;
        let base_url = Url::parse(&config.base_url)?;

        Ok(Self {
            config,
            client,
            selectors,
            base_url,
        })
    }

    /// URL the listing form is posted to for a target
    pub fn listing_url(&self, target: &Target) -> String {
        append_raw_param(&self.base_url, &self.config.target_param, &target.query)
    }

    /// Runs the link collection for one target
    ///
    /// Page failures are logged and skipped. The collection is checkpointed
    /// every `checkpoint_interval` records and saved once more at the end.
    /// A run in which every page request failed is reported as
    /// [`HarvestError::ArchiveUnreachable`] after that final save.
    pub async fn collect(&self, target: &Target) -> Result<CollectOutcome, HarvestError> {
        let path = self.config.links_path(target);
        let mut links = open_or_reset(path)?;
        let initial = links.len();
        if initial > 0 {
            tracing::info!(
                "Loaded {} existing links from {}",
                initial,
                links.path().display()
            );
        }

        tracing::info!("Collecting links for {} ({})", target.name, target.id);

        let listing_url = self.listing_url(target);
        let mut pages_visited = 0;
        let mut failed_pages = Vec::new();
        let mut stop_reason = StopReason::PageLimit;

        for page in 1..=self.config.max_pages {
            tracing::info!("Scraping page {}...", page);
            pages_visited += 1;

            let form = [
                (self.config.page_param.as_str(), page.to_string()),
                (self.config.target_param.as_str(), target.query.clone()),
            ];
            let body = match fetch_listing(&self.client, &listing_url, &form)
                .await
                .into_body()
            {
                Ok(body) => body,
                Err(error) => {
                    tracing::warn!("Error scraping page {}: {}", page, error);
                    failed_pages.push(page);
                    continue;
                }
            };

            let listing = parse_listing(&body, &self.selectors);
            if listing.row_count == 0 {
                tracing::info!("No more articles found on page {}. Stopping.", page);
                stop_reason = StopReason::EmptyPage(page);
                break;
            }

            let mut found_on_page = 0;
            for entry in listing.entries {
                let Some(url) = resolve_link(
                    &self.base_url,
                    &entry.href,
                    &self.config.target_param,
                    &target.query,
                ) else {
                    tracing::debug!("Skipping unusable link {:?}", entry.href);
                    continue;
                };

                if links.insert(LinkRecord {
                    title: entry.title,
                    url,
                }) {
                    found_on_page += 1;
                    links.checkpoint(self.config.checkpoint_interval)?;
                }
            }

            tracing::info!(
                "Found {} articles on page {}. Total so far: {}",
                found_on_page,
                page,
                links.len()
            );

            if found_on_page == 0 {
                tracing::info!("No new articles found on page {}. Stopping.", page);
                stop_reason = StopReason::NoNewRecords(page);
                break;
            }
        }

        links.save()?;
        tracing::info!(
            "Saved {} links for {} to {}",
            links.len(),
            target.id,
            links.path().display()
        );

        if pages_visited > 0 && failed_pages.len() == pages_visited as usize {
            return Err(HarvestError::ArchiveUnreachable {
                target: target.id.clone(),
                pages: pages_visited,
            });
        }

        Ok(CollectOutcome {
            pages_visited,
            failed_pages,
            new_records: links.len() - initial,
            total_records: links.len(),
            stop_reason,
        })
    }
}

/// Opens a link collection; an unreadable JSON file is logged and replaced
fn open_or_reset(path: std::path::PathBuf) -> Result<LinkCollection, HarvestError> {
    match LinkCollection::open(path.clone()) {
        Ok(links) => Ok(links),
        Err(StorageError::Corrupt { path: bad, source }) => {
            tracing::warn!("Could not load existing file {}: {}", bad, source);
            Ok(LinkCollection::empty(path))
        }
        Err(e) => Err(e.into()),
    }
}
