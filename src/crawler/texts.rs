//! Content extraction phase
//!
//! Walks a target's link collection, fetches every page not yet present in
//! the text collection, and stores the extracted body and date.

use crate::config::{SiteConfig, Target};
use crate::crawler::fetcher::{build_http_client, fetch_page};
use crate::crawler::parser::{parse_document, Selectors};
use crate::storage::{LinkCollection, StorageError, TextCollection, TextRecord};
use crate::HarvestError;
use reqwest::Client;
use std::time::Duration;

/// Summary of one extraction run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractOutcome {
    /// Links that were fetched this run
    pub attempted: usize,
    /// New records stored
    pub extracted: usize,
    /// Links skipped because a record already existed
    pub skipped: usize,
    /// Pages fetched but without any body text
    pub empty: usize,
    /// Pages that could not be fetched
    pub failed: usize,
    /// Records in the collection after the run
    pub total_records: usize,
}

/// Extracts speech texts for targets of one archive
pub struct ContentExtractor {
    config: SiteConfig,
    client: Client,
    selectors: Selectors,
}

impl ContentExtractor {
    pub fn new(config: SiteConfig) -> Result<Self, HarvestError> {
        let client = build_http_client(&config)?;
        let selectors = Selectors::from_config(&config)?;
        Ok(Self {
            config,
            client,
            selectors,
        })
    }

    /// Runs content extraction for one target
    ///
    /// Requires the target's link collection to exist. Fetch failures and
    /// empty pages are logged and skipped; a fixed delay follows every fetch.
    pub async fn extract(&self, target: &Target) -> Result<ExtractOutcome, HarvestError> {
        let links_path = self.config.links_path(target);
        if !links_path.exists() {
            return Err(HarvestError::MissingLinks {
                path: links_path.display().to_string(),
            });
        }
        let links = LinkCollection::open(links_path)?;

        let texts_path = self.config.texts_path(target);
        let mut texts = match TextCollection::open(texts_path.clone()) {
            Ok(texts) => texts,
            Err(StorageError::Corrupt { path, source }) => {
                tracing::warn!("Could not load existing file {}: {}", path, source);
                TextCollection::empty(texts_path)
            }
            Err(e) => return Err(e.into()),
        };
        if !texts.is_empty() {
            tracing::info!(
                "Loaded {} existing texts from {}",
                texts.len(),
                texts.path().display()
            );
        }

        let total = links.len();
        tracing::info!("Processing {} articles for {}", total, target.name);

        let delay = Duration::from_millis(self.config.request_delay_ms);
        let mut outcome = ExtractOutcome::default();

        for (idx, link) in links.records().iter().enumerate() {
            let position = idx + 1;
            if texts.contains(&link.url) {
                tracing::debug!(
                    "[{}/{}] Skipping (already processed): {}",
                    position,
                    total,
                    link.title
                );
                outcome.skipped += 1;
                continue;
            }

            tracing::info!("[{}/{}] Scraping: {}", position, total, link.title);
            outcome.attempted += 1;

            match fetch_page(&self.client, &link.url).await.into_body() {
                Ok(body) => {
                    let doc = parse_document(&body, &self.selectors, &self.config.date_label);
                    if doc.paragraphs.is_empty() {
                        tracing::warn!("No content found for {}", link.url);
                        outcome.empty += 1;
                    } else {
                        texts.insert(TextRecord {
                            url: link.url.clone(),
                            title: link.title.clone(),
                            date: doc.date.unwrap_or_default(),
                            paragraphs: doc.paragraphs,
                        });
                        outcome.extracted += 1;
                        texts.checkpoint(self.config.checkpoint_interval)?;
                    }
                }
                Err(error) => {
                    tracing::warn!("Error on {}: {}", link.title, error);
                    outcome.failed += 1;
                }
            }

            tokio::time::sleep(delay).await;
        }

        texts.save()?;
        outcome.total_records = texts.len();
        tracing::info!(
            "Total speeches scraped: {}/{} (saved to {})",
            texts.len(),
            total,
            texts.path().display()
        );

        Ok(outcome)
    }
}
