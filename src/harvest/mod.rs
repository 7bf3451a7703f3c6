use std::path::Path;
use std::thread;
use std::time::Duration;

use indicatif::ProgressBar;
use tracing::info;

use crate::{catalogue::Catalogue, config::HarvestConfig, error::Result, record::CatalogueRecord};

pub mod builder;
pub mod client;
pub mod lister;
pub mod rss;
pub mod stub;

pub use builder::{CatalogueBuilder, HarvestSummary};
pub use client::ZenodoClient;
pub use lister::{RecordLister, SearchPage, SearchQuery};

/// The remote services a harvest talks to.
///
/// [`ZenodoClient`] is the real implementation; tests substitute canned responses.
pub trait Upstream {
    /// One page of the community search. Any non-success answer is an error.
    fn search(&self, query: &SearchQuery<'_>) -> Result<SearchPage>;

    /// The record's own JSON-LD export, or `None` when it cannot be used.
    fn export(&self, record_id: &str) -> Option<CatalogueRecord>;

    /// Raw body of an RSS feed.
    fn feed(&self, url: &str) -> Result<String>;
}

/// Courtesy pause between two requests to the same service.
pub trait Pacer {
    fn wait_between_requests(&self);
}

/// Sleeps for a fixed duration.
#[derive(Debug, Clone, Copy)]
pub struct FixedDelay(pub Duration);

impl Pacer for FixedDelay {
    fn wait_between_requests(&self) {
        if !self.0.is_zero() {
            thread::sleep(self.0);
        }
    }
}

/// Never waits.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDelay;

impl Pacer for NoDelay {
    fn wait_between_requests(&self) {}
}

/// Harvest `community` and write the catalogue to `output`.
pub fn run(
    config: &HarvestConfig,
    community: &str,
    max_pages: Option<u32>,
    output: &Path,
    progress: ProgressBar,
) -> Result<HarvestSummary> {
    info!("Harvesting Zenodo community: {community}");

    let client = ZenodoClient::new(config.clone());
    let pacer = FixedDelay(config.request_delay);
    let (records, summary) = CatalogueBuilder::new(&client, &pacer, config)
        .with_progress(progress)
        .build(community, max_pages)?;

    info!("Collected {} records", records.len());
    Catalogue::new(records).write(output)?;
    info!("Wrote {}", output.display());
    Ok(summary)
}
