//! Upstream endpoints and run settings for both stages.
//!
//! Everything has a default matching the public BioEcoOcean setup; the CLI overrides individual
//! values.

use std::path::PathBuf;
use std::time::Duration;

/// Community that additionally pulls in the OBIS IPT feed.
pub const DEFAULT_COMMUNITY: &str = "bioecoocean";

/// Catalogue file shared by both stages.
pub const DEFAULT_CATALOGUE: &str = "bioecoocean-catalogue.jsonld";

pub const DEFAULT_OUT_DIR: &str = "jsonFiles/zenodo";

pub const DEFAULT_PAGE_SIZE: u32 = 25;

/// Roughly one request per second.
pub const DEFAULT_DELAY_MS: u64 = 1200;

#[derive(Debug, Clone)]
pub struct HarvestConfig {
    pub search_url: String,
    /// `{id}` is replaced by the record id.
    pub export_url_template: String,
    pub feed_url: String,
    pub default_community: String,
    pub page_size: u32,
    pub request_delay: Duration,
    pub search_timeout: Duration,
    pub detail_timeout: Duration,
    pub feed_timeout: Duration,
    pub user_agent: String,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            search_url: "https://zenodo.org/api/records".into(),
            export_url_template: "https://zenodo.org/record/{id}/export/schemaorg_jsonld".into(),
            feed_url: "https://ipt.obis.org/bioecoocean/rss.do".into(),
            default_community: DEFAULT_COMMUNITY.into(),
            page_size: DEFAULT_PAGE_SIZE,
            request_delay: Duration::from_millis(DEFAULT_DELAY_MS),
            search_timeout: Duration::from_secs(90),
            detail_timeout: Duration::from_secs(30),
            feed_timeout: Duration::from_secs(30),
            user_agent: concat!("metacat/", env!("CARGO_PKG_VERSION")).into(),
        }
    }
}

impl HarvestConfig {
    pub fn export_url(&self, record_id: &str) -> String {
        self.export_url_template.replace("{id}", record_id)
    }
}

#[derive(Debug, Clone)]
pub struct ProjectConfig {
    pub input: PathBuf,
    pub out_dir: PathBuf,
    /// Prefix for each record's `@id`; no `@id` is emitted without it.
    pub base_url: Option<String>,
    pub sitemap: Option<PathBuf>,
}
