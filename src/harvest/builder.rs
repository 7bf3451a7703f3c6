use indicatif::ProgressBar;
use tracing::{debug, info, warn};

use crate::{
    config::HarvestConfig,
    error::Result,
    harvest::{Pacer, RecordLister, Upstream, rss, stub},
    record::CatalogueRecord,
};

/// Where the records of one harvest came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HarvestSummary {
    /// Records kept from their own JSON-LD export.
    pub exported: usize,
    /// Records synthesized from search metadata.
    pub stubbed: usize,
    /// Datasets appended from the RSS feed.
    pub feed: usize,
}

impl HarvestSummary {
    pub fn total(&self) -> usize {
        self.exported + self.stubbed + self.feed
    }
}

pub struct CatalogueBuilder<'a, U: ?Sized, P: ?Sized> {
    upstream: &'a U,
    pacer: &'a P,
    config: &'a HarvestConfig,
    progress: ProgressBar,
}

impl<'a, U, P> CatalogueBuilder<'a, U, P>
where
    U: Upstream + ?Sized,
    P: Pacer + ?Sized,
{
    pub fn new(upstream: &'a U, pacer: &'a P, config: &'a HarvestConfig) -> Self {
        Self {
            upstream,
            pacer,
            config,
            progress: ProgressBar::hidden(),
        }
    }

    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    /// Collect every record of `community`, search results first, then the RSS feed when
    /// `community` is the default one.
    ///
    /// Only a failing search request aborts the harvest.
    pub fn build(
        &self,
        community: &str,
        max_pages: Option<u32>,
    ) -> Result<(Vec<CatalogueRecord>, HarvestSummary)> {
        let hits = RecordLister::new(
            self.upstream,
            self.pacer,
            community,
            self.config.page_size,
            max_pages,
        )
        .collect::<Result<Vec<_>>>()?;

        let mut summary = HarvestSummary::default();
        let mut catalogue = Vec::with_capacity(hits.len());

        self.progress.set_length(hits.len() as u64);
        for hit in hits {
            self.progress.set_message(format!("record {}", hit.id));
            match self.upstream.export(&hit.id).filter(CatalogueRecord::has_type) {
                Some(record) => {
                    debug!(record = %hit.id, "using JSON-LD export");
                    summary.exported += 1;
                    catalogue.push(record);
                }
                None => {
                    warn!(record = %hit.id, "no usable JSON-LD export, using metadata stub");
                    summary.stubbed += 1;
                    catalogue.push(stub::synthesize(&hit.id, &hit.metadata).into());
                }
            }
            self.progress.inc(1);
            self.pacer.wait_between_requests();
        }
        self.progress.finish_and_clear();

        if community == self.config.default_community {
            let datasets = rss::harvest(self.upstream, &self.config.feed_url);
            if !datasets.is_empty() {
                info!(
                    "Adding {} OBIS IPT dataset(s) from {}",
                    datasets.len(),
                    self.config.feed_url
                );
                summary.feed = datasets.len();
                catalogue.extend(datasets.into_iter().map(CatalogueRecord::from));
            }
        }

        Ok((catalogue, summary))
    }
}
