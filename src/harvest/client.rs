use std::time::Duration;

use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::{
    config::HarvestConfig,
    error::{Error, Result},
    harvest::{SearchPage, SearchQuery, Upstream},
    record::CatalogueRecord,
};

/// Blocking HTTP access to Zenodo and the OBIS IPT.
pub struct ZenodoClient {
    config: HarvestConfig,
    search: ureq::Agent,
    detail: ureq::Agent,
    feed: ureq::Agent,
}

fn agent(timeout: Duration) -> ureq::Agent {
    let cfg = ureq::Agent::config_builder()
        .timeout_global(Some(timeout))
        .http_status_as_error(false)
        .build();
    ureq::Agent::new_with_config(cfg)
}

impl ZenodoClient {
    pub fn new(config: HarvestConfig) -> Self {
        Self {
            search: agent(config.search_timeout),
            detail: agent(config.detail_timeout),
            feed: agent(config.feed_timeout),
            config,
        }
    }

    fn search_url(&self, query: &SearchQuery<'_>) -> Result<Url> {
        Ok(Url::parse_with_params(
            &self.config.search_url,
            &[
                ("communities", query.community.to_string()),
                ("size", query.size.to_string()),
                ("sort", "mostrecent".to_string()),
                ("page", query.page.to_string()),
            ],
        )?)
    }

    /// GET `url` and return the body of a successful answer.
    fn get(&self, agent: &ureq::Agent, url: &str, accept: &str) -> Result<(String, String)> {
        let mut res = agent
            .get(url)
            .header("Accept", accept)
            .header("User-Agent", self.config.user_agent.as_str())
            .call()
            .map_err(|e| Error::http(url, e))?;

        let status = res.status();
        if !status.is_success() {
            return Err(Error::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        let content_type = res
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();
        let body = res
            .body_mut()
            .read_to_string()
            .map_err(|e| Error::http(url, e))?;
        Ok((content_type, body))
    }

    fn fetch_export(&self, record_id: &str) -> Result<Option<CatalogueRecord>> {
        let url = self.config.export_url(record_id);
        let (content_type, body) =
            self.get(&self.detail, &url, "application/ld+json, application/json")?;
        if !content_type.contains("json") {
            debug!(record = record_id, %content_type, "export is not served as JSON, parsing anyway");
        }
        Ok(parse_export(&body))
    }
}

/// A JSON-LD export body as a record; anything but a JSON object is unusable.
pub fn parse_export(body: &str) -> Option<CatalogueRecord> {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(CatalogueRecord::from_value)
}

impl Upstream for ZenodoClient {
    fn search(&self, query: &SearchQuery<'_>) -> Result<SearchPage> {
        let url = self.search_url(query)?;
        debug!(%url, "searching");
        let (_, body) = self.get(&self.search, url.as_str(), "application/json")?;
        SearchPage::from_json(&body)
    }

    fn export(&self, record_id: &str) -> Option<CatalogueRecord> {
        match self.fetch_export(record_id) {
            Ok(record) => record,
            Err(e) => {
                warn!(record = record_id, "JSON-LD export unavailable: {e}");
                None
            }
        }
    }

    fn feed(&self, url: &str) -> Result<String> {
        let (_, body) = self.get(&self.feed, url, "application/rss+xml, application/xml, text/xml")?;
        Ok(body)
    }
}
