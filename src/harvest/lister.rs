//! Community search pagination.

use std::collections::VecDeque;

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::{
    error::Result,
    harvest::{Pacer, Upstream},
};

/// Parameters of one search request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchQuery<'a> {
    pub community: &'a str,
    pub size: u32,
    /// 1-based.
    pub page: u32,
}

/// A search hit carrying an id.
#[derive(Debug, Clone, PartialEq)]
pub struct Hit {
    pub id: String,
    pub metadata: Map<String, Value>,
}

/// One decoded page of search results.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchPage {
    /// Hits that carried an id, in response order.
    pub hits: Vec<Hit>,
    /// Number of hits on the page, with or without an id.
    pub returned: usize,
    /// Total number of matches reported by the service.
    pub total: u64,
}

#[derive(Debug, Default, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    hits: HitList,
}

#[derive(Debug, Default, Deserialize)]
struct HitList {
    #[serde(default)]
    hits: Vec<RawHit>,
    #[serde(default)]
    total: Total,
}

/// Older API versions report a bare count, newer ones `{"value": n, "relation": "eq"}`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Total {
    Count(u64),
    Object { value: u64 },
}

impl Default for Total {
    fn default() -> Self {
        Total::Count(0)
    }
}

#[derive(Debug, Deserialize)]
struct RawHit {
    #[serde(default)]
    id: Value,
    #[serde(default)]
    metadata: Value,
}

impl SearchPage {
    pub fn from_json(body: &str) -> Result<Self> {
        let response: SearchResponse = serde_json::from_str(body)?;
        let returned = response.hits.hits.len();
        let total = match response.hits.total {
            Total::Count(n) | Total::Object { value: n } => n,
        };
        let hits = response
            .hits
            .hits
            .into_iter()
            .filter_map(|raw| {
                let id = match raw.id {
                    Value::String(s) => s,
                    Value::Number(n) => n.to_string(),
                    _ => return None,
                };
                let metadata = match raw.metadata {
                    Value::Object(map) => map,
                    _ => Map::new(),
                };
                Some(Hit { id, metadata })
            })
            .collect();
        Ok(SearchPage {
            hits,
            returned,
            total,
        })
    }
}

/// Lazily walks the community search, one page at a time.
///
/// Stops after an empty page, after `max_pages` pages, or once as many hits as the reported total
/// have been collected. A failed request is yielded once as an error and ends the sequence.
pub struct RecordLister<'a, U: ?Sized, P: ?Sized> {
    upstream: &'a U,
    pacer: &'a P,
    community: &'a str,
    page_size: u32,
    max_pages: Option<u32>,
    page: u32,
    collected: u64,
    buffered: VecDeque<Hit>,
    done: bool,
}

impl<'a, U, P> RecordLister<'a, U, P>
where
    U: Upstream + ?Sized,
    P: Pacer + ?Sized,
{
    pub fn new(
        upstream: &'a U,
        pacer: &'a P,
        community: &'a str,
        page_size: u32,
        max_pages: Option<u32>,
    ) -> Self {
        Self {
            upstream,
            pacer,
            community,
            page_size,
            max_pages,
            page: 0,
            collected: 0,
            buffered: VecDeque::new(),
            done: false,
        }
    }

    fn fetch_next_page(&mut self) -> Result<()> {
        if self.page > 0 {
            self.pacer.wait_between_requests();
        }
        self.page += 1;

        let page = self.upstream.search(&SearchQuery {
            community: self.community,
            size: self.page_size,
            page: self.page,
        })?;
        debug!(
            page = self.page,
            returned = page.returned,
            total = page.total,
            "search page"
        );

        self.collected += page.hits.len() as u64;
        self.buffered.extend(page.hits);

        let last_page = self.max_pages.is_some_and(|max| self.page >= max);
        if page.returned == 0 || last_page || self.collected >= page.total {
            self.done = true;
        }
        Ok(())
    }
}

impl<U, P> Iterator for RecordLister<'_, U, P>
where
    U: Upstream + ?Sized,
    P: Pacer + ?Sized,
{
    type Item = Result<Hit>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(hit) = self.buffered.pop_front() {
                return Some(Ok(hit));
            }
            if self.done {
                return None;
            }
            if let Err(e) = self.fetch_next_page() {
                self.done = true;
                return Some(Err(e));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};

    use serde_json::json;

    use super::*;
    use crate::{error::Error, harvest::NoDelay, record::CatalogueRecord};

    /// Serves pre-built pages and records every request.
    struct Pages {
        pages: Vec<std::result::Result<String, u16>>,
        requested: RefCell<Vec<u32>>,
    }

    impl Pages {
        fn new(pages: Vec<Value>) -> Self {
            Self {
                pages: pages.into_iter().map(|p| Ok(p.to_string())).collect(),
                requested: RefCell::new(Vec::new()),
            }
        }
    }

    impl Upstream for Pages {
        fn search(&self, query: &SearchQuery<'_>) -> Result<SearchPage> {
            self.requested.borrow_mut().push(query.page);
            match self.pages.get(query.page as usize - 1) {
                Some(Ok(body)) => SearchPage::from_json(body),
                Some(Err(status)) => Err(Error::Status {
                    url: "search".into(),
                    status: *status,
                }),
                None => SearchPage::from_json(r#"{"hits": {"hits": [], "total": 0}}"#),
            }
        }

        fn export(&self, _record_id: &str) -> Option<CatalogueRecord> {
            None
        }

        fn feed(&self, _url: &str) -> Result<String> {
            Ok(String::new())
        }
    }

    #[derive(Default)]
    struct CountingPacer(Cell<usize>);

    impl Pacer for CountingPacer {
        fn wait_between_requests(&self) {
            self.0.set(self.0.get() + 1);
        }
    }

    fn page(ids: &[u64], total: u64) -> Value {
        let hits: Vec<Value> = ids
            .iter()
            .map(|id| json!({"id": id, "metadata": {"title": format!("Record {id}")}}))
            .collect();
        json!({"hits": {"hits": hits, "total": total}})
    }

    fn ids<U: Upstream, P: Pacer>(lister: RecordLister<'_, U, P>) -> Vec<String> {
        lister.map(|h| h.expect("hit").id).collect()
    }

    #[test]
    fn stops_once_total_is_reached() {
        let pages = Pages::new(vec![page(&[1, 2], 3), page(&[3], 3), page(&[4], 3)]);
        let pacer = CountingPacer::default();
        let got = ids(RecordLister::new(&pages, &pacer, "c", 2, None));
        assert_eq!(got, ["1", "2", "3"]);
        assert_eq!(*pages.requested.borrow(), [1, 2]);
        assert_eq!(pacer.0.get(), 1);
    }

    #[test]
    fn stops_on_empty_page() {
        let pages = Pages::new(vec![page(&[1], 10), page(&[], 10)]);
        let got = ids(RecordLister::new(&pages, &CountingPacer::default(), "c", 1, None));
        assert_eq!(got, ["1"]);
        assert_eq!(*pages.requested.borrow(), [1, 2]);
    }

    #[test]
    fn honours_max_pages() {
        let pages = Pages::new(vec![page(&[1], 10), page(&[2], 10), page(&[3], 10)]);
        let got = ids(RecordLister::new(&pages, &CountingPacer::default(), "c", 1, Some(2)));
        assert_eq!(got, ["1", "2"]);
        assert_eq!(*pages.requested.borrow(), [1, 2]);
    }

    #[test]
    fn is_lazy() {
        let pages = Pages::new(vec![page(&[1], 2), page(&[2], 2)]);
        let pacer = CountingPacer::default();
        let mut lister = RecordLister::new(&pages, &pacer, "c", 1, None);
        assert!(pages.requested.borrow().is_empty());
        lister.next();
        assert_eq!(*pages.requested.borrow(), [1]);
        assert_eq!(pacer.0.get(), 0);
    }

    #[test]
    fn failed_page_is_yielded_once_then_ends() {
        let pages = Pages {
            pages: vec![Ok(page(&[1], 5).to_string()), Err(500)],
            requested: RefCell::new(Vec::new()),
        };
        let mut lister = RecordLister::new(&pages, &NoDelay, "c", 1, None);
        assert_eq!(lister.next().unwrap().unwrap().id, "1");
        assert!(matches!(
            lister.next(),
            Some(Err(Error::Status { status: 500, .. }))
        ));
        assert!(lister.next().is_none());
    }

    #[test]
    fn page_decoding_is_lenient() {
        let body = json!({
            "hits": {
                "hits": [
                    {"id": "abc", "metadata": null},
                    {"metadata": {"title": "no id"}},
                    {"id": 7, "metadata": {"title": "seven"}},
                ],
                "total": {"value": 12, "relation": "eq"},
            }
        })
        .to_string();
        let page = SearchPage::from_json(&body).unwrap();
        assert_eq!(page.returned, 3);
        assert_eq!(page.total, 12);
        assert_eq!(page.hits.len(), 2);
        assert_eq!(page.hits[0].id, "abc");
        assert!(page.hits[0].metadata.is_empty());
        assert_eq!(page.hits[1].id, "7");
        assert_eq!(page.hits[1].metadata["title"], "seven");
    }
}
