//! OBIS IPT RSS feed.
//!
//! The IPT publishes one `<item>` per dataset, with the dataset's EML document and Darwin Core
//! Archive linked through `eml` and `dwca` elements in the IPT namespace. Standard RSS fields are
//! only read from un-namespaced elements.

use chrono::DateTime;
use once_cell::sync::Lazy;
use quick_xml::NsReader;
use quick_xml::events::{BytesRef, Event};
use quick_xml::name::{Namespace, ResolveResult};
use regex::Regex;
use serde_json::Value;
use tracing::warn;

use crate::{
    error::{Error, Result},
    harvest::Upstream,
    record::CatalogueRecord,
    schema::{DataDownload, Dataset, PropertyValue, SCHEMA_ORG},
};

/// Fetch and map the feed at `url`. Failures are logged and yield no datasets.
pub fn harvest<U: Upstream + ?Sized>(upstream: &U, url: &str) -> Vec<Dataset> {
    let body = match upstream.feed(url) {
        Ok(body) => body,
        Err(e) => {
            warn!("could not harvest OBIS IPT RSS ({e})");
            return Vec::new();
        }
    };
    match parse_feed(&body) {
        Ok(datasets) => datasets,
        Err(e) => {
            warn!("could not parse OBIS IPT RSS XML ({e})");
            Vec::new()
        }
    }
}

/// Namespace of the IPT's `eml` and `dwca` item extensions.
pub const IPT_NS: &str = "http://ipt.gbif.org/";

/// An element name as the feed parser sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ElementName {
    /// No namespace.
    Plain(String),
    /// In the IPT namespace.
    Ipt(String),
    /// Any other namespace, or an undeclared prefix.
    Foreign,
}

impl ElementName {
    fn resolve(ns: &ResolveResult<'_>, local: &[u8]) -> Self {
        let local = String::from_utf8_lossy(local).into_owned();
        match ns {
            ResolveResult::Unbound => ElementName::Plain(local),
            ResolveResult::Bound(Namespace(uri)) if *uri == IPT_NS.as_bytes() => {
                ElementName::Ipt(local)
            }
            _ => ElementName::Foreign,
        }
    }

    fn is_plain(&self, name: &str) -> bool {
        matches!(self, ElementName::Plain(n) if n == name)
    }
}

/// Raw text of the first occurrence of each field in one `<item>`.
#[derive(Debug, Default)]
struct FeedItem {
    title: Option<String>,
    link: Option<String>,
    description: Option<String>,
    pub_date: Option<String>,
    eml: Option<String>,
    dwca: Option<String>,
}

/// Trimmed text, or `None` when nothing is left.
fn non_empty(text: Option<String>) -> Option<String> {
    text.map(|t| t.trim().to_owned()).filter(|t| !t.is_empty())
}

impl FeedItem {
    /// Record `text` for `element` unless the field was already seen.
    fn set(&mut self, element: &ElementName, text: &str) {
        let slot = match element {
            ElementName::Plain(n) if n == "title" => &mut self.title,
            ElementName::Plain(n) if n == "link" => &mut self.link,
            ElementName::Plain(n) if n == "description" => &mut self.description,
            ElementName::Plain(n) if n == "pubDate" => &mut self.pub_date,
            ElementName::Ipt(n) if n == "eml" => &mut self.eml,
            ElementName::Ipt(n) if n == "dwca" => &mut self.dwca,
            _ => return,
        };
        if slot.is_none() {
            *slot = Some(text.to_owned());
        }
    }

    fn into_dataset(self) -> Dataset {
        let title = non_empty(self.title);
        let link = non_empty(self.link);
        let pub_date = non_empty(self.pub_date);
        let eml = non_empty(self.eml);
        let dwca = non_empty(self.dwca);
        let identifier = eml.clone().or_else(|| link.clone());

        let mut distribution = Vec::new();
        if let Some(eml) = &eml {
            distribution.push(DataDownload::eml(eml));
        }
        if let Some(dwca) = &dwca {
            distribution.push(DataDownload::dwca(dwca));
        }

        Dataset {
            context: SCHEMA_ORG,
            kind: "Dataset",
            name: title.unwrap_or_else(|| "OBIS IPT resource".to_string()),
            description: strip_html(self.description.as_deref().unwrap_or_default()),
            url: link.or_else(|| identifier.clone()).unwrap_or_default(),
            identifier: identifier
                .as_deref()
                .map(|id| PropertyValue::for_url("OBIS IPT resource", id)),
            date_published: pub_date.as_deref().map(publication_date),
            distribution: (!distribution.is_empty()).then_some(distribution),
        }
    }
}

/// Parse an RSS 2.0 document into datasets, one per `<channel><item>`.
///
/// Item fields take the text that precedes their first child element, and only the first
/// occurrence of each field counts.
pub fn parse_feed(xml: &str) -> Result<Vec<Dataset>> {
    let mut reader = NsReader::from_str(xml);

    // Open elements, root first.
    let mut path: Vec<ElementName> = Vec::new();
    let mut seen_root = false;
    let mut current: Option<FeedItem> = None;
    let mut items = Vec::new();
    let mut text = String::new();
    // Set once a field element opens a child; later text is ignored.
    let mut past_leading_text = false;

    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Eof) => break,
            Ok(Event::Start(e)) => {
                let (ns, local) = reader.resolve_element(e.name());
                let name = ElementName::resolve(&ns, local.as_ref());
                if path.len() == 2 && path[1].is_plain("channel") && name.is_plain("item") {
                    current = Some(FeedItem::default());
                }
                if path.len() >= 4 {
                    past_leading_text = true;
                } else {
                    text.clear();
                }
                seen_root = true;
                path.push(name);
            }
            Ok(Event::End(_)) => {
                if let Some(item) = current.as_mut() {
                    match path.len() {
                        4 => item.set(&path[3], &text),
                        3 => items.extend(current.take()),
                        _ => {}
                    }
                }
                path.pop();
                if path.len() < 4 {
                    text.clear();
                    past_leading_text = false;
                }
            }
            Ok(Event::Empty(e)) => {
                if path.len() == 3
                    && let Some(item) = current.as_mut()
                {
                    let (ns, local) = reader.resolve_element(e.name());
                    item.set(&ElementName::resolve(&ns, local.as_ref()), "");
                }
                seen_root = true;
            }
            Ok(Event::Text(t)) if !past_leading_text => {
                text.push_str(&String::from_utf8_lossy(&t))
            }
            Ok(Event::CData(t)) if !past_leading_text => {
                text.push_str(&String::from_utf8_lossy(&t))
            }
            Ok(Event::GeneralRef(r)) if !past_leading_text => push_reference(&mut text, &r),
            Err(e) => {
                return Err(Error::Xml(format!(
                    "{e} at position {}",
                    reader.error_position()
                )));
            }
            _ => {}
        }
        buf.clear();
    }

    if !seen_root {
        return Err(Error::Xml("no element found".into()));
    }
    if !path.is_empty() {
        return Err(Error::Xml("unclosed element".into()));
    }

    Ok(items.into_iter().map(FeedItem::into_dataset).collect())
}

/// Append the text an `&…;` reference stands for.
fn push_reference(text: &mut String, r: &BytesRef<'_>) {
    if let Ok(Some(ch)) = r.resolve_char_ref() {
        text.push(ch);
        return;
    }
    let name = String::from_utf8_lossy(r);
    match name.as_ref() {
        "lt" => text.push('<'),
        "gt" => text.push('>'),
        "amp" => text.push('&'),
        "apos" => text.push('\''),
        "quot" => text.push('"'),
        other => {
            text.push('&');
            text.push_str(other);
            text.push(';');
        }
    }
}

/// Drop anything that looks like a tag and collapse whitespace.
///
/// Not an HTML parser: markup that is not well formed can survive.
pub fn strip_html(text: &str) -> String {
    static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").unwrap());
    static WS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
    let no_tags = TAG_RE.replace_all(text, " ");
    WS_RE.replace_all(&no_tags, " ").trim().to_string()
}

/// RFC 2822 `pubDate` as `YYYY-MM-DD`; unparseable input is kept verbatim.
pub fn publication_date(raw: &str) -> String {
    DateTime::parse_from_rfc2822(raw)
        .map(|dt| dt.date_naive().to_string())
        .unwrap_or_else(|_| raw.to_string())
}

impl From<Dataset> for CatalogueRecord {
    fn from(dataset: Dataset) -> Self {
        match serde_json::to_value(dataset) {
            Ok(Value::Object(map)) => CatalogueRecord::from(map),
            _ => CatalogueRecord::default(),
        }
    }
}
