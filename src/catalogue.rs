//! The catalogue file handed from the harvester to the projector.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::warn;

use crate::{
    error::{Error, Result},
    record::CatalogueRecord,
    schema::SCHEMA_ORG,
};

/// A JSON-LD `@graph` document holding every harvested record in harvest order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Catalogue {
    #[serde(rename = "@context")]
    context: Value,
    #[serde(rename = "@graph")]
    pub graph: Vec<CatalogueRecord>,
}

/// Accepted input layouts.
#[derive(Deserialize)]
#[serde(untagged)]
enum CatalogueFile {
    Graph {
        #[serde(rename = "@graph")]
        graph: Vec<Value>,
    },
    Bare(Vec<Value>),
    Other(Value),
}

impl Catalogue {
    pub fn new(graph: Vec<CatalogueRecord>) -> Self {
        Self {
            context: json!([SCHEMA_ORG, {"@vocab": SCHEMA_ORG}]),
            graph,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }
        fs::write(path, self.to_json()?).map_err(|e| Error::io(path, e))
    }

    /// Records of a `{"@graph": [...]}` document or of a bare array.
    ///
    /// Any other layout has no records. Entries that are not objects are skipped.
    pub fn from_json(text: &str) -> Result<Vec<CatalogueRecord>> {
        let entries = match serde_json::from_str::<CatalogueFile>(text)? {
            CatalogueFile::Graph { graph } | CatalogueFile::Bare(graph) => graph,
            CatalogueFile::Other(_) => Vec::new(),
        };
        Ok(entries
            .into_iter()
            .enumerate()
            .filter_map(|(i, entry)| {
                let record = CatalogueRecord::from_value(entry);
                if record.is_none() {
                    warn!("skipping catalogue entry {}: not a JSON object", i + 1);
                }
                record
            })
            .collect())
    }

    pub fn load(path: &Path) -> Result<Vec<CatalogueRecord>> {
        let text = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Self::from_json(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn writes_graph_envelope() {
        let record = CatalogueRecord::from_value(json!({"@type": "Dataset", "name": "Océan"})).unwrap();
        let text = Catalogue::new(vec![record]).to_json().unwrap();
        let v: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(
            v["@context"],
            json!(["https://schema.org/", {"@vocab": "https://schema.org/"}])
        );
        assert_eq!(v["@graph"][0]["name"], "Océan");
        assert!(text.contains("Océan"), "non-ASCII should be written as-is");
        assert!(text.contains("\n  \"@graph\""), "two-space indent expected");
    }

    #[test]
    fn loads_graph_bare_and_unknown_layouts() {
        let graph = Catalogue::from_json(r#"{"@graph": [{"name": "a"}, 3, {"name": "b"}]}"#).unwrap();
        assert_eq!(graph.len(), 2);
        assert_eq!(graph[1].text("name"), Some("b"));

        let bare = Catalogue::from_json(r#"[{"name": "a"}]"#).unwrap();
        assert_eq!(bare.len(), 1);

        assert!(Catalogue::from_json(r#"{"@graph": {"name": "a"}}"#).unwrap().is_empty());
        assert!(Catalogue::from_json(r#""text""#).unwrap().is_empty());
        assert!(Catalogue::from_json("{not json").is_err());
    }

    #[test]
    fn write_then_load_keeps_order() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/catalogue.jsonld");
        let records: Vec<_> = ["first", "second", "third"]
            .iter()
            .map(|n| CatalogueRecord::from_value(json!({"name": n})).unwrap())
            .collect();
        Catalogue::new(records.clone()).write(&path).unwrap();
        assert_eq!(Catalogue::load(&path).unwrap(), records);
    }
}
