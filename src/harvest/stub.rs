use serde_json::{Map, Value};

use crate::{
    record::{CatalogueRecord, is_truthy},
    schema::{CreativeWork, Person, SCHEMA_ORG},
};

pub fn record_page_url(record_id: &str) -> String {
    format!("https://zenodo.org/record/{record_id}")
}

/// Build a `CreativeWork` from the summary metadata of a search hit.
///
/// `name`, `identifier` and `url` are always set; every other field only when the metadata has a
/// non-empty value for it.
pub fn synthesize(record_id: &str, metadata: &Map<String, Value>) -> CreativeWork {
    let url = record_page_url(record_id);
    let text = |key: &str| {
        metadata
            .get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    };
    let present = |key: &str| metadata.get(key).filter(|v| is_truthy(v)).cloned();

    let name = text("title")
        .map(str::to_owned)
        .unwrap_or_else(|| format!("Zenodo record {record_id}"));
    let identifier = text("doi")
        .map(|doi| format!("https://doi.org/{doi}"))
        .unwrap_or_else(|| url.clone());

    let creator = metadata
        .get("creators")
        .and_then(Value::as_array)
        .filter(|c| !c.is_empty())
        .map(|creators| {
            creators
                .iter()
                .map(|c| Person::new(c.get("name").and_then(Value::as_str).unwrap_or_default()))
                .collect()
        });

    CreativeWork {
        context: SCHEMA_ORG,
        kind: "CreativeWork",
        id: url.clone(),
        name,
        identifier,
        url,
        description: present("description"),
        date_published: present("publication_date"),
        creator,
        keywords: present("keywords"),
        license: present("license"),
    }
}

impl From<CreativeWork> for CatalogueRecord {
    fn from(work: CreativeWork) -> Self {
        match serde_json::to_value(work) {
            Ok(Value::Object(map)) => CatalogueRecord::from(map),
            _ => CatalogueRecord::default(),
        }
    }
}
