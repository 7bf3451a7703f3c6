//! Catalogue record → `Project` record.
//!
//! Contact points, served areas and offers are never derived here; they are curated by hand on
//! the published files.

use std::path::Path;

use crate::{
    project::doi::{DOI_REGISTRY, DOI_RESOLVER, DoiRef},
    record::{CatalogueRecord, RECORD_PATH_MARKER},
    schema::{BIOECOOCEAN_GRANT, DefinedTerm, LicenseWork, ProjectRecord, PropertyValue, SCHEMA_ORG},
};

pub struct License {
    /// Zenodo license id.
    pub id: &'static str,
    /// Matched inside license URLs.
    pub url_fragment: &'static str,
    pub label: &'static str,
    pub url: &'static str,
}

static LICENSES: &[License] = &[
    License {
        id: "cc-by-4.0",
        url_fragment: "creativecommons.org/licenses/by/4.0",
        label: "CC-BY: Creative Commons Attribution 4.0",
        url: "https://creativecommons.org/licenses/by/4.0/",
    },
];

/// Look a license up by id first, then by URL fragment. Case-insensitive.
pub fn license_for(license: &str) -> Option<&'static License> {
    let key = license.to_lowercase();
    LICENSES
        .iter()
        .find(|l| l.id == key)
        .or_else(|| LICENSES.iter().find(|l| key.contains(l.url_fragment)))
}

/// A source-specific addition to the projected record.
struct Enrichment {
    applies: fn(source_url: &str) -> bool,
    apply: fn(&mut ProjectRecord),
}

/// Evaluated in order; every matching rule is applied.
static ENRICHMENTS: &[Enrichment] = &[Enrichment {
    applies: |url| url.contains(RECORD_PATH_MARKER),
    apply: |project| project.funding = Some(vec![BIOECOOCEAN_GRANT]),
}];

/// `base_url` joined with the file's path, as a POSIX path without leading `./`.
pub fn published_id(base_url: &str, rel_path: &Path) -> String {
    let posix = rel_path
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        posix.trim_start_matches(['.', '/'])
    )
}

/// Project one catalogue record.
///
/// `rel_path` is where the result will be written; it only matters when `base_url` is given.
pub fn to_project(
    record: &CatalogueRecord,
    base_url: Option<&str>,
    rel_path: &Path,
) -> ProjectRecord {
    let url = record.url().unwrap_or_default();

    let name = record
        .name()
        .map(str::to_owned)
        .or_else(|| record.record_id().map(|id| format!("Zenodo record {id}")))
        .unwrap_or_else(|| "Record".to_string());

    let doi = DoiRef::extract(record.identifier());
    let identifier = match doi.value {
        Some(value) => {
            let doi_url = doi
                .url
                .unwrap_or_else(|| format!("{DOI_RESOLVER}{value}"));
            Some(PropertyValue::new("DOI", DOI_REGISTRY, doi_url, value))
        }
        None if !url.is_empty() => Some(PropertyValue::for_url("Record URL", url)),
        None => None,
    };

    let publishing_principles = record.license().and_then(license_for).map(|l| {
        vec![LicenseWork {
            kind: "CreativeWork",
            name: l.label,
            url: l.url,
        }]
    });

    let terms: Vec<DefinedTerm> = record.keywords().map(DefinedTerm::new).collect();

    let mut project = ProjectRecord {
        context: SCHEMA_ORG,
        kind: "Project",
        name,
        description: record.description().as_str().to_string(),
        url: url.to_string(),
        identifier,
        publishing_principles,
        keywords: (!terms.is_empty()).then_some(terms),
        funding: None,
        id: base_url
            .filter(|b| !b.is_empty())
            .map(|b| published_id(b, rel_path)),
    };

    for rule in ENRICHMENTS {
        if (rule.applies)(url) {
            (rule.apply)(&mut project);
        }
    }

    project
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn project(v: Value) -> ProjectRecord {
        let record = CatalogueRecord::from_value(v).unwrap();
        to_project(&record, None, Path::new("out/x.json"))
    }

    #[test]
    fn zenodo_export_is_fully_projected() {
        let record = CatalogueRecord::from_value(json!({
            "@context": "https://schema.org/",
            "@type": "Dataset",
            "@id": "https://doi.org/10.5281/zenodo.789",
            "url": "https://zenodo.org/record/789",
            "identifier": "https://doi.org/10.5281/zenodo.789",
            "name": "Plankton time series",
            "description": "Weekly counts",
            "license": "https://creativecommons.org/licenses/by/4.0/legalcode",
            "keywords": ["plankton", 4, "time series"],
        }))
        .unwrap();
        let p = to_project(
            &record,
            Some("https://x.org/repo/"),
            Path::new("./jsonFiles/zenodo/plankton-time-series-789.json"),
        );
        assert_eq!(
            serde_json::to_value(&p).unwrap(),
            json!({
                "@context": "https://schema.org/",
                "@type": "Project",
                "name": "Plankton time series",
                "description": "Weekly counts",
                "url": "https://zenodo.org/record/789",
                "identifier": {
                    "@type": "PropertyValue",
                    "description": "DOI",
                    "propertyID": "https://registry.identifiers.org/registry/doi",
                    "url": "https://doi.org/10.5281/zenodo.789",
                    "value": "10.5281/zenodo.789",
                },
                "publishingPrinciples": [{
                    "@type": "CreativeWork",
                    "name": "CC-BY: Creative Commons Attribution 4.0",
                    "url": "https://creativecommons.org/licenses/by/4.0/",
                }],
                "keywords": [
                    {"@type": "DefinedTerm", "name": "plankton"},
                    {"@type": "DefinedTerm", "name": "time series"},
                ],
                "funding": [{
                    "@type": "MonetaryGrant",
                    "name": "BioEcoOcean (Horizon Europe)",
                    "identifier": "101136748",
                    "funder": {
                        "@type": "FundingAgency",
                        "name": "European Commission",
                        "legalName": "European Commission",
                        "url": "https://commission.europa.eu/index_en",
                    },
                }],
                "@id": "https://x.org/repo/jsonFiles/zenodo/plankton-time-series-789.json",
            })
        );
    }

    #[test]
    fn funding_only_for_zenodo_records() {
        let p = project(json!({"url": "https://zenodo.org/record/789"}));
        let funding = p.funding.expect("funding");
        assert_eq!(funding[0].identifier, "101136748");

        let p = project(json!({"url": "https://ipt.obis.org/bioecoocean/resource?r=zoo"}));
        assert!(p.funding.is_none());
        let v = serde_json::to_value(&p).unwrap();
        assert!(v.get("funding").is_none());
    }

    #[test]
    fn rss_dataset_gets_record_url_identifier() {
        let p = project(json!({
            "@type": "Dataset",
            "name": "Zooplankton",
            "url": "https://ipt.obis.org/r?r=zoo",
            "identifier": {"@type": "PropertyValue", "url": "https://ipt.obis.org/eml?r=zoo"},
        }));
        let id = p.identifier.expect("identifier");
        assert_eq!(id.description, "Record URL");
        assert_eq!(id.property_id, "url");
        assert_eq!(id.value, "https://ipt.obis.org/r?r=zoo");
        assert!(p.id.is_none());
    }

    #[test]
    fn names_fall_back_in_order() {
        assert_eq!(project(json!({"url": "https://zenodo.org/record/5"})).name, "Zenodo record 5");
        assert_eq!(project(json!({"name": ""})).name, "Record");
        assert_eq!(project(json!({"name": {"@value": "Titre", "@language": "fr"}})).name, "Titre");
    }

    #[test]
    fn missing_fields_degrade_quietly() {
        let p = project(json!({"description": {"@value": "Text"}, "keywords": "a, b", "license": {"id": "cc-by-4.0"}}));
        assert_eq!(p.description, "Text");
        assert_eq!(p.url, "");
        assert!(p.identifier.is_none());
        assert!(p.keywords.is_none());
        assert!(p.publishing_principles.is_none());

        let v = serde_json::to_value(project(json!({}))).unwrap();
        assert_eq!(v["description"], "");
        assert_eq!(
            v.as_object().unwrap().keys().collect::<Vec<_>>(),
            ["@context", "@type", "name", "description", "url"]
        );
    }

    #[test]
    fn license_lookup() {
        assert_eq!(license_for("CC-BY-4.0").map(|l| l.id), Some("cc-by-4.0"));
        assert_eq!(
            license_for("HTTPS://CreativeCommons.org/licenses/by/4.0/legalcode").map(|l| l.id),
            Some("cc-by-4.0")
        );
        assert!(license_for("https://creativecommons.org/licenses/by-sa/4.0/").is_none());
        assert!(license_for("cc0-1.0").is_none());
        assert!(license_for("mit").is_none());
    }

    #[test]
    fn published_id_joins_posix_paths() {
        assert_eq!(
            published_id("https://x.org/repo", Path::new("./out/a.json")),
            "https://x.org/repo/out/a.json"
        );
        assert_eq!(
            published_id("https://x.org/repo///", Path::new("a.json")),
            "https://x.org/repo/a.json"
        );
    }
}
