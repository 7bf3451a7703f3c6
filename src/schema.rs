//! schema.org nodes produced by this crate.

use serde::Serialize;
use serde_json::Value;

pub const SCHEMA_ORG: &str = "https://schema.org/";

/// A `PropertyValue` identifier block.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyValue {
    #[serde(rename = "@type")]
    pub kind: &'static str,
    pub description: String,
    #[serde(rename = "propertyID")]
    pub property_id: String,
    pub url: String,
    pub value: String,
}

impl PropertyValue {
    pub fn new(
        description: impl Into<String>,
        property_id: impl Into<String>,
        url: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            kind: "PropertyValue",
            description: description.into(),
            property_id: property_id.into(),
            url: url.into(),
            value: value.into(),
        }
    }

    /// An identifier whose value is the URL itself.
    pub fn for_url(description: impl Into<String>, url: &str) -> Self {
        Self::new(description, "url", url, url)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Person {
    #[serde(rename = "@type")]
    pub kind: &'static str,
    pub name: String,
}

impl Person {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            kind: "Person",
            name: name.into(),
        }
    }
}

/// Stand-in for a Zenodo record whose JSON-LD export could not be used.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreativeWork {
    #[serde(rename = "@context")]
    pub context: &'static str,
    #[serde(rename = "@type")]
    pub kind: &'static str,
    #[serde(rename = "@id")]
    pub id: String,
    pub name: String,
    pub identifier: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Value>,
    #[serde(rename = "datePublished", skip_serializing_if = "Option::is_none")]
    pub date_published: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creator: Option<Vec<Person>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataDownload {
    #[serde(rename = "@type")]
    pub kind: &'static str,
    pub name: &'static str,
    #[serde(rename = "encodingFormat")]
    pub encoding_format: &'static str,
    #[serde(rename = "contentUrl")]
    pub content_url: String,
}

impl DataDownload {
    pub fn eml(url: impl Into<String>) -> Self {
        Self {
            kind: "DataDownload",
            name: "EML metadata",
            encoding_format: "application/xml",
            content_url: url.into(),
        }
    }

    pub fn dwca(url: impl Into<String>) -> Self {
        Self {
            kind: "DataDownload",
            name: "Darwin Core Archive",
            encoding_format: "application/zip",
            content_url: url.into(),
        }
    }
}

/// A dataset announced on the OBIS IPT feed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dataset {
    #[serde(rename = "@context")]
    pub context: &'static str,
    #[serde(rename = "@type")]
    pub kind: &'static str,
    pub name: String,
    pub description: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier: Option<PropertyValue>,
    #[serde(rename = "datePublished", skip_serializing_if = "Option::is_none")]
    pub date_published: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distribution: Option<Vec<DataDownload>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DefinedTerm {
    #[serde(rename = "@type")]
    pub kind: &'static str,
    pub name: String,
}

impl DefinedTerm {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            kind: "DefinedTerm",
            name: name.into(),
        }
    }
}

/// A license reference under `publishingPrinciples`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LicenseWork {
    #[serde(rename = "@type")]
    pub kind: &'static str,
    pub name: &'static str,
    pub url: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FundingAgency {
    #[serde(rename = "@type")]
    pub kind: &'static str,
    pub name: &'static str,
    #[serde(rename = "legalName")]
    pub legal_name: &'static str,
    pub url: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonetaryGrant {
    #[serde(rename = "@type")]
    pub kind: &'static str,
    pub name: &'static str,
    pub identifier: &'static str,
    pub funder: FundingAgency,
}

/// Horizon Europe grant behind the BioEcoOcean community.
pub const BIOECOOCEAN_GRANT: MonetaryGrant = MonetaryGrant {
    kind: "MonetaryGrant",
    name: "BioEcoOcean (Horizon Europe)",
    identifier: "101136748",
    funder: FundingAgency {
        kind: "FundingAgency",
        name: "European Commission",
        legal_name: "European Commission",
        url: "https://commission.europa.eu/index_en",
    },
};

/// The published per-record document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectRecord {
    #[serde(rename = "@context")]
    pub context: &'static str,
    #[serde(rename = "@type")]
    pub kind: &'static str,
    pub name: String,
    pub description: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier: Option<PropertyValue>,
    #[serde(
        rename = "publishingPrinciples",
        skip_serializing_if = "Option::is_none"
    )]
    pub publishing_principles: Option<Vec<LicenseWork>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<DefinedTerm>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub funding: Option<Vec<MonetaryGrant>>,
    #[serde(rename = "@id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}
