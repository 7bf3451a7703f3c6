//! Catalogue records as harvested, before projection.
//!
//! Records come from three producers (Zenodo JSON-LD exports, synthesized stubs and the OBIS
//! feed) and share no fixed shape, so the raw JSON object is kept as-is and fields are read
//! through the accessors below.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Path fragment identifying a Zenodo record page.
pub const RECORD_PATH_MARKER: &str = "zenodo.org/record/";

/// One linked-data object of the catalogue graph.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CatalogueRecord(Map<String, Value>);

/// The shapes an upstream `identifier` field is found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Identifier<'a> {
    /// `"https://doi.org/10.5281/zenodo.1"` or a bare `"10.5281/zenodo.1"`.
    Plain(&'a str),
    /// A `PropertyValue`-like object; only its `value` and `url` matter.
    Structured {
        value: Option<&'a str>,
        url: Option<&'a str>,
    },
    Absent,
}

/// The shapes an upstream `description` field is found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Description<'a> {
    Text(&'a str),
    /// A value object such as `{"@value": "…", "@language": "en"}`.
    Literal(&'a str),
    Absent,
}

impl Description<'_> {
    pub fn as_str(&self) -> &str {
        match self {
            Description::Text(s) | Description::Literal(s) => s,
            Description::Absent => "",
        }
    }
}

/// JSON truthiness: `null`, `false`, `0`, `""`, `[]` and `{}` count as missing.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Return the Zenodo record id embedded in `url` after [`RECORD_PATH_MARKER`].
///
/// The id ends at the next `/` or at the query string.
pub fn zenodo_record_id(url: &str) -> Option<&str> {
    let start = url.find(RECORD_PATH_MARKER)? + RECORD_PATH_MARKER.len();
    let id = url[start..].split(['/', '?']).next()?;
    (!id.is_empty()).then_some(id)
}

impl CatalogueRecord {
    /// Wrap a JSON value; anything but an object is rejected.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// A non-empty string field.
    pub fn text(&self, key: &str) -> Option<&str> {
        self.get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    pub fn has_type(&self) -> bool {
        self.get("@type").is_some_and(is_truthy)
    }

    /// The record's link key: `url`, else `@id`.
    pub fn url(&self) -> Option<&str> {
        self.text("url").or_else(|| self.text("@id"))
    }

    pub fn record_id(&self) -> Option<&str> {
        self.url().and_then(zenodo_record_id)
    }

    /// `name` as a plain string or unwrapped from a value object.
    pub fn name(&self) -> Option<&str> {
        match self.get("name")? {
            Value::String(s) if !s.is_empty() => Some(s),
            Value::Object(o) => o
                .get("@value")
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty()),
            _ => None,
        }
    }

    pub fn description(&self) -> Description<'_> {
        match self.get("description") {
            Some(Value::String(s)) => Description::Text(s),
            Some(Value::Object(o)) if o.contains_key("@value") => o
                .get("@value")
                .and_then(Value::as_str)
                .map_or(Description::Absent, Description::Literal),
            _ => Description::Absent,
        }
    }

    pub fn identifier(&self) -> Identifier<'_> {
        match self.get("identifier") {
            Some(Value::String(s)) => Identifier::Plain(s),
            Some(Value::Object(o)) => Identifier::Structured {
                value: o.get("value").and_then(Value::as_str),
                url: o.get("url").and_then(Value::as_str),
            },
            _ => Identifier::Absent,
        }
    }

    pub fn license(&self) -> Option<&str> {
        self.get("license").and_then(Value::as_str)
    }

    /// String keywords; other entries are skipped.
    pub fn keywords(&self) -> impl Iterator<Item = &str> {
        self.get("keywords")
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .filter_map(Value::as_str)
    }
}

impl From<Map<String, Value>> for CatalogueRecord {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}
