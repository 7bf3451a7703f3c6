use crate::record::Identifier;

/// Resolver every DOI URL is built on.
pub const DOI_RESOLVER: &str = "https://doi.org/";

/// identifiers.org registry entry used as `propertyID` for DOIs.
pub const DOI_REGISTRY: &str = "https://registry.identifiers.org/registry/doi";

/// Matches `https://doi.org/`, `http://dx.doi.org/` and the like.
const RESOLVER_HOST: &str = "doi.org/";

/// A DOI pulled out of an `identifier` field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DoiRef {
    /// The bare DOI, e.g. `10.5281/zenodo.123`.
    pub value: Option<String>,
    /// A resolver URL for it.
    pub url: Option<String>,
}

impl DoiRef {
    /// Extract a DOI from any shape an `identifier` comes in.
    ///
    /// A plain string is either a resolver URL or the DOI itself. For a structured identifier the
    /// `value` is the DOI and the `url` is only kept when it points at a resolver. When a DOI is
    /// found without a URL, the canonical resolver URL is synthesized.
    pub fn extract(identifier: Identifier<'_>) -> Self {
        let (value, url) = match identifier {
            Identifier::Plain(s) => match s.split_once(RESOLVER_HOST) {
                Some((_, doi)) => (Some(doi), Some(s)),
                None => (Some(s), None),
            },
            Identifier::Structured { value, url } => {
                (value, url.filter(|u| u.contains(RESOLVER_HOST)))
            }
            Identifier::Absent => (None, None),
        };

        let value = value.filter(|v| !v.is_empty());
        let url = url
            .map(str::to_owned)
            .or_else(|| value.map(|v| format!("{DOI_RESOLVER}{v}")));

        DoiRef {
            value: value.map(str::to_owned),
            url,
        }
    }
}
