use std::path::PathBuf;

/// Errors raised while harvesting or projecting catalogue records.
///
/// Only the listing stage and the projector's input/output treat these as fatal. Detail exports
/// and the RSS feed catch them at the call site and fall back instead.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: Box<ureq::Error>,
    },

    #[error("{url} answered with HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid XML: {0}")]
    Xml(String),

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("no records found in {path:?}")]
    EmptyCatalogue { path: PathBuf },
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn http(url: impl Into<String>, source: ureq::Error) -> Self {
        Self::Http {
            url: url.into(),
            source: Box::new(source),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_offending_resource() {
        let err = Error::Status {
            url: "https://zenodo.org/api/records".into(),
            status: 503,
        };
        assert_eq!(
            err.to_string(),
            "https://zenodo.org/api/records answered with HTTP 503"
        );

        let err = Error::EmptyCatalogue {
            path: PathBuf::from("catalogue.jsonld"),
        };
        assert!(err.to_string().contains("catalogue.jsonld"));
    }
}
