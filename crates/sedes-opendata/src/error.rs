use std::path::PathBuf;

use thiserror::Error;

/// Errors returned by the facility and geocoding sources.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("upstream returned {status} for {context}")]
    UnexpectedStatus { status: u16, context: String },

    /// The CKAN API answered with `"success": false`.
    #[error("CKAN API error: {0}")]
    Api(String),

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A single dataset record that cannot become a facility.
    #[error("invalid facility record: {0}")]
    InvalidRecord(String),

    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),

    #[error("geocoding access token is not configured")]
    MissingToken,

    #[error("search query is empty")]
    EmptyQuery,

    /// Neither the live source nor the fallback file produced data.
    #[error("facility data unavailable (live: {live}; fallback: {fallback})")]
    Unavailable { live: String, fallback: String },
}
