use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("could not build http client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} answered with status {status}")]
    Status { url: String, status: u16 },
    #[error("response from {url} is not valid JSON: {source}")]
    Json {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Error, Debug)]
pub enum HashError {
    #[error("could not decode image: {0}")]
    Decode(#[from] image::ImageError),
    #[error("artwork region is {width}x{height}, nothing to hash")]
    DegenerateRegion { width: u32, height: u32 },
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("fingerprint table is not sorted at {0:?}")]
    Unsorted(String),
    #[error("duplicate id in fingerprint table: {0}")]
    Duplicate(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid fingerprint {0:?}: expected 16 lowercase hex characters")]
pub struct ParseFingerprintError(pub String);

/// Failures that abort a table build. Per-record problems never end up here.
#[derive(Error, Debug)]
pub enum BuildError {
    #[error("could not load catalog: {0}")]
    Catalog(#[from] FetchError),
    #[error("could not write fingerprint table: {0}")]
    Storage(#[from] StorageError),
}
