use std::time::Duration;

use serde_json::Value;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::FetchError;

/// Source of raw bytes for catalog lists and card images.
pub trait Fetch {
    fn get_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError>;

    fn get_json(&self, url: &str) -> Result<Value, FetchError> {
        let body = self.get_bytes(url)?;
        serde_json::from_slice(&body).map_err(|source| FetchError::Json {
            url: url.to_string(),
            source,
        })
    }
}

/// Blocking HTTP client with one flat timeout per request.
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(FetchError::Client)?;
        Ok(Self { client })
    }

    pub fn from_config(config: &Config) -> Result<Self, FetchError> {
        Self::new(config.timeout)
    }
}

impl Fetch for HttpFetcher {
    fn get_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let http = |source| FetchError::Http {
            url: url.to_string(),
            source,
        };
        let resp = self.client.get(url).send().map_err(http)?;
        if !resp.status().is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: resp.status().as_u16(),
            });
        }
        let body = resp.bytes().map_err(http)?;
        debug!(url, bytes = body.len(), "fetched");
        Ok(body.to_vec())
    }
}

/// Fetches every catalog list in order. Any failure aborts the whole load.
pub fn fetch_catalogs<F: Fetch + ?Sized>(
    fetcher: &F,
    sources: &[String],
) -> Result<Vec<Value>, FetchError> {
    sources
        .iter()
        .map(|url| {
            info!(url = url.as_str(), "loading catalog");
            fetcher.get_json(url)
        })
        .collect()
}

/// Canned responses keyed by URL for unit tests; unknown URLs answer 404.
#[cfg(test)]
impl Fetch for std::collections::HashMap<String, Vec<u8>> {
    fn get_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        self.get(url).cloned().ok_or_else(|| FetchError::Status {
            url: url.to_string(),
            status: 404,
        })
    }
}
