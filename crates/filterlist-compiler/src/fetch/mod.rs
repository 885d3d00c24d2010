//! Collaborators that turn a location into document text.
use std::io;

use async_trait::async_trait;
use thiserror::Error;

pub mod http;
pub mod local;

pub use http::{HttpFetcher, HttpFetcherConfig};

pub const SUPPORTED_CONTENT_TYPES: [&str; 2] = ["text/plain", "text/html"];

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Response status for url {url} is invalid: {status}")]
    InvalidResponseStatus { url: String, status: u16 },

    #[error("Response content type should be one of: \"{}\"", SUPPORTED_CONTENT_TYPES.join(", "))]
    UnsupportedContentType { url: String, content_type: String },

    #[error("Failed to request url '{url}': {reason}")]
    RequestFailed { url: String, reason: String },

    #[error("Failed to read local file '{path}': {source}")]
    Io { path: String, source: io::Error },
}

pub type FetchResult<T> = Result<T, FetchError>;

#[async_trait]
pub trait FileFetcher: Send + Sync {
    /// Reads `path`, relative to the `origin` directory when it has one.
    async fn get_local_file(&self, path: &str, origin: Option<&str>) -> FetchResult<String>;

    async fn get_external_file(&self, url: &str) -> FetchResult<String>;
}

/// Reads local documents from disk and external ones over HTTP.
#[derive(Clone, Debug, Default)]
pub struct DefaultFetcher {
    http: HttpFetcher,
}

impl DefaultFetcher {
    pub fn new(config: HttpFetcherConfig) -> Self {
        Self {
            http: HttpFetcher::new(config),
        }
    }
}

#[async_trait]
impl FileFetcher for DefaultFetcher {
    async fn get_local_file(&self, path: &str, origin: Option<&str>) -> FetchResult<String> {
        local::read_local_file(path, origin).await
    }

    async fn get_external_file(&self, url: &str) -> FetchResult<String> {
        self.http.get(url).await
    }
}
