use std::fmt;
use std::io::Read;
use std::time::Duration;

use tracing::debug;

use crate::fetch::{FetchError, FetchResult, SUPPORTED_CONTENT_TYPES};

#[derive(Clone, Debug)]
pub struct HttpFetcherConfig {
    pub timeout: Duration,
}

impl Default for HttpFetcherConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
        }
    }
}

/// Blocking `ureq` requests, run on tokio's blocking pool.
#[derive(Clone)]
pub struct HttpFetcher {
    agent: ureq::Agent,
    config: HttpFetcherConfig,
}

impl fmt::Debug for HttpFetcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpFetcher")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new(HttpFetcherConfig::default())
    }
}

pub fn is_content_type_supported(content_type: &str) -> bool {
    SUPPORTED_CONTENT_TYPES
        .iter()
        .any(|supported| content_type.contains(supported))
}

impl HttpFetcher {
    pub fn new(config: HttpFetcherConfig) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(config.timeout)
            .timeout_read(config.timeout)
            .timeout_write(config.timeout)
            .build();
        Self { agent, config }
    }

    pub async fn get(&self, url: &str) -> FetchResult<String> {
        let agent = self.agent.clone();
        let owned_url = url.to_string();
        tokio::task::spawn_blocking(move || fetch_blocking(&agent, &owned_url))
            .await
            .map_err(|e| FetchError::RequestFailed {
                url: url.to_string(),
                reason: e.to_string(),
            })?
    }
}

fn fetch_blocking(agent: &ureq::Agent, url: &str) -> FetchResult<String> {
    debug!("GET {}", url);
    let response = match agent.get(url).set("Pragma", "no-cache").call() {
        Ok(response) => response,
        Err(ureq::Error::Status(status, _)) => {
            return Err(FetchError::InvalidResponseStatus {
                url: url.to_string(),
                status,
            })
        }
        Err(ureq::Error::Transport(err)) => {
            return Err(FetchError::RequestFailed {
                url: url.to_string(),
                reason: err.to_string(),
            })
        }
    };

    let status = response.status();
    if status != 200 && status != 0 {
        return Err(FetchError::InvalidResponseStatus {
            url: url.to_string(),
            status,
        });
    }

    if let Some(content_type) = response.header("content-type") {
        if !is_content_type_supported(content_type) {
            return Err(FetchError::UnsupportedContentType {
                url: url.to_string(),
                content_type: content_type.to_string(),
            });
        }
    }

    let mut body = String::new();
    response
        .into_reader()
        .read_to_string(&mut body)
        .map_err(|e| FetchError::RequestFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    Ok(body)
}
