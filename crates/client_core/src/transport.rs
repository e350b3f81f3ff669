use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::error::TransportError;

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Minimal GET/POST surface against the show player's base resource.
#[async_trait]
pub trait ShowfileTransport: Send + Sync {
    async fn get_json(&self, path: &str) -> Result<Value, TransportError>;
    /// Response bodies are ignored; only delivery matters.
    async fn post_json(&self, path: &str, body: &Value) -> Result<(), TransportError>;
}

/// Relative paths of the show player resources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShowfileEndpoints {
    pub status: String,
    pub directory: String,
    pub command: String,
}

impl Default for ShowfileEndpoints {
    fn default() -> Self {
        Self {
            status: "showfile/status".into(),
            directory: "showfile/directory".into(),
            command: "showfile".into(),
        }
    }
}

pub struct HttpTransport {
    http: Client,
    base_url: Url,
}

impl HttpTransport {
    pub fn new(base_url: &str) -> Result<Self, TransportError> {
        Self::with_timeout(base_url, DEFAULT_REQUEST_TIMEOUT)
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, TransportError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| TransportError::Client(err.to_string()))?;
        Ok(Self {
            http,
            base_url: normalize_base_url(base_url)?,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn resolve(&self, path: &str) -> Result<Url, TransportError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|err| TransportError::InvalidBaseUrl {
                url: format!("{}{path}", self.base_url),
                reason: err.to_string(),
            })
    }
}

/// Ensures the base path ends with `/` so joins append rather than replace.
fn normalize_base_url(raw: &str) -> Result<Url, TransportError> {
    let mut url = Url::parse(raw.trim()).map_err(|err| TransportError::InvalidBaseUrl {
        url: raw.to_string(),
        reason: err.to_string(),
    })?;
    if url.cannot_be_a_base() {
        return Err(TransportError::InvalidBaseUrl {
            url: raw.to_string(),
            reason: "url cannot be used as a base".into(),
        });
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url.set_query(None);
    url.set_fragment(None);
    Ok(url)
}

fn map_request_error(url: &Url, err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout {
            url: url.to_string(),
        }
    } else {
        TransportError::Request {
            url: url.to_string(),
            reason: err.to_string(),
        }
    }
}

#[async_trait]
impl ShowfileTransport for HttpTransport {
    async fn get_json(&self, path: &str) -> Result<Value, TransportError> {
        let url = self.resolve(path)?;
        debug!(%url, "GET");
        let res = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(|err| map_request_error(&url, err))?;

        let status = res.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let bytes = res
            .bytes()
            .await
            .map_err(|err| map_request_error(&url, err))?;
        serde_json::from_slice(&bytes).map_err(|err| TransportError::Body {
            url: url.to_string(),
            reason: err.to_string(),
        })
    }

    async fn post_json(&self, path: &str, body: &Value) -> Result<(), TransportError> {
        let url = self.resolve(path)?;
        debug!(%url, %body, "POST");
        let res = self
            .http
            .post(url.clone())
            .json(body)
            .send()
            .await
            .map_err(|err| map_request_error(&url, err))?;

        let status = res.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
