use async_trait::async_trait;
use lens_core::{Config, Error, Result};
use reqwest::Client;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use url::Url;

use crate::backend::{Backend, Endpoint};

const MAX_DETAIL_LEN: usize = 200;

/// POSTs JSON bodies to the research backend.
///
/// No timeout, retry or backoff is configured: a hung backend keeps the
/// caller's slice pending until its fetch cycle is cancelled.
pub struct HttpBackend {
    client: Arc<Client>,
    base_url: Url,
}

impl HttpBackend {
    pub fn new(config: &Config) -> Result<Self> {
        Self::with_client(Client::new(), config)
    }

    pub fn with_client(client: Client, config: &Config) -> Result<Self> {
        let mut base_url = config.backend_url.clone();
        if base_url.cannot_be_a_base() {
            return Err(Error::Config(format!("{base_url} cannot be a base URL")));
        }
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self {
            client: Arc::new(client),
            base_url,
        })
    }

    pub fn endpoint_url(&self, endpoint: Endpoint) -> Result<Url> {
        let relative = endpoint.path().trim_start_matches('/');
        self.base_url
            .join(relative)
            .map_err(|e| Error::InvalidUrl(format!("{}{}: {}", self.base_url, relative, e)))
    }
}

impl fmt::Debug for HttpBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpBackend")
            .field("client", &"<reqwest::Client>")
            .field("base_url", &self.base_url.as_str())
            .finish()
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn invoke(&self, endpoint: Endpoint, body: Value) -> Result<Value> {
        let path = endpoint.path();
        let url = self.endpoint_url(endpoint)?;
        tracing::debug!("POST {}", url);

        let response = self
            .client
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::remote(path, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.ok().and_then(|text| failure_detail(&text));
            let message = match detail {
                Some(detail) => format!("HTTP {status}: {detail}"),
                None => format!("HTTP {status}"),
            };
            return Err(Error::remote(path, message));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| Error::remote(path, e.to_string()))?;
        serde_json::from_slice(&bytes)
            .map_err(|e| Error::remote(path, format!("malformed JSON body: {e}")))
    }
}

/// Extracts a readable reason from an error body. FastAPI-style
/// `{"detail": "..."}` bodies yield the detail string.
fn failure_detail(text: &str) -> Option<String> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(text) {
        if let Some(Value::String(detail)) = map.get("detail") {
            return Some(detail.clone());
        }
    }
    Some(text.chars().take(MAX_DETAIL_LEN).collect())
}
