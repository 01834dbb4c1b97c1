use url::Url;

use crate::{Error, Result};

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";
pub const BACKEND_URL_ENV: &str = "LENS_BACKEND_URL";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Base URL every endpoint path is joined onto.
    pub backend_url: Url,
}

impl Config {
    pub fn with_backend_url(url: &str) -> Result<Self> {
        let backend_url = Url::parse(url)
            .map_err(|e| Error::Config(format!("invalid backend URL {url:?}: {e}")))?;
        if backend_url.cannot_be_a_base() {
            return Err(Error::Config(format!("backend URL {url:?} cannot be a base")));
        }
        Ok(Self { backend_url })
    }

    /// Reads `LENS_BACKEND_URL`, falling back to the default backend.
    pub fn from_env() -> Result<Self> {
        match std::env::var(BACKEND_URL_ENV) {
            Ok(url) if !url.trim().is_empty() => Self::with_backend_url(url.trim()),
            _ => Ok(Self::default()),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: Url::parse(DEFAULT_BACKEND_URL).expect("default backend URL is valid"),
        }
    }
}
