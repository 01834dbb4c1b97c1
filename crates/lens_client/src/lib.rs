use lens_core::Config;
use std::sync::Arc;

pub mod api;
pub mod backend;
pub mod http;
pub mod mock;

pub use api::ResearchApi;
pub use backend::{Backend, Endpoint};
pub use http::HttpBackend;
pub use mock::MockBackend;

/// Builds the API over the HTTP backend described by `config`.
pub fn create_api(config: &Config) -> lens_core::Result<ResearchApi> {
    let backend = HttpBackend::new(config)?;
    Ok(ResearchApi::new(Arc::new(backend)))
}

pub mod prelude {
    pub use super::{create_api, Backend, Endpoint, ResearchApi};
    pub use lens_core::{Error, Result};
}
