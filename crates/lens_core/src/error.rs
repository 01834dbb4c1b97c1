use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Any failure of a single backend call: transport, non-2xx status or an
    /// undecodable body.
    #[error("{endpoint} failed: {message}")]
    Remote { endpoint: &'static str, message: String },

    #[error("Missing field `{0}` in response")]
    MissingField(&'static str),

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Topics error: {0}")]
    Topics(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("External error: {0}")]
    External(#[from] anyhow::Error),
}

impl Error {
    pub fn remote(endpoint: &'static str, message: impl Into<String>) -> Self {
        Error::Remote {
            endpoint,
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
