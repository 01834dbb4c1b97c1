pub mod config;
pub mod error;
pub mod logging;
pub mod slice;
pub mod topics;
pub mod types;

pub use config::Config;
pub use error::Error;
pub use slice::{FetchSlice, FetchStatus};
pub use types::{
    FactCheckOutcome, FactCheckReport, PageDigest, Reliability, ResearchBundle, Resource,
    SourceSummary, Summary, TopicLink,
};

pub type Result<T> = std::result::Result<T, Error>;

pub mod prelude {
    pub use crate::{Config, Error, FetchSlice, FetchStatus, Result};
}
