use async_trait::async_trait;
use lens_core::Result;
use serde_json::Value;
use std::fmt;

/// The backend operations this client knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    DeepResearch,
    ScrapeAndSummarize,
    GeneratePerspective,
    RelatedTopics,
    FactCheck,
}

impl Endpoint {
    pub const ALL: [Endpoint; 5] = [
        Endpoint::DeepResearch,
        Endpoint::ScrapeAndSummarize,
        Endpoint::GeneratePerspective,
        Endpoint::RelatedTopics,
        Endpoint::FactCheck,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::DeepResearch => "/deep-research",
            Endpoint::ScrapeAndSummarize => "/scrape-and-summarize",
            Endpoint::GeneratePerspective => "/generate-perspective",
            Endpoint::RelatedTopics => "/related-topics",
            Endpoint::FactCheck => "/fact-check",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// One JSON-in, JSON-out call per invocation. Implementations must not retry.
#[async_trait]
pub trait Backend: Send + Sync + fmt::Debug {
    async fn invoke(&self, endpoint: Endpoint, body: Value) -> Result<Value>;
}
