use lens_core::{Error, FactCheckOutcome, FactCheckReport, ResearchBundle, Result, Summary};
use serde_json::{json, Value};
use std::fmt;
use std::sync::Arc;

use crate::backend::{Backend, Endpoint};

/// Typed wrappers over the raw backend calls. Each method issues exactly one
/// call and decodes only the fields the pages use.
#[derive(Clone)]
pub struct ResearchApi {
    backend: Arc<dyn Backend>,
}

impl fmt::Debug for ResearchApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResearchApi")
            .field("backend", &self.backend)
            .finish()
    }
}

impl ResearchApi {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self { backend }
    }

    pub async fn deep_research(&self, url: &str) -> Result<ResearchBundle> {
        let response = self
            .backend
            .invoke(Endpoint::DeepResearch, json!({ "url": url }))
            .await?;
        let research = take_field(response, "research").ok_or(Error::MissingField("research"))?;
        Ok(serde_json::from_value(research)?)
    }

    /// A missing, non-string or blank summary is an error.
    pub async fn summarize(&self, url: &str) -> Result<Summary> {
        let response = self
            .backend
            .invoke(Endpoint::ScrapeAndSummarize, json!({ "url": url }))
            .await?;
        match take_field(response, "summary") {
            Some(Value::String(text)) => Summary::new(text),
            _ => Err(Error::MissingField("summary")),
        }
    }

    pub async fn perspective(&self, summary: &Summary) -> Result<String> {
        let response = self
            .backend
            .invoke(Endpoint::GeneratePerspective, json!({ "summary": summary.text }))
            .await?;
        match take_field(response, "perspective") {
            Some(Value::String(text)) => Ok(text),
            _ => Err(Error::MissingField("perspective")),
        }
    }

    /// Raw related-topics text; an absent field reads as no topics.
    pub async fn related_topics(&self, summary: &str) -> Result<String> {
        let response = self
            .backend
            .invoke(Endpoint::RelatedTopics, json!({ "summary": summary }))
            .await?;
        match take_field(response, "topics") {
            None => Ok(String::new()),
            Some(Value::String(topics)) => Ok(topics),
            Some(other) => Err(Error::InvalidValue(format!(
                "topics must be a string, got {other}"
            ))),
        }
    }

    /// A body without `reliability` is [`FactCheckOutcome::NoData`], not an
    /// error.
    pub async fn fact_check(&self, url: &str) -> Result<FactCheckOutcome> {
        let response = self
            .backend
            .invoke(Endpoint::FactCheck, json!({ "url": url }))
            .await?;
        if response.get("reliability").map_or(true, Value::is_null) {
            return Ok(FactCheckOutcome::NoData);
        }
        let report: FactCheckReport = serde_json::from_value(response)?;
        report.reliability.validate()?;
        Ok(FactCheckOutcome::Report(report))
    }
}

fn take_field(response: Value, name: &str) -> Option<Value> {
    match response {
        Value::Object(mut map) => map.remove(name).filter(|v| !v.is_null()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockBackend;
    use lens_core::Reliability;

    fn api_with(mock: &Arc<MockBackend>) -> ResearchApi {
        ResearchApi::new(mock.clone())
    }

    #[tokio::test]
    async fn test_summarize_requires_text() {
        let mock = Arc::new(MockBackend::new().respond(Endpoint::ScrapeAndSummarize, json!({ "summary": "S1" })));
        let summary = api_with(&mock).summarize("http://example.com/a").await.unwrap();
        assert_eq!(summary.text, "S1");
        assert_eq!(
            mock.calls(),
            vec![(Endpoint::ScrapeAndSummarize, json!({ "url": "http://example.com/a" }))]
        );

        for body in [json!({}), json!({ "summary": "" }), json!({ "summary": null }), json!({ "summary": 3 })] {
            let mock = Arc::new(MockBackend::new().respond(Endpoint::ScrapeAndSummarize, body));
            let err = api_with(&mock).summarize("http://example.com/a").await.unwrap_err();
            assert!(matches!(err, Error::MissingField("summary")));
        }
    }

    #[tokio::test]
    async fn test_perspective_sends_summary_text() {
        let mock = Arc::new(MockBackend::new().respond(Endpoint::GeneratePerspective, json!({ "perspective": "P1" })));
        let summary = Summary::new("S1").unwrap();
        assert_eq!(api_with(&mock).perspective(&summary).await.unwrap(), "P1");
        assert_eq!(mock.calls()[0].1, json!({ "summary": "S1" }));
    }

    #[tokio::test]
    async fn test_deep_research_decodes_bundle() {
        let mock = Arc::new(MockBackend::new().respond(
            Endpoint::DeepResearch,
            json!({ "research": { "combined_summary": "C", "individual_summaries": [] } }),
        ));
        let bundle = api_with(&mock).deep_research("http://example.com/a").await.unwrap();
        assert_eq!(bundle.combined_summary, "C");
        assert!(bundle.individual_summaries.is_empty());

        let mock = Arc::new(MockBackend::new().respond(Endpoint::DeepResearch, json!({ "research": null })));
        let err = api_with(&mock).deep_research("http://example.com/a").await.unwrap_err();
        assert!(matches!(err, Error::MissingField("research")));
    }

    #[tokio::test]
    async fn test_related_topics_defaults_to_empty() {
        let mock = Arc::new(MockBackend::new().respond(Endpoint::RelatedTopics, json!({})));
        assert_eq!(api_with(&mock).related_topics("S1").await.unwrap(), "");

        let mock = Arc::new(MockBackend::new().respond(Endpoint::RelatedTopics, json!({ "topics": ["a"] })));
        assert!(api_with(&mock).related_topics("S1").await.is_err());
    }

    #[tokio::test]
    async fn test_fact_check_outcomes() {
        let mock = Arc::new(MockBackend::new().respond(
            Endpoint::FactCheck,
            json!({
                "article_text": "text",
                "resources": [{ "title": "Src", "url": "http://src", "score": 0.9 }],
                "reliability": { "true_percentage": 70, "fake_percentage": 30 }
            }),
        ));
        let outcome = api_with(&mock).fact_check("http://example.com/a").await.unwrap();
        let report = outcome.report().unwrap();
        assert_eq!(report.reliability, Reliability::new(70.0, 30.0).unwrap());
        assert_eq!(report.resources[0].title.as_deref(), Some("Src"));

        let mock = Arc::new(MockBackend::new().respond(Endpoint::FactCheck, json!({ "article_text": "text" })));
        let outcome = api_with(&mock).fact_check("http://example.com/a").await.unwrap();
        assert_eq!(outcome, FactCheckOutcome::NoData);

        let mock = Arc::new(MockBackend::new().respond(
            Endpoint::FactCheck,
            json!({ "reliability": { "true_percentage": 170, "fake_percentage": 30 } }),
        ));
        let err = api_with(&mock).fact_check("http://example.com/a").await.unwrap_err();
        assert!(matches!(err, Error::InvalidValue(_)));
    }

    #[tokio::test]
    async fn test_backend_failure_propagates() {
        let mock = Arc::new(MockBackend::new().fail(Endpoint::FactCheck, "HTTP 500"));
        let err = api_with(&mock).fact_check("http://example.com/a").await.unwrap_err();
        assert!(matches!(err, Error::Remote { endpoint: "/fact-check", .. }));
    }
}
