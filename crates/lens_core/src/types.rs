use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Output of the scrape-and-summarize call. Never empty once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub text: String,
}

impl Summary {
    pub fn new(text: impl Into<String>) -> Result<Self> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(Error::MissingField("summary"));
        }
        Ok(Self { text })
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ResearchBundle {
    #[serde(default)]
    pub combined_summary: String,
    #[serde(default)]
    pub individual_summaries: Vec<SourceSummary>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SourceSummary {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub summary: PageDigest,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PageDigest {
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub keywords: String,
    #[serde(default)]
    pub date: String,
}

impl PageDigest {
    pub fn keywords(&self) -> impl Iterator<Item = &str> {
        self.keywords.split(' ').filter(|k| !k.is_empty())
    }

    /// Date formatted for display. Unparseable dates are returned as given.
    pub fn display_date(&self) -> String {
        let raw = self.date.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return dt.format("%Y-%m-%d %H:%M").to_string();
        }
        if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            return date.format("%b %-d, %Y").to_string();
        }
        raw.to_string()
    }
}

/// Reliability scores as returned by the fact-check backend.
///
/// Each share is validated to lie in `[0, 100]`. The backend is asked for
/// shares summing to 100 but nothing enforces it, so the sum is kept as-is and
/// [`Reliability::unaccounted`] reports the gap.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reliability {
    pub true_percentage: f64,
    pub fake_percentage: f64,
}

impl Reliability {
    pub fn new(true_percentage: f64, fake_percentage: f64) -> Result<Self> {
        let reliability = Self {
            true_percentage,
            fake_percentage,
        };
        reliability.validate()?;
        Ok(reliability)
    }

    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("true_percentage", self.true_percentage),
            ("fake_percentage", self.fake_percentage),
        ] {
            if !value.is_finite() || !(0.0..=100.0).contains(&value) {
                return Err(Error::InvalidValue(format!(
                    "{name} must be within 0..=100, got {value}"
                )));
            }
        }
        Ok(())
    }

    pub fn total(&self) -> f64 {
        self.true_percentage + self.fake_percentage
    }

    /// Share not assigned to either bucket; negative when the total exceeds 100.
    pub fn unaccounted(&self) -> f64 {
        100.0 - self.total()
    }

    pub fn is_normalized(&self) -> bool {
        (self.total() - 100.0).abs() < f64::EPSILON
    }
}

/// External source consulted by the fact-check pipeline.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Resource {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub score: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactCheckReport {
    #[serde(default)]
    pub article_text: String,
    #[serde(default)]
    pub resources: Vec<Resource>,
    pub reliability: Reliability,
}

/// A successful fact-check response either carries scores or it doesn't.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FactCheckOutcome {
    Report(FactCheckReport),
    NoData,
}

impl FactCheckOutcome {
    pub fn report(&self) -> Option<&FactCheckReport> {
        match self {
            FactCheckOutcome::Report(report) => Some(report),
            FactCheckOutcome::NoData => None,
        }
    }
}

/// A labelled link derived from the related-topics text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicLink {
    pub link_text: String,
    pub link_url: String,
}

impl TopicLink {
    pub fn new(link_text: impl Into<String>, link_url: impl Into<String>) -> Self {
        Self {
            link_text: link_text.into(),
            link_url: link_url.into(),
        }
    }

    pub fn bare(url: impl Into<String>) -> Self {
        let url = url.into();
        Self::new(url.clone(), url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_summary_rejects_blank_text() {
        assert!(Summary::new("  ").is_err());
        assert_eq!(Summary::new("S1").unwrap().text, "S1");
    }

    #[test]
    fn test_research_bundle_tolerates_missing_fields() {
        let bundle: ResearchBundle = serde_json::from_value(json!({
            "combined_summary": "C",
            "individual_summaries": [
                { "title": "T", "link": "http://t", "summary": { "summary": "s", "keywords": "a b" } }
            ]
        }))
        .unwrap();
        assert_eq!(bundle.combined_summary, "C");
        let digest = &bundle.individual_summaries[0].summary;
        assert_eq!(digest.keywords().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(digest.date, "");
    }

    #[test]
    fn test_display_date() {
        let mut digest = PageDigest::default();
        digest.date = "2024-03-05".to_string();
        assert_eq!(digest.display_date(), "Mar 5, 2024");

        digest.date = "2024-03-05T10:30:00+00:00".to_string();
        assert_eq!(digest.display_date(), "2024-03-05 10:30");

        digest.date = "Date not found".to_string();
        assert_eq!(digest.display_date(), "Date not found");
    }

    #[test]
    fn test_reliability_bounds() {
        assert!(Reliability::new(70.0, 30.0).is_ok());
        assert!(Reliability::new(101.0, 0.0).is_err());
        assert!(Reliability::new(50.0, -1.0).is_err());
        assert!(Reliability::new(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn test_reliability_tolerates_non_normalized_sum() {
        let r = Reliability::new(60.0, 30.0).unwrap();
        assert!(!r.is_normalized());
        assert_eq!(r.unaccounted(), 10.0);

        let r = Reliability::new(70.0, 30.0).unwrap();
        assert!(r.is_normalized());
        assert_eq!(r.unaccounted(), 0.0);
    }

    #[test]
    fn test_topic_link_serializes_camel_case() {
        let value = serde_json::to_value(TopicLink::bare("http://x")).unwrap();
        assert_eq!(value, json!({ "linkText": "http://x", "linkUrl": "http://x" }));
    }
}
