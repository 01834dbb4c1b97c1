//! Plain-text renderers for the page views. Each takes a view snapshot and
//! holds no state of its own.

use lens_core::{FetchSlice, Reliability, ResearchBundle};
use std::fmt;

use crate::article::ArticleView;
use crate::fact_check::{FactCheckPhase, FactCheckView};
use crate::sidebar::SidebarView;

pub const PROGRESS_WIDTH: usize = 20;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ArticleTab {
    #[default]
    Perspective,
    Research,
}

pub fn article_page(view: &ArticleView, tab: ArticleTab) -> String {
    let mut out = vec![tab_bar(tab), String::new()];

    let Some(url) = view.url.as_deref() else {
        out.push("No article selected. Open /article?url=<article URL>.".to_string());
        return out.join("\n");
    };

    match tab {
        ArticleTab::Perspective => {
            heading(&mut out, "Article Summary");
            if view.summary_loading() {
                out.push("Loading summary...".to_string());
            } else {
                match &view.summary {
                    FetchSlice::Ready(summary) => out.push(summary.text.clone()),
                    FetchSlice::Failed(e) => out.push(format!("Summary unavailable: {e}")),
                    _ => {}
                }
                out.push(format!("Source Article: {url}"));
                if let Some(href) = view.fact_check_href() {
                    out.push(format!("Fact Check: {href}"));
                }
            }
            out.push(String::new());

            heading(&mut out, "AI Perspective");
            if view.perspective_loading() {
                out.push("Loading perspective...".to_string());
            } else {
                match &view.perspective {
                    FetchSlice::Ready(text) => out.push(text.clone()),
                    FetchSlice::Failed(e) => out.push(format!("Perspective unavailable: {e}")),
                    _ => {}
                }
            }
        }
        ArticleTab::Research => match &view.research {
            FetchSlice::Ready(bundle) => research_dashboard(&mut out, bundle),
            FetchSlice::Failed(e) => out.push(format!("Deep research unavailable: {e}")),
            FetchSlice::Idle | FetchSlice::Pending => {
                out.push("Loading deep research...".to_string())
            }
        },
    }
    out.join("\n")
}

fn tab_bar(tab: ArticleTab) -> String {
    match tab {
        ArticleTab::Perspective => "[ AI Perspective ]   Deep Research".to_string(),
        ArticleTab::Research => "  AI Perspective   [ Deep Research ]".to_string(),
    }
}

fn heading(out: &mut Vec<String>, title: &str) {
    out.push(format!("== {title} =="));
}

fn research_dashboard(out: &mut Vec<String>, bundle: &ResearchBundle) {
    let count = bundle.individual_summaries.len();
    heading(
        out,
        &format!(
            "Unified Research Overview ({count} resource{})",
            if count == 1 { "" } else { "s" }
        ),
    );
    out.push(bundle.combined_summary.clone());

    for (i, source) in bundle.individual_summaries.iter().enumerate() {
        out.push(String::new());
        out.push(format!("{}. {}", i + 1, source.title));
        if !source.summary.summary.is_empty() {
            out.push(format!("   {}", source.summary.summary));
        }
        let keywords: Vec<String> = source.summary.keywords().map(|k| format!("[{k}]")).collect();
        if !keywords.is_empty() {
            out.push(format!("   Keywords: {}", keywords.join(" ")));
        }
        if !source.summary.date.is_empty() {
            out.push(format!("   Date: {}", source.summary.display_date()));
        }
        if !source.link.is_empty() {
            out.push(format!("   Link: {}", source.link));
        }
    }
}

pub fn fact_check_page(view: &FactCheckView) -> String {
    let mut out = Vec::new();
    heading(&mut out, "Article Reliability");
    if let Some(url) = view.url.as_deref() {
        out.push(format!("Article: {url}"));
    }
    out.push(String::new());

    match view.phase() {
        FactCheckPhase::Waiting => out.push("Waiting for an article URL.".to_string()),
        FactCheckPhase::Loading => out.push("Checking reliability...".to_string()),
        FactCheckPhase::Failed(message) => out.push(format!("Error: {message}")),
        FactCheckPhase::NoData => out.push("No data available.".to_string()),
        FactCheckPhase::Report(report) => {
            reliability(&mut out, &report.reliability);
            if !report.resources.is_empty() {
                out.push(String::new());
                out.push("Sources consulted:".to_string());
                for resource in &report.resources {
                    let title = resource.title.as_deref().unwrap_or("(untitled)");
                    match resource.url.as_deref() {
                        Some(url) => out.push(format!("- {title} <{url}>")),
                        None => out.push(format!("- {title}")),
                    }
                }
            }
        }
    }
    out.join("\n")
}

fn reliability(out: &mut Vec<String>, reliability: &Reliability) {
    let unaccounted = reliability.unaccounted();
    out.push(format!(
        "True: {}% | Fake: {}% | Unaccounted: {}%",
        percent(reliability.true_percentage),
        percent(reliability.fake_percentage),
        percent(unaccounted.max(0.0))
    ));
    out.push(ProgressBar::new(reliability.true_percentage, PROGRESS_WIDTH).to_string());
    if unaccounted < 0.0 && !reliability.is_normalized() {
        out.push(format!("Scores exceed 100% by {}%", percent(-unaccounted)));
    }
}

fn percent(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.1}")
    }
}

/// Horizontal bar whose filled part is proportional to a percentage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressBar {
    percent: f64,
    width: usize,
}

impl ProgressBar {
    pub fn new(percent: f64, width: usize) -> Self {
        Self {
            percent: percent.clamp(0.0, 100.0),
            width,
        }
    }

    pub fn filled(&self) -> usize {
        ((self.percent / 100.0) * self.width as f64).round() as usize
    }
}

impl fmt::Display for ProgressBar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let filled = self.filled();
        write!(
            f,
            "[{}{}] {}%",
            "#".repeat(filled),
            "-".repeat(self.width - filled),
            percent(self.percent)
        )
    }
}

pub fn sidebar(view: &SidebarView) -> String {
    if !view.open {
        return "Related Links (closed)".to_string();
    }
    let mut out = Vec::new();
    heading(&mut out, "Related Links");
    if let Some(url) = view.article_url.as_deref() {
        out.push(format!("Back to article: {url}"));
    }
    match &view.topics {
        FetchSlice::Idle => out.push("Related links need an article summary.".to_string()),
        FetchSlice::Pending => out.push("Loading related links...".to_string()),
        FetchSlice::Failed(e) => out.push(format!("Related links unavailable: {e}")),
        FetchSlice::Ready(links) if links.is_empty() => {
            out.push("No related links found.".to_string())
        }
        FetchSlice::Ready(links) => {
            for link in links {
                if link.link_text == link.link_url {
                    out.push(format!("- {}", link.link_url));
                } else {
                    out.push(format!("- {} <{}>", link.link_text, link.link_url));
                }
            }
        }
    }
    out.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use lens_core::{
        FactCheckOutcome, FactCheckReport, PageDigest, Resource, SourceSummary, Summary, TopicLink,
    };

    fn article(url: &str) -> ArticleView {
        ArticleView {
            url: Some(url.to_string()),
            ..ArticleView::default()
        }
    }

    #[test]
    fn test_perspective_tab_while_loading() {
        let mut view = article("http://example.com/a");
        view.summary = FetchSlice::Pending;
        let page = article_page(&view, ArticleTab::Perspective);
        assert!(page.contains("Loading summary..."));
        assert!(page.contains("Loading perspective..."));
    }

    #[test]
    fn test_perspective_tab_settled() {
        let mut view = article("http://example.com/a");
        view.summary = FetchSlice::Ready(Summary::new("S1").unwrap());
        view.perspective = FetchSlice::Ready("P1".to_string());
        let page = article_page(&view, ArticleTab::Perspective);
        assert!(page.contains("S1"));
        assert!(page.contains("P1"));
        assert!(page.contains("Source Article: http://example.com/a"));
        assert!(page.contains("Fact Check: /fact-check?url=http%3A%2F%2Fexample.com%2Fa"));
    }

    #[test]
    fn test_research_tab() {
        let mut view = article("http://example.com/a");
        view.research = FetchSlice::Ready(ResearchBundle {
            combined_summary: "C".to_string(),
            individual_summaries: vec![SourceSummary {
                title: "Other take".to_string(),
                link: "http://other".to_string(),
                summary: PageDigest {
                    summary: "s".to_string(),
                    keywords: "economy  trade".to_string(),
                    date: "2024-03-05".to_string(),
                },
            }],
        });
        let page = article_page(&view, ArticleTab::Research);
        assert!(page.contains("Unified Research Overview (1 resource)"));
        assert!(page.contains("Keywords: [economy] [trade]"));
        assert!(page.contains("Date: Mar 5, 2024"));
        assert!(page.contains("Link: http://other"));
    }

    #[test]
    fn test_no_article() {
        let page = article_page(&ArticleView::default(), ArticleTab::Perspective);
        assert!(page.contains("No article selected"));
    }

    #[test]
    fn test_fact_check_report() {
        let view = FactCheckView {
            report: FetchSlice::Ready(FactCheckOutcome::Report(FactCheckReport {
                article_text: String::new(),
                resources: vec![Resource {
                    title: Some("Src".to_string()),
                    url: Some("http://src".to_string()),
                    ..Resource::default()
                }],
                reliability: Reliability::new(70.0, 30.0).unwrap(),
            })),
            ..FactCheckView::default()
        };
        let page = fact_check_page(&view);
        assert!(page.contains("True: 70% | Fake: 30% | Unaccounted: 0%"));
        assert!(page.contains("[##############------] 70%"));
        assert!(page.contains("- Src <http://src>"));
        assert!(!page.contains("exceed"));
    }

    #[test]
    fn test_fact_check_unaccounted_share() {
        let view = FactCheckView {
            report: FetchSlice::Ready(FactCheckOutcome::Report(FactCheckReport {
                article_text: String::new(),
                resources: vec![],
                reliability: Reliability::new(60.0, 30.0).unwrap(),
            })),
            ..FactCheckView::default()
        };
        assert!(fact_check_page(&view).contains("True: 60% | Fake: 30% | Unaccounted: 10%"));
    }

    #[test]
    fn test_fact_check_scores_over_one_hundred() {
        let view = FactCheckView {
            report: FetchSlice::Ready(FactCheckOutcome::Report(FactCheckReport {
                article_text: String::new(),
                resources: vec![],
                reliability: Reliability::new(80.0, 40.0).unwrap(),
            })),
            ..FactCheckView::default()
        };
        let page = fact_check_page(&view);
        assert!(page.contains("True: 80% | Fake: 40% | Unaccounted: 0%"));
        assert!(page.contains("Scores exceed 100% by 20%"));
    }

    #[test]
    fn test_fact_check_no_data_and_error() {
        let view = FactCheckView {
            report: FetchSlice::Ready(FactCheckOutcome::NoData),
            ..FactCheckView::default()
        };
        assert!(fact_check_page(&view).contains("No data available."));

        let view = FactCheckView {
            report: FetchSlice::Failed("boom".to_string()),
            ..FactCheckView::default()
        };
        assert!(fact_check_page(&view).contains("Error: boom"));
    }

    #[test]
    fn test_progress_bar() {
        assert_eq!(ProgressBar::new(70.0, 20).filled(), 14);
        assert_eq!(ProgressBar::new(0.0, 20).filled(), 0);
        assert_eq!(ProgressBar::new(250.0, 10).filled(), 10);
        assert_eq!(ProgressBar::new(50.0, 4).to_string(), "[##--] 50%");
    }

    #[test]
    fn test_sidebar() {
        let mut view = SidebarView {
            open: true,
            article_url: Some("http://example.com/a".to_string()),
            topics: FetchSlice::Ready(vec![
                TopicLink::new("Foo", "http://x"),
                TopicLink::bare("http://y"),
            ]),
            ..SidebarView::default()
        };
        let text = sidebar(&view);
        assert!(text.contains("- Foo <http://x>"));
        assert!(text.contains("- http://y"));

        view.topics = FetchSlice::Ready(vec![]);
        assert!(sidebar(&view).contains("No related links found."));

        view.open = false;
        assert_eq!(sidebar(&view), "Related Links (closed)");
    }
}
