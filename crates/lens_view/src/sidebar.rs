use lens_client::ResearchApi;
use lens_core::{topics, FetchSlice, TopicLink};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::watch;

use crate::cycle::{apply, Cycles, Generational};

/// When opening the sidebar asks the backend for topics again.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RefetchPolicy {
    /// Every toggle to open issues a fresh call, even for an unchanged summary.
    #[default]
    EveryOpen,
    /// Reuse the last topics while the summary text is unchanged.
    OncePerSummary,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SidebarView {
    #[serde(skip)]
    pub(crate) generation: u64,
    #[serde(skip)]
    pub(crate) fetched_for: Option<String>,
    pub open: bool,
    pub article_url: Option<String>,
    pub topics: FetchSlice<Vec<TopicLink>>,
}

impl Generational for SidebarView {
    fn generation(&self) -> u64 {
        self.generation
    }
}

/// Related-links drawer of the article page.
///
/// The parent pushes the article URL and summary in through
/// [`RelatedTopicsController::set_context`]; fetching is driven only by the
/// user opening the drawer.
pub struct RelatedTopicsController {
    api: ResearchApi,
    policy: RefetchPolicy,
    summary: Option<String>,
    state: Arc<watch::Sender<SidebarView>>,
    cycles: Cycles,
}

impl RelatedTopicsController {
    pub fn new(api: ResearchApi, policy: RefetchPolicy) -> Self {
        let (state, _) = watch::channel(SidebarView::default());
        Self {
            api,
            policy,
            summary: None,
            state: Arc::new(state),
            cycles: Cycles::default(),
        }
    }

    pub fn state(&self) -> SidebarView {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SidebarView> {
        self.state.subscribe()
    }

    /// Updates the article the drawer belongs to. Moving to another article
    /// drops topics fetched for the previous one.
    pub fn set_context(&mut self, article_url: Option<String>, summary: Option<String>) {
        self.summary = summary.filter(|s| !s.trim().is_empty());
        if self.state.borrow().article_url == article_url {
            return;
        }
        let generation = self.cycles.invalidate();
        self.state.send_modify(|view| {
            view.generation = generation;
            view.article_url = article_url;
            view.fetched_for = None;
            view.topics.reset();
        });
    }

    /// Flips the drawer and, when it opens, requests topics. Returns whether
    /// the drawer is now open.
    pub fn toggle(&mut self) -> bool {
        let open = !self.state.borrow().open;
        if open {
            self.open();
        } else {
            self.close();
        }
        open
    }

    /// Opens the drawer and requests topics according to the policy. Returns
    /// whether a call was issued.
    pub fn open(&mut self) -> bool {
        self.state.send_modify(|view| view.open = true);
        self.refresh()
    }

    /// Closing never cancels an outstanding request.
    pub fn close(&mut self) {
        self.state.send_modify(|view| view.open = false);
    }

    fn refresh(&mut self) -> bool {
        let Some(summary) = self.summary.clone() else {
            tracing::debug!("no summary yet, not requesting related topics");
            return false;
        };
        {
            let view = self.state.borrow();
            if view.article_url.is_none() {
                tracing::debug!("no article, not requesting related topics");
                return false;
            }
            if self.policy == RefetchPolicy::OncePerSummary
                && view.fetched_for.as_deref() == Some(summary.as_str())
                && view.topics.value().is_some()
            {
                tracing::debug!("reusing related topics for unchanged summary");
                return false;
            }
        }

        let (generation, token) = self.cycles.begin();
        self.state.send_modify(|view| {
            view.generation = generation;
            view.topics.start();
        });

        let api = self.api.clone();
        let state = self.state.clone();
        self.cycles.spawn(token, async move {
            let outcome = match api.related_topics(&summary).await {
                Ok(raw) => topics::parse(&raw),
                Err(e) => Err(e),
            };
            let parsed = outcome.is_ok();
            apply(&state, generation, |view| {
                view.topics.settle(outcome);
                view.fetched_for = parsed.then_some(summary);
            });
        });
        true
    }

    pub async fn settled(&mut self) {
        self.cycles.settled().await;
    }
}
