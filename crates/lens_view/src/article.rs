use lens_client::ResearchApi;
use lens_core::{FetchSlice, ResearchBundle, Summary};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::watch;

use crate::cycle::{apply, Cycles, Generational};
use crate::route::fact_check_href;

/// Reason shown on the perspective slice when its input never arrived.
pub const PERSPECTIVE_SKIPPED: &str = "not generated: article summary unavailable";

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ArticleView {
    #[serde(skip)]
    pub(crate) generation: u64,
    pub url: Option<String>,
    pub research: FetchSlice<ResearchBundle>,
    pub summary: FetchSlice<Summary>,
    pub perspective: FetchSlice<String>,
}

impl Generational for ArticleView {
    fn generation(&self) -> u64 {
        self.generation
    }
}

impl ArticleView {
    pub fn summary_loading(&self) -> bool {
        self.summary.is_loading()
    }

    /// The perspective counts as loading while it waits on the summary too.
    pub fn perspective_loading(&self) -> bool {
        self.perspective.is_loading()
            || (matches!(self.perspective, FetchSlice::Idle) && self.summary.is_loading())
    }

    pub fn research_loading(&self) -> bool {
        self.research.is_loading()
    }

    pub fn is_settled(&self) -> bool {
        !self.summary_loading() && !self.perspective_loading() && !self.research_loading()
    }

    pub fn summary_text(&self) -> Option<&str> {
        self.summary.value().map(|s| s.text.as_str())
    }

    pub fn fact_check_href(&self) -> Option<String> {
        self.url.as_deref().map(fact_check_href)
    }
}

/// Drives the article page.
///
/// Setting a URL starts one fetch cycle: deep research and scrape-and-summarize
/// run concurrently, and the perspective call starts only once a non-empty
/// summary has been applied. A new URL, or dropping the controller, cancels
/// the running cycle; its late results are discarded.
pub struct ArticleController {
    api: ResearchApi,
    state: Arc<watch::Sender<ArticleView>>,
    cycles: Cycles,
}

impl ArticleController {
    pub fn new(api: ResearchApi) -> Self {
        let (state, _) = watch::channel(ArticleView::default());
        Self {
            api,
            state: Arc::new(state),
            cycles: Cycles::default(),
        }
    }

    pub fn state(&self) -> ArticleView {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ArticleView> {
        self.state.subscribe()
    }

    /// Returns `false` when `url` is the one already driving the page.
    pub fn set_url(&mut self, url: Option<String>) -> bool {
        let url = url.filter(|u| !u.trim().is_empty());
        if self.state.borrow().url == url {
            return false;
        }

        let (generation, token) = self.cycles.begin();
        let pending = url.is_some();
        self.state.send_modify(|view| {
            *view = ArticleView {
                generation,
                url: url.clone(),
                ..ArticleView::default()
            };
            if pending {
                view.research.start();
                view.summary.start();
            }
        });

        if let Some(url) = url {
            tracing::info!(%url, generation, "loading article");
            let work = run_cycle(self.api.clone(), self.state.clone(), generation, url);
            self.cycles.spawn(token, work);
        }
        true
    }

    /// Waits until the current fetch cycle has finished or been cancelled.
    pub async fn settled(&mut self) {
        self.cycles.settled().await;
    }
}

async fn run_cycle(
    api: ResearchApi,
    state: Arc<watch::Sender<ArticleView>>,
    generation: u64,
    url: String,
) {
    let research = async {
        let outcome = api.deep_research(&url).await;
        apply(&state, generation, |view| view.research.settle(outcome));
    };

    let analysis = async {
        let summary = match api.summarize(&url).await {
            Ok(summary) => summary,
            Err(e) => {
                tracing::warn!(%url, "summary unavailable, skipping perspective: {}", e);
                apply(&state, generation, |view| {
                    view.summary.fail(e.to_string());
                    view.perspective.fail(PERSPECTIVE_SKIPPED);
                });
                return;
            }
        };

        let applied = apply(&state, generation, |view| {
            view.summary = FetchSlice::Ready(summary.clone());
            view.perspective.start();
        });
        if !applied {
            return;
        }

        let outcome = api.perspective(&summary).await;
        apply(&state, generation, |view| view.perspective.settle(outcome));
    };

    tokio::join!(research, analysis);
}
