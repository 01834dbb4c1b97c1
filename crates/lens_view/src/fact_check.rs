use lens_client::ResearchApi;
use lens_core::{FactCheckOutcome, FactCheckReport, FetchSlice};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::watch;

use crate::cycle::{apply, Cycles, Generational};

pub const NO_URL_MESSAGE: &str = "No URL provided for fact checking";

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FactCheckView {
    #[serde(skip)]
    pub(crate) generation: u64,
    pub url: Option<String>,
    pub report: FetchSlice<FactCheckOutcome>,
}

impl Generational for FactCheckView {
    fn generation(&self) -> u64 {
        self.generation
    }
}

/// What the fact-check page shows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FactCheckPhase<'a> {
    Waiting,
    Loading,
    Failed(&'a str),
    Report(&'a FactCheckReport),
    NoData,
}

impl FactCheckView {
    pub fn phase(&self) -> FactCheckPhase<'_> {
        match &self.report {
            FetchSlice::Idle => FactCheckPhase::Waiting,
            FetchSlice::Pending => FactCheckPhase::Loading,
            FetchSlice::Failed(message) => FactCheckPhase::Failed(message),
            FetchSlice::Ready(FactCheckOutcome::Report(report)) => FactCheckPhase::Report(report),
            FetchSlice::Ready(FactCheckOutcome::NoData) => FactCheckPhase::NoData,
        }
    }

    pub fn is_settled(&self) -> bool {
        self.report.is_settled()
    }
}

pub struct FactCheckController {
    api: ResearchApi,
    state: Arc<watch::Sender<FactCheckView>>,
    cycles: Cycles,
}

impl FactCheckController {
    pub fn new(api: ResearchApi) -> Self {
        let (state, _) = watch::channel(FactCheckView::default());
        Self {
            api,
            state: Arc::new(state),
            cycles: Cycles::default(),
        }
    }

    pub fn state(&self) -> FactCheckView {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<FactCheckView> {
        self.state.subscribe()
    }

    /// Starts a fact check for `url`. A missing URL fails the page without
    /// calling the backend. Returns `false` when nothing changed.
    pub fn set_url(&mut self, url: Option<String>) -> bool {
        let url = url.filter(|u| !u.trim().is_empty());
        {
            let view = self.state.borrow();
            if view.url == url && !matches!(view.report, FetchSlice::Idle) {
                return false;
            }
        }

        let (generation, token) = self.cycles.begin();
        self.state.send_modify(|view| {
            view.generation = generation;
            view.url = url.clone();
            match &url {
                Some(_) => view.report.start(),
                None => view.report.fail(NO_URL_MESSAGE),
            }
        });

        let Some(url) = url else {
            tracing::warn!("{}", NO_URL_MESSAGE);
            return true;
        };

        tracing::info!(%url, generation, "fact checking article");
        let api = self.api.clone();
        let state = self.state.clone();
        self.cycles.spawn(token, async move {
            let outcome = api.fact_check(&url).await;
            apply(&state, generation, |view| view.report.settle(outcome));
        });
        true
    }

    pub async fn settled(&mut self) {
        self.cycles.settled().await;
    }
}
