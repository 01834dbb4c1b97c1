use anyhow::Context;
use lens_client::ResearchApi;
use lens_core::{topics, FetchSlice};
use lens_view::{
    render, ArticleController, ArticleTab, ArticleView, FactCheckController, RefetchPolicy,
    RelatedTopicsController,
};
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};

#[derive(Debug, Default)]
pub struct ArticleOptions {
    /// `None` prints both tabs.
    pub tab: Option<ArticleTab>,
    pub related: bool,
    pub topics_policy: RefetchPolicy,
}

pub async fn show_article(
    api: &ResearchApi,
    url: Option<String>,
    options: &ArticleOptions,
) -> anyhow::Result<()> {
    let mut page = ArticleController::new(api.clone());
    let mut updates = page.subscribe();
    page.set_url(url);

    let mut last = page.state();
    while !last.is_settled() {
        if updates.changed().await.is_err() {
            break;
        }
        let view = updates.borrow_and_update().clone();
        log_settled_slices(&last, &view);
        last = view;
    }
    page.settled().await;
    let view = page.state();

    match options.tab {
        Some(tab) => println!("{}", render::article_page(&view, tab)),
        None => {
            println!("{}", render::article_page(&view, ArticleTab::Perspective));
            println!();
            println!("{}", render::article_page(&view, ArticleTab::Research));
        }
    }

    if options.related {
        let mut sidebar = RelatedTopicsController::new(api.clone(), options.topics_policy);
        sidebar.set_context(view.url.clone(), view.summary_text().map(str::to_string));
        sidebar.toggle();
        sidebar.settled().await;
        println!();
        println!("{}", render::sidebar(&sidebar.state()));
    }
    Ok(())
}

fn log_settled_slices(before: &ArticleView, after: &ArticleView) {
    log_slice("📰 summary", &before.summary, &after.summary);
    log_slice("🧠 perspective", &before.perspective, &after.perspective);
    log_slice("📚 deep research", &before.research, &after.research);
}

fn log_slice<T>(name: &str, before: &FetchSlice<T>, after: &FetchSlice<T>) {
    if before.status() == after.status() {
        return;
    }
    match after {
        FetchSlice::Pending => info!("{} requested", name),
        FetchSlice::Ready(_) => info!("{} ready", name),
        FetchSlice::Failed(e) => warn!("{} failed: {}", name, e),
        FetchSlice::Idle => {}
    }
}

pub async fn show_fact_check(api: &ResearchApi, url: Option<String>) -> anyhow::Result<()> {
    let mut page = FactCheckController::new(api.clone());
    page.set_url(url);
    page.settled().await;
    println!("{}", render::fact_check_page(&page.state()));
    Ok(())
}

pub fn show_topics(file: Option<&Path>) -> anyhow::Result<()> {
    let raw = match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?,
        None => {
            let mut raw = String::new();
            std::io::stdin()
                .read_to_string(&mut raw)
                .context("reading stdin")?;
            raw
        }
    };

    let links = topics::parse(&raw)?;
    if links.is_empty() {
        println!("No related links found.");
    }
    for link in links {
        if link.link_text == link.link_url {
            println!("{}", link.link_url);
        } else {
            println!("{}\t{}", link.link_text, link.link_url);
        }
    }
    Ok(())
}
