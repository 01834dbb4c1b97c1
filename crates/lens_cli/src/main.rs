use clap::{Parser, ValueEnum};
use lens_core::config::{Config, BACKEND_URL_ENV, DEFAULT_BACKEND_URL};
use lens_core::logging::{init_logging, level_for_verbosity};
use lens_view::{ArticleTab, RefetchPolicy, Route};
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::info;

mod pages;

#[derive(Parser, Debug)]
#[command(author, version, about = "Summaries, counter-perspectives and fact checks for news articles", long_about = None)]
pub struct Cli {
    /// Base URL of the research backend
    #[arg(long, env = BACKEND_URL_ENV, default_value = DEFAULT_BACKEND_URL)]
    backend_url: String,
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Summarize an article, generate an opposing perspective and run deep research
    Article {
        url: String,
        /// Only print one tab of the article page
        #[arg(long, value_enum)]
        tab: Option<Tab>,
        /// Open the related-links drawer once the summary is available
        #[arg(long)]
        related: bool,
        #[arg(long, value_enum, default_value = "every-open")]
        topics_policy: TopicsPolicy,
    },
    /// Score the reliability of an article
    FactCheck { url: String },
    /// Parse related-topics text from a file (or stdin) into links
    Topics { file: Option<PathBuf> },
    /// Open a page route such as "/fact-check?url=https%3A%2F%2Fexample.com"
    Open { route: String },
    /// Serve page view-state as JSON
    Serve {
        #[arg(long, default_value = "127.0.0.1:3000")]
        addr: SocketAddr,
        #[arg(long, value_enum, default_value = "every-open")]
        topics_policy: TopicsPolicy,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Tab {
    Perspective,
    Research,
}

impl From<Tab> for ArticleTab {
    fn from(tab: Tab) -> Self {
        match tab {
            Tab::Perspective => ArticleTab::Perspective,
            Tab::Research => ArticleTab::Research,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum TopicsPolicy {
    EveryOpen,
    OncePerSummary,
}

impl From<TopicsPolicy> for RefetchPolicy {
    fn from(policy: TopicsPolicy) -> Self {
        match policy {
            TopicsPolicy::EveryOpen => RefetchPolicy::EveryOpen,
            TopicsPolicy::OncePerSummary => RefetchPolicy::OncePerSummary,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(level_for_verbosity(cli.verbose));

    let config = Config::with_backend_url(&cli.backend_url)?;
    let api = lens_client::create_api(&config)?;
    info!("🔎 Using backend at {}", config.backend_url);

    match cli.command {
        Commands::Article {
            url,
            tab,
            related,
            topics_policy,
        } => {
            let options = pages::ArticleOptions {
                tab: tab.map(ArticleTab::from),
                related,
                topics_policy: topics_policy.into(),
            };
            pages::show_article(&api, Some(url), &options).await?;
        }
        Commands::FactCheck { url } => pages::show_fact_check(&api, Some(url)).await?,
        Commands::Topics { file } => pages::show_topics(file.as_deref())?,
        Commands::Open { route } => match Route::parse(&route)? {
            Route::Article { url } => {
                pages::show_article(&api, url, &pages::ArticleOptions::default()).await?
            }
            Route::FactCheck { url } => pages::show_fact_check(&api, url).await?,
        },
        Commands::Serve {
            addr,
            topics_policy,
        } => {
            let state = lens_web::AppState {
                api,
                topics_policy: topics_policy.into(),
            };
            lens_web::serve(state, addr).await?;
        }
    }

    Ok(())
}
