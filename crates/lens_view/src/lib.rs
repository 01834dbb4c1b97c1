//! Page view-state for the article, fact-check and related-topics views.
//!
//! Each controller owns the state of its page behind a `watch` channel and
//! runs backend calls on the tokio runtime, so controllers must be driven
//! from within one.

pub mod article;
mod cycle;
pub mod fact_check;
pub mod render;
pub mod route;
pub mod sidebar;

pub use article::{ArticleController, ArticleView};
pub use fact_check::{FactCheckController, FactCheckPhase, FactCheckView};
pub use render::ArticleTab;
pub use route::{fact_check_href, Route};
pub use sidebar::{RefetchPolicy, RelatedTopicsController, SidebarView};

pub mod prelude {
    pub use super::{
        ArticleController, ArticleTab, FactCheckController, RelatedTopicsController, Route,
    };
    pub use lens_core::{FetchSlice, Result};
}
