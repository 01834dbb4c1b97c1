use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use lens_view::{ArticleController, FactCheckController, RelatedTopicsController};
use serde::Deserialize;
use std::sync::Arc;

use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TopicsQuery {
    pub url: Option<String>,
    pub summary: Option<String>,
}

pub async fn article(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PageQuery>,
) -> impl IntoResponse {
    let mut page = ArticleController::new(state.api.clone());
    page.set_url(query.url);
    page.settled().await;
    Json(page.state())
}

pub async fn fact_check(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PageQuery>,
) -> impl IntoResponse {
    let mut page = FactCheckController::new(state.api.clone());
    page.set_url(query.url);
    page.settled().await;
    Json(page.state())
}

pub async fn related_topics(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TopicsQuery>,
) -> impl IntoResponse {
    let mut sidebar = RelatedTopicsController::new(state.api.clone(), state.topics_policy);
    sidebar.set_context(query.url, query.summary);
    sidebar.open();
    sidebar.settled().await;
    Json(sidebar.state())
}
