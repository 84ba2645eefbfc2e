use axum::{
    extract::{Path, Query, State},
    response::Response,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tf_core::{Article, Category, LatestNews, PriceTick};
use tracing::{info, warn};
use crate::error::ApiError;
use crate::views::{render_template, LandingPage, SectionView};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct LatestQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct LandingQuery {
    /// Cards shown in the latest grid.
    pub visible: Option<usize>,
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

fn section_message(label: &str, result: tf_core::Result<Vec<Article>>) -> Result<Vec<Article>, String> {
    result.map_err(|e| {
        warn!("{} section failed: {}", label, e);
        if e.is_configuration_error() {
            e.to_string()
        } else {
            format!("Error fetching {} news. Please try again.", label.to_lowercase())
        }
    })
}

pub async fn landing(State(state): State<Arc<AppState>>, Query(query): Query<LandingQuery>) -> Response {
    // Dropping this future (client went away) cancels the fetches
    let token = state.shutdown.child_token();
    let _guard = token.clone().drop_guard();

    let (sections, prices) = tokio::join!(state.feeds.sections(&token), state.feeds.prices());

    let config = state.feeds.config();
    let visible = query.visible.unwrap_or(config.latest_visible);
    let latest = sections.latest(config.block_size, visible);
    let prices = prices.unwrap_or_else(|e| {
        warn!("Price marquee unavailable: {}", e);
        Vec::new()
    });

    let page = LandingPage::new(
        &prices,
        SectionView::new("crypto", "Crypto News", section_message("Crypto", sections.crypto)),
        SectionView::new("technology", "Tech News", section_message("Tech", sections.tech)),
        latest,
        visible,
    );
    render_template(&page)
}

pub async fn news(
    State(state): State<Arc<AppState>>,
    Path(category): Path<String>,
) -> Result<Json<Vec<Article>>, ApiError> {
    let category = Category::from(category.as_str());
    let token = state.shutdown.child_token();
    let _guard = token.clone().drop_guard();

    let articles = state.feeds.fetcher().fetch_category_cancellable(&category, &token).await?;
    info!("Served {} {} articles", articles.len(), category);
    Ok(Json(articles))
}

pub async fn latest(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LatestQuery>,
) -> Result<Json<LatestNews>, ApiError> {
    let visible = query.limit.unwrap_or(state.feeds.config().latest_visible);
    let token = state.shutdown.child_token();
    let _guard = token.clone().drop_guard();

    Ok(Json(state.feeds.latest(visible, &token).await?))
}

pub async fn prices(State(state): State<Arc<AppState>>) -> Result<Json<Vec<PriceTick>>, ApiError> {
    Ok(Json(state.feeds.prices().await?))
}
