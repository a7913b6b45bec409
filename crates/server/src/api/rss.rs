//! RSS feed and rule handlers.
//!
//! Feeds are addressed by their item path in the daemon's RSS tree
//! (folders separated by `\`), percent-encoded in the URL.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tracing::info;

use qbitdash_core::qbit::{RssArticle, RssFeed, RssRule};

use super::error::{ApiError, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AddFeedRequest {
    pub url: String,
    /// Where to put the feed in the tree; defaults to the URL.
    #[serde(default)]
    pub path: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct MarkReadRequest {
    /// Mark only this article; the whole feed when absent.
    #[serde(default)]
    pub article_id: Option<String>,
}

/// GET /api/v1/rss/feeds
pub async fn list_feeds(State(state): State<Arc<AppState>>) -> ApiResult<Vec<RssFeed>> {
    Ok(Json(state.qbit().rss_feeds().await?))
}

/// POST /api/v1/rss/feeds
pub async fn add_feed(
    State(state): State<Arc<AppState>>,
    Json(body): Json<AddFeedRequest>,
) -> Result<(StatusCode, Json<Vec<RssFeed>>), ApiError> {
    let url = body.url.trim();
    if url.is_empty() {
        return Err(ApiError::bad_request("Feed URL cannot be empty"));
    }
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ApiError::bad_request("Feed URL must start with http:// or https://"));
    }

    let qbit = state.qbit();
    let path = body.path.as_deref().map(str::trim).filter(|p| !p.is_empty());
    qbit.add_rss_feed(url, path).await?;
    info!(url, "Added RSS feed");

    Ok((StatusCode::CREATED, Json(qbit.rss_feeds().await?)))
}

/// DELETE /api/v1/rss/feeds/{path}
pub async fn remove_feed(
    State(state): State<Arc<AppState>>,
    Path(path): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.qbit().remove_rss_item(&path).await?;
    info!(path = %path, "Removed RSS feed");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/rss/feeds/{path}/articles
pub async fn list_articles(
    State(state): State<Arc<AppState>>,
    Path(path): Path<String>,
) -> ApiResult<Vec<RssArticle>> {
    let feed = state
        .qbit()
        .rss_feeds()
        .await?
        .into_iter()
        .find(|f| f.path == path)
        .ok_or_else(|| ApiError::not_found(format!("RSS feed not found: {}", path)))?;
    Ok(Json(feed.articles))
}

/// POST /api/v1/rss/feeds/{path}/read
pub async fn mark_read(
    State(state): State<Arc<AppState>>,
    Path(path): Path<String>,
    Json(body): Json<MarkReadRequest>,
) -> Result<StatusCode, ApiError> {
    state
        .qbit()
        .mark_rss_read(&path, body.article_id.as_deref())
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/rss/rules
pub async fn list_rules(State(state): State<Arc<AppState>>) -> ApiResult<Vec<RssRule>> {
    Ok(Json(state.qbit().rss_rules().await?))
}
