//! Torrent list and torrent control handlers.

use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use qbitdash_core::qbit::{
    AddTorrentRequest, FilePriority, StateFilter, Torrent, TorrentFile, TorrentFilter,
    TorrentProperties, TorrentTracker,
};
use qbitdash_core::{paginate, sort_torrents, Page, SortDirection, SortState, TorrentSortField};

use super::error::{ApiError, ApiResult};
use crate::state::AppState;

const DEFAULT_PAGE_SIZE: usize = 20;
const MAX_PAGE_SIZE: usize = 500;

// ============================================================================
// Request/Response types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct TorrentListParams {
    #[serde(default)]
    pub filter: Option<StateFilter>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub sort: Option<TorrentSortField>,
    #[serde(default)]
    pub direction: Option<SortDirection>,
    #[serde(default)]
    pub page: Option<usize>,
    #[serde(default)]
    pub page_size: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct TorrentListResponse {
    pub sort: SortState<TorrentSortField>,
    #[serde(flatten)]
    pub page: Page<Torrent>,
}

#[derive(Debug, Deserialize)]
pub struct FilePriorityRequest {
    pub ids: Vec<u32>,
    pub priority: FilePriority,
}

#[derive(Debug, Deserialize)]
pub struct AddUrlRequest {
    /// One magnet link or URL per line.
    pub url: String,
    #[serde(default)]
    pub save_path: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub paused: bool,
}

#[derive(Debug, Deserialize)]
pub struct HashesRequest {
    pub hashes: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct DeleteRequest {
    pub hashes: Vec<String>,
    #[serde(default)]
    pub delete_files: bool,
}

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub message: String,
}

impl SuccessResponse {
    fn new(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            message: message.into(),
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn apply_options(
    mut request: AddTorrentRequest,
    save_path: Option<String>,
    category: Option<String>,
    paused: bool,
) -> AddTorrentRequest {
    if let Some(path) = non_empty(save_path) {
        request = request.with_save_path(path);
    }
    if let Some(category) = non_empty(category) {
        request = request.with_category(category);
    }
    request.with_paused(paused)
}

fn require_hashes(hashes: &[String]) -> Result<(), ApiError> {
    if hashes.iter().all(|h| h.trim().is_empty()) {
        return Err(ApiError::bad_request("No torrent hashes given"));
    }
    Ok(())
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/v1/torrents
///
/// Filter on the daemon, then sort and page locally.
pub async fn list_torrents(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TorrentListParams>,
) -> ApiResult<TorrentListResponse> {
    let filter = TorrentFilter {
        state: params.filter,
        category: params.category,
    };
    let mut torrents = state.qbit().list_torrents(&filter).await?;

    let sort = SortState::new(
        params.sort.unwrap_or_default(),
        params.direction.unwrap_or_default(),
    );
    sort_torrents(&mut torrents, sort.field, sort.direction);

    let page_size = params
        .page_size
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);
    let page = paginate(&torrents, params.page.unwrap_or(1), page_size);

    Ok(Json(TorrentListResponse { sort, page }))
}

/// GET /api/v1/torrents/{hash}
pub async fn get_properties(
    State(state): State<Arc<AppState>>,
    Path(hash): Path<String>,
) -> ApiResult<TorrentProperties> {
    Ok(Json(state.qbit().torrent_properties(&hash).await?))
}

/// GET /api/v1/torrents/{hash}/files
pub async fn get_files(
    State(state): State<Arc<AppState>>,
    Path(hash): Path<String>,
) -> ApiResult<Vec<TorrentFile>> {
    Ok(Json(state.qbit().torrent_files(&hash).await?))
}

/// POST /api/v1/torrents/{hash}/files/priority
pub async fn set_file_priority(
    State(state): State<Arc<AppState>>,
    Path(hash): Path<String>,
    Json(body): Json<FilePriorityRequest>,
) -> ApiResult<Vec<TorrentFile>> {
    if body.ids.is_empty() {
        return Err(ApiError::bad_request("No file ids given"));
    }
    let qbit = state.qbit();
    qbit.set_file_priority(&hash, &body.ids, body.priority)
        .await?;
    Ok(Json(qbit.torrent_files(&hash).await?))
}

/// GET /api/v1/torrents/{hash}/trackers
pub async fn get_trackers(
    State(state): State<Arc<AppState>>,
    Path(hash): Path<String>,
) -> ApiResult<Vec<TorrentTracker>> {
    Ok(Json(state.qbit().torrent_trackers(&hash).await?))
}

/// POST /api/v1/torrents/add/url
pub async fn add_url(
    State(state): State<Arc<AppState>>,
    Json(body): Json<AddUrlRequest>,
) -> ApiResult<SuccessResponse> {
    let urls: Vec<String> = body
        .url
        .lines()
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .map(str::to_string)
        .collect();
    if urls.is_empty() {
        return Err(ApiError::bad_request("URL cannot be empty"));
    }

    let count = urls.len();
    let request = AddTorrentRequest::Urls {
        urls,
        options: Default::default(),
    };
    let request = apply_options(request, body.save_path, body.category, body.paused);
    state.qbit().add_torrent(request).await?;

    info!(count, "Added torrents by URL");
    Ok(SuccessResponse::new(format!("Added {} torrent(s)", count)))
}

/// POST /api/v1/torrents/add/file
///
/// Multipart form with a `file` part and optional `save_path`, `category`
/// and `paused` fields.
pub async fn add_file(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> ApiResult<SuccessResponse> {
    let mut torrent_data: Option<Vec<u8>> = None;
    let mut filename: Option<String> = None;
    let mut save_path: Option<String> = None;
    let mut category: Option<String> = None;
    let mut paused = false;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Invalid multipart body: {}", e)))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "file" => {
                filename = field.file_name().map(|s| s.to_string());
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("Failed to read file: {}", e)))?;
                torrent_data = Some(bytes.to_vec());
            }
            "save_path" => save_path = field.text().await.ok(),
            "category" => category = field.text().await.ok(),
            "paused" => {
                if let Ok(text) = field.text().await {
                    paused = text == "true" || text == "1";
                }
            }
            _ => {}
        }
    }

    let data = match torrent_data {
        Some(d) if !d.is_empty() => d,
        _ => return Err(ApiError::bad_request("No torrent file provided")),
    };

    let request = AddTorrentRequest::torrent_file(data, filename.clone());
    let request = apply_options(request, save_path, category, paused);
    state.qbit().add_torrent(request).await?;

    info!(filename = ?filename, "Added torrent from file");
    Ok(SuccessResponse::new("Added 1 torrent(s)"))
}

/// POST /api/v1/torrents/pause
pub async fn pause(
    State(state): State<Arc<AppState>>,
    Json(body): Json<HashesRequest>,
) -> ApiResult<SuccessResponse> {
    require_hashes(&body.hashes)?;
    state.qbit().pause_torrents(&body.hashes).await?;
    Ok(SuccessResponse::new(format!("Paused {} torrent(s)", body.hashes.len())))
}

/// POST /api/v1/torrents/resume
pub async fn resume(
    State(state): State<Arc<AppState>>,
    Json(body): Json<HashesRequest>,
) -> ApiResult<SuccessResponse> {
    require_hashes(&body.hashes)?;
    state.qbit().resume_torrents(&body.hashes).await?;
    Ok(SuccessResponse::new(format!("Resumed {} torrent(s)", body.hashes.len())))
}

/// POST /api/v1/torrents/delete
pub async fn delete(
    State(state): State<Arc<AppState>>,
    Json(body): Json<DeleteRequest>,
) -> ApiResult<SuccessResponse> {
    require_hashes(&body.hashes)?;
    state
        .qbit()
        .delete_torrents(&body.hashes, body.delete_files)
        .await?;
    info!(
        count = body.hashes.len(),
        delete_files = body.delete_files,
        "Deleted torrents"
    );
    Ok(SuccessResponse::new(format!("Deleted {} torrent(s)", body.hashes.len())))
}
