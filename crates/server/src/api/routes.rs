use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use super::middleware::metrics_middleware;
use super::{handlers, logs, preferences, rss, search, session, torrents};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    // Dashboard static files path (configurable via env)
    let dashboard_dir =
        std::env::var("DASHBOARD_DIR").unwrap_or_else(|_| "dashboard/dist".to_string());

    // API routes
    let api_routes = Router::new()
        // Health and config
        .route("/health", get(handlers::health))
        .route("/config", get(handlers::get_config))
        // Session
        .route("/session", get(session::get_session))
        .route("/session/login", post(session::login))
        .route("/session/logout", post(session::logout))
        // Application
        .route("/app/version", get(handlers::app_version))
        .route("/transfer", get(handlers::transfer_info))
        .route(
            "/preferences",
            get(preferences::get_preferences).post(preferences::set_preferences),
        )
        .route("/logs", get(logs::get_logs))
        // Torrents
        .route("/torrents", get(torrents::list_torrents))
        .route("/torrents/add/url", post(torrents::add_url))
        .route("/torrents/add/file", post(torrents::add_file))
        .route("/torrents/pause", post(torrents::pause))
        .route("/torrents/resume", post(torrents::resume))
        .route("/torrents/delete", post(torrents::delete))
        .route("/torrents/{hash}", get(torrents::get_properties))
        .route("/torrents/{hash}/files", get(torrents::get_files))
        .route(
            "/torrents/{hash}/files/priority",
            post(torrents::set_file_priority),
        )
        .route("/torrents/{hash}/trackers", get(torrents::get_trackers))
        // RSS
        .route("/rss/feeds", get(rss::list_feeds).post(rss::add_feed))
        .route("/rss/feeds/{path}", delete(rss::remove_feed))
        .route("/rss/feeds/{path}/articles", get(rss::list_articles))
        .route("/rss/feeds/{path}/read", post(rss::mark_read))
        .route("/rss/rules", get(rss::list_rules))
        // Search
        .route(
            "/search",
            get(search::get_search)
                .post(search::start_search)
                .delete(search::cancel_search),
        )
        .route("/search/sort", post(search::sort_results))
        .route("/search/page", post(search::set_page))
        .route("/search/plugins", get(search::list_plugins))
        .with_state(state);

    // Serve dashboard with SPA fallback
    let index_path = format!("{}/index.html", dashboard_dir);
    let serve_dir = ServeDir::new(&dashboard_dir).fallback(ServeFile::new(&index_path));

    Router::new()
        .route("/metrics", get(handlers::metrics))
        .nest("/api/v1", api_routes)
        .fallback_service(serve_dir)
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
}
