pub mod error;
pub mod handlers;
pub mod logs;
pub mod middleware;
pub mod preferences;
pub mod routes;
pub mod rss;
pub mod search;
pub mod session;
pub mod torrents;

pub use error::{ApiError, ErrorResponse};
pub use routes::create_router;
