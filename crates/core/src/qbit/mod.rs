//! qBittorrent WebUI API facade.

mod api;
mod client;
mod error;
pub mod rss;
mod types;

pub use api::QbitApi;
pub use client::QbitClient;
pub use error::QbitError;
pub use rss::{RssArticle, RssFeed, RssRule};
pub use types::*;
