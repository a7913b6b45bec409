//! RSS feed and rule types.
//!
//! qBittorrent returns RSS items as a tree of folders and feeds keyed by
//! name. The dashboard works with a flat list, so the tree is flattened here
//! and each feed keeps its item path for follow-up calls.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Separator qBittorrent uses between RSS folder names.
pub const RSS_PATH_SEPARATOR: &str = "\\";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RssArticle {
    pub id: String,
    pub title: String,
    pub date: Option<String>,
    pub author: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "torrentURL")]
    pub torrent_url: Option<String>,
    pub link: Option<String>,
    pub is_read: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RssFeed {
    /// Item path in the RSS tree, used to remove or mark the feed.
    pub path: String,
    pub uid: String,
    pub url: String,
    pub title: String,
    pub last_build_date: Option<String>,
    pub is_loading: bool,
    pub has_error: bool,
    pub unread_count: usize,
    pub articles: Vec<RssArticle>,
}

/// Auto-download rule from `rss/rules`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RssRule {
    /// Rule name; comes from the map key, not the definition.
    pub name: String,
    pub enabled: bool,
    pub must_contain: String,
    pub must_not_contain: String,
    pub use_regex: bool,
    pub episode_filter: String,
    pub smart_filter: bool,
    pub affected_feeds: Vec<String>,
    pub assigned_category: String,
    pub save_path: String,
}

/// Flatten the `rss/items` tree into feeds, depth first, in key order.
pub fn flatten_feeds(tree: &Map<String, Value>) -> Vec<RssFeed> {
    let mut feeds = Vec::new();
    collect_feeds(tree, "", &mut feeds);
    feeds
}

fn collect_feeds(node: &Map<String, Value>, prefix: &str, out: &mut Vec<RssFeed>) {
    for (name, child) in node {
        let Some(child) = child.as_object() else {
            continue;
        };
        let path = if prefix.is_empty() {
            name.clone()
        } else {
            format!("{}{}{}", prefix, RSS_PATH_SEPARATOR, name)
        };

        if is_feed(child) {
            out.push(feed_from_node(path, child));
        } else {
            collect_feeds(child, &path, out);
        }
    }
}

fn is_feed(node: &Map<String, Value>) -> bool {
    node.get("uid").map(Value::is_string).unwrap_or(false)
        || node.get("url").map(Value::is_string).unwrap_or(false)
}

fn feed_from_node(path: String, node: &Map<String, Value>) -> RssFeed {
    let text = |key: &str| {
        node.get(key)
            .and_then(Value::as_str)
            .map(str::to_string)
    };
    let flag = |key: &str| node.get(key).and_then(Value::as_bool).unwrap_or(false);

    let articles: Vec<RssArticle> = node
        .get("articles")
        .and_then(|a| serde_json::from_value(a.clone()).ok())
        .unwrap_or_default();
    let unread_count = articles.iter().filter(|a| !a.is_read).count();
    let title = text("title")
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| path.rsplit(RSS_PATH_SEPARATOR).next().unwrap_or("").to_string());

    RssFeed {
        uid: text("uid").unwrap_or_default(),
        url: text("url").unwrap_or_default(),
        title,
        last_build_date: text("lastBuildDate"),
        is_loading: flag("isLoading"),
        has_error: flag("hasError"),
        unread_count,
        articles,
        path,
    }
}

/// Turn the `rss/rules` map into a list, preserving key order.
pub fn rules_from_map(map: Map<String, Value>) -> Vec<RssRule> {
    map.into_iter()
        .filter_map(|(name, definition)| {
            serde_json::from_value::<RssRule>(definition)
                .ok()
                .map(|rule| RssRule { name, ..rule })
        })
        .collect()
}
