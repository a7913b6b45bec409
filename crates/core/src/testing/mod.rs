//! Testing utilities and an in-memory qBittorrent.
//!
//! # Example
//!
//! ```rust,ignore
//! use qbitdash_core::testing::{fixtures, MockQbit};
//!
//! let qbit = MockQbit::new();
//! qbit.add_mock_torrent(fixtures::torrent("abc", "Ubuntu 24.04")).await;
//! qbit.push_search_response(Ok(fixtures::search_batch(5, SearchStatus::Stopped))).await;
//! ```

mod mock_qbit;

pub use mock_qbit::{MockQbit, RecordedAddTorrent};

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::qbit::{FilePriority, Torrent, TorrentFile, TorrentState};
    use crate::search::{SearchResult, SearchResultsResponse, SearchStatus};

    /// A downloading torrent with reasonable defaults.
    pub fn torrent(hash: &str, name: &str) -> Torrent {
        Torrent {
            hash: hash.to_string(),
            name: name.to_string(),
            state: TorrentState::Downloading,
            progress: 0.5,
            size: 1024 * 1024 * 700, // 700 MB
            total_size: 1024 * 1024 * 700,
            downloaded: 1024 * 1024 * 350,
            amount_left: 1024 * 1024 * 350,
            dlspeed: 1024 * 1024,
            upspeed: 64 * 1024,
            num_seeds: 12,
            num_leechs: 3,
            ratio: 0.1,
            eta: 350,
            added_on: 1_703_980_800,
            save_path: "/downloads".to_string(),
            magnet_uri: format!("magnet:?xt=urn:btih:{}", hash),
            ..Torrent::default()
        }
    }

    pub fn file(index: u32, name: &str) -> TorrentFile {
        TorrentFile {
            index,
            name: name.to_string(),
            size: 1024 * 1024,
            progress: 0.0,
            priority: FilePriority::Normal,
            is_seed: false,
            piece_range: vec![0, 1],
            availability: 1.0,
        }
    }

    pub fn search_result(name: &str, seeders: i64) -> SearchResult {
        SearchResult {
            file_name: name.to_string(),
            file_size: 1024 * 1024 * 1024,
            nb_seeders: seeders,
            nb_leechers: seeders / 2,
            site_url: "https://tracker.example".to_string(),
            descr_link: format!("https://tracker.example/t/{}", name),
            file_url: format!("magnet:?xt=urn:btih:{}", name),
            engine_name: Some("example".to_string()),
            pub_date: None,
        }
    }

    /// `count` results named `result-N` with N seeders each.
    pub fn search_batch(count: usize, status: SearchStatus) -> SearchResultsResponse {
        let results: Vec<SearchResult> = (0..count)
            .map(|i| search_result(&format!("result-{}", i), i as i64))
            .collect();
        SearchResultsResponse {
            total: results.len() as u64,
            results,
            status,
        }
    }
}
