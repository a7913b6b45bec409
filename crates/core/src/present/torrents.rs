//! Sorting of the torrent list.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::qbit::Torrent;

use super::sort::{cmp_ignore_case, SortDirection};

/// Sortable columns of the torrent list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TorrentSortField {
    #[default]
    Name,
    Size,
    Progress,
    Dlspeed,
    Upspeed,
    Eta,
    State,
    Ratio,
}

impl TorrentSortField {
    fn compare(self, a: &Torrent, b: &Torrent) -> Ordering {
        match self {
            TorrentSortField::Name => cmp_ignore_case(&a.name, &b.name),
            TorrentSortField::Size => a.size.cmp(&b.size),
            TorrentSortField::Progress => a.progress.total_cmp(&b.progress),
            TorrentSortField::Dlspeed => a.dlspeed.cmp(&b.dlspeed),
            TorrentSortField::Upspeed => a.upspeed.cmp(&b.upspeed),
            TorrentSortField::Eta => a.eta.cmp(&b.eta),
            TorrentSortField::State => a.state.as_str().cmp(b.state.as_str()),
            TorrentSortField::Ratio => a.ratio.total_cmp(&b.ratio),
        }
    }
}

/// Sort torrents in place. Ties keep their order.
pub fn sort_torrents(torrents: &mut [Torrent], field: TorrentSortField, direction: SortDirection) {
    torrents.sort_by(|a, b| direction.apply(field.compare(a, b)));
}
