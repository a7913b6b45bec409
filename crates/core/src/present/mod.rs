//! View state for tabular data: sorting and pagination.

mod page;
mod results;
mod sort;
mod torrents;

pub use page::{paginate, Page};
pub use results::{sort_results, ResultSortField, ResultTable, ResultView};
pub use sort::{SortDirection, SortState};
pub use torrents::{sort_torrents, TorrentSortField};
