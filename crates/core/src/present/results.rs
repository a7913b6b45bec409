//! Sorting and paging of search results.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::search::{SearchJob, SearchJobId, SearchResult};

use super::page::{paginate, Page};
use super::sort::{cmp_ignore_case, SortDirection, SortState};

/// Sortable columns of the result table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultSortField {
    Name,
    Size,
    Seeders,
    Leechers,
    /// Site the result came from.
    Source,
}

impl ResultSortField {
    fn compare(self, a: &SearchResult, b: &SearchResult) -> Ordering {
        match self {
            ResultSortField::Name => cmp_ignore_case(&a.file_name, &b.file_name),
            ResultSortField::Size => a.file_size.cmp(&b.file_size),
            ResultSortField::Seeders => a.nb_seeders.cmp(&b.nb_seeders),
            ResultSortField::Leechers => a.nb_leechers.cmp(&b.nb_leechers),
            ResultSortField::Source => cmp_ignore_case(&a.site_url, &b.site_url),
        }
    }
}

/// Sorted copy of `results`. Ties keep their input order.
pub fn sort_results(
    results: &[SearchResult],
    field: ResultSortField,
    direction: SortDirection,
) -> Vec<SearchResult> {
    let mut sorted = results.to_vec();
    sorted.sort_by(|a, b| direction.apply(field.compare(a, b)));
    sorted
}

/// What the result table shows right now.
#[derive(Debug, Clone, Serialize)]
pub struct ResultView {
    pub sort: SortState<ResultSortField>,
    #[serde(flatten)]
    pub page: Page<SearchResult>,
}

/// View state of the search result table.
#[derive(Debug, Clone)]
pub struct ResultTable {
    sort: SortState<ResultSortField>,
    page: usize,
    page_size: usize,
    /// Job id and result generation the current page belongs to.
    source: Option<(SearchJobId, u64)>,
}

impl ResultTable {
    pub fn new(page_size: usize) -> Self {
        Self {
            sort: SortState::new(ResultSortField::Seeders, SortDirection::Desc),
            page: 1,
            page_size: page_size.max(1),
            source: None,
        }
    }

    pub fn sort(&self) -> SortState<ResultSortField> {
        self.sort
    }

    pub fn page(&self) -> usize {
        self.page
    }

    /// A new column sorts descending first; the active one toggles.
    pub fn sort_by(&mut self, field: ResultSortField) {
        self.sort.select(field, SortDirection::Desc);
        self.page = 1;
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = page.max(1);
    }

    /// Go back to page 1 when a different result set is shown.
    pub fn sync(&mut self, job_id: SearchJobId, generation: u64) {
        let source = Some((job_id, generation));
        if self.source != source {
            self.source = source;
            self.page = 1;
        }
    }

    /// Render the current page of `job`'s results.
    pub fn view(&mut self, job: &SearchJob) -> ResultView {
        self.sync(job.id, job.generation);
        let sorted = sort_results(&job.results, self.sort.field, self.sort.direction);
        let page = paginate(&sorted, self.page, self.page_size);
        self.page = page.page;
        ResultView {
            sort: self.sort,
            page,
        }
    }
}

impl Default for ResultTable {
    fn default() -> Self {
        Self::new(20)
    }
}
