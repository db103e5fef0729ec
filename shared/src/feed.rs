//! Home feed: recommendations fetched page by page and merged by id.
//!
//! Loading is split into [`FeedPaginator::begin`] and
//! [`FeedPaginator::complete`] so a UI task can release the paginator while
//! the request is out. At most one request is in flight per paginator, for
//! every mode: a refresh started during a load-more is rejected just like a
//! second load-more.

use tracing::{debug, info, warn};

use crate::shelf::{Recommendations, Shelf};
use crate::{BookApi, BookPage, ClientError, Recommendation};

/// Books per feed page.
pub const DEFAULT_PAGE_LIMIT: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadMode {
    /// First load when the screen mounts.
    Initial,
    /// Pull-to-refresh: back to page 1.
    Refresh,
    /// Infinite scroll: the next page.
    Append,
}

/// A page load that has been admitted by the in-flight guard.
#[derive(Debug, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
    pub mode: LoadMode,
    generation: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded { page: u32, received: usize },
    /// Rejected by the guard; nothing was requested.
    Skipped,
    /// The paginator was reset while this request was out.
    Stale,
}

#[derive(Debug, Clone)]
pub struct FeedPaginator {
    items: Recommendations,
    current_page: u32,
    has_more: bool,
    limit: u32,
    in_flight: Option<LoadMode>,
    generation: u64,
}

impl Default for FeedPaginator {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_LIMIT)
    }
}

impl FeedPaginator {
    pub fn new(limit: u32) -> Self {
        Self {
            items: Recommendations::new(),
            current_page: 0,
            has_more: true,
            limit: limit.max(1),
            in_flight: None,
            generation: 0,
        }
    }

    pub fn items(&self) -> &Recommendations {
        &self.items
    }

    /// Last page merged, 0 before anything has loaded.
    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn is_loading(&self) -> bool {
        matches!(
            self.in_flight,
            Some(LoadMode::Initial) | Some(LoadMode::Append)
        )
    }

    pub fn is_refreshing(&self) -> bool {
        self.in_flight == Some(LoadMode::Refresh)
    }

    /// Admit a load, or return `None` when it must be a no-op.
    pub fn begin(&mut self, mode: LoadMode) -> Option<PageRequest> {
        if let Some(active) = self.in_flight {
            debug!(?mode, ?active, "feed load already in flight; skipping");
            return None;
        }
        let page = match mode {
            LoadMode::Initial | LoadMode::Refresh => 1,
            LoadMode::Append if !self.has_more => {
                debug!(page = self.current_page, "feed exhausted; skipping load-more");
                return None;
            }
            LoadMode::Append => self.current_page + 1,
        };
        self.in_flight = Some(mode);
        Some(PageRequest {
            page,
            limit: self.limit,
            mode,
            generation: self.generation,
        })
    }

    /// Apply the response to an admitted request. On error nothing but the
    /// in-flight flag changes.
    pub fn complete(
        &mut self,
        request: PageRequest,
        result: Result<BookPage, ClientError>,
    ) -> Result<LoadOutcome, ClientError> {
        if request.generation != self.generation {
            debug!(page = request.page, "dropping response for a reset feed");
            return Ok(LoadOutcome::Stale);
        }
        self.in_flight = None;

        let page = match result {
            Ok(page) => page,
            Err(e) => {
                warn!(page = request.page, mode = ?request.mode, error = %e, "feed load failed");
                return Err(e);
            }
        };

        let received = page.books.len();
        match request.mode {
            LoadMode::Initial | LoadMode::Refresh => self.items.replace_all(page.books),
            LoadMode::Append => {
                self.items.merge(page.books);
            }
        }
        self.current_page = request.page;
        self.has_more = request.page < page.total_pages;
        info!(
            page = request.page,
            total_pages = page.total_pages,
            received,
            held = self.items.len(),
            "feed page merged"
        );

        Ok(LoadOutcome::Loaded {
            page: request.page,
            received,
        })
    }

    /// `begin`, fetch, `complete` in one call.
    pub async fn load<A: BookApi + ?Sized>(
        &mut self,
        api: &A,
        token: &str,
        mode: LoadMode,
    ) -> Result<LoadOutcome, ClientError> {
        let Some(request) = self.begin(mode) else {
            return Ok(LoadOutcome::Skipped);
        };
        let result = api.list_books(token, request.page, request.limit).await;
        self.complete(request, result)
    }

    /// Forget everything, including any request still out.
    pub fn reset(&mut self) {
        let generation = self.generation + 1;
        *self = Self::new(self.limit);
        self.generation = generation;
    }
}

impl Shelf for FeedPaginator {
    fn remove(&mut self, id: &str) -> Option<Recommendation> {
        self.items.remove(id)
    }
}
