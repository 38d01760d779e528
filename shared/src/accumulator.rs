//! List accumulation and pagination.
//!
//! Two screens share the same primitive, a ranged list request:
//!
//! - [`PagedList`] shows one page at a time and replaces it wholesale.
//! - [`ScrollList`] appends successive batches into an [`AccumulatedList`]
//!   that never holds two items with the same reference URL.
//!
//! Both are plain state machines (`Idle -> Loading -> Loaded | Failed`). They
//! hand back the [`RequestKey`] they are waiting for and accept the outcome for
//! exactly that key; they never talk to the network themselves.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::api::FetchError;
use crate::catalog::{ListItem, ListPage};
use crate::orchestrator::{ListMode, RequestKey};
use crate::MAX_VISIBLE_PAGES;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Loaded,
    Failed(FetchError),
}

impl LoadState {
    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    #[must_use]
    pub fn error(&self) -> Option<&FetchError> {
        match self {
            Self::Failed(error) => Some(error),
            _ => None,
        }
    }
}

/// `ceil(count / page_size)`. Zero items means zero pages.
#[must_use]
pub fn total_pages(count: u32, page_size: u32) -> u32 {
    if page_size == 0 {
        return 0;
    }
    count.div_ceil(page_size)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageCursor {
    current_page: u32,
    page_size: u32,
}

impl PageCursor {
    /// Page numbers are 1-based; 0 is clamped to 1.
    #[must_use]
    pub fn new(current_page: u32, page_size: u32) -> Self {
        Self {
            current_page: current_page.max(1),
            page_size,
        }
    }

    #[must_use]
    pub const fn current_page(self) -> u32 {
        self.current_page
    }

    #[must_use]
    pub const fn page_size(self) -> u32 {
        self.page_size
    }

    #[must_use]
    pub fn offset(self) -> u32 {
        self.current_page
            .saturating_sub(1)
            .saturating_mul(self.page_size)
    }

    #[must_use]
    pub fn with_page(self, page: u32) -> Self {
        Self::new(page, self.page_size)
    }

    #[must_use]
    pub fn request_key(self) -> RequestKey {
        RequestKey::list(ListMode::Paged, self.page_size, self.offset())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "page", rename_all = "snake_case")]
pub enum PageMarker {
    Page(u32),
    Gap,
}

/// Page buttons to render around `current`: every page when they fit,
/// otherwise the first and last page with a window near the current one and
/// gaps in between.
#[must_use]
pub fn page_window(current: u32, total: u32) -> Vec<PageMarker> {
    if total <= MAX_VISIBLE_PAGES {
        return (1..=total).map(PageMarker::Page).collect();
    }

    let mut markers = Vec::with_capacity(7);
    if current <= 3 {
        markers.extend((1..=4).map(PageMarker::Page));
        markers.push(PageMarker::Gap);
        markers.push(PageMarker::Page(total));
    } else if current >= total - 2 {
        markers.push(PageMarker::Page(1));
        markers.push(PageMarker::Gap);
        markers.extend((total - 3..=total).map(PageMarker::Page));
    } else {
        markers.push(PageMarker::Page(1));
        markers.push(PageMarker::Gap);
        markers.extend((current - 1..=current + 1).map(PageMarker::Page));
        markers.push(PageMarker::Gap);
        markers.push(PageMarker::Page(total));
    }
    markers
}

/// Paged mode: one page on screen, no history.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PagedList {
    cursor: PageCursor,
    page: Option<ListPage>,
    known_count: Option<u32>,
    state: LoadState,
}

impl PagedList {
    #[must_use]
    pub fn new(page_size: u32) -> Self {
        Self {
            cursor: PageCursor::new(1, page_size),
            page: None,
            known_count: None,
            state: LoadState::Idle,
        }
    }

    #[must_use]
    pub fn cursor(&self) -> PageCursor {
        self.cursor
    }

    #[must_use]
    pub fn page(&self) -> Option<&ListPage> {
        self.page.as_ref()
    }

    #[must_use]
    pub fn state(&self) -> &LoadState {
        &self.state
    }

    #[must_use]
    pub fn known_count(&self) -> Option<u32> {
        self.known_count
    }

    /// Navigable page count: at least 1 so that page 1 is always reachable.
    #[must_use]
    pub fn total_pages(&self) -> u32 {
        self.known_count
            .map_or(1, |count| total_pages(count, self.cursor.page_size()))
            .max(1)
    }

    #[must_use]
    pub fn can_go_to(&self, page: u32) -> bool {
        (1..=self.total_pages()).contains(&page)
    }

    /// Moves to `page` and returns the key to fetch. `None` when the page is
    /// out of bounds or already loading/loaded.
    pub fn go_to(&mut self, page: u32) -> Option<RequestKey> {
        if !self.can_go_to(page) {
            return None;
        }
        if page == self.cursor.current_page()
            && matches!(self.state, LoadState::Loading | LoadState::Loaded)
        {
            return None;
        }
        self.cursor = self.cursor.with_page(page);
        Some(self.begin())
    }

    /// Enters `Loading` for the current cursor and returns its key.
    pub fn begin(&mut self) -> RequestKey {
        self.page = None;
        self.state = LoadState::Loading;
        self.cursor.request_key()
    }

    #[must_use]
    pub fn wanted(&self) -> Option<RequestKey> {
        self.state.is_loading().then(|| self.cursor.request_key())
    }

    pub fn accept(&mut self, page: ListPage) {
        self.known_count = Some(page.count);
        self.page = Some(page);
        self.state = LoadState::Loaded;
    }

    pub fn fail(&mut self, error: FetchError) {
        self.state = LoadState::Failed(error);
    }
}

/// Append-only, de-duplicated list of items in first-seen order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AccumulatedList {
    items: Vec<ListItem>,
    seen: HashSet<String>,
}

impl AccumulatedList {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn items(&self) -> &[ListItem] {
        &self.items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn contains(&self, url: &str) -> bool {
        self.seen.contains(url)
    }

    /// `(accumulated, page) -> accumulated`: appends the page's items whose
    /// reference URL has not been seen, in arrival order.
    #[must_use]
    pub fn merged(mut self, page: &ListPage) -> Self {
        self.extend_from_page(page);
        self
    }

    /// In-place form of [`Self::merged`]. Returns how many items were appended.
    pub fn extend_from_page(&mut self, page: &ListPage) -> usize {
        let before = self.items.len();
        for item in page.items() {
            if self.seen.insert(item.url.clone()) {
                self.items.push(item.clone());
            }
        }
        self.items.len() - before
    }
}

/// Accumulating (infinite-scroll) mode.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScrollList {
    batch_size: u32,
    offset: u32,
    list: AccumulatedList,
    has_more: bool,
    total_count: Option<u32>,
    state: LoadState,
}

impl ScrollList {
    #[must_use]
    pub fn new(batch_size: u32) -> Self {
        Self {
            batch_size,
            offset: 0,
            list: AccumulatedList::new(),
            has_more: false,
            total_count: None,
            state: LoadState::Idle,
        }
    }

    #[must_use]
    pub fn items(&self) -> &[ListItem] {
        self.list.items()
    }

    #[must_use]
    pub fn offset(&self) -> u32 {
        self.offset
    }

    #[must_use]
    pub fn batch_size(&self) -> u32 {
        self.batch_size
    }

    #[must_use]
    pub fn has_more(&self) -> bool {
        self.has_more
    }

    #[must_use]
    pub fn total_count(&self) -> Option<u32> {
        self.total_count
    }

    #[must_use]
    pub fn state(&self) -> &LoadState {
        &self.state
    }

    /// A failure with nothing accumulated yet blocks the whole view; later
    /// failures only affect the load-more affordance.
    #[must_use]
    pub fn is_blocking_failure(&self) -> bool {
        matches!(self.state, LoadState::Failed(_)) && self.list.is_empty()
    }

    #[must_use]
    pub fn can_load_more(&self) -> bool {
        self.has_more && self.state == LoadState::Loaded
    }

    fn key(&self) -> RequestKey {
        RequestKey::list(ListMode::Scroll, self.batch_size, self.offset)
    }

    /// Enters `Loading` for the current offset and returns its key. Used for
    /// the first batch and for retries.
    pub fn begin(&mut self) -> RequestKey {
        self.state = LoadState::Loading;
        self.key()
    }

    /// Advances the offset by one batch. `None` unless the last batch loaded
    /// and reported more to come.
    pub fn load_more(&mut self) -> Option<RequestKey> {
        if !self.can_load_more() {
            return None;
        }
        self.offset = self.offset.saturating_add(self.batch_size);
        Some(self.begin())
    }

    #[must_use]
    pub fn wanted(&self) -> Option<RequestKey> {
        self.state.is_loading().then(|| self.key())
    }

    /// Merges a batch. Returns the number of new items.
    pub fn accept(&mut self, page: &ListPage) -> usize {
        let added = self.list.extend_from_page(page);
        self.has_more = page.has_more();
        self.total_count = Some(page.count);
        self.state = LoadState::Loaded;
        added
    }

    pub fn fail(&mut self, error: FetchError) {
        self.state = LoadState::Failed(error);
    }
}
