use serde::{Deserialize, Serialize};

use crate::api::FetchError;
use crate::catalog::{Entry, ListPage};
use crate::config::CatalogConfig;
use crate::orchestrator::Ticket;

// --- Event enum: no None variant, large variants boxed ---

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub enum Event {
    // Paged list
    OpenPagedList,
    PageRequested {
        page: u32,
    },
    NextPage,
    PreviousPage,

    // Infinite scroll
    OpenInfiniteScroll,
    LoadMoreRequested,

    // Detail
    OpenEntry {
        key: String,
    },

    // Shared
    RetryRequested,
    ClockTicked {
        now_ms: u64,
    },
    Configure(Box<CatalogConfig>),

    // Capability responses (boxed to keep enum size small)
    #[serde(skip)]
    ListFetched {
        ticket: Ticket,
        result: Box<Result<ListPage, FetchError>>,
    },
    #[serde(skip)]
    EntryFetched {
        ticket: Ticket,
        result: Box<Result<Entry, FetchError>>,
    },
}

impl Event {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::OpenPagedList => "open_paged_list",
            Self::PageRequested { .. } => "page_requested",
            Self::NextPage => "next_page",
            Self::PreviousPage => "previous_page",
            Self::OpenInfiniteScroll => "open_infinite_scroll",
            Self::LoadMoreRequested => "load_more_requested",
            Self::OpenEntry { .. } => "open_entry",
            Self::RetryRequested => "retry_requested",
            Self::ClockTicked { .. } => "clock_ticked",
            Self::Configure(_) => "configure",
            Self::ListFetched { .. } => "list_fetched",
            Self::EntryFetched { .. } => "entry_fetched",
        }
    }

    #[must_use]
    pub const fn is_user_initiated(&self) -> bool {
        matches!(
            self,
            Self::OpenPagedList
                | Self::PageRequested { .. }
                | Self::NextPage
                | Self::PreviousPage
                | Self::OpenInfiniteScroll
                | Self::LoadMoreRequested
                | Self::OpenEntry { .. }
                | Self::RetryRequested
        )
    }
}
