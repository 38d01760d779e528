//! Projection of the model into what a shell renders.

use serde::{Deserialize, Serialize};

use crate::accumulator::{page_window, LoadState, PageMarker, PagedList, ScrollList};
use crate::api::FetchError;
use crate::model::{DetailScreen, Model, Screen};
use crate::presenter::{present_card, present_entry, CardView, EntryView};

pub const ERROR_TITLE: &str = "Something went wrong";
pub const RETRY_EVENT: &str = "retry_requested";

/// State of the "load more" affordance under an accumulated list.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LoadMore {
    Available,
    Loading,
    Exhausted,
    /// A batch failed after items were already shown; the shell renders the
    /// message inline with a retry control in place of the button.
    Failed { message: String },
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ViewState {
    Blank,
    Paged {
        cards: Vec<CardView>,
        skeletons: u32,
        current_page: u32,
        total_pages: u32,
        total_count: u32,
        can_go_previous: bool,
        can_go_next: bool,
        page_numbers: Vec<PageMarker>,
        show_pagination: bool,
    },
    Scroll {
        cards: Vec<CardView>,
        shown: usize,
        total_count: u32,
        skeletons: u32,
        load_more: LoadMore,
        reached_end: bool,
    },
    DetailLoading {
        key: String,
    },
    Detail(Box<EntryView>),
    Error {
        title: String,
        message: String,
        is_retryable: bool,
        retry_event: Option<String>,
    },
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ViewModel {
    pub state: ViewState,
}

impl ViewModel {
    #[must_use]
    pub fn from_model(model: &Model) -> Self {
        let artwork_base = model.config.artwork_base_url.as_str();
        let state = match &model.screen {
            Screen::Blank => ViewState::Blank,
            Screen::Paged(list) => paged(list, artwork_base),
            Screen::Scroll(list) => scroll(list, artwork_base),
            Screen::Detail(detail) => detail_state(detail),
        };
        Self { state }
    }
}

fn error_panel(error: &FetchError) -> ViewState {
    ViewState::Error {
        title: ERROR_TITLE.into(),
        message: error.message().to_string(),
        is_retryable: true,
        retry_event: Some(RETRY_EVENT.into()),
    }
}

fn paged(list: &PagedList, artwork_base: &str) -> ViewState {
    if let Some(error) = list.state().error() {
        return error_panel(error);
    }

    let cursor = list.cursor();
    let current = cursor.current_page();
    let total = list.total_pages();
    let loading = list.state().is_loading();

    ViewState::Paged {
        cards: list
            .page()
            .map(|page| {
                page.items()
                    .iter()
                    .map(|item| present_card(item, artwork_base))
                    .collect()
            })
            .unwrap_or_default(),
        skeletons: if loading { cursor.page_size() } else { 0 },
        current_page: current,
        total_pages: total,
        total_count: list.known_count().unwrap_or(0),
        can_go_previous: current > 1,
        can_go_next: current < total,
        page_numbers: page_window(current, total),
        show_pagination: list.page().is_some(),
    }
}

fn scroll(list: &ScrollList, artwork_base: &str) -> ViewState {
    if list.is_blocking_failure() {
        if let Some(error) = list.state().error() {
            return error_panel(error);
        }
    }

    let loading = list.state().is_loading();
    let load_more = match list.state() {
        LoadState::Loading => LoadMore::Loading,
        LoadState::Failed(error) => LoadMore::Failed {
            message: error.message().to_string(),
        },
        LoadState::Loaded if list.has_more() => LoadMore::Available,
        LoadState::Loaded | LoadState::Idle => LoadMore::Exhausted,
    };

    ViewState::Scroll {
        cards: list
            .items()
            .iter()
            .map(|item| present_card(item, artwork_base))
            .collect(),
        shown: list.items().len(),
        total_count: list.total_count().unwrap_or(0),
        skeletons: if loading { list.batch_size() } else { 0 },
        load_more,
        reached_end: list.state() == &LoadState::Loaded
            && !list.has_more()
            && !list.items().is_empty(),
    }
}

fn detail_state(detail: &DetailScreen) -> ViewState {
    match (detail.state(), detail.entry()) {
        (LoadState::Failed(error), _) => error_panel(error),
        (LoadState::Loading, _) => ViewState::DetailLoading {
            key: detail.key().to_string(),
        },
        (LoadState::Loaded, Some(entry)) => ViewState::Detail(Box::new(present_entry(entry))),
        _ => ViewState::Blank,
    }
}
