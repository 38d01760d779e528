use crux_core::testing::AppTester;
use shared::api::FetchError;
use shared::catalog::{ListItem, ListPage};
use shared::orchestrator::{ListMode, RequestKey, Ticket};
use shared::view::LoadMore;
use shared::{App, Effect, Event, Model, ViewState};

const NEXT: &str = "https://pokeapi.co/api/v2/pokemon?offset=20&limit=20";

fn requested_urls(effects: &[Effect]) -> Vec<String> {
    effects
        .iter()
        .filter_map(|effect| match effect {
            Effect::Http(request) => Some(request.operation.url.clone()),
            _ => None,
        })
        .collect()
}

fn batch(ids: impl IntoIterator<Item = u32>, has_more: bool) -> ListPage {
    ListPage {
        count: 1154,
        next: has_more.then(|| NEXT.to_string()),
        previous: None,
        results: ids
            .into_iter()
            .map(|id| {
                ListItem::new(
                    format!("mon-{id}"),
                    format!("https://pokeapi.co/api/v2/pokemon/{id}/"),
                )
            })
            .collect(),
    }
}

fn fetched(offset: u32, attempt: u32, result: Result<ListPage, FetchError>) -> Event {
    Event::ListFetched {
        ticket: Ticket {
            key: RequestKey::list(ListMode::Scroll, 20, offset),
            attempt,
            generation: 0,
        },
        result: Box::new(result),
    }
}

struct ScrollView {
    names: Vec<String>,
    shown: usize,
    skeletons: u32,
    load_more: LoadMore,
    reached_end: bool,
}

fn scroll_view(app: &AppTester<App, Effect>, model: &Model) -> ScrollView {
    match app.view(model).state {
        ViewState::Scroll {
            cards,
            shown,
            skeletons,
            load_more,
            reached_end,
            ..
        } => ScrollView {
            names: cards.into_iter().map(|card| card.name).collect(),
            shown,
            skeletons,
            load_more,
            reached_end,
        },
        other => panic!("expected scroll view, got {other:?}"),
    }
}

fn opened_with_first_batch() -> (AppTester<App, Effect>, Model) {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();
    let update = app.update(Event::OpenInfiniteScroll, &mut model);
    assert_eq!(
        requested_urls(&update.effects),
        ["https://pokeapi.co/api/v2/pokemon?limit=20&offset=0"]
    );
    assert_eq!(scroll_view(&app, &model).skeletons, 20);

    app.update(fetched(0, 0, Ok(batch(1..=20, true))), &mut model);
    (app, model)
}

#[test]
fn batches_accumulate() {
    let (app, mut model) = opened_with_first_batch();
    let view = scroll_view(&app, &model);
    assert_eq!(view.shown, 20);
    assert_eq!(view.skeletons, 0);
    assert_eq!(view.load_more, LoadMore::Available);

    let update = app.update(Event::LoadMoreRequested, &mut model);
    assert_eq!(
        requested_urls(&update.effects),
        ["https://pokeapi.co/api/v2/pokemon?limit=20&offset=20"]
    );
    let view = scroll_view(&app, &model);
    assert_eq!(view.shown, 20, "existing items stay visible while loading");
    assert_eq!(view.load_more, LoadMore::Loading);

    let update = app.update(Event::LoadMoreRequested, &mut model);
    assert!(requested_urls(&update.effects).is_empty());

    app.update(fetched(20, 0, Ok(batch(21..=40, true))), &mut model);
    let view = scroll_view(&app, &model);
    assert_eq!(view.shown, 40);
    assert_eq!(view.names.first().map(String::as_str), Some("mon-1"));
    assert_eq!(view.names.last().map(String::as_str), Some("mon-40"));
}

#[test]
fn overlapping_batch_appends_only_new_items() {
    let (app, mut model) = opened_with_first_batch();
    app.update(Event::LoadMoreRequested, &mut model);

    // 18, 19, 20 are already shown.
    app.update(fetched(20, 0, Ok(batch(18..=27, true))), &mut model);
    let view = scroll_view(&app, &model);
    assert_eq!(view.shown, 27);
    let unique: std::collections::HashSet<&String> = view.names.iter().collect();
    assert_eq!(unique.len(), view.names.len());
}

#[test]
fn exhausted_list_shows_end_marker() {
    let (app, mut model) = opened_with_first_batch();
    app.update(Event::LoadMoreRequested, &mut model);
    app.update(fetched(20, 0, Ok(batch(21..=25, false))), &mut model);

    let view = scroll_view(&app, &model);
    assert!(view.reached_end);
    assert_eq!(view.load_more, LoadMore::Exhausted);

    let update = app.update(Event::LoadMoreRequested, &mut model);
    assert!(update.effects.is_empty());
}

#[test]
fn partial_failure_keeps_items_and_offers_inline_retry() {
    let (app, mut model) = opened_with_first_batch();
    app.update(Event::LoadMoreRequested, &mut model);
    for attempt in 0..=2 {
        app.update(fetched(20, attempt, Err(FetchError::list())), &mut model);
    }

    let view = scroll_view(&app, &model);
    assert_eq!(view.shown, 20);
    assert_eq!(
        view.load_more,
        LoadMore::Failed {
            message: "Failed to fetch list".into()
        }
    );

    let update = app.update(Event::LoadMoreRequested, &mut model);
    assert!(update.effects.is_empty(), "load more is disabled until retried");

    let update = app.update(Event::RetryRequested, &mut model);
    assert_eq!(
        requested_urls(&update.effects),
        ["https://pokeapi.co/api/v2/pokemon?limit=20&offset=20"]
    );

    app.update(fetched(20, 0, Ok(batch(21..=40, true))), &mut model);
    let view = scroll_view(&app, &model);
    assert_eq!(view.shown, 40);
    assert_eq!(view.load_more, LoadMore::Available);
}

#[test]
fn failure_before_anything_loaded_blocks_the_view() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();
    app.update(Event::OpenInfiniteScroll, &mut model);
    for attempt in 0..=2 {
        app.update(fetched(0, attempt, Err(FetchError::list())), &mut model);
    }

    assert!(matches!(
        app.view(&model).state,
        ViewState::Error {
            is_retryable: true,
            ..
        }
    ));

    app.update(Event::RetryRequested, &mut model);
    app.update(fetched(0, 0, Ok(batch(1..=20, true))), &mut model);
    assert_eq!(scroll_view(&app, &model).shown, 20);
}

#[test]
fn reopening_starts_a_new_session() {
    let (app, mut model) = opened_with_first_batch();
    app.update(Event::LoadMoreRequested, &mut model);
    app.update(fetched(20, 0, Ok(batch(21..=40, true))), &mut model);
    assert_eq!(scroll_view(&app, &model).shown, 40);

    app.update(Event::OpenPagedList, &mut model);
    let update = app.update(Event::OpenInfiniteScroll, &mut model);
    assert!(
        requested_urls(&update.effects).is_empty(),
        "first batch is still fresh"
    );
    assert_eq!(scroll_view(&app, &model).shown, 20);
}
