use tracing::{debug, info, instrument, warn};

use crate::accumulator::{PagedList, ScrollList};
use crate::api::FetchError;
use crate::capabilities::Capabilities;
use crate::catalog::EntryKey;
use crate::event::Event;
use crate::model::{Clock, DetailScreen, Model, Screen};
use crate::orchestrator::{Payload, RequestKey, Settlement, Ticket};
use crate::view::ViewModel;
use crate::UnixTimeMs;

#[derive(Default)]
pub struct App;

impl App {
    /// Routes `key` through the request cache: serves a fresh result
    /// synchronously, joins an in-flight request, or issues a new one.
    /// `force` bypasses freshness (user retry).
    #[instrument(skip(model, caps), level = "debug")]
    fn dispatch(model: &mut Model, caps: &Capabilities, key: RequestKey, force: bool) {
        if !force {
            let now = model.now();
            let window = key.stale_after_ms(&model.config);
            if let Some(payload) = model.requests.fresh(&key, now, window) {
                debug!("serving fresh cached result");
                model.screen.apply(&key, Ok(payload));
                return;
            }
        }

        match model.requests.begin(&key) {
            Some(ticket) => Self::send(model, caps, ticket),
            None => debug!("joining in-flight request"),
        }
    }

    fn send(model: &mut Model, caps: &Capabilities, ticket: Ticket) {
        let issued = model.api().and_then(|api| match &ticket.key {
            RequestKey::List { limit, offset, .. } => {
                let pending = ticket.clone();
                api.list_items(&caps.http, *limit, *offset, move |result| {
                    Event::ListFetched {
                        ticket: pending,
                        result: Box::new(result),
                    }
                })
            }
            RequestKey::Entry { key } => {
                let pending = ticket.clone();
                api.get_entry(&caps.http, key, move |result| Event::EntryFetched {
                    ticket: pending,
                    result: Box::new(result),
                })
            }
        });

        if let Err(error) = issued {
            warn!(%error, key = ?ticket.key, "could not issue request");
            let failure = Self::failure_for(&ticket.key);
            Self::on_fetched(model, caps, &ticket, Err(failure));
        }
    }

    fn failure_for(key: &RequestKey) -> FetchError {
        match key {
            RequestKey::List { .. } => FetchError::list(),
            RequestKey::Entry { key } => FetchError::entry(key),
        }
    }

    fn on_fetched(
        model: &mut Model,
        caps: &Capabilities,
        ticket: &Ticket,
        result: Result<Payload, FetchError>,
    ) {
        let now = model.now();
        match model.requests.settle(ticket, result, now) {
            Settlement::Stored(payload) => Self::apply(model, caps, &ticket.key, Ok(payload)),
            Settlement::Failed(error) => Self::apply(model, caps, &ticket.key, Err(error)),
            Settlement::Retry(next) => {
                info!(key = ?next.key, attempt = next.attempt, "reissuing request");
                Self::send(model, caps, next);
            }
            Settlement::Ignored => {}
        }
    }

    fn apply(
        model: &mut Model,
        caps: &Capabilities,
        key: &RequestKey,
        outcome: Result<Payload, FetchError>,
    ) {
        if model.screen.apply(key, outcome) {
            caps.render.render();
        } else {
            debug!(?key, "result not wanted by the current screen");
        }
    }

    fn go_to_page(model: &mut Model, caps: &Capabilities, target: impl FnOnce(u32) -> u32) {
        let Screen::Paged(list) = &mut model.screen else {
            debug!("page change outside the paged list");
            return;
        };
        let page = target(list.cursor().current_page());
        match list.go_to(page) {
            Some(key) => {
                Self::dispatch(model, caps, key, false);
                caps.render.render();
            }
            None => debug!(page, "page change ignored"),
        }
    }
}

impl crux_core::App for App {
    type Event = Event;
    type Model = Model;
    type ViewModel = ViewModel;
    type Capabilities = Capabilities;

    fn update(&self, event: Event, model: &mut Model, caps: &Capabilities) {
        debug!(
            event = event.name(),
            user_initiated = event.is_user_initiated(),
            "update"
        );

        match event {
            Event::OpenPagedList => {
                let mut list = PagedList::new(model.config.page_size);
                let key = list.begin();
                model.screen = Screen::Paged(list);
                Self::dispatch(model, caps, key, false);
                caps.render.render();
            }

            Event::PageRequested { page } => Self::go_to_page(model, caps, |_| page),
            Event::NextPage => Self::go_to_page(model, caps, |current| current.saturating_add(1)),
            Event::PreviousPage => {
                Self::go_to_page(model, caps, |current| current.saturating_sub(1));
            }

            Event::OpenInfiniteScroll => {
                let mut list = ScrollList::new(model.config.batch_size);
                let key = list.begin();
                model.screen = Screen::Scroll(list);
                Self::dispatch(model, caps, key, false);
                caps.render.render();
            }

            Event::LoadMoreRequested => {
                let Screen::Scroll(list) = &mut model.screen else {
                    debug!("load more outside the scroll list");
                    return;
                };
                if let Some(key) = list.load_more() {
                    Self::dispatch(model, caps, key, false);
                    caps.render.render();
                }
            }

            Event::OpenEntry { key } => {
                let mut detail = DetailScreen::new(EntryKey::new(key));
                let wanted = detail.begin();
                model.screen = Screen::Detail(detail);
                if let Some(key) = wanted {
                    Self::dispatch(model, caps, key, false);
                }
                caps.render.render();
            }

            Event::RetryRequested => match model.screen.retry() {
                Some(key) => {
                    Self::dispatch(model, caps, key, true);
                    caps.render.render();
                }
                None => debug!("nothing to retry"),
            },

            Event::ClockTicked { now_ms } => {
                model.clock = Clock::Manual(UnixTimeMs(now_ms));
            }

            Event::Configure(config) => match config.validate() {
                Ok(()) => {
                    model.reconfigure(*config);
                    info!(
                        generation = model.requests.generation(),
                        "configuration applied"
                    );
                    caps.render.render();
                }
                Err(error) => warn!(%error, "rejecting configuration"),
            },

            Event::ListFetched { ticket, result } => {
                Self::on_fetched(model, caps, &ticket, (*result).map(Payload::List));
            }

            Event::EntryFetched { ticket, result } => {
                let result = (*result).map(|entry| Payload::Entry(Box::new(entry)));
                Self::on_fetched(model, caps, &ticket, result);
            }
        }
    }

    fn view(&self, model: &Model) -> ViewModel {
        ViewModel::from_model(model)
    }
}
