use serde::{Deserialize, Serialize};

use crate::accumulator::{LoadState, PagedList, ScrollList};
use crate::api::{CatalogApi, FetchError};
use crate::capabilities::{BaseUrl, HttpError};
use crate::catalog::{Entry, EntryKey};
use crate::config::CatalogConfig;
use crate::orchestrator::{Payload, RequestCache, RequestKey};
use crate::UnixTimeMs;

/// Source of "now" for freshness checks. Starts on the system clock and
/// switches to a shell-driven clock on the first `ClockTicked`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Clock {
    /// Reads 0 on wasm32, which has no system clock. Web shells must send
    /// `ClockTicked` before relying on freshness.
    #[default]
    System,
    Manual(UnixTimeMs),
}

impl Clock {
    #[must_use]
    pub fn now(self) -> UnixTimeMs {
        match self {
            Self::System => UnixTimeMs::now(),
            Self::Manual(now) => now,
        }
    }
}

/// Detail screen for one entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DetailScreen {
    key: EntryKey,
    entry: Option<Box<Entry>>,
    state: LoadState,
}

impl DetailScreen {
    #[must_use]
    pub fn new(key: EntryKey) -> Self {
        Self {
            key,
            entry: None,
            state: LoadState::Idle,
        }
    }

    #[must_use]
    pub fn key(&self) -> &EntryKey {
        &self.key
    }

    #[must_use]
    pub fn entry(&self) -> Option<&Entry> {
        self.entry.as_deref()
    }

    #[must_use]
    pub fn state(&self) -> &LoadState {
        &self.state
    }

    /// Enters `Loading` and returns the key to fetch. An empty key never
    /// loads; the screen stays idle.
    pub fn begin(&mut self) -> Option<RequestKey> {
        if self.key.is_empty() {
            return None;
        }
        self.state = LoadState::Loading;
        Some(RequestKey::entry(self.key.clone()))
    }

    #[must_use]
    pub fn wanted(&self) -> Option<RequestKey> {
        self.state
            .is_loading()
            .then(|| RequestKey::entry(self.key.clone()))
    }

    pub fn accept(&mut self, entry: Box<Entry>) {
        self.entry = Some(entry);
        self.state = LoadState::Loaded;
    }

    pub fn fail(&mut self, error: FetchError) {
        self.entry = None;
        self.state = LoadState::Failed(error);
    }
}

/// What the user is looking at. Replacing the screen abandons whatever the
/// previous one was waiting for.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Screen {
    #[default]
    Blank,
    Paged(PagedList),
    Scroll(ScrollList),
    Detail(DetailScreen),
}

impl Screen {
    /// The request key this screen is waiting on, if any.
    #[must_use]
    pub fn wanted(&self) -> Option<RequestKey> {
        match self {
            Self::Blank => None,
            Self::Paged(list) => list.wanted(),
            Self::Scroll(list) => list.wanted(),
            Self::Detail(detail) => detail.wanted(),
        }
    }

    /// Applies a settled outcome. Returns `false` without touching state when
    /// the screen is not waiting for exactly `key`.
    pub fn apply(&mut self, key: &RequestKey, outcome: Result<Payload, FetchError>) -> bool {
        if self.wanted().as_ref() != Some(key) {
            return false;
        }
        match (self, outcome) {
            (Self::Paged(list), Ok(Payload::List(page))) => list.accept(page),
            (Self::Scroll(list), Ok(Payload::List(page))) => {
                list.accept(&page);
            }
            (Self::Detail(detail), Ok(Payload::Entry(entry))) => detail.accept(entry),
            (Self::Paged(list), Err(error)) => list.fail(error),
            (Self::Scroll(list), Err(error)) => list.fail(error),
            (Self::Detail(detail), Err(error)) => detail.fail(error),
            _ => return false,
        }
        true
    }

    /// Re-enters `Loading` for the failed request and returns its key.
    /// `None` unless the screen is currently showing a failure.
    pub fn retry(&mut self) -> Option<RequestKey> {
        match self {
            Self::Paged(list) if list.state().error().is_some() => Some(list.begin()),
            Self::Scroll(list) if list.state().error().is_some() => Some(list.begin()),
            Self::Detail(detail) if detail.state().error().is_some() => detail.begin(),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct Model {
    pub config: CatalogConfig,
    pub requests: RequestCache,
    pub screen: Screen,
    pub clock: Clock,
}

impl Model {
    /// Fresh model for a validated config; the request cache starts empty.
    #[must_use]
    pub fn with_config(config: CatalogConfig) -> Self {
        Self {
            requests: RequestCache::from_config(&config),
            config,
            screen: Screen::Blank,
            clock: Clock::System,
        }
    }

    /// Swaps in a validated config, keeping only the clock. The new cache is
    /// one generation ahead, so responses to requests issued under the old
    /// config are dropped on arrival.
    pub fn reconfigure(&mut self, config: CatalogConfig) {
        let generation = self.requests.generation().wrapping_add(1);
        let clock = self.clock;
        *self = Self::with_config(config);
        self.requests.set_generation(generation);
        self.clock = clock;
    }

    /// Client for the configured base URL.
    pub fn api(&self) -> Result<CatalogApi, HttpError> {
        Ok(CatalogApi::new(BaseUrl::new(&self.config.base_url)?))
    }

    #[must_use]
    pub fn now(&self) -> UnixTimeMs {
        self.clock.now()
    }
}
