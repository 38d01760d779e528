//! Request orchestration: the explicit replacement for an ambient query
//! cache. Every logically distinct fetch has a [`RequestKey`]; the
//! [`RequestCache`] maps it to its status, its last good result and when that
//! result arrived.
//!
//! Rules enforced here:
//! - at most one request per key in flight;
//! - a result younger than its freshness window is served without a round trip;
//! - a failed attempt is retried automatically up to `max_retries` times;
//! - a response whose attempt no longer matches the slot is dropped;
//! - a response issued under an earlier configuration (an older generation)
//!   is dropped before it can touch any slot.

use lru::LruCache;
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use tracing::{debug, info, instrument};

use crate::api::FetchError;
use crate::catalog::{Entry, EntryKey, ListPage};
use crate::config::CatalogConfig;
use crate::{UnixTimeMs, DEFAULT_CACHE_CAPACITY};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListMode {
    Paged,
    Scroll,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RequestKey {
    List {
        mode: ListMode,
        limit: u32,
        offset: u32,
    },
    Entry {
        key: EntryKey,
    },
}

impl RequestKey {
    #[must_use]
    pub fn list(mode: ListMode, limit: u32, offset: u32) -> Self {
        Self::List {
            mode,
            limit,
            offset,
        }
    }

    pub fn entry(key: impl Into<EntryKey>) -> Self {
        Self::Entry { key: key.into() }
    }

    /// How long a successful result for this key stays fresh.
    #[must_use]
    pub fn stale_after_ms(&self, config: &CatalogConfig) -> u64 {
        match self {
            Self::List { .. } => config.list_stale_after_ms,
            Self::Entry { .. } => config.detail_stale_after_ms,
        }
    }
}

/// Identifies one attempt at fetching a key. Attempt 0 is the first try.
/// `generation` is the cache generation the request was issued under.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    pub key: RequestKey,
    pub attempt: u32,
    pub generation: u64,
}

impl Ticket {
    #[must_use]
    pub fn first(key: RequestKey, generation: u64) -> Self {
        Self {
            key,
            attempt: 0,
            generation,
        }
    }

    #[must_use]
    fn next_attempt(&self) -> Self {
        Self {
            key: self.key.clone(),
            attempt: self.attempt + 1,
            generation: self.generation,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Payload {
    List(ListPage),
    Entry(Box<Entry>),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestStatus {
    InFlight,
    Succeeded,
    Failed(FetchError),
}

#[derive(Clone, Debug)]
struct Slot {
    status: RequestStatus,
    attempt: u32,
    last_success: Option<(Payload, UnixTimeMs)>,
}

impl Slot {
    fn in_flight() -> Self {
        Self {
            status: RequestStatus::InFlight,
            attempt: 0,
            last_success: None,
        }
    }
}

/// Outcome of [`RequestCache::settle`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Settlement {
    /// Fresh result stored; apply it to whoever is waiting on the key.
    Stored(Payload),
    /// Attempt failed but the budget allows another; issue this ticket.
    Retry(Ticket),
    /// Final failure for this round of attempts.
    Failed(FetchError),
    /// Superseded response; nothing to do.
    Ignored,
}

#[derive(Clone, Debug)]
pub struct RequestCache {
    slots: LruCache<RequestKey, Slot>,
    max_retries: u32,
    generation: u64,
}

impl Default for RequestCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY, crate::DEFAULT_MAX_RETRIES)
    }
}

impl RequestCache {
    #[must_use]
    pub fn new(capacity: usize, max_retries: u32) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            slots: LruCache::new(capacity),
            max_retries,
            generation: 0,
        }
    }

    #[must_use]
    pub fn from_config(config: &CatalogConfig) -> Self {
        Self::new(config.cache_capacity, config.max_retries)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Tickets issued before this call no longer settle anything.
    pub fn set_generation(&mut self, generation: u64) {
        self.generation = generation;
    }

    #[must_use]
    pub fn status(&self, key: &RequestKey) -> Option<&RequestStatus> {
        self.slots.peek(key).map(|slot| &slot.status)
    }

    #[must_use]
    pub fn is_in_flight(&self, key: &RequestKey) -> bool {
        matches!(self.status(key), Some(RequestStatus::InFlight))
    }

    /// Last good result for `key` if it arrived less than `stale_after_ms` ago.
    pub fn fresh(&mut self, key: &RequestKey, now: UnixTimeMs, stale_after_ms: u64) -> Option<Payload> {
        let slot = self.slots.get(key)?;
        let (payload, fetched_at) = slot.last_success.as_ref()?;
        (now.elapsed_since(*fetched_at) < stale_after_ms).then(|| payload.clone())
    }

    /// Marks `key` in flight and returns the ticket for its first attempt.
    /// `None` if a request for the key is already outstanding.
    #[instrument(skip(self), level = "debug")]
    pub fn begin(&mut self, key: &RequestKey) -> Option<Ticket> {
        match self.slots.get_mut(key) {
            Some(slot) if slot.status == RequestStatus::InFlight => {
                debug!("request already in flight");
                None
            }
            Some(slot) => {
                slot.status = RequestStatus::InFlight;
                slot.attempt = 0;
                Some(Ticket::first(key.clone(), self.generation))
            }
            None => {
                self.slots.put(key.clone(), Slot::in_flight());
                Some(Ticket::first(key.clone(), self.generation))
            }
        }
    }

    /// Records the outcome of one attempt.
    #[instrument(
        skip(self, result),
        fields(key = ?ticket.key, attempt = ticket.attempt, generation = ticket.generation),
        level = "debug"
    )]
    pub fn settle(
        &mut self,
        ticket: &Ticket,
        result: Result<Payload, FetchError>,
        now: UnixTimeMs,
    ) -> Settlement {
        if ticket.generation != self.generation {
            debug!(current = self.generation, "dropping response from an earlier generation");
            return Settlement::Ignored;
        }

        let Some(slot) = self.slots.get_mut(&ticket.key) else {
            // Evicted while in flight: keep a good result, report a bad one.
            return match result {
                Ok(payload) => {
                    let mut slot = Slot::in_flight();
                    slot.status = RequestStatus::Succeeded;
                    slot.last_success = Some((payload.clone(), now));
                    self.slots.put(ticket.key.clone(), slot);
                    Settlement::Stored(payload)
                }
                Err(error) => Settlement::Failed(error),
            };
        };

        if slot.status != RequestStatus::InFlight || slot.attempt != ticket.attempt {
            debug!("dropping superseded response");
            return Settlement::Ignored;
        }

        match result {
            Ok(payload) => {
                slot.status = RequestStatus::Succeeded;
                slot.last_success = Some((payload.clone(), now));
                debug!("request succeeded");
                Settlement::Stored(payload)
            }
            Err(error) if ticket.attempt < self.max_retries => {
                let next = ticket.next_attempt();
                slot.attempt = next.attempt;
                info!(%error, next_attempt = next.attempt, "retrying failed request");
                Settlement::Retry(next)
            }
            Err(error) => {
                slot.status = RequestStatus::Failed(error.clone());
                debug!(%error, "request failed, retries exhausted");
                Settlement::Failed(error)
            }
        }
    }
}
