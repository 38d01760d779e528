//! Remote data client for the catalog API.
//!
//! Two read operations are supported, "list a range" and "fetch one entry".
//! Each issues exactly one HTTP effect and reports back through the event
//! produced by the caller's closure. The client does no retrying and no
//! caching of its own; the orchestrator owns both.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::capabilities::{settle, BaseUrl, HttpCapability, HttpError};
use crate::catalog::{Entry, EntryKey, ListPage};
use crate::event::Event;

/// The only failure a view ever sees. It carries a human-readable message and
/// nothing else.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
#[error("{message}")]
pub struct FetchError {
    message: String,
}

impl FetchError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn list() -> Self {
        Self::new("Failed to fetch list")
    }

    #[must_use]
    pub fn entry(key: &EntryKey) -> Self {
        Self::new(format!("Failed to fetch entry with id: {key}"))
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogApi {
    base: BaseUrl,
}

impl CatalogApi {
    #[must_use]
    pub fn new(base: BaseUrl) -> Self {
        Self { base }
    }

    #[must_use]
    pub fn base(&self) -> &BaseUrl {
        &self.base
    }

    /// Requests `limit` list items starting at `offset`.
    pub fn list_items<F>(
        &self,
        http: &HttpCapability,
        limit: u32,
        offset: u32,
        make_event: F,
    ) -> Result<(), HttpError>
    where
        F: FnOnce(Result<ListPage, FetchError>) -> Event + Send + 'static,
    {
        let url = self.base.list_url(limit, offset)?;
        debug!(%url, limit, offset, "requesting list range");

        http.get(url)
            .expect_json::<ListPage>()
            .send(move |result| {
                make_event(settle(result).map_err(|error| {
                    debug!(%error, offset, "list request failed");
                    FetchError::list()
                }))
            });
        Ok(())
    }

    /// Requests a single entry by numeric id or name.
    pub fn get_entry<F>(
        &self,
        http: &HttpCapability,
        key: &EntryKey,
        make_event: F,
    ) -> Result<(), HttpError>
    where
        F: FnOnce(Result<Entry, FetchError>) -> Event + Send + 'static,
    {
        let url = self.base.entry_url(key.as_str())?;
        debug!(%url, "requesting entry");

        let failure = FetchError::entry(key);
        http.get(url).expect_json::<Entry>().send(move |result| {
            make_event(settle(result).map_err(|error| {
                debug!(%error, "entry request failed");
                failure
            }))
        });
        Ok(())
    }
}

/// Numeric id carried by the trailing path segment of a reference URL such
/// as `https://pokeapi.co/api/v2/pokemon/25/`. Query and fragment are
/// ignored, as is a single trailing slash. Returns 0 when the segment is not
/// purely numeric or does not fit; never fails.
#[must_use]
pub fn extract_identifier(url: &str) -> u32 {
    let path = url.split(['?', '#']).next().unwrap_or_default();
    let path = path.strip_suffix('/').unwrap_or(path);
    let segment = path.rsplit('/').next().unwrap_or_default();

    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return 0;
    }
    segment.parse().unwrap_or(0)
}
