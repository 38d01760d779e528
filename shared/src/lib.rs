// lib.rs - Catalog viewer core

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::too_many_lines)]

pub mod accumulator;
pub mod api;
pub mod app;
pub mod capabilities;
pub mod catalog;
pub mod config;
pub mod event;
pub mod model;
pub mod orchestrator;
pub mod presenter;
pub mod view;

use serde::{Deserialize, Serialize};

pub use app::App;
pub use capabilities::{Capabilities, Effect};
pub use crux_core::{render::Render, App as CruxApp};
pub use event::Event;
pub use model::Model;
pub use view::{ViewModel, ViewState};

pub const DEFAULT_BASE_URL: &str = "https://pokeapi.co/api/v2";
pub const DEFAULT_ARTWORK_BASE_URL: &str =
    "https://raw.githubusercontent.com/PokeAPI/sprites/master/sprites/pokemon/other/official-artwork";
pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const DEFAULT_BATCH_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 100;
pub const LIST_STALE_AFTER_MS: u64 = 5 * 60 * 1000;
pub const DETAIL_STALE_AFTER_MS: u64 = 10 * 60 * 1000;
pub const DEFAULT_MAX_RETRIES: u32 = 2;
pub const DEFAULT_CACHE_CAPACITY: usize = 256;
pub const MAX_VISIBLE_PAGES: u32 = 5;
pub const STAT_CEILING: u32 = 255;

#[must_use]
pub fn get_current_time_ms() -> u64 {
    // wasm32-unknown-unknown has no system clock; web shells drive time via ClockTicked.
    #[cfg(not(target_arch = "wasm32"))]
    {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
            .unwrap_or(0)
    }
    #[cfg(target_arch = "wasm32")]
    {
        0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UnixTimeMs(pub u64);

impl UnixTimeMs {
    #[must_use]
    pub fn now() -> Self {
        Self(get_current_time_ms())
    }

    #[must_use]
    pub const fn as_millis(self) -> u64 {
        self.0
    }

    #[must_use]
    pub fn elapsed_since(self, earlier: Self) -> u64 {
        self.0.saturating_sub(earlier.0)
    }

    #[must_use]
    pub fn add_millis(self, ms: u64) -> Self {
        Self(self.0.saturating_add(ms))
    }
}

impl Default for UnixTimeMs {
    fn default() -> Self {
        Self::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elapsed_saturates_when_clock_goes_backwards() {
        let earlier = UnixTimeMs(5_000);
        let later = UnixTimeMs(4_000);
        assert_eq!(later.elapsed_since(earlier), 0);
        assert_eq!(earlier.elapsed_since(later), 1_000);
    }

    #[test]
    fn add_millis_saturates() {
        assert_eq!(UnixTimeMs(u64::MAX - 1).add_millis(10), UnixTimeMs(u64::MAX));
        assert_eq!(UnixTimeMs(1_000).add_millis(500).as_millis(), 1_500);
    }

    #[test]
    fn stale_windows_match_list_and_detail_policy() {
        assert_eq!(LIST_STALE_AFTER_MS, 300_000);
        assert_eq!(DETAIL_STALE_AFTER_MS, 600_000);
    }
}
