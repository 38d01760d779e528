use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::capabilities::{BaseUrl, HttpError};
use crate::{
    DEFAULT_ARTWORK_BASE_URL, DEFAULT_BASE_URL, DEFAULT_BATCH_SIZE, DEFAULT_CACHE_CAPACITY,
    DEFAULT_MAX_RETRIES, DEFAULT_PAGE_SIZE, DETAIL_STALE_AFTER_MS, LIST_STALE_AFTER_MS,
    MAX_PAGE_SIZE,
};

/// Why a configuration was rejected. Serializable so a shell can show it.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{field} must be > 0")]
    Zero { field: String },

    #[error("{field} must be <= {max}, got {value}")]
    TooLarge {
        field: String,
        value: u32,
        max: u32,
    },

    #[error("invalid base url: {0}")]
    BaseUrl(#[from] HttpError),
}

/// Tunables for the catalog core. Every field has a default, so a shell can
/// send a partial document and override only what it cares about.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub base_url: String,
    pub artwork_base_url: String,
    pub page_size: u32,
    pub batch_size: u32,
    pub list_stale_after_ms: u64,
    pub detail_stale_after_ms: u64,
    pub max_retries: u32,
    pub cache_capacity: usize,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            artwork_base_url: DEFAULT_ARTWORK_BASE_URL.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            batch_size: DEFAULT_BATCH_SIZE,
            list_stale_after_ms: LIST_STALE_AFTER_MS,
            detail_stale_after_ms: DETAIL_STALE_AFTER_MS,
            max_retries: DEFAULT_MAX_RETRIES,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

impl CatalogConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        Self::check_size("page_size", self.page_size)?;
        Self::check_size("batch_size", self.batch_size)?;
        if self.cache_capacity == 0 {
            return Err(ConfigError::Zero {
                field: "cache_capacity".to_string(),
            });
        }
        self.base_url()?;
        Ok(())
    }

    pub fn base_url(&self) -> Result<BaseUrl, ConfigError> {
        Ok(BaseUrl::new(&self.base_url)?)
    }

    fn check_size(field: &str, value: u32) -> Result<(), ConfigError> {
        if value == 0 {
            return Err(ConfigError::Zero {
                field: field.to_string(),
            });
        }
        if value > MAX_PAGE_SIZE {
            return Err(ConfigError::TooLarge {
                field: field.to_string(),
                value,
                max: MAX_PAGE_SIZE,
            });
        }
        Ok(())
    }
}
