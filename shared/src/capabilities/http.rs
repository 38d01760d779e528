use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crux_http::Http;

use crate::event::Event;

pub type HttpCapability = Http<Event>;

pub const MAX_URL_LENGTH: usize = 2048;

const LIST_RESOURCE: &str = "pokemon";

/// A validated API root. Endpoint URLs are derived from it by appending path
/// segments, so a base with or without a trailing slash behaves the same.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseUrl {
    url: Url,
}

impl BaseUrl {
    pub fn new(url: impl AsRef<str>) -> Result<Self, HttpError> {
        Ok(Self {
            url: Self::validate(url.as_ref())?,
        })
    }

    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }

    pub fn host(&self) -> Option<&str> {
        self.url.host_str()
    }

    /// `{base}/pokemon?limit=<limit>&offset=<offset>`
    pub fn list_url(&self, limit: u32, offset: u32) -> Result<String, HttpError> {
        let mut url = self.with_segments(&[LIST_RESOURCE])?;
        url.query_pairs_mut()
            .append_pair("limit", &limit.to_string())
            .append_pair("offset", &offset.to_string());
        Ok(url.into())
    }

    /// `{base}/pokemon/{id_or_name}`, with the identifier percent-encoded as a
    /// single path segment.
    pub fn entry_url(&self, id_or_name: &str) -> Result<String, HttpError> {
        Ok(self.with_segments(&[LIST_RESOURCE, id_or_name])?.into())
    }

    fn with_segments(&self, segments: &[&str]) -> Result<Url, HttpError> {
        let mut url = self.url.clone();
        url.set_query(None);
        url.set_fragment(None);
        {
            let mut path = url.path_segments_mut().map_err(|()| HttpError::InvalidUrl {
                url: Self::truncate_url(self.url.as_str()),
                reason: "URL cannot be used as a base".to_string(),
            })?;
            path.pop_if_empty();
            for segment in segments {
                path.push(segment);
            }
        }
        Ok(url)
    }

    fn validate(url: &str) -> Result<Url, HttpError> {
        if url.is_empty() {
            return Err(HttpError::InvalidUrl {
                url: String::new(),
                reason: "URL cannot be empty".to_string(),
            });
        }

        if url.len() > MAX_URL_LENGTH {
            return Err(HttpError::InvalidUrl {
                url: Self::truncate_url(url),
                reason: format!("URL exceeds maximum length of {MAX_URL_LENGTH} bytes"),
            });
        }

        let parsed = Url::parse(url).map_err(|e| HttpError::InvalidUrl {
            url: Self::truncate_url(url),
            reason: e.to_string(),
        })?;

        let scheme = parsed.scheme().to_lowercase();
        if scheme != "http" && scheme != "https" {
            return Err(HttpError::InvalidUrl {
                url: Self::truncate_url(url),
                reason: format!("invalid scheme '{scheme}', only 'http' and 'https' are allowed"),
            });
        }

        if parsed.host_str().is_none() {
            return Err(HttpError::InvalidUrl {
                url: Self::truncate_url(url),
                reason: "URL must have a host".to_string(),
            });
        }

        if !parsed.username().is_empty() || parsed.password().is_some() {
            return Err(HttpError::InvalidUrl {
                url: Self::truncate_url(url),
                reason: "credentials in URL are not allowed".to_string(),
            });
        }

        Ok(parsed)
    }

    fn truncate_url(url: &str) -> String {
        if url.len() <= 100 {
            url.to_string()
        } else {
            let cut = (0..=100).rev().find(|i| url.is_char_boundary(*i)).unwrap_or(0);
            format!("{}...", &url[..cut])
        }
    }
}

#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum HttpError {
    #[error("invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("transport failure: {message}")]
    Transport { message: String },

    #[error("unexpected status {code}")]
    Status { code: u16 },

    #[error("response had no body")]
    EmptyBody,
}

/// Collapses a shell-resolved HTTP exchange into its body or the reason it
/// has none. Any non-2xx status counts as a failure.
pub fn settle<T>(result: crux_http::Result<crux_http::Response<T>>) -> Result<T, HttpError> {
    match result {
        Ok(mut response) => {
            let status = response.status();
            if !status.is_success() {
                return Err(HttpError::Status {
                    code: u16::from(status),
                });
            }
            response.take_body().ok_or(HttpError::EmptyBody)
        }
        Err(e) => Err(HttpError::Transport {
            message: e.to_string(),
        }),
    }
}
