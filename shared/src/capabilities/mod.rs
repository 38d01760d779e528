mod http;

pub use self::http::{settle, BaseUrl, HttpCapability, HttpError, MAX_URL_LENGTH};

// Render and Http come straight from Crux.
pub use crux_core::render::Render;
pub use crux_http::Http;

use crate::app::App;
use crate::event::Event;

/// Effects the core asks its shell to perform: HTTP round trips against the
/// catalog API and view refreshes.
#[derive(crux_core::macros::Effect)]
pub struct Capabilities {
    pub http: Http<Event>,
    pub render: Render<Event>,
}
