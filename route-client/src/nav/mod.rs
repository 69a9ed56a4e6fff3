//! Address-bar synchronization.

mod browser;
mod url_sync;

pub use browser::Browser;
pub use url_sync::{ParsedPoint, ParsedUrl, UrlSync, parse_url};
