//! Network access for `curl`, `wget` and `api`.
//!
//! No HTTP client ships with the crate: the embedder injects a [`FetchFn`]
//! and everything here layers timeouts, redirect handling and error
//! normalisation on top of it.

pub mod fetch;
pub mod mirror;
pub mod types;
pub mod url;

pub use fetch::{fetch_with_timeout, FetchOptions};
pub use mirror::{mirror, MirrorOptions, MirrorReport};
pub use types::{status_text, FetchFn, FetchResponse, HttpMethod, NetworkError};
pub use url::{download_file_name, normalize_url, parse_url, ParsedUrl};
