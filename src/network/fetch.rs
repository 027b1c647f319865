// src/network/fetch.rs

use std::collections::HashMap;
use std::time::Duration;

use super::types::{status_text, FetchFn, FetchResponse, HttpMethod, NetworkError};

const DEFAULT_MAX_REDIRECTS: usize = 20;
const REDIRECT_CODES: &[u16] = &[301, 302, 303, 307, 308];

/// Options for a single request
#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub method: HttpMethod,
    pub headers: HashMap<String, String>,
    pub body: Option<String>,
    pub timeout: Duration,
    pub follow_redirects: bool,
    /// Return non-2xx responses instead of failing with `HttpError`.
    pub allow_error_status: bool,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            method: HttpMethod::Get,
            headers: HashMap::new(),
            body: None,
            timeout: Duration::from_secs(30),
            follow_redirects: true,
            allow_error_status: false,
        }
    }
}

/// Perform one request through `fetch_fn`, bounded by `options.timeout`
/// per hop, following redirects.
pub async fn fetch_with_timeout(
    fetch_fn: &FetchFn,
    url: &str,
    options: &FetchOptions,
) -> Result<FetchResponse, NetworkError> {
    let mut current_url = url.to_string();
    let mut redirect_count = 0;
    let mut method = options.method;

    loop {
        let body = if method.allows_body() { options.body.clone() } else { None };
        let request = fetch_fn(
            current_url.clone(),
            method.as_str().to_string(),
            options.headers.clone(),
            body,
        );
        let response = match tokio::time::timeout(options.timeout, request).await {
            Err(_) => {
                log::warn!("request to {} timed out", current_url);
                return Err(NetworkError::RequestTimeout {
                    url: current_url,
                    timeout_ms: options.timeout.as_millis() as u64,
                });
            }
            Ok(Err(message)) => {
                log::warn!("request to {} failed: {}", current_url, message);
                return Err(NetworkError::HostUnreachable { url: current_url, message });
            }
            Ok(Ok(response)) => response,
        };

        if options.follow_redirects && REDIRECT_CODES.contains(&response.status) {
            if let Some(location) = response.header("location") {
                redirect_count += 1;
                if redirect_count > DEFAULT_MAX_REDIRECTS {
                    return Err(NetworkError::TooManyRedirects { max: DEFAULT_MAX_REDIRECTS });
                }
                current_url = resolve_redirect_url(&current_url, location);
                if response.status == 303 {
                    method = HttpMethod::Get;
                }
                log::debug!("following redirect to {}", current_url);
                continue;
            }
        }

        if !response.is_success() && !options.allow_error_status {
            log::warn!("request to {} returned HTTP {}", current_url, response.status);
            return Err(NetworkError::HttpError {
                status: response.status,
                status_text: status_text(response.status).to_string(),
                url: current_url,
            });
        }
        return Ok(response);
    }
}

/// Resolve a redirect location (may be relative) against the current URL.
fn resolve_redirect_url(base_url: &str, location: &str) -> String {
    if location.starts_with("http://") || location.starts_with("https://") {
        return location.to_string();
    }
    match super::url::parse_url(base_url) {
        Ok(base) => super::url::resolve_link(&base, location).unwrap_or_else(|| location.to_string()),
        Err(_) => location.to_string(),
    }
}
