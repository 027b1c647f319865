use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use thiserror::Error;

/// HTTP response handed back by the injected transport
#[derive(Debug, Clone)]
pub struct FetchResponse {
    pub status: u16,
    pub headers: HashMap<String, String>,
    pub body: String,
    pub url: String,
}

impl FetchResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn is_html(&self) -> bool {
        self.header("content-type")
            .map(|ct| ct.contains("text/html"))
            .unwrap_or_else(|| {
                let head = self.body.trim_start().get(..64).unwrap_or("").to_ascii_lowercase();
                head.starts_with("<!doctype html") || head.starts_with("<html")
            })
    }
}

/// Callback performing one HTTP request.
/// Parameters: url, method, headers, body
pub type FetchFn = Arc<
    dyn Fn(String, String, HashMap<String, String>, Option<String>)
            -> Pin<Box<dyn Future<Output = Result<FetchResponse, String>> + Send>>
        + Send
        + Sync,
>;

/// HTTP methods accepted by `curl -X` and `api`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Head,
    Post,
    Put,
    Delete,
    Patch,
    Options,
}

impl HttpMethod {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "GET" => Some(Self::Get),
            "HEAD" => Some(Self::Head),
            "POST" => Some(Self::Post),
            "PUT" => Some(Self::Put),
            "DELETE" => Some(Self::Delete),
            "PATCH" => Some(Self::Patch),
            "OPTIONS" => Some(Self::Options),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Head => "HEAD",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
            Self::Patch => "PATCH",
            Self::Options => "OPTIONS",
        }
    }

    pub fn allows_body(&self) -> bool {
        !matches!(self, Self::Get | Self::Head | Self::Options)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum NetworkError {
    #[error("request to {url} timed out after {timeout_ms}ms")]
    RequestTimeout { url: String, timeout_ms: u64 },

    #[error("HTTP {status} {status_text}: {url}")]
    HttpError {
        status: u16,
        status_text: String,
        url: String,
    },

    #[error("could not reach {url}: {message}")]
    HostUnreachable { url: String, message: String },

    #[error("invalid URL: {url}")]
    InvalidUrl { url: String },

    #[error("network access is not configured")]
    NotConfigured,

    #[error("too many redirects (max: {max})")]
    TooManyRedirects { max: usize },
}

pub fn status_text(status: u16) -> &'static str {
    match status {
        200 => "OK",
        201 => "Created",
        202 => "Accepted",
        204 => "No Content",
        301 => "Moved Permanently",
        302 => "Found",
        303 => "See Other",
        304 => "Not Modified",
        307 => "Temporary Redirect",
        308 => "Permanent Redirect",
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        405 => "Method Not Allowed",
        409 => "Conflict",
        429 => "Too Many Requests",
        500 => "Internal Server Error",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        504 => "Gateway Timeout",
        _ => "Unknown",
    }
}
