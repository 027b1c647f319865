//! Minimal URL handling for http(s) links found in fetched pages.

use super::types::NetworkError;

/// Parsed URL components
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedUrl {
    pub scheme: String,
    /// host with optional `:port`
    pub authority: String,
    /// path portion, "/" when absent; query and fragment stripped
    pub pathname: String,
    pub query: Option<String>,
}

impl ParsedUrl {
    pub fn origin(&self) -> String {
        format!("{}://{}", self.scheme, self.authority)
    }

    pub fn hostname(&self) -> &str {
        match self.authority.rfind(':') {
            Some(idx) if !self.authority.ends_with(']') => &self.authority[..idx],
            _ => &self.authority,
        }
    }

    /// Full URL without the fragment.
    pub fn href(&self) -> String {
        match &self.query {
            Some(q) => format!("{}{}?{}", self.origin(), self.pathname, q),
            None => format!("{}{}", self.origin(), self.pathname),
        }
    }

    /// Directory part of the path, always ending in `/`.
    pub fn directory(&self) -> &str {
        match self.pathname.rfind('/') {
            Some(idx) => &self.pathname[..=idx],
            None => "/",
        }
    }
}

pub fn parse_url(url: &str) -> Result<ParsedUrl, NetworkError> {
    let invalid = || NetworkError::InvalidUrl { url: url.to_string() };
    let scheme_end = url.find("://").ok_or_else(invalid)?;
    let scheme = url[..scheme_end].to_ascii_lowercase();
    if scheme != "http" && scheme != "https" {
        return Err(invalid());
    }

    let rest = &url[scheme_end + 3..];
    let rest = rest.split('#').next().unwrap_or("");
    let (rest, query) = match rest.split_once('?') {
        Some((before, q)) => (before, Some(q.to_string())),
        None => (rest, None),
    };
    let (authority, pathname) = match rest.find('/') {
        Some(idx) => (&rest[..idx], &rest[idx..]),
        None => (rest, "/"),
    };
    if authority.is_empty() || authority.contains(char::is_whitespace) {
        return Err(invalid());
    }

    Ok(ParsedUrl {
        scheme,
        authority: authority.to_ascii_lowercase(),
        pathname: pathname.to_string(),
        query,
    })
}

/// Prefix `https://` when no scheme is given.
pub fn normalize_url(url: &str) -> String {
    if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!("https://{}", url)
    }
}

fn strip_www(host: &str) -> &str {
    host.strip_prefix("www.").unwrap_or(host)
}

/// Whether two URLs point at the same site, ignoring a leading `www.`.
pub fn same_host(a: &ParsedUrl, b: &ParsedUrl) -> bool {
    strip_www(a.hostname()) == strip_www(b.hostname())
}

/// Resolve a link found on `base` into an absolute URL.
/// Returns None for links that are not fetchable (anchors, mailto:, data:, ...).
pub fn resolve_link(base: &ParsedUrl, link: &str) -> Option<String> {
    let link = link.trim();
    if link.is_empty() || link.starts_with('#') {
        return None;
    }
    let lower = link.to_ascii_lowercase();
    if ["javascript:", "mailto:", "data:", "tel:"].iter().any(|p| lower.starts_with(p)) {
        return None;
    }
    if lower.starts_with("http://") || lower.starts_with("https://") {
        return parse_url(link).ok().map(|u| u.href());
    }
    if let Some(rest) = link.strip_prefix("//") {
        return parse_url(&format!("{}://{}", base.scheme, rest)).ok().map(|u| u.href());
    }
    if link.contains("://") {
        return None;
    }

    let joined = if link.starts_with('/') {
        link.to_string()
    } else {
        format!("{}{}", base.directory(), link)
    };
    let without_fragment = joined.split('#').next().unwrap_or("");
    let (path, query) = match without_fragment.split_once('?') {
        Some((p, q)) => (p, Some(q.to_string())),
        None => (without_fragment, None),
    };

    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }
    let mut pathname = format!("/{}", segments.join("/"));
    if path.ends_with('/') && pathname != "/" {
        pathname.push('/');
    }
    Some(
        ParsedUrl {
            scheme: base.scheme.clone(),
            authority: base.authority.clone(),
            pathname,
            query,
        }
        .href(),
    )
}

/// Path of `url` relative to a mirror root: `/` and `/docs/` become `index.html`.
pub fn local_relative_path(url: &ParsedUrl) -> String {
    let trimmed = url.pathname.trim_start_matches('/');
    if trimmed.is_empty() {
        "index.html".to_string()
    } else if trimmed.ends_with('/') {
        format!("{}index.html", trimmed)
    } else {
        trimmed.to_string()
    }
}

/// File name `wget` saves a single download under.
pub fn download_file_name(url: &ParsedUrl) -> String {
    match url.pathname.rsplit('/').next() {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => "index.html".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> ParsedUrl {
        parse_url("https://www.example.com/docs/guide/intro.html?x=1#top").unwrap()
    }

    #[test]
    fn test_parse_url() {
        let url = base();
        assert_eq!(url.origin(), "https://www.example.com");
        assert_eq!(url.pathname, "/docs/guide/intro.html");
        assert_eq!(url.query.as_deref(), Some("x=1"));
        assert_eq!(url.directory(), "/docs/guide/");
        assert_eq!(parse_url("http://localhost:8080").unwrap().hostname(), "localhost");
        assert!(parse_url("ftp://example.com").is_err());
        assert!(parse_url("example.com").is_err());
    }

    #[test]
    fn test_resolve_link() {
        let base = base();
        assert_eq!(resolve_link(&base, "next.html").as_deref(), Some("https://www.example.com/docs/guide/next.html"));
        assert_eq!(resolve_link(&base, "../api/").as_deref(), Some("https://www.example.com/docs/api/"));
        assert_eq!(resolve_link(&base, "/style.css").as_deref(), Some("https://www.example.com/style.css"));
        assert_eq!(resolve_link(&base, "//cdn.example.com/a.js").as_deref(), Some("https://cdn.example.com/a.js"));
        assert_eq!(resolve_link(&base, "https://other.org/x#frag").as_deref(), Some("https://other.org/x"));
        assert_eq!(resolve_link(&base, "#section"), None);
        assert_eq!(resolve_link(&base, "mailto:me@example.com"), None);
        assert_eq!(resolve_link(&base, "javascript:void(0)"), None);
    }

    #[test]
    fn test_same_host_ignores_www() {
        let a = parse_url("https://www.example.com/").unwrap();
        let b = parse_url("https://example.com/about").unwrap();
        let c = parse_url("https://blog.example.com/").unwrap();
        assert!(same_host(&a, &b));
        assert!(!same_host(&a, &c));
    }

    #[test]
    fn test_local_paths() {
        assert_eq!(local_relative_path(&parse_url("https://a.com").unwrap()), "index.html");
        assert_eq!(local_relative_path(&parse_url("https://a.com/docs/").unwrap()), "docs/index.html");
        assert_eq!(local_relative_path(&parse_url("https://a.com/x/y.css").unwrap()), "x/y.css");
        assert_eq!(download_file_name(&parse_url("https://a.com/f/data.json").unwrap()), "data.json");
        assert_eq!(download_file_name(&parse_url("https://a.com/").unwrap()), "index.html");
        assert_eq!(normalize_url("example.com"), "https://example.com");
    }
}
