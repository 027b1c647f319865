//! Breadth-first site mirroring into the virtual filesystem.

use std::collections::{HashSet, VecDeque};
use std::time::Duration;

use lazy_static::lazy_static;
use regex_lite::Regex;

use super::fetch::{fetch_with_timeout, FetchOptions};
use super::types::{FetchFn, NetworkError};
use super::url::{local_relative_path, parse_url, resolve_link, same_host, ParsedUrl};
use crate::fs::FileSystem;
use crate::utils::{parent_path, path_join};

lazy_static! {
    static ref LINK_ATTR: Regex =
        Regex::new(r#"(?i)\b(href|src|data-src)\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s>"']+))"#).unwrap();
}

#[derive(Debug, Clone)]
pub struct MirrorOptions {
    pub max_files: usize,
    pub max_links_per_page: usize,
    pub crawl_delay: Duration,
    pub timeout: Duration,
    /// Only follow links below the start URL's directory.
    pub no_parent: bool,
    /// Also queue `src` references (images, scripts, stylesheets).
    pub page_requisites: bool,
}

impl Default for MirrorOptions {
    fn default() -> Self {
        Self {
            max_files: 100,
            max_links_per_page: 20,
            crawl_delay: Duration::from_millis(100),
            timeout: Duration::from_secs(30),
            no_parent: true,
            page_requisites: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MirrorReport {
    /// Absolute paths of saved files, in download order.
    pub saved: Vec<String>,
    /// `(url, reason)` for requests or writes that failed.
    pub failed: Vec<(String, String)>,
}

/// Links found in `html`: `href` values first, then `src` values.
pub fn extract_links(html: &str, include_src: bool) -> Vec<String> {
    let mut hrefs = Vec::new();
    let mut srcs = Vec::new();
    for caps in LINK_ATTR.captures_iter(html) {
        let value = caps
            .get(2)
            .or_else(|| caps.get(3))
            .or_else(|| caps.get(4))
            .map(|m| m.as_str().trim())
            .unwrap_or("");
        if value.is_empty() {
            continue;
        }
        let bucket = if caps[1].eq_ignore_ascii_case("href") { &mut hrefs } else { &mut srcs };
        if !bucket.iter().any(|v: &String| v == value) {
            bucket.push(value.to_string());
        }
    }
    if include_src {
        hrefs.extend(srcs);
    }
    hrefs
}

fn looks_like_page(url: &str) -> bool {
    let last = url.rsplit('/').next().unwrap_or("");
    url.ends_with('/') || last.ends_with(".html") || last.ends_with(".htm") || !last.contains('.')
}

/// Mirror the site at `start_url` below `dest_dir/<host>/`.
pub async fn mirror(
    fs: &dyn FileSystem,
    fetch_fn: &FetchFn,
    start_url: &str,
    dest_dir: &str,
    options: &MirrorOptions,
) -> Result<MirrorReport, NetworkError> {
    let start = parse_url(start_url)?;
    let root_dir = path_join(dest_dir, &[start.hostname()]);
    let scope = start.directory().to_string();
    let fetch_options = FetchOptions { timeout: options.timeout, ..Default::default() };

    let mut report = MirrorReport::default();
    let mut visited: HashSet<String> = HashSet::new();
    let mut queue: VecDeque<String> = VecDeque::from([start.href()]);

    while let Some(current) = queue.pop_front() {
        if report.saved.len() >= options.max_files {
            break;
        }
        if !visited.insert(current.clone()) {
            continue;
        }
        if visited.len() > 1 && !options.crawl_delay.is_zero() {
            tokio::time::sleep(options.crawl_delay).await;
        }
        log::debug!("mirror: fetching {}", current);

        let response = match fetch_with_timeout(fetch_fn, &current, &fetch_options).await {
            Ok(response) => response,
            Err(e) => {
                report.failed.push((current, e.to_string()));
                continue;
            }
        };
        let url = match parse_url(&current) {
            Ok(url) => url,
            Err(e) => {
                report.failed.push((current, e.to_string()));
                continue;
            }
        };

        let local = path_join(&root_dir, &[local_relative_path(&url).as_str()]);
        let saved = match fs.make_directory(&parent_path(&local), true).await {
            Ok(()) => fs.write_file_unsafe(&local, &response.body).await,
            Err(e) => Err(e),
        };
        match saved {
            Ok(()) => report.saved.push(local),
            Err(e) => report.failed.push((current.clone(), e.to_string())),
        }

        if response.is_html() {
            let next = follow_links(&url, &start, &scope, &response.body, options, &visited, &queue);
            queue.extend(next);
        }
    }

    Ok(report)
}

fn follow_links(
    page: &ParsedUrl,
    start: &ParsedUrl,
    scope: &str,
    html: &str,
    options: &MirrorOptions,
    visited: &HashSet<String>,
    queue: &VecDeque<String>,
) -> Vec<String> {
    let mut links: Vec<String> = extract_links(html, options.page_requisites)
        .iter()
        .filter_map(|link| resolve_link(page, link))
        .filter(|link| match parse_url(link) {
            Ok(target) => {
                same_host(&target, start) && (!options.no_parent || target.pathname.starts_with(scope))
            }
            Err(_) => false,
        })
        .filter(|link| !visited.contains(link) && !queue.contains(link))
        .collect();
    links.dedup();
    links.truncate(options.max_links_per_page);
    // pages before assets
    links.sort_by_key(|link| !looks_like_page(link));
    links
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::make_fs;
    use crate::network::FetchResponse;
    use std::collections::HashMap;
    use std::future::Future;
    use std::pin::Pin;
    use std::sync::{Arc, Mutex};

    /// A FetchFn serving fixed pages; unknown URLs are 404s.
    fn site(pages: &[(&str, &str)], log: Arc<Mutex<Vec<String>>>) -> FetchFn {
        let pages: HashMap<String, String> =
            pages.iter().map(|(u, b)| (u.to_string(), b.to_string())).collect();
        Arc::new(move |url: String, _method: String, _headers: HashMap<String, String>, _body: Option<String>| {
            log.lock().unwrap().push(url.clone());
            let found = pages.get(&url).cloned();
            Box::pin(async move {
                let mut headers = HashMap::new();
                match found {
                    Some(body) => {
                        let ct = if url.ends_with(".css") { "text/css" } else { "text/html" };
                        headers.insert("Content-Type".to_string(), ct.to_string());
                        Ok(FetchResponse { status: 200, headers, body, url })
                    }
                    None => Ok(FetchResponse { status: 404, headers, body: String::new(), url }),
                }
            }) as Pin<Box<dyn Future<Output = Result<FetchResponse, String>> + Send>>
        })
    }

    fn fast() -> MirrorOptions {
        MirrorOptions { crawl_delay: Duration::ZERO, ..Default::default() }
    }

    #[test]
    fn test_extract_links() {
        let html = r#"<a href="/a">A</a><A HREF='b.html'>B</a><img src=logo.png><a href="/a">dup</a>"#;
        assert_eq!(extract_links(html, false), vec!["/a", "b.html"]);
        assert_eq!(extract_links(html, true), vec!["/a", "b.html", "logo.png"]);
    }

    #[tokio::test]
    async fn test_mirror_same_host_only() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let fetch = site(
            &[
                (
                    "https://www.example.com/",
                    r#"<a href="/about">about</a><a href="https://example.com/blog/">blog</a>
                       <a href="https://other.org/">ext</a><link href="/main.css">"#,
                ),
                ("https://www.example.com/about", "<p>about</p>"),
                ("https://example.com/blog/", "<p>blog</p>"),
                ("https://www.example.com/main.css", "body{}"),
            ],
            log.clone(),
        );
        let fs = make_fs();
        let report = mirror(fs.as_ref(), &fetch, "https://www.example.com/", "/tmp", &fast())
            .await
            .unwrap();

        assert_eq!(report.saved.len(), 4);
        assert!(report.failed.is_empty());
        assert!(fs.read_file("/tmp/www.example.com/index.html").await.unwrap().contains("about"));
        assert_eq!(fs.read_file("/tmp/www.example.com/blog/index.html").await.unwrap(), "<p>blog</p>");
        assert_eq!(fs.read_file("/tmp/www.example.com/main.css").await.unwrap(), "body{}");
        assert!(!log.lock().unwrap().iter().any(|u| u.contains("other.org")));
    }

    #[tokio::test]
    async fn test_mirror_respects_max_files_and_no_parent() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let fetch = site(
            &[
                ("https://a.dev/docs/", r#"<a href="one">1</a><a href="two">2</a><a href="/outside">x</a>"#),
                ("https://a.dev/docs/one", "1"),
                ("https://a.dev/docs/two", "2"),
                ("https://a.dev/outside", "x"),
            ],
            log.clone(),
        );
        let fs = make_fs();
        let options = MirrorOptions { max_files: 2, ..fast() };
        let report = mirror(fs.as_ref(), &fetch, "https://a.dev/docs/", "/tmp", &options).await.unwrap();
        assert_eq!(report.saved, vec!["/tmp/a.dev/docs/index.html", "/tmp/a.dev/docs/one"]);
        assert!(!log.lock().unwrap().iter().any(|u| u.ends_with("/outside")));
    }

    #[tokio::test]
    async fn test_mirror_records_failures() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let fetch = site(&[("https://a.dev/", r#"<a href="/gone">gone</a>"#)], log);
        let fs = make_fs();
        let report = mirror(fs.as_ref(), &fetch, "https://a.dev/", "/tmp", &fast()).await.unwrap();
        assert_eq!(report.saved.len(), 1);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].0, "https://a.dev/gone");
    }

    #[tokio::test]
    async fn test_mirror_invalid_url() {
        let fetch = site(&[], Arc::new(Mutex::new(Vec::new())));
        let fs = make_fs();
        let result = mirror(fs.as_ref(), &fetch, "not a url", "/tmp", &fast()).await;
        assert!(matches!(result, Err(NetworkError::InvalidUrl { .. })));
    }
}
