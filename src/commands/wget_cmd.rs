//! `wget`: single downloads and same-site mirroring into the virtual filesystem.

use async_trait::async_trait;
use chrono::Utc;

use crate::commands::{Command, CommandContext, CommandResult};
use crate::network::{
    download_file_name, fetch_with_timeout, mirror, normalize_url, parse_url, status_text, FetchOptions,
    MirrorOptions, NetworkError,
};
use crate::utils::path_join;

pub struct WgetCommand;

const USAGE: &str = "wget: missing URL\nUsage: wget [options] <URL>\n\nOptions:\n  \
-m, --mirror                    mirror website\n  \
-p, --page-requisites           download page requisites\n  \
-np, --no-parent                don't ascend to parent directory\n  \
-P, --directory <dir>           save files to <dir>\n  \
-n, --max-files <num>           maximum number of files to download (default: 100)";

#[derive(Debug, PartialEq)]
struct WgetOptions {
    mirror: bool,
    page_requisites: bool,
    no_parent: bool,
    directory: Option<String>,
    max_files: Option<usize>,
    url: Option<String>,
}

fn parse_args(args: &[String]) -> Result<WgetOptions, String> {
    let mut opts = WgetOptions {
        mirror: false,
        page_requisites: false,
        no_parent: false,
        directory: None,
        max_files: None,
        url: None,
    };
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-m" | "--mirror" => {
                opts.mirror = true;
                opts.page_requisites = true;
                opts.no_parent = true;
            }
            "-p" | "--page-requisites" => opts.page_requisites = true,
            "-np" | "--no-parent" => opts.no_parent = true,
            "-P" | "--directory" | "--directory-prefix" => {
                opts.directory = Some(iter.next().cloned().ok_or("wget: option '-P' requires an argument")?);
            }
            "-n" | "--max-files" => {
                let value = iter.next().ok_or("wget: option '-n' requires an argument")?;
                match value.parse::<usize>() {
                    Ok(n) if n > 0 => opts.max_files = Some(n),
                    _ => return Err(format!("wget: invalid number of files: '{}'", value)),
                }
            }
            a if a.starts_with("--directory-prefix=") => {
                opts.directory = Some(a["--directory-prefix=".len()..].to_string());
            }
            // -k/--convert-links, -q and the alias's --no-check-certificate
            a if a.starts_with('-') => {}
            _ => {
                if opts.url.is_none() {
                    opts.url = Some(arg.clone());
                }
            }
        }
    }
    Ok(opts)
}

fn mirror_summary(report: &crate::network::MirrorReport) -> String {
    let mut out = format!("Mirror completed successfully!\nDownloaded {} files:", report.saved.len());
    for path in &report.saved {
        out.push_str(&format!("\n  {}", path));
    }
    if !report.failed.is_empty() {
        out.push_str(&format!("\nFailed {} requests:", report.failed.len()));
        for (url, reason) in &report.failed {
            out.push_str(&format!("\n  {} ({})", url, reason));
        }
    }
    out
}

#[async_trait]
impl Command for WgetCommand {
    fn name(&self) -> &'static str {
        "wget"
    }

    fn summary(&self) -> &'static str {
        "download files or mirror a site"
    }

    async fn execute(&self, ctx: CommandContext<'_>) -> CommandResult {
        let opts = match parse_args(&ctx.args) {
            Ok(opts) => opts,
            Err(e) => return CommandResult::error(e),
        };
        let Some(url) = opts.url.as_deref().map(normalize_url) else {
            return CommandResult::error(USAGE);
        };
        let Some(fetch_fn) = ctx.fetch_fn.clone() else {
            return CommandResult::error(NetworkError::NotConfigured.to_string());
        };
        let dest = match ctx.resolve(opts.directory.as_deref().unwrap_or(".")) {
            Ok(p) => p,
            Err(e) => return CommandResult::error(format!("wget: {}", e)),
        };
        let network = &ctx.config.network;

        if opts.mirror {
            let options = MirrorOptions {
                max_files: opts.max_files.unwrap_or(network.max_mirror_files),
                max_links_per_page: network.max_links_per_page,
                crawl_delay: network.crawl_delay(),
                timeout: network.timeout(),
                no_parent: opts.no_parent,
                page_requisites: opts.page_requisites,
            };
            log::info!("wget: mirroring {} into {}", url, dest);
            return match mirror(ctx.fs.as_ref(), &fetch_fn, &url, &dest, &options).await {
                Ok(report) => CommandResult::success(mirror_summary(&report)),
                Err(e) => CommandResult::error(format!("wget: Mirror failed: {}", e)),
            };
        }

        let parsed = match parse_url(&url) {
            Ok(p) => p,
            Err(e) => return CommandResult::error(format!("wget: {}", e)),
        };
        let request = FetchOptions { timeout: network.timeout(), ..Default::default() };
        let response = match fetch_with_timeout(&fetch_fn, &url, &request).await {
            Ok(r) => r,
            Err(e) => return CommandResult::error(format!("wget: {}", e)),
        };

        let final_url = parse_url(&response.url).unwrap_or(parsed);
        let filename = download_file_name(&final_url);
        let path = path_join(&dest, &[filename.as_str()]);
        if let Err(e) = ctx.fs.write_file_unsafe(&path, &response.body).await {
            return CommandResult::error(format!("wget: Failed to save file {}: {}", filename, e));
        }

        let stamp = Utc::now().format("%Y-%m-%d %H:%M:%S");
        let length = response.body.len();
        let content_type = response.header("content-type").unwrap_or("application/octet-stream");
        CommandResult::success(format!(
            "--{stamp}--  {url}\n\
             Resolving {host}... connected.\n\
             HTTP request sent, awaiting response... {status} {text}\n\
             Length: {length} [{content_type}]\n\
             Saving to: '{filename}'\n\n\
             {stamp} - '{filename}' saved [{length}]",
            stamp = stamp,
            url = response.url,
            host = final_url.hostname(),
            status = response.status,
            text = status_text(response.status),
            length = length,
            content_type = content_type,
            filename = filename,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::TestEnv;
    use crate::network::fetch::tests::mock_fetch;
    use crate::network::{FetchFn, FetchResponse};
    use std::collections::HashMap;
    use std::future::Future;
    use std::pin::Pin;
    use std::sync::Arc;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn two_page_site() -> FetchFn {
        Arc::new(|url: String, _m: String, _h: HashMap<String, String>, _b: Option<String>| {
            Box::pin(async move {
                let mut headers = HashMap::new();
                headers.insert("Content-Type".to_string(), "text/html".to_string());
                let body = match url.as_str() {
                    "https://site.test/" => r#"<a href="/about.html">about</a>"#.to_string(),
                    "https://site.test/about.html" => "<p>about</p>".to_string(),
                    _ => return Ok(FetchResponse { status: 404, headers, body: String::new(), url }),
                };
                Ok(FetchResponse { status: 200, headers, body, url })
            }) as Pin<Box<dyn Future<Output = Result<FetchResponse, String>> + Send>>
        })
    }

    #[test]
    fn test_parse_args() {
        let opts = parse_args(&args(&["--no-check-certificate", "-m", "-n", "5", "-P", "site", "a.test"])).unwrap();
        assert!(opts.mirror && opts.no_parent && opts.page_requisites);
        assert_eq!(opts.max_files, Some(5));
        assert_eq!(opts.directory.as_deref(), Some("site"));
        assert_eq!(opts.url.as_deref(), Some("a.test"));
        assert!(parse_args(&args(&["-n", "zero"])).is_err());
        assert!(parse_args(&args(&["-P"])).is_err());
    }

    #[tokio::test]
    async fn test_wget_single_file() {
        let mut env = TestEnv::with_fetch(mock_fetch(200, "{\"ok\":true}"));
        let result = WgetCommand.execute(env.ctx(vec!["https://files.test/data/report.json"])).await;
        assert!(result.success, "{}", result.output);
        assert!(result.output.contains("Saving to: 'report.json'"));
        assert!(result.output.ends_with("'report.json' saved [11]"));
        assert_eq!(env.fs.read_file("/home/user/report.json").await.unwrap(), "{\"ok\":true}");
    }

    #[tokio::test]
    async fn test_wget_directory_prefix_and_index() {
        let mut env = TestEnv::with_fetch(mock_fetch(200, "<html></html>"));
        let result = WgetCommand.execute(env.ctx(vec!["-P", "/tmp", "files.test"])).await;
        assert!(result.success, "{}", result.output);
        assert_eq!(env.fs.read_file("/tmp/index.html").await.unwrap(), "<html></html>");
    }

    #[tokio::test]
    async fn test_wget_mirror() {
        let mut env = TestEnv::with_fetch(two_page_site());
        env.config.network.crawl_delay_ms = 0;
        let result = WgetCommand.execute(env.ctx(vec!["-m", "-P", "/tmp/m", "https://site.test/"])).await;
        assert_eq!(
            result.output,
            "Mirror completed successfully!\nDownloaded 2 files:\n  /tmp/m/site.test/index.html\n  /tmp/m/site.test/about.html"
        );
    }

    #[tokio::test]
    async fn test_wget_errors() {
        let mut env = TestEnv::with_fetch(mock_fetch(500, "boom"));
        let result = WgetCommand.execute(env.ctx(vec!["https://files.test/x"])).await;
        assert_eq!(
            result.rendered(),
            "error: wget: HTTP 500 Internal Server Error: https://files.test/x"
        );
        let result = WgetCommand.execute(env.ctx(vec![])).await;
        assert!(result.output.starts_with("wget: missing URL"));

        let mut env = TestEnv::new();
        let result = WgetCommand.execute(env.ctx(vec!["https://files.test/x"])).await;
        assert_eq!(result.rendered(), "error: network access is not configured");
    }
}
