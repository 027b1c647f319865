/// curl - Transfer data from or to a server

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::collections::HashMap;

use crate::commands::{Command, CommandContext, CommandResult};
use crate::network::{fetch_with_timeout, normalize_url, status_text, FetchOptions, FetchResponse, HttpMethod, NetworkError};

pub struct CurlCommand;

#[derive(Debug, Default, PartialEq)]
struct CurlOptions {
    method: Option<String>,
    headers: Vec<(String, String)>,
    data: Option<String>,
    user: Option<String>,
    include_headers: bool,
    head_only: bool,
    follow_redirects: bool,
    fail: bool,
    output: Option<String>,
    url: Option<String>,
}

fn parse_options(args: &[String]) -> Result<CurlOptions, String> {
    let mut opts = CurlOptions::default();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        let mut value = |flag: &str| {
            iter.next()
                .cloned()
                .ok_or_else(|| format!("curl: option {}: requires parameter", flag))
        };
        match arg.as_str() {
            "-X" | "--request" => opts.method = Some(value(arg)?.to_uppercase()),
            "-H" | "--header" => {
                let header = value(arg)?;
                if let Some((name, val)) = header.split_once(':') {
                    opts.headers.push((name.trim().to_string(), val.trim().to_string()));
                }
            }
            "-d" | "--data" | "--data-raw" | "--data-binary" => opts.data = Some(value(arg)?),
            "-u" | "--user" => opts.user = Some(value(arg)?),
            "-o" | "--output" => opts.output = Some(value(arg)?),
            "-i" | "--include" => opts.include_headers = true,
            "-I" | "--head" => opts.head_only = true,
            "-L" | "--location" => opts.follow_redirects = true,
            "-f" | "--fail" => opts.fail = true,
            // accepted for compatibility with the default aliases
            "-s" | "--silent" | "-S" | "--show-error" | "-k" | "--insecure" | "--no-check-certificate" => {}
            a if a.starts_with('-') && a.len() > 1 => {
                return Err(format!("curl: option {}: is unknown", a));
            }
            _ => opts.url = Some(arg.clone()),
        }
    }
    Ok(opts)
}

impl CurlOptions {
    fn method(&self) -> Result<HttpMethod, String> {
        match (&self.method, self.head_only, &self.data) {
            (Some(m), _, _) => HttpMethod::from_str(m).ok_or_else(|| format!("curl: unsupported method: {}", m)),
            (None, true, _) => Ok(HttpMethod::Head),
            (None, false, Some(_)) => Ok(HttpMethod::Post),
            (None, false, None) => Ok(HttpMethod::Get),
        }
    }

    fn request_headers(&self) -> HashMap<String, String> {
        let mut headers: HashMap<String, String> = self.headers.iter().cloned().collect();
        if let Some(ref user) = self.user {
            let encoded = STANDARD.encode(user.as_bytes());
            headers.insert("Authorization".to_string(), format!("Basic {}", encoded));
        }
        if self.data.is_some() && !headers.keys().any(|k| k.eq_ignore_ascii_case("content-type")) {
            headers.insert("Content-Type".to_string(), "application/x-www-form-urlencoded".to_string());
        }
        headers
    }
}

fn format_headers(response: &FetchResponse) -> String {
    let mut lines = vec![format!("HTTP/1.1 {} {}", response.status, status_text(response.status))];
    let mut names: Vec<&String> = response.headers.keys().collect();
    names.sort();
    for name in names {
        lines.push(format!("{}: {}", name, response.headers[name]));
    }
    lines.join("\n")
}

fn build_output(options: &CurlOptions, response: &FetchResponse) -> String {
    if options.head_only {
        return format_headers(response);
    }
    if options.include_headers {
        return format!("{}\n\n{}", format_headers(response), response.body);
    }
    response.body.clone()
}

#[async_trait]
impl Command for CurlCommand {
    fn name(&self) -> &'static str {
        "curl"
    }

    fn summary(&self) -> &'static str {
        "transfer a URL"
    }

    async fn execute(&self, ctx: CommandContext<'_>) -> CommandResult {
        let options = match parse_options(&ctx.args) {
            Ok(opts) => opts,
            Err(e) => return CommandResult::error(e),
        };
        let Some(url) = options.url.as_deref().map(normalize_url) else {
            return CommandResult::error("curl: no URL specified");
        };
        let Some(fetch_fn) = ctx.fetch_fn.clone() else {
            return CommandResult::error(NetworkError::NotConfigured.to_string());
        };
        let method = match options.method() {
            Ok(m) => m,
            Err(e) => return CommandResult::error(e),
        };

        let request = FetchOptions {
            method,
            headers: options.request_headers(),
            body: options.data.clone(),
            timeout: ctx.config.network.timeout(),
            follow_redirects: options.follow_redirects,
            allow_error_status: !options.fail,
        };
        let response = match fetch_with_timeout(&fetch_fn, &url, &request).await {
            Ok(response) => response,
            Err(e) => return CommandResult::error(format!("curl: {}", e)),
        };

        let output = build_output(&options, &response);
        match options.output {
            Some(ref file) => {
                let written = match ctx.resolve(file) {
                    Ok(path) => ctx.fs.write_file_unsafe(&path, &output).await,
                    Err(e) => Err(e),
                };
                CommandResult::from_fs(written)
            }
            None => CommandResult::success(output),
        }
    }
}
