use async_trait::async_trait;
use std::collections::HashMap;

use crate::commands::{Command, CommandContext, CommandResult};
use crate::network::{fetch_with_timeout, normalize_url, status_text, FetchOptions, HttpMethod, NetworkError};

pub struct ApiCommand;

/// Pretty-print a JSON body, or return it unchanged when it is not JSON.
fn pretty_body(body: &str) -> String {
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(value) => serde_json::to_string_pretty(&value).unwrap_or_else(|_| body.to_string()),
        Err(_) => body.to_string(),
    }
}

#[async_trait]
impl Command for ApiCommand {
    fn name(&self) -> &'static str {
        "api"
    }

    fn summary(&self) -> &'static str {
        "call a JSON API"
    }

    async fn execute(&self, ctx: CommandContext<'_>) -> CommandResult {
        let (Some(method), Some(url)) = (ctx.args.first(), ctx.args.get(1)) else {
            return CommandResult::error("api: missing method or URL\nUsage: api <method> <URL> [data]");
        };
        let Some(method) = HttpMethod::from_str(&method.to_uppercase()) else {
            return CommandResult::error(format!("api: unsupported method: {}", method));
        };

        let data = ctx.args[2..].join(" ");
        let body = if data.is_empty() {
            None
        } else {
            match serde_json::from_str::<serde_json::Value>(&data) {
                Ok(value) => Some(value.to_string()),
                Err(_) => return CommandResult::error(format!("api: Invalid JSON data: {}", data)),
            }
        };
        let Some(fetch_fn) = ctx.fetch_fn.clone() else {
            return CommandResult::error(NetworkError::NotConfigured.to_string());
        };

        let mut headers = HashMap::new();
        headers.insert("Accept".to_string(), "application/json".to_string());
        if body.is_some() {
            headers.insert("Content-Type".to_string(), "application/json".to_string());
        }
        let request = FetchOptions {
            method,
            headers,
            body,
            timeout: ctx.config.network.timeout(),
            allow_error_status: true,
            ..Default::default()
        };
        match fetch_with_timeout(&fetch_fn, &normalize_url(url), &request).await {
            Ok(response) => CommandResult::success(format!(
                "HTTP {} {}\n{}",
                response.status,
                status_text(response.status),
                pretty_body(&response.body)
            )),
            Err(e) => CommandResult::error(format!("api: {}", e)),
        }
    }
}
