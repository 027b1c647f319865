//! Command-line entry point: `;` sequencing, `&&` short-circuiting and
//! `|` piping over the dispatcher.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use super::dispatcher::Dispatcher;
use super::errors::ShellError;
use super::parser::{expand_line, parse_command, split_top_level};
use super::rate_limit::RateLimiter;
use crate::commands::{CommandResult, Session, UiAction};

type LineFuture<'a> = Pin<Box<dyn Future<Output = Outcome> + Send + 'a>>;

/// Result of one submitted line.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecResult {
    /// Non-empty outputs joined by newlines; failures carry `error: `.
    pub output: String,
    /// UI requests raised while running the line, in order.
    pub actions: Vec<UiAction>,
    /// Working directory after the line ran.
    pub cwd: String,
}

impl ExecResult {
    pub fn is_error(&self) -> bool {
        self.output.starts_with("error:")
    }
}

/// Collected output of a line, pipeline or command.
#[derive(Debug)]
struct Outcome {
    outputs: Vec<String>,
    success: bool,
}

impl Outcome {
    fn single(output: String, success: bool) -> Self {
        let outputs = if output.is_empty() { Vec::new() } else { vec![output] };
        Self { outputs, success }
    }

    fn joined(self) -> String {
        self.outputs.join("\n")
    }

    /// A command that reports `error:` counts as failed even if its
    /// handler returned success.
    fn failed(&self) -> bool {
        !self.success || self.outputs.first().is_some_and(|o| o.starts_with("error:"))
    }
}

/// Drop control characters other than tab.
pub fn sanitize(line: &str) -> String {
    line.chars().filter(|&c| c == '\t' || !c.is_control()).collect()
}

pub struct ChainHandler {
    dispatcher: Dispatcher,
    rate_limiter: RateLimiter,
}

impl ChainHandler {
    pub fn new(dispatcher: Dispatcher) -> Self {
        let interval = Duration::from_millis(dispatcher.config().rate_limit_ms);
        Self {
            dispatcher,
            rate_limiter: RateLimiter::new(interval),
        }
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Run one submitted line against `session`. `bypass_rate_limit` is
    /// set for script and rc-file lines.
    pub async fn execute(&mut self, session: &mut Session, raw: &str, bypass_rate_limit: bool) -> ExecResult {
        let max = self.dispatcher.config().max_input_len;
        let len = raw.chars().count();
        let rejected = if raw.trim().is_empty() {
            Some(ShellError::EmptyInput)
        } else if len > max {
            Some(ShellError::InputTooLong { len, max })
        } else if bypass_rate_limit {
            None
        } else {
            self.rate_limiter.check().err()
        };
        if let Some(err) = rejected {
            log::debug!("chain: rejected line: {}", err);
            return ExecResult {
                output: CommandResult::error(err.to_string()).rendered(),
                actions: Vec::new(),
                cwd: session.cwd.clone(),
            };
        }

        let line = sanitize(raw);
        session.push_history(line.trim(), self.dispatcher.config().history_size);

        let mut actions = Vec::new();
        let outcome = self.run_line(session, line, 0, &mut actions).await;
        ExecResult {
            output: outcome.joined(),
            actions,
            cwd: session.cwd.clone(),
        }
    }

    /// `;`-separated chains run regardless of earlier failures; inside a
    /// chain `&&` stops at the first failing part.
    fn run_line<'a>(
        &'a self,
        session: &'a mut Session,
        line: String,
        depth: usize,
        actions: &'a mut Vec<UiAction>,
    ) -> LineFuture<'a> {
        Box::pin(async move {
            let max = self.dispatcher.config().max_nesting;
            if depth > max {
                let err = ShellError::NestingTooDeep { max };
                return Outcome::single(CommandResult::error(err.to_string()).rendered(), false);
            }

            let mut total = Outcome { outputs: Vec::new(), success: true };
            for chain in split_top_level(&line, ";") {
                for part in split_top_level(&chain, "&&") {
                    let outcome = self.run_pipeline(session, &part, depth, actions).await;
                    total.success = !outcome.failed();
                    total.outputs.extend(outcome.outputs);
                    if !total.success {
                        log::debug!("chain: short-circuit after `{}`", part);
                        break;
                    }
                }
            }
            total
        })
    }

    /// Each stage receives the previous stage's output; a failing stage
    /// ends the pipe with its error.
    async fn run_pipeline(
        &self,
        session: &mut Session,
        pipeline: &str,
        depth: usize,
        actions: &mut Vec<UiAction>,
    ) -> Outcome {
        let stages = split_top_level(pipeline, "|");
        let mut input: Option<String> = None;
        let mut last = Outcome { outputs: Vec::new(), success: true };

        for (i, stage) in stages.iter().enumerate() {
            last = self.run_command(session, stage, input.take(), depth, actions).await;
            if last.failed() || i + 1 == stages.len() {
                break;
            }
            input = Some(std::mem::take(&mut last.outputs).join("\n"));
        }
        last
    }

    async fn run_command(
        &self,
        session: &mut Session,
        text: &str,
        input: Option<String>,
        depth: usize,
        actions: &mut Vec<UiAction>,
    ) -> Outcome {
        let expanded = expand_line(text, &session.aliases, &session.env);
        let Some(command) = parse_command(&expanded, session.home()) else {
            return Outcome { outputs: Vec::new(), success: true };
        };

        if command.background {
            let job = session.jobs.create_job(&command.line, true);
            log::debug!("chain: job {} queued: {}", job.id, job.command);
            return Outcome::single(format!("[{}] {}", job.id, job.pid), true);
        }

        let result = self.dispatcher.dispatch(session, &command, input).await;
        if let Some(action) = result.action.clone() {
            actions.push(action);
        }

        let mut outcome = Outcome::single(result.rendered(), result.success);
        if result.success && !result.delegate.is_empty() {
            for line in result.delegate {
                let nested = self.run_line(session, line, depth + 1, actions).await;
                outcome.success = nested.success;
                outcome.outputs.extend(nested.outputs);
            }
        }
        outcome
    }
}
