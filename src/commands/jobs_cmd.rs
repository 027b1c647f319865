//! Job control over the simulated job table: `jobs`, `bg`, `fg`, `kill`, `ps`.

use async_trait::async_trait;
use crate::commands::{Command, CommandContext, CommandResult};
use crate::managers::{Job, JobManager, JobStatus};

pub struct JobsCommand;
pub struct BgCommand;
pub struct FgCommand;
pub struct KillCommand;
pub struct PsCommand;

/// Resolve a job spec (`%2`, `2`, `%%`, `%+`, or nothing) to a job id.
fn find_job(jobs: &JobManager, spec: Option<&str>) -> Result<u32, String> {
    match spec {
        None | Some("%%") | Some("%+") => jobs.current_job().map(|j| j.id).ok_or_else(|| "no current job".to_string()),
        Some(spec) => spec
            .trim_start_matches('%')
            .parse::<u32>()
            .ok()
            .filter(|id| jobs.get_job(*id).is_some())
            .ok_or_else(|| format!("{}: no such job", spec)),
    }
}

fn job_line(job: &Job, with_pid: bool) -> String {
    let suffix = if job.background && job.status == JobStatus::Running { " &" } else { "" };
    if with_pid {
        format!("[{}]  {} {:<10} {}{}", job.id, job.pid, job.status.as_str(), job.command, suffix)
    } else {
        format!("[{}]  {:<10} {}{}", job.id, job.status.as_str(), job.command, suffix)
    }
}

#[async_trait]
impl Command for JobsCommand {
    fn name(&self) -> &'static str {
        "jobs"
    }

    fn summary(&self) -> &'static str {
        "list jobs"
    }

    async fn execute(&self, mut ctx: CommandContext<'_>) -> CommandResult {
        let with_pid = ctx.args.iter().any(|a| a == "-l");
        let jobs = &mut ctx.session.jobs;
        let lines: Vec<String> = jobs.all_jobs().into_iter().map(|j| job_line(j, with_pid)).collect();

        // finished jobs are reported once
        let finished: Vec<u32> = jobs
            .all_jobs()
            .into_iter()
            .filter(|j| matches!(j.status, JobStatus::Completed | JobStatus::Terminated))
            .map(|j| j.id)
            .collect();
        for id in finished {
            jobs.remove_job(id);
        }
        CommandResult::success(lines.join("\n"))
    }
}

#[async_trait]
impl Command for BgCommand {
    fn name(&self) -> &'static str {
        "bg"
    }

    fn summary(&self) -> &'static str {
        "resume a job in the background"
    }

    async fn execute(&self, mut ctx: CommandContext<'_>) -> CommandResult {
        let jobs = &mut ctx.session.jobs;
        let id = match find_job(jobs, ctx.args.first().map(String::as_str)) {
            Ok(id) => id,
            Err(e) => return CommandResult::error(format!("bg: {}", e)),
        };
        jobs.update_status(id, JobStatus::Running);
        jobs.set_background(id, true);
        match jobs.get_job(id) {
            Some(job) => CommandResult::success(format!("[{}]+ {} &", job.id, job.command)),
            None => CommandResult::error(format!("bg: %{}: no such job", id)),
        }
    }
}

#[async_trait]
impl Command for FgCommand {
    fn name(&self) -> &'static str {
        "fg"
    }

    fn summary(&self) -> &'static str {
        "run a job in the foreground"
    }

    /// The job's command line is handed back to the chain to run; the job
    /// itself is marked done and leaves the table.
    async fn execute(&self, mut ctx: CommandContext<'_>) -> CommandResult {
        let jobs = &mut ctx.session.jobs;
        let id = match find_job(jobs, ctx.args.first().map(String::as_str)) {
            Ok(id) => id,
            Err(e) => return CommandResult::error(format!("fg: {}", e)),
        };
        jobs.update_status(id, JobStatus::Completed);
        match jobs.remove_job(id) {
            Some(job) => CommandResult::delegating(job.command.clone(), vec![job.command]),
            None => CommandResult::error(format!("fg: %{}: no such job", id)),
        }
    }
}

enum Signal {
    Terminate,
    Stop,
    Continue,
}

#[async_trait]
impl Command for KillCommand {
    fn name(&self) -> &'static str {
        "kill"
    }

    fn summary(&self) -> &'static str {
        "send a signal to a job"
    }

    async fn execute(&self, mut ctx: CommandContext<'_>) -> CommandResult {
        const USAGE: &str = "kill: usage: kill [-STOP|-CONT|-9] <%job|pid>";
        let mut signal = Signal::Terminate;
        let mut target = None;
        for arg in &ctx.args {
            match arg.as_str() {
                "-STOP" | "-SIGSTOP" | "-19" => signal = Signal::Stop,
                "-CONT" | "-SIGCONT" | "-18" => signal = Signal::Continue,
                "-9" | "-KILL" | "-SIGKILL" | "-15" | "-TERM" | "-SIGTERM" => signal = Signal::Terminate,
                a if a.starts_with('-') => return CommandResult::error(format!("kill: {}: invalid signal specification", &a[1..])),
                _ => target = Some(arg.as_str()),
            }
        }
        let Some(target) = target else {
            return CommandResult::error(USAGE);
        };

        let jobs = &mut ctx.session.jobs;
        let id = if target.starts_with('%') {
            match find_job(jobs, Some(target)) {
                Ok(id) => id,
                Err(e) => return CommandResult::error(format!("kill: {}", e)),
            }
        } else {
            match target.parse::<u32>().ok().and_then(|pid| jobs.get_job_by_pid(pid)) {
                Some(job) => job.id,
                None => return CommandResult::error(format!("kill: ({}) - No such process", target)),
            }
        };

        let status = match signal {
            Signal::Stop => JobStatus::Stopped,
            Signal::Continue => JobStatus::Running,
            Signal::Terminate => JobStatus::Terminated,
        };
        jobs.update_status(id, status);
        match (signal, jobs.get_job(id)) {
            (Signal::Terminate, Some(job)) => CommandResult::success(format!("[{}]+  Terminated  {}", job.id, job.command)),
            _ => CommandResult::empty(),
        }
    }
}

#[async_trait]
impl Command for PsCommand {
    fn name(&self) -> &'static str {
        "ps"
    }

    fn summary(&self) -> &'static str {
        "report running processes"
    }

    async fn execute(&self, ctx: CommandContext<'_>) -> CommandResult {
        let mut lines = vec![
            "  PID TTY          TIME CMD".to_string(),
            "    1 pts/0    00:00:00 bash".to_string(),
        ];
        for job in ctx.session.jobs.all_jobs() {
            if matches!(job.status, JobStatus::Running | JobStatus::Stopped) {
                let cmd = job.command.split_whitespace().next().unwrap_or("");
                lines.push(format!("{:>5} pts/0    00:00:00 {}", job.pid, cmd));
            }
        }
        lines.push("    2 pts/0    00:00:00 ps".to_string());
        CommandResult::success(lines.join("\n"))
    }
}
