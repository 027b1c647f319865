use clap::Parser;
use std::io::{BufRead, IsTerminal, Read, Write};
use std::sync::Arc;

use zk_terminal::fs::{FileBackend, StorageBackend};
use zk_terminal::{ExecResult, Shell, ShellConfig, ShellOptions, UiAction};

#[derive(Parser)]
#[command(name = "zk-terminal")]
#[command(about = "A simulated Unix shell over a persisted virtual filesystem")]
#[command(version)]
struct Cli {
    /// Execute the commands from command line argument
    #[arg(short = 'c')]
    script: Option<String>,

    /// Persist the filesystem under this directory
    #[arg(long = "state-dir")]
    state_dir: Option<String>,

    /// TOML configuration file
    #[arg(long = "config")]
    config: Option<String>,

    /// Do not source ~/.bashrc on startup
    #[arg(long = "no-rc")]
    no_rc: bool,

    /// Output results as JSON (output, actions, cwd)
    #[arg(long = "json")]
    json: bool,

    /// Script file to execute
    #[arg()]
    script_file: Option<String>,
}

fn print_result(result: &ExecResult, json: bool) {
    if json {
        let actions: Vec<String> = result.actions.iter().map(|a| format!("{:?}", a)).collect();
        println!(
            "{}",
            serde_json::json!({
                "output": result.output,
                "actions": actions,
                "cwd": result.cwd,
                "error": result.is_error(),
            })
        );
    } else if result.is_error() {
        eprintln!("{}", result.output);
    } else if !result.output.is_empty() {
        println!("{}", result.output);
    }
}

async fn repl(shell: &mut Shell) {
    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("{}", shell.prompt());
        let _ = std::io::stdout().flush();
        let Some(Ok(line)) = lines.next() else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }
        let result = shell.execute(&line).await;
        for action in &result.actions {
            match action {
                UiAction::ClearScreen => print!("\x1b[2J\x1b[H"),
                UiAction::OpenEditor { path, editor } => {
                    eprintln!("{}: no editor attached to this terminal ({})", editor, path)
                }
                UiAction::Exit => return,
            }
        }
        print_result(&result, false);
    }
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let config = match cli.config.as_deref().map(ShellConfig::load) {
        Some(Ok(config)) => config,
        Some(Err(e)) => {
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
        None => ShellConfig::default(),
    };
    let backend = cli
        .state_dir
        .as_ref()
        .map(|dir| Arc::new(FileBackend::new(dir)) as Arc<dyn StorageBackend>);

    let mut shell = Shell::new(ShellOptions {
        config,
        backend,
        ..Default::default()
    });
    if !cli.no_rc {
        if let Some(result) = shell.load_rc().await {
            if result.is_error() {
                log::warn!("~/.bashrc: {}", result.output);
            }
        }
    }

    // Determine script source: -c, file, stdin, or an interactive prompt
    let script = if let Some(s) = cli.script {
        s
    } else if let Some(ref file) = cli.script_file {
        match std::fs::read_to_string(file) {
            Ok(content) => content,
            Err(e) => {
                eprintln!("Error: Cannot read script file: {}: {}", file, e);
                std::process::exit(1);
            }
        }
    } else if std::io::stdin().is_terminal() {
        repl(&mut shell).await;
        return;
    } else {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf).unwrap_or_default();
        buf
    };

    let result = shell.run_script(&script).await;
    print_result(&result, cli.json);
    std::process::exit(if result.is_error() { 1 } else { 0 });
}
