use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser as _;
use cmdloop_core::event_loop::DEFAULT_THREAD_NAME;
use cmdloop_core::{EventLoop, Parser};
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

/// Runs the commands in a file on a dedicated event loop.
#[derive(Debug, clap::Parser)]
#[command(name = "cmdloop", version, about)]
struct Args {
    /// Path to file with instructions
    #[arg(short = 'f', long = "file", env = "CMDLOOP_FILE")]
    file: PathBuf,

    /// Name of the worker thread
    #[arg(long, default_value = DEFAULT_THREAD_NAME)]
    thread_name: String,

    /// Log filter, e.g. `debug` or `cmdloop_core=trace` (falls back to RUST_LOG)
    #[arg(long, env = "CMDLOOP_LOG")]
    log_level: Option<String>,

    /// Print loop statistics as JSON to stderr after shutdown
    #[arg(long)]
    stats: bool,

    /// Post lines without waiting for each one to settle; output scheduled by
    /// a command may then appear after later lines
    #[arg(long)]
    pipelined: bool,
}

/// Logs go to stderr; stdout carries command output only.
fn init_tracing(log_level: Option<&str>) -> Result<()> {
    let filter = match log_level {
        Some(directives) => EnvFilter::try_new(directives)
            .with_context(|| format!("invalid log filter `{directives}`"))?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.log_level.as_deref())?;

    let input = File::open(&args.file)
        .await
        .with_context(|| format!("failed to open {}", args.file.display()))?;

    let event_loop = EventLoop::builder()
        .thread_name(args.thread_name.as_str())
        .spawn()?;
    let parser = Parser::stdout();

    let mut lines = BufReader::new(input).lines();
    let mut line_no = 0usize;
    while let Some(line) = lines
        .next_line()
        .await
        .with_context(|| format!("failed to read {}", args.file.display()))?
    {
        line_no += 1;
        match parser.parse(&line) {
            Ok(Some(cmd)) => {
                event_loop.post(cmd);
                if !args.pipelined {
                    let handle = event_loop.handle();
                    tokio::task::spawn_blocking(move || handle.wait_idle()).await??;
                }
            }
            Ok(None) => debug!(line = line_no, "blank line"),
            Err(e) => warn!(line = line_no, error = %e, "skipping line"),
        }
    }

    event_loop.finish().await?;

    if args.stats {
        eprintln!("{}", serde_json::to_string(&event_loop.stats())?);
    }
    Ok(())
}
