//! `flagdex`: browse the country flag directory from the terminal.
//!
//! Fetches the directory once at startup, then filters it as you type.
//! Cards are laid out as a grid sized to the terminal; flags that do not
//! load fall back to a placeholder.
//!
//! Logs are written to a file (default `/tmp/flagdex.log`) to avoid
//! corrupting the terminal UI.

mod action;
mod app;
mod component;
mod data_bridge;
mod event;
mod screens;
mod theme;
mod tui;
mod widgets;

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::Result;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use flagdex_config::Config;

use crate::app::App;

/// Terminal browser for the country flag directory.
#[derive(Parser, Debug)]
#[command(name = "flagdex", version, about)]
struct Cli {
    /// Config file (defaults to the platform config dir)
    #[arg(short, long, env = "FLAGDEX_CONFIG")]
    config: Option<PathBuf>,

    /// Log file path (defaults to /tmp/flagdex.log)
    #[arg(long, default_value = "/tmp/flagdex.log")]
    log_file: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Print the effective configuration and exit
    #[arg(long)]
    print_config: bool,
}

/// File-based tracing. Nothing may go to stdout/stderr while the TUI owns
/// the terminal. The guard must live until exit so logs are flushed.
fn setup_tracing(cli: &Cli) -> WorkerGuard {
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "flagdex={log_level},flagdex_tui={log_level},flagdex_core={log_level},flagdex_api={log_level}"
        ))
    });

    let log_dir = cli
        .log_file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(std::path::Path::new("."));
    let log_filename = cli
        .log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("flagdex.log"));

    let file_appender = tracing_appender::rolling::never(log_dir, log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true),
        )
        .init();

    guard
}

fn load_config(cli: &Cli) -> Result<Config> {
    let config = match &cli.config {
        Some(path) => flagdex_config::load_config_from(path)?,
        None => flagdex_config::load_config()?,
    };
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Hooks go in before the terminal is touched
    tui::install_hooks()?;

    let config = load_config(&cli)?;
    if cli.print_config {
        print!("{}", config.to_toml()?);
        return Ok(());
    }

    let _log_guard = setup_tracing(&cli);

    info!(
        endpoint = %config.endpoint,
        filter_mode = %config.filter_mode,
        probe_flags = config.probe_flags,
        "starting flagdex"
    );

    let mut app = App::new(config)?;
    app.run().await?;

    Ok(())
}
