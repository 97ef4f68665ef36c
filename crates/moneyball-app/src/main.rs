// Moneyball entry point.
//
// Startup sequence:
// 1. Initialize tracing (log to file, stdout carries the report)
// 2. Parse the command line
// 3. Load config (copying defaults on first run)
// 4. Open the snapshot cache and dispatch the command

use anyhow::Context;
use clap::Parser;
use tracing::{error, info};

use moneyball_app::app::App;
use moneyball_app::cli::Cli;
use moneyball_app::config;

fn main() -> anyhow::Result<()> {
    init_tracing()?;
    info!("moneyball starting up");

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => config::load_config_file(path),
        None => config::load_config(),
    }
    .context("failed to load configuration")?;
    info!("Config loaded: snapshots from {}", config.data.snapshot_dir);

    let app = App::from_config(config).context("failed to initialize")?;
    match app.run(&cli.command) {
        Ok(output) => {
            println!("{output}");
            Ok(())
        }
        Err(e) => {
            error!("command failed: {:#}", e);
            Err(e)
        }
    }
}

/// Initialize tracing to log to a file so stdout stays clean for reports
/// and JSON.
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::File::create(log_dir.join("moneyball.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("moneyball=info,warn")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
