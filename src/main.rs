//! ipmi-fan-control entry point: CLI dispatch, signal handlers, async runtime.

mod app;
mod config;
mod control;
mod curve;
mod daemon;
mod error;
mod hardware;
mod system;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::time::Instant;
use tracing::{info, warn};

use app::cli::Args;
use app::logging::{filter_for_level, init_tracing};
use config::env::load_config;
use control::control_loop::print_diagnostic;
use control::{shutdown, ControlLoop};
use daemon::signals::spawn_signal_listener;
use hardware::IpmiClient;
use system::executor::IpmiTool;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Priority: 1. --log-level flag, 2. LOG_LEVEL env, 3. default (info)
    let log_level = args
        .log_level
        .clone()
        .or_else(|| std::env::var("LOG_LEVEL").ok())
        .unwrap_or_else(|| "info".to_string());
    let filter = filter_for_level(&log_level).unwrap_or_else(|| {
        eprintln!(
            "Invalid log level '{}'. Using INFO. Valid levels: TRACE, DEBUG, INFO, WARN, ERROR, CRITICAL",
            log_level
        );
        "info"
    });
    init_tracing(filter);

    let config = load_config().context("Invalid configuration")?;

    if args.config {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    info!(
        "ipmi-fan-control v{} starting, BMC {} as {}",
        env!("CARGO_PKG_VERSION"),
        config.connection.host,
        config.connection.username
    );
    if args.dry_run {
        warn!("Dry run: fan mode and duty cycle commands will only be logged");
    }

    let tool = IpmiTool::new(config.connection.clone());
    let client = IpmiClient::new(tool, args.dry_run);

    if args.test {
        info!("Running in test mode");
        print_diagnostic(&client, Instant::now())
            .await
            .context("Sensor read failed")?;
        return Ok(());
    }

    let (handle, shutdown) = shutdown::channel();
    let listener = spawn_signal_listener(handle);

    let result = ControlLoop::new(Box::new(client), config, shutdown).run().await;
    listener.abort();

    result.context("Fan control aborted")?;
    info!("Shutdown complete");
    Ok(())
}
