//! Command implementations for the receiver CLI
//!
//! This module contains the command dispatch, logging setup and layered
//! configuration loading shared by every subcommand.

pub mod logger;
pub mod monitor;
pub mod parse;
pub mod shared;

use crate::cli::args::{Args, Commands};
use crate::config::Config;
use crate::constants::LOG_TARGET;
use crate::{Error, Result};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

pub use shared::RunSummary;

/// Main command runner
///
/// Sets up logging, loads configuration and hands off to the selected
/// subcommand. The token is cancelled when the user interrupts.
pub async fn run(args: Args, cancellation_token: CancellationToken) -> Result<RunSummary> {
    setup_logging(&args)?;

    debug!("Command line arguments: {:?}", args);
    args.validate()?;

    let config = load_configuration(&args)?;
    debug!("Loaded configuration: {:?}", config);

    let command = args
        .command
        .clone()
        .ok_or_else(|| Error::configuration("No command given"))?;

    match command {
        Commands::Log(log_args) => {
            info!("Logging readings from {}", config.serial.device_path);
            logger::run_log(config, log_args.include_hybrid, cancellation_token).await
        }
        Commands::Monitor(_) => {
            info!("Monitoring {}", config.serial.device_path);
            monitor::run_monitor(config, cancellation_token).await
        }
        Commands::Parse(parse_args) => parse::run_parse(&config, &parse_args),
    }
}

/// Set up structured logging based on CLI arguments
fn setup_logging(args: &Args) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{}={}", LOG_TARGET, log_level)));

    if args.quiet {
        // Minimal logging for quiet mode
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .try_init()
            .map_err(|e| Error::configuration(format!("Failed to initialize logging: {}", e)))?;
    } else {
        // Standard logging with timestamps
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .try_init()
            .map_err(|e| Error::configuration(format!("Failed to initialize logging: {}", e)))?;
    }

    debug!("Logging initialized at level: {}", log_level);
    Ok(())
}

/// Load configuration using layered approach (defaults -> file -> args)
fn load_configuration(args: &Args) -> Result<Config> {
    let base = match &args.config_file {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };

    let config = args.apply_to(base);
    config.validate()?;
    Ok(config)
}
