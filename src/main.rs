use anyhow::Context;
use clap::Parser;
use std::process;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use usbwde::cli::{args::Args, commands};

/// How long a cancelled command may take to wind down before we stop waiting
const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

fn main() {
    // Parse command line arguments
    let args = Args::parse();

    // If no subcommand was provided, show help and available commands
    if args.command.is_none() {
        show_help_and_commands();
        process::exit(0);
    }

    let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("Failed to create async runtime: {}", e);
        process::exit(1);
    });

    let result: anyhow::Result<Option<commands::RunSummary>> = runtime.block_on(async {
        // Create cancellation token for coordinating graceful shutdown
        let cancellation_token = CancellationToken::new();

        let command = commands::run(args, cancellation_token.clone());
        tokio::pin!(command);

        tokio::select! {
            result = &mut command => result.map(Some).context("Command failed"),
            signal = tokio::signal::ctrl_c() => match signal {
                Err(e) => Err(anyhow::Error::new(e).context("Failed to listen for CTRL+C")),
                Ok(()) => {
                    eprintln!("\nReceived CTRL+C, shutting down gracefully...");
                    cancellation_token.cancel();

                    // A blocking serial read may outlive the grace period
                    match tokio::time::timeout(SHUTDOWN_GRACE, &mut command).await {
                        Ok(result) => result.map(Some).context("Command failed during shutdown"),
                        Err(_) => Ok(None),
                    }
                }
            },
        }
    });

    match result {
        Ok(Some(summary)) if !summary.is_success() => {
            eprintln!(
                "{} of {} frame(s) failed to parse",
                summary.frames_discarded,
                summary.frames_discarded + summary.readings_parsed
            );
            process::exit(1);
        }
        Ok(_) => process::exit(0),
        Err(error) => {
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}

/// Show help information and available commands when no subcommand is provided
fn show_help_and_commands() {
    println!("usbwde - USB-WDE1 weather-station receiver tool");
    println!("===============================================");
    println!();
    println!("Reads frames from an ELV USB-WDE1 style receiver on a serial port and");
    println!("logs, monitors or parses the eight probe and hybrid sensor readings.");
    println!();
    println!("USAGE:");
    println!("    usbwde [OPTIONS] <COMMAND>");
    println!();
    println!("COMMANDS:");
    println!("    log         Log every reading until the stream fails");
    println!("    monitor     Keep reading with reconnects and print JSON status lines");
    println!("    parse       Parse recorded frames from a file or stdin");
    println!("    help        Show this help message or help for specific commands");
    println!();
    println!("OPTIONS:");
    println!("    -d, --device <PATH>    Serial device (default /dev/ttyUSB0)");
    println!("        --config <FILE>    JSON configuration file");
    println!("        --lenient-hybrid   Accept blank precipitation/rain fields");
    println!("    -v, --verbose          Increase verbosity");
    println!("    -q, --quiet            Only log errors");
    println!("    -h, --help             Show help information");
    println!("    -V, --version          Show version information");
    println!();
    println!("EXAMPLES:");
    println!("    # Log readings from the default receiver:");
    println!("    usbwde log");
    println!();
    println!("    # Monitor a receiver, reporting stale data after five minutes:");
    println!("    usbwde monitor -d /dev/ttyUSB1 --max-data-age 300");
    println!();
    println!("    # Check a capture file:");
    println!("    usbwde parse frames.txt --lenient-hybrid");
    println!();
    println!("For detailed help on any command, use:");
    println!("    usbwde <COMMAND> --help");
}
