//! Parse command: check recorded frames offline
//!
//! Reads one frame per line from a file or stdin and prints each rendered
//! reading, or the error that rejected it, followed by a summary.

use colored::*;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use tracing::{debug, info};

use super::shared::RunSummary;
use crate::app::services::frame_parser::FrameParser;
use crate::cli::args::ParseArgs;
use crate::config::Config;
use crate::{Error, Result};

/// Parse every frame in the input named by `args`
pub fn run_parse(config: &Config, args: &ParseArgs) -> Result<RunSummary> {
    let parser = FrameParser::new(config.parser);
    debug!("Parser configuration: {:?}", parser.config());
    let stdout = io::stdout();
    let mut output = stdout.lock();

    match &args.input {
        Some(path) => {
            info!("Parsing frames from {}", path.display());
            let file = File::open(path).map_err(|e| {
                Error::io(format!("Failed to open input file {}", path.display()), e)
            })?;
            parse_lines(BufReader::new(file), &mut output, &parser, args.include_hybrid)
        }
        None => {
            info!("Parsing frames from stdin");
            let stdin = io::stdin();
            parse_lines(stdin.lock(), &mut output, &parser, args.include_hybrid)
        }
    }
}

/// Parse each non-blank line of `input`, writing one result line per frame
pub fn parse_lines<R: BufRead, W: Write>(
    input: R,
    output: &mut W,
    parser: &FrameParser,
    include_hybrid: bool,
) -> Result<RunSummary> {
    let mut summary = RunSummary {
        discards_are_failures: true,
        ..RunSummary::default()
    };

    for (line_number, line) in input.lines().enumerate() {
        let line = line.map_err(|e| Error::io("Failed to read input line", e))?;
        if line.trim().is_empty() {
            continue;
        }

        match parser.parse(line.as_bytes()) {
            Ok(reading) => {
                let verdict = match reading.check_complete(include_hybrid) {
                    Ok(()) => "complete".green().to_string(),
                    Err(e) => e.to_string().yellow().to_string(),
                };
                writeln!(
                    output,
                    "{} {}: {} [{}]",
                    "OK ".bright_green().bold(),
                    line_number + 1,
                    reading,
                    verdict
                )?;
                summary.record_reading("input", &reading, include_hybrid);
            }
            Err(e) => {
                debug!("Line {} rejected: {}", line_number + 1, e);
                writeln!(output, "{} {}: {}", "ERR".bright_red().bold(), line_number + 1, e)?;
                summary.frames_discarded += 1;
            }
        }
    }

    writeln!(
        output,
        "\n{} {} parsed, {} failed, {} incomplete",
        "Summary:".bright_white().bold(),
        summary.readings_parsed,
        summary.frames_discarded,
        summary.incomplete_readings
    )?;

    Ok(summary)
}
