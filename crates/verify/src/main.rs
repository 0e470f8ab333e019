// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! procsim-verify CLI entry point.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use procsim_verify::{check, load_capture, load_scenario, replay, ReplayLayout};

/// Exit code when the capture diverges from the scenario
const EXIT_MISMATCH: u8 = 1;
/// Exit code for unreadable or invalid input files
const EXIT_INPUT: u8 = 2;

/// Replay and check procsim capture files
#[derive(Parser, Debug)]
#[command(name = "procsim-verify")]
#[command(about = "Replay and check procsim capture files")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the recorded calls of a capture
    Replay {
        /// JSONL capture written via PROCSIM_CAPTURE
        capture: PathBuf,

        /// Group lifecycle calls under their launch instead of a timeline
        #[arg(long)]
        grouped: bool,
    },

    /// Compare a capture against a scenario's expected calls
    Check {
        /// JSONL capture written via PROCSIM_CAPTURE
        capture: PathBuf,

        /// Scenario file (TOML, or JSON with a .json extension)
        #[arg(short, long)]
        scenario: PathBuf,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Replay { capture, grouped } => {
            let capture = match load_capture(&capture).await {
                Ok(capture) => capture,
                Err(e) => {
                    eprintln!("Error: {}", e);
                    return ExitCode::from(EXIT_INPUT);
                }
            };
            let layout = if grouped {
                ReplayLayout::Grouped
            } else {
                ReplayLayout::Timeline
            };
            print!("{}", replay(&capture, layout));
            ExitCode::SUCCESS
        }
        Command::Check { capture, scenario } => {
            let loaded = match load_capture(&capture).await {
                Ok(capture) => load_scenario(&scenario).await.map(|s| (capture, s)),
                Err(e) => Err(e),
            };
            let (capture, scenario) = match loaded {
                Ok(pair) => pair,
                Err(e) => {
                    eprintln!("Error: {}", e);
                    return ExitCode::from(EXIT_INPUT);
                }
            };
            match check(&capture, &scenario) {
                Ok(()) => {
                    println!("ok: {} call(s) match", scenario.expected_calls().len());
                    ExitCode::SUCCESS
                }
                Err(mismatch) => {
                    eprintln!("{}", mismatch);
                    ExitCode::from(EXIT_MISMATCH)
                }
            }
        }
    }
}
