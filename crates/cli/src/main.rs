// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! gw: watch a report-generation job until it is ready

mod color;
mod commands;
mod env;
mod exit_error;
mod output;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::commands::watch::WatchArgs;
use crate::exit_error::ExitError;
use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "gw", version, styles = color::styles())]
#[command(about = "Drive report generation jobs to completion")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Trigger or resume a job and wait for it to finish
    Watch(WatchArgs),
    /// Read and classify a job's status once
    Status {
        /// Job (report) id
        job: String,
        #[arg(short = 'o', long = "output", value_enum, default_value_t)]
        output: OutputFormat,
    },
    /// Reset a job's status to `preparing`
    Reset {
        /// Job (report) id
        job: String,
    },
    /// Start the generation pipeline once
    Trigger {
        /// Job (report) id
        job: String,
        /// Resume from this step instead of starting over
        #[arg(long)]
        from_step: Option<u32>,
    },
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = if verbose > 0 {
        EnvFilter::new(default)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
    };
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Watch(args) => commands::watch::handle(args).await,
        Commands::Status { job, output } => commands::status::handle(job, output).await,
        Commands::Reset { job } => commands::record::reset(job).await,
        Commands::Trigger { job, from_step } => commands::record::trigger(job, from_step).await,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let code = match run(cli).await {
        Ok(()) => 0,
        Err(e) => match e.downcast_ref::<ExitError>() {
            Some(exit) => {
                if exit.code != exit_error::RETURNED_TO_INPUT {
                    eprintln!("error: {}", exit);
                }
                exit.code
            }
            None => {
                eprintln!("error: {:#}", e);
                exit_error::FAILURE
            }
        },
    };
    // The stdin reader thread may still be parked on a read
    std::process::exit(code);
}
