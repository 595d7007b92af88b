use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod builder;
mod cli;
mod config;
mod error;
mod extract;
mod layout;
mod output;
mod spec;
mod templates;
mod workflow;

use cli::{Command, RootArgs};

fn main() -> Result<ExitCode> {
    let args = RootArgs::parse();
    init_logging(args.verbose);

    match args.command {
        Command::Build(build_args) => {
            let ok = workflow::run_build(build_args)?;
            Ok(if ok {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Command::Preview(preview_args) => {
            workflow::run_preview(preview_args)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Log to stderr so stdout stays clean for `--json` output. `RUST_LOG`
/// replaces the default filter.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("ubuild={default_level}")));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();
}
