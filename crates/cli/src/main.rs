//! `hudkit` binary.
//!
//! Checks generator output against a family schema, prints the rules a
//! generator is prompted with, and replays candidates through a stage to
//! show how they would be admitted and stacked.

use std::process::ExitCode;

use clap::Parser;

mod cli;
mod commands;
mod config;

use cli::{Cli, Command};
use config::Config;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<ExitCode> {
	let cli = Cli::parse();
	setup_tracing(cli.verbose);

	let config = Config::resolve(cli.config.as_deref())?;
	tracing::debug!(?config, "cli.config");

	match cli.command {
		Command::Check(args) => commands::check(&args),
		Command::Rules(args) => commands::rules(&args),
		Command::Replay(args) => commands::replay(&args, &config).await,
		Command::ShowConfig => commands::show_config(&config),
	}
}

fn setup_tracing(verbose: bool) {
	use tracing_subscriber::EnvFilter;

	let filter = EnvFilter::try_from_env("HUDKIT_LOG")
		.or_else(|_| EnvFilter::try_from_default_env())
		.unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.init();
}
