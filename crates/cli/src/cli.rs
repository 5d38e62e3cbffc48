use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use hudkit_schema::Family;

/// Validate, correct and stage generated UI components.
#[derive(Parser, Debug)]
#[command(name = "hudkit", version)]
pub struct Cli {
	/// Configuration file (defaults to $XDG_CONFIG_HOME/hudkit/config.toml)
	#[arg(short, long, value_name = "PATH", global = true)]
	pub config: Option<PathBuf>,

	/// Verbose logging
	#[arg(short, long, global = true)]
	pub verbose: bool,

	#[command(subcommand)]
	pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
	/// Run the corrector over one candidate and print the result as JSON
	Check(CheckArgs),
	/// Print the system prompt and rules for a family
	Rules(RulesArgs),
	/// Add candidates to a stage in order and print the resulting layout
	Replay(ReplayArgs),
	/// Print the effective configuration as TOML
	ShowConfig,
}

#[derive(Args, Debug)]
pub struct CheckArgs {
	/// Family to check against (read from the `component` field when omitted)
	#[arg(short, long, value_parser = parse_family)]
	pub family: Option<Family>,

	/// File holding generator output (stdin when omitted)
	pub file: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct RulesArgs {
	#[arg(short, long, value_parser = parse_family)]
	pub family: Family,
}

#[derive(Args, Debug)]
pub struct ReplayArgs {
	/// Family for candidates without a `component` field
	#[arg(short, long, value_parser = parse_family)]
	pub family: Option<Family>,

	/// Candidate files, added in order
	#[arg(required = true)]
	pub files: Vec<PathBuf>,
}

fn parse_family(raw: &str) -> Result<Family, String> {
	raw.parse().map_err(|_| {
		let known: Vec<&str> = Family::ALL.iter().map(|family| family.as_str()).collect();
		format!("unknown family `{raw}` (expected one of: {})", known.join(", "))
	})
}
