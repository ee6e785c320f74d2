use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "implidx")]
#[command(about = "Inspect trait implementor fragments the way the doc viewer merges them")]
#[command(version)]
/// Command-line arguments.
pub struct Cli {
	/// Config file (defaults to ./implidx.toml when present)
	#[arg(long, short = 'c', global = true, value_name = "FILE")]
	pub config: Option<PathBuf>,

	/// Fragment root directory (overrides `loader.root`)
	#[arg(long, short = 'r', global = true, value_name = "DIR")]
	pub root: Option<PathBuf>,

	/// Verbose logging
	#[arg(long, short = 'v', global = true)]
	pub verbose: bool,

	/// Subcommand to execute.
	#[command(subcommand)]
	pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
	/// Render the Implementors section for a trait
	Show {
		/// Trait path, e.g. core::fmt::Debug
		trait_key: String,

		/// Install the page consumer after this many fragments have registered
		/// (defaults to after all of them)
		#[arg(long, value_name = "N")]
		attach_after: Option<usize>,

		/// Omit this namespace from the rendered list
		#[arg(long, value_name = "NAMESPACE")]
		skip_namespace: Option<String>,
	},
	/// Decode every fragment and report malformed ones
	Check,
	/// List known traits with namespace and entry counts
	Traits,
}
