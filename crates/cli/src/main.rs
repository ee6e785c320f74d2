//! `implidx` binary.
//!
//! Loads a tree of implementor fragments, replays them through the registry
//! and renders the Implementors section a trait page would show.

mod cli;
mod commands;
mod config;

use std::process::ExitCode;

use clap::Parser;

use crate::cli::{Cli, Command};
use crate::config::Config;

fn main() -> anyhow::Result<ExitCode> {
	let cli = Cli::parse();
	setup_tracing(cli.verbose);

	let mut config = Config::load(cli.config.as_deref())?;
	if let Some(root) = cli.root {
		config.loader.root = root;
	}
	let root = config.loader.root.as_path();

	let report = match cli.command {
		Command::Show {
			trait_key,
			attach_after,
			skip_namespace,
		} => {
			let mut options = config.page.clone();
			if skip_namespace.is_some() {
				options.skip_namespace = skip_namespace;
			}
			commands::show(root, &trait_key, attach_after, options)?
		}
		Command::Check => commands::check(root)?,
		Command::Traits => commands::traits(root)?,
	};

	print!("{}", report.output);
	Ok(if report.ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

/// Logs to stderr. `IMPLIDX_LOG` takes an `EnvFilter` directive and wins
/// over `--verbose`.
fn setup_tracing(verbose: bool) {
	use tracing_subscriber::EnvFilter;

	let filter = EnvFilter::try_from_env("IMPLIDX_LOG").unwrap_or_else(|_| {
		if verbose {
			EnvFilter::new("implidx=debug,info")
		} else {
			EnvFilter::new("warn")
		}
	});

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_target(verbose)
		.init();
}
