//! Subcommand implementations. Each returns the text to print.

use std::fmt::Write;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use implidx_fragment::{FragmentTree, LoadReport};
use implidx_page::{Page, RenderOptions};
use implidx_registry::{InstallOutcome, Registry};

/// Output of a subcommand plus whether it found problems.
#[derive(Debug)]
pub struct Report {
	pub output: String,
	pub ok: bool,
}

fn load_tree(root: &Path) -> anyhow::Result<LoadReport> {
	let tree = FragmentTree::scan(root).with_context(|| format!("cannot scan fragments in {}", root.display()))?;
	if tree.is_empty() {
		tracing::warn!(root = %root.display(), "no trait fragments found");
	}
	Ok(tree.load())
}

/// Replays the viewer: registers every fragment, installing the page after
/// `attach_after` of them, then renders `trait_key`'s section.
pub fn show(
	root: &Path,
	trait_key: &str,
	attach_after: Option<usize>,
	options: RenderOptions,
) -> anyhow::Result<Report> {
	let report = load_tree(root)?;
	let registry = Registry::new();
	let page = Arc::new(Page::new(options));
	page.display(trait_key);

	let attach_at = attach_after.unwrap_or(report.payloads.len());
	let mut attached = false;
	for (i, payload) in report.payloads.into_iter().enumerate() {
		if i == attach_at {
			attach(&page, &registry)?;
			attached = true;
		}
		registry.register(payload);
	}
	if !attached {
		attach(&page, &registry)?;
	}

	let stats = registry.stats();
	tracing::info!(
		registered = stats.registered,
		buffered = stats.buffered,
		delivered = stats.delivered,
		"fragments replayed"
	);

	let mut output = page.rendered().html.clone();
	output.push('\n');
	Ok(Report {
		output,
		ok: report.failures.is_empty(),
	})
}

fn attach(page: &Arc<Page>, registry: &Registry) -> anyhow::Result<()> {
	let outcome = page.attach(registry)?;
	if let InstallOutcome::Installed { flushed } = outcome {
		tracing::debug!(flushed, "page attached");
	}
	Ok(())
}

/// Decodes every fragment and lists the ones that fail.
pub fn check(root: &Path) -> anyhow::Result<Report> {
	let report = load_tree(root)?;
	let mut output = String::new();
	for (path, error) in &report.failures {
		let _ = writeln!(output, "{}: {error}", path.display());
	}
	let _ = writeln!(
		output,
		"{} fragment(s) ok, {} rejected",
		report.payloads.len(),
		report.failures.len()
	);
	Ok(Report {
		output,
		ok: report.is_clean(),
	})
}

/// Lists every trait with its namespace and entry counts.
pub fn traits(root: &Path) -> anyhow::Result<Report> {
	let report = load_tree(root)?;
	let registry = Registry::new();
	let page = Arc::new(Page::default());
	attach(&page, &registry)?;
	for payload in report.payloads {
		registry.register(payload);
	}

	let mut output = String::new();
	for row in page.summary() {
		let _ = writeln!(output, "{}\t{}\t{}", row.trait_key, row.namespaces, row.entries);
	}
	Ok(Report {
		output,
		ok: report.failures.is_empty(),
	})
}

#[cfg(test)]
mod tests {
	use std::fs;

	use pretty_assertions::assert_eq;

	use super::*;

	const DEBUG_A: &str = r#"var implementors = {};
implementors["crateA"] = ["impl Debug for A"];"#;
	const DEBUG_B: &str = r#"{"crateB": ["impl Debug for B"]}"#;

	fn tree() -> tempfile::TempDir {
		let dir = tempfile::tempdir().unwrap();
		let fmt = dir.path().join("core/fmt");
		fs::create_dir_all(&fmt).unwrap();
		fs::write(fmt.join("trait.Debug.js"), DEBUG_A).unwrap();
		let clone = dir.path().join("core/clone");
		fs::create_dir_all(&clone).unwrap();
		fs::write(clone.join("trait.Clone.js"), DEBUG_B).unwrap();
		dir
	}

	#[test]
	fn show_renders_regardless_of_attach_point() {
		let dir = tree();
		let late = show(dir.path(), "core::fmt::Debug", None, RenderOptions::default()).unwrap();
		let early = show(dir.path(), "core::fmt::Debug", Some(0), RenderOptions::default()).unwrap();
		assert!(late.ok);
		assert_eq!(late.output, early.output);
		assert!(late.output.contains("<li><code>impl Debug for A</code></li>"));
	}

	#[test]
	fn show_unknown_trait_renders_not_loaded() {
		let dir = tree();
		let report = show(dir.path(), "std::io::Read", Some(1), RenderOptions::default()).unwrap();
		assert!(report.output.contains("implementors-not-loaded"));
	}

	#[test]
	fn check_reports_malformed_fragment() {
		let dir = tree();
		fs::write(dir.path().join("core/fmt/trait.Display.js"), r#"{"x": "nope"}"#).unwrap();

		let report = check(dir.path()).unwrap();
		assert!(!report.ok);
		assert!(report.output.contains("trait.Display.js: malformed implementor payload"), "{}", report.output);
		assert!(report.output.ends_with("2 fragment(s) ok, 1 rejected\n"));
	}

	#[test]
	fn traits_lists_sorted_counts() {
		let dir = tree();
		let report = traits(dir.path()).unwrap();
		assert_eq!(report.output, "core::clone::Clone\t1\t1\ncore::fmt::Debug\t1\t1\n");
	}

	#[test]
	fn empty_root_lists_nothing() {
		let dir = tempfile::tempdir().unwrap();
		let report = traits(dir.path()).unwrap();
		assert!(report.ok);
		assert_eq!(report.output, "");
	}

	#[test]
	fn missing_root_is_an_error() {
		let dir = tempfile::tempdir().unwrap();
		assert!(check(&dir.path().join("absent")).is_err());
	}
}
