//! Fragment tree discovery and loading.
//!
//! A documentation build writes one fragment per trait under an
//! `implementors/` root. [`FragmentTree`] finds them and decodes them; the
//! caller decides when each payload is handed to the registry.

use std::fs;
use std::path::{Path, PathBuf};

use implidx_registry::{ImplementorPayload, Registration, Registry, TraitKey};
use walkdir::WalkDir;

use crate::decode::decode;
use crate::error::FragmentError;
use crate::path::trait_key_from_path;

/// One discovered fragment file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FragmentFile {
	pub path: PathBuf,
	pub trait_key: TraitKey,
}

/// Result of loading every fragment in a tree.
#[derive(Debug, Default)]
pub struct LoadReport {
	/// Decoded payloads, in fragment path order.
	pub payloads: Vec<ImplementorPayload>,
	/// Fragments that could not be read or decoded.
	pub failures: Vec<(PathBuf, FragmentError)>,
}

impl LoadReport {
	pub fn is_clean(&self) -> bool {
		self.failures.is_empty()
	}
}

/// Fragment files found under a root directory, sorted by path.
#[derive(Debug, Clone)]
pub struct FragmentTree {
	root: PathBuf,
	files: Vec<FragmentFile>,
}

impl FragmentTree {
	/// Walks `root` for `trait.*.js` files.
	///
	/// Unreadable directory entries are skipped with a warning; files that do
	/// not follow the trait fragment layout are ignored.
	pub fn scan(root: impl Into<PathBuf>) -> Result<Self, FragmentError> {
		let root = root.into();
		if !root.is_dir() {
			return Err(FragmentError::MissingRoot { path: root });
		}

		let mut files: Vec<FragmentFile> = WalkDir::new(&root)
			.into_iter()
			.filter_map(|entry| match entry {
				Ok(entry) => Some(entry),
				Err(e) => {
					tracing::warn!(error = %e, "skipping unreadable fragment tree entry");
					None
				}
			})
			.filter(|entry| entry.file_type().is_file())
			.filter_map(|entry| {
				let relative = entry.path().strip_prefix(&root).ok()?;
				let trait_key = trait_key_from_path(relative)?;
				Some(FragmentFile {
					path: entry.into_path(),
					trait_key,
				})
			})
			.collect();
		files.sort_by(|a, b| a.path.cmp(&b.path));

		tracing::debug!(root = %root.display(), fragments = files.len(), "fragment tree scanned");
		Ok(Self { root, files })
	}

	pub fn root(&self) -> &Path {
		&self.root
	}

	pub fn files(&self) -> &[FragmentFile] {
		&self.files
	}

	pub fn len(&self) -> usize {
		self.files.len()
	}

	pub fn is_empty(&self) -> bool {
		self.files.is_empty()
	}

	/// Reads and decodes every fragment, collecting failures instead of
	/// stopping at the first one.
	pub fn load(&self) -> LoadReport {
		let mut report = LoadReport::default();
		for file in &self.files {
			match read_fragment(file) {
				Ok(payload) => report.payloads.push(payload),
				Err(e) => {
					tracing::warn!(path = %file.path.display(), error = %e, "rejected implementor fragment");
					report.failures.push((file.path.clone(), e));
				}
			}
		}
		report
	}
}

fn read_fragment(file: &FragmentFile) -> Result<ImplementorPayload, FragmentError> {
	let text = fs::read_to_string(&file.path).map_err(|source| FragmentError::Io {
		path: file.path.clone(),
		source,
	})?;
	decode(file.trait_key.clone(), &text)
}

/// Decodes `text` and registers the payload.
///
/// A malformed fragment is rejected before it reaches the registry and
/// reported at `warn`; the registry is left untouched.
pub fn register_fragment(
	registry: &Registry,
	trait_key: impl Into<TraitKey>,
	text: &str,
) -> Result<Registration, FragmentError> {
	let trait_key = trait_key.into();
	match decode(trait_key.clone(), text) {
		Ok(payload) => Ok(registry.register(payload)),
		Err(e) => {
			tracing::warn!(registry = registry.label(), %trait_key, error = %e, "rejected implementor fragment");
			Err(e)
		}
	}
}

#[cfg(test)]
mod tests;
