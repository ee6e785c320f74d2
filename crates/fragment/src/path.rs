//! Mapping between trait keys and fragment file paths.
//!
//! `core::fmt::Debug` lives at `core/fmt/trait.Debug.js` under the fragment
//! root.

use std::path::{Component, Path, PathBuf};

use implidx_registry::TraitKey;

const PREFIX: &str = "trait.";
const EXTENSION: &str = ".js";

/// Trait key for a fragment path relative to the fragment root.
pub fn trait_key_from_path(relative: &Path) -> Option<TraitKey> {
	let mut segments = Vec::new();
	for component in relative.components() {
		match component {
			Component::Normal(part) => segments.push(part.to_str()?),
			Component::CurDir => {}
			_ => return None,
		}
	}
	let file = segments.pop()?;
	let name = file.strip_prefix(PREFIX)?.strip_suffix(EXTENSION)?;
	if name.is_empty() || segments.is_empty() {
		return None;
	}
	segments.push(name);
	Some(TraitKey::new(segments.join("::")))
}

/// Fragment path, relative to the fragment root, for `trait_key`.
pub fn fragment_path(trait_key: &TraitKey) -> PathBuf {
	let mut path = PathBuf::new();
	let mut segments: Vec<&str> = trait_key.segments().collect();
	let name = segments.pop().unwrap_or_default();
	for segment in segments {
		path.push(segment);
	}
	path.push(format!("{PREFIX}{name}{EXTENSION}"));
	path
}

#[cfg(test)]
mod tests {
	use rstest::rstest;

	use super::*;

	#[rstest]
	#[case("core/fmt/trait.Debug.js", Some("core::fmt::Debug"))]
	#[case("./minivm/trait.Visitor.js", Some("minivm::Visitor"))]
	#[case("core/fmt/struct.Formatter.js", None)]
	#[case("core/fmt/trait.Debug.json", None)]
	#[case("trait.Debug.js", None)]
	#[case("core/trait..js", None)]
	#[case("../core/trait.Debug.js", None)]
	fn maps_paths_to_trait_keys(#[case] path: &str, #[case] expected: Option<&str>) {
		let key = trait_key_from_path(Path::new(path));
		assert_eq!(key.as_ref().map(TraitKey::as_str), expected);
	}

	#[test]
	fn fragment_path_inverts_trait_key() {
		let key = TraitKey::new("core::fmt::Debug");
		let path = fragment_path(&key);
		assert_eq!(path, Path::new("core/fmt/trait.Debug.js"));
		assert_eq!(trait_key_from_path(&path), Some(key));
	}
}
