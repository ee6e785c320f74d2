//! `implidx.toml` configuration.
//!
//! ```toml
//! [loader]
//! root = "target/doc/implementors"
//!
//! [page]
//! skip_namespace = "minivm"
//! empty_text = "No implementors."
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use implidx_page::RenderOptions;
use serde::Deserialize;

pub const DEFAULT_CONFIG_FILE: &str = "implidx.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
	pub loader: LoaderConfig,
	pub page: RenderOptions,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoaderConfig {
	/// Directory holding `a/b/trait.Name.js` fragments.
	pub root: PathBuf,
}

impl Default for LoaderConfig {
	fn default() -> Self {
		Self {
			root: PathBuf::from("implementors"),
		}
	}
}

impl Config {
	/// Loads `path`, or `./implidx.toml` if it exists, or defaults.
	///
	/// An explicitly named file must exist.
	pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
		let path = match path {
			Some(path) => path.to_path_buf(),
			None => {
				let default = PathBuf::from(DEFAULT_CONFIG_FILE);
				if !default.is_file() {
					tracing::debug!("no config file, using defaults");
					return Ok(Self::default());
				}
				default
			}
		};

		let text = fs::read_to_string(&path).with_context(|| format!("failed to read {}", path.display()))?;
		let config = Self::parse(&text).with_context(|| format!("invalid config {}", path.display()))?;
		tracing::debug!(path = %path.display(), "config loaded");
		Ok(config)
	}

	pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
		toml::from_str(text)
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	#[test]
	fn empty_file_is_all_defaults() {
		assert_eq!(Config::parse("").unwrap(), Config::default());
	}

	#[test]
	fn sections_override_defaults() {
		let config = Config::parse(
			r#"
			[loader]
			root = "doc/implementors"

			[page]
			skip_namespace = "minivm"
			heading = "Implementations"
			"#,
		)
		.unwrap();
		assert_eq!(config.loader.root, PathBuf::from("doc/implementors"));
		assert_eq!(config.page.skip_namespace.as_deref(), Some("minivm"));
		assert_eq!(config.page.heading, "Implementations");
		assert_eq!(config.page.empty_text, RenderOptions::default().empty_text);
	}

	#[test]
	fn unknown_keys_are_rejected() {
		assert!(Config::parse("[page]\ncolour = \"red\"\n").is_err());
	}

	#[test]
	fn explicit_missing_file_is_an_error() {
		let dir = tempfile::tempdir().unwrap();
		let err = Config::load(Some(&dir.path().join("missing.toml"))).unwrap_err();
		assert!(err.to_string().contains("failed to read"), "{err}");
	}

	#[test]
	fn explicit_file_is_loaded() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("implidx.toml");
		fs::write(&path, "[loader]\nroot = \"frags\"\n").unwrap();
		assert_eq!(Config::load(Some(&path)).unwrap().loader.root, PathBuf::from("frags"));
	}
}
