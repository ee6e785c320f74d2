use std::path::PathBuf;

/// Fragment decoding and loading errors.
#[derive(Debug, thiserror::Error)]
pub enum FragmentError {
	/// The fragment does not have the expected shape. Nothing from it is
	/// registered.
	#[error("malformed implementor payload: {reason}")]
	Malformed { reason: String },

	#[error("fragment root {} is not a directory", path.display())]
	MissingRoot { path: PathBuf },

	#[error("failed to read {}: {source}", path.display())]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},
}

impl FragmentError {
	pub(crate) fn malformed(reason: impl Into<String>) -> Self {
		Self::Malformed { reason: reason.into() }
	}

	pub fn is_malformed(&self) -> bool {
		matches!(self, Self::Malformed { .. })
	}
}
