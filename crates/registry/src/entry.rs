//! Keys and entries carried by implementor payloads.
//!
//! Everything here is immutable once constructed and backed by `Arc<str>`, so
//! payloads can be shared between the registry, the page state and the
//! renderer without copying snippet text.

use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

macro_rules! string_key {
	($(#[$meta:meta])* $name:ident) => {
		$(#[$meta])*
		#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
		pub struct $name(Arc<str>);

		impl $name {
			pub fn new(value: impl Into<Arc<str>>) -> Self {
				Self(value.into())
			}

			#[inline]
			pub fn as_str(&self) -> &str {
				&self.0
			}
		}

		impl fmt::Debug for $name {
			fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
				write!(f, "{}({:?})", stringify!($name), &*self.0)
			}
		}

		impl fmt::Display for $name {
			fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
				f.write_str(&self.0)
			}
		}

		impl Borrow<str> for $name {
			fn borrow(&self) -> &str {
				&self.0
			}
		}

		impl AsRef<str> for $name {
			fn as_ref(&self) -> &str {
				&self.0
			}
		}

		impl From<&str> for $name {
			fn from(value: &str) -> Self {
				Self::new(value)
			}
		}

		impl From<String> for $name {
			fn from(value: String) -> Self {
				Self::new(value)
			}
		}
	};
}

string_key! {
	/// Fully qualified path of a trait, e.g. `core::fmt::Debug`.
	///
	/// Unique within one documentation build; used as the lookup key by the
	/// page state.
	TraitKey
}

string_key! {
	/// Identifier of the compiled unit that contributed a group of entries.
	Namespace
}

impl TraitKey {
	/// Path segments separated by `::`.
	pub fn segments(&self) -> impl Iterator<Item = &str> {
		self.0.split("::")
	}
}

/// One type's implementation of a trait, pre-rendered by the analyzer.
///
/// The markup is opaque: it is stored and handed back verbatim, never parsed
/// or escaped here.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ImplementorEntry {
	markup: Arc<str>,
	source_label: Option<Arc<str>>,
}

impl ImplementorEntry {
	pub fn new(markup: impl Into<Arc<str>>) -> Self {
		Self {
			markup: markup.into(),
			source_label: None,
		}
	}

	/// Attaches a source location label (e.g. `src/lib.rs:42`).
	pub fn with_source_label(mut self, label: impl Into<Arc<str>>) -> Self {
		self.source_label = Some(label.into());
		self
	}

	#[inline]
	pub fn markup(&self) -> &str {
		&self.markup
	}

	#[inline]
	pub fn source_label(&self) -> Option<&str> {
		self.source_label.as_deref()
	}
}

impl From<&str> for ImplementorEntry {
	fn from(markup: &str) -> Self {
		Self::new(markup)
	}
}

impl From<String> for ImplementorEntry {
	fn from(markup: String) -> Self {
		Self::new(markup)
	}
}
