//! Per-fragment implementor payloads.

use indexmap::IndexMap;

use crate::entry::{ImplementorEntry, Namespace, TraitKey};

/// Implementor lists for one trait, grouped by contributing namespace.
///
/// Groups keep insertion order. Adding a namespace twice while building
/// replaces the earlier list but keeps its original position, matching the
/// behaviour of re-assigning a key in a fragment script.
///
/// A payload is never mutated after construction; the registry shares it as
/// `Arc<ImplementorPayload>`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImplementorPayload {
	trait_key: TraitKey,
	groups: IndexMap<Namespace, Vec<ImplementorEntry>>,
}

impl ImplementorPayload {
	/// Creates a payload with no namespace groups.
	pub fn new(trait_key: impl Into<TraitKey>) -> Self {
		Self {
			trait_key: trait_key.into(),
			groups: IndexMap::new(),
		}
	}

	/// Adds (or replaces) the entry list for `namespace`.
	pub fn with_group<I, E>(mut self, namespace: impl Into<Namespace>, entries: I) -> Self
	where
		I: IntoIterator<Item = E>,
		E: Into<ImplementorEntry>,
	{
		self.groups
			.insert(namespace.into(), entries.into_iter().map(Into::into).collect());
		self
	}

	#[inline]
	pub fn trait_key(&self) -> &TraitKey {
		&self.trait_key
	}

	/// Namespace groups in insertion order.
	pub fn groups(&self) -> impl ExactSizeIterator<Item = (&Namespace, &[ImplementorEntry])> {
		self.groups.iter().map(|(ns, entries)| (ns, entries.as_slice()))
	}

	pub fn group(&self, namespace: &str) -> Option<&[ImplementorEntry]> {
		self.groups.get(namespace).map(Vec::as_slice)
	}

	pub fn namespace_count(&self) -> usize {
		self.groups.len()
	}

	/// Total entries across all groups.
	pub fn entry_count(&self) -> usize {
		self.groups.values().map(Vec::len).sum()
	}

	/// True when the payload carries no namespace groups at all.
	///
	/// A payload with groups that are all empty is not empty: it still tells
	/// the page that the trait is loaded.
	pub fn is_empty(&self) -> bool {
		self.groups.is_empty()
	}
}
