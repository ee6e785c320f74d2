//! Per-trait merge of namespace groups.
//!
//! A re-registered namespace is a correction: its list replaces the earlier
//! one in place. Groups keep the position where their namespace was first
//! seen, so the merged order never depends on which fragment loaded last.

use std::sync::Arc;

use implidx_registry::{ImplementorEntry, ImplementorPayload, Namespace};
use indexmap::IndexMap;

/// What a merge did to one trait's groups.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MergeOutcome {
	/// Namespaces seen for the first time.
	pub added: usize,
	/// Namespaces whose list was replaced.
	pub replaced: usize,
}

/// Merged implementor groups for one trait.
#[derive(Debug, Default, Clone)]
pub struct TraitImplementors {
	groups: IndexMap<Namespace, Arc<[ImplementorEntry]>>,
}

impl TraitImplementors {
	pub fn new() -> Self {
		Self::default()
	}

	/// Folds one payload's groups into this trait.
	pub fn merge(&mut self, payload: &ImplementorPayload) -> MergeOutcome {
		let mut outcome = MergeOutcome::default();
		for (namespace, entries) in payload.groups() {
			match self.groups.insert(namespace.clone(), Arc::from(entries)) {
				Some(_) => outcome.replaced += 1,
				None => outcome.added += 1,
			}
		}
		outcome
	}

	/// Groups in first-seen namespace order.
	pub fn groups(&self) -> impl ExactSizeIterator<Item = (&Namespace, &Arc<[ImplementorEntry]>)> {
		self.groups.iter()
	}

	/// All entries, namespace groups concatenated in first-seen order.
	pub fn entries(&self) -> impl Iterator<Item = &ImplementorEntry> {
		self.groups.values().flat_map(|entries| entries.iter())
	}

	pub fn entry_count(&self) -> usize {
		self.groups.values().map(|entries| entries.len()).sum()
	}

	pub fn namespace_count(&self) -> usize {
		self.groups.len()
	}
}

#[cfg(test)]
mod tests;
