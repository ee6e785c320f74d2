//! Page state fed by the implementor registry.
//!
//! [`Page`] is the consumer the page installs into a
//! [`Registry`](implidx_registry::Registry). Every accepted payload is merged
//! into per-trait state; if the merge touches the trait currently on display,
//! its section is rendered again and published through an [`ArcSwap`], so
//! readers never wait on a merge.
//!
//! Lock order is `displayed` before `traits`.

use std::sync::Arc;

use arc_swap::ArcSwap;
use implidx_registry::{
	ImplementorConsumer, ImplementorEntry, ImplementorPayload, InstallOutcome, Registry, RegistryError, TraitKey,
};
use parking_lot::RwLock;
use rustc_hash::FxHashMap as HashMap;

use crate::merge::TraitImplementors;
use crate::section::{NamespaceGroup, RenderOptions, Section, render_section};

/// Latest rendering of the displayed trait's section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedSection {
	/// Trait on display, `None` before the first [`Page::display`].
	pub trait_key: Option<TraitKey>,
	pub html: String,
	/// Incremented on every render.
	pub revision: u64,
}

/// Summary row for one known trait.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraitSummary {
	pub trait_key: TraitKey,
	pub namespaces: usize,
	pub entries: usize,
}

pub struct Page {
	options: RenderOptions,
	displayed: RwLock<Option<TraitKey>>,
	traits: RwLock<HashMap<TraitKey, TraitImplementors>>,
	rendered: ArcSwap<RenderedSection>,
}

impl std::fmt::Debug for Page {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Page")
			.field("displayed", &*self.displayed.read())
			.field("traits", &self.traits.read().len())
			.field("revision", &self.rendered.load().revision)
			.finish()
	}
}

impl Default for Page {
	fn default() -> Self {
		Self::new(RenderOptions::default())
	}
}

impl Page {
	pub fn new(options: RenderOptions) -> Self {
		Self {
			options,
			displayed: RwLock::new(None),
			traits: RwLock::new(HashMap::default()),
			rendered: ArcSwap::from_pointee(RenderedSection::default()),
		}
	}

	/// Installs this page as the registry's consumer.
	pub fn attach(self: &Arc<Self>, registry: &Registry) -> Result<InstallOutcome, RegistryError> {
		registry.install_consumer(Arc::clone(self) as Arc<dyn ImplementorConsumer>)
	}

	/// Merged implementors for `trait_key`, namespace groups in first-seen
	/// order. Empty when the trait has no implementors or has not loaded yet.
	pub fn get_implementors(&self, trait_key: &str) -> Vec<ImplementorEntry> {
		self.traits
			.read()
			.get(trait_key)
			.map(|merged| merged.entries().cloned().collect())
			.unwrap_or_default()
	}

	/// Display state for `trait_key`.
	pub fn section(&self, trait_key: &str) -> Section {
		section_of(self.traits.read().get(trait_key))
	}

	/// Known traits sorted by key.
	pub fn summary(&self) -> Vec<TraitSummary> {
		let traits = self.traits.read();
		let mut rows: Vec<_> = traits
			.iter()
			.map(|(key, merged)| TraitSummary {
				trait_key: key.clone(),
				namespaces: merged.namespace_count(),
				entries: merged.entry_count(),
			})
			.collect();
		rows.sort_by(|a, b| a.trait_key.cmp(&b.trait_key));
		rows
	}

	/// Switches the displayed trait and renders its section immediately.
	pub fn display(&self, trait_key: impl Into<TraitKey>) -> Arc<RenderedSection> {
		let trait_key = trait_key.into();
		let mut displayed = self.displayed.write();
		let traits = self.traits.read();
		let section = section_of(traits.get(trait_key.as_str()));
		*displayed = Some(trait_key.clone());
		self.publish(trait_key, &section)
	}

	/// Latest rendered section.
	pub fn rendered(&self) -> Arc<RenderedSection> {
		self.rendered.load_full()
	}

	fn merge(&self, payload: &ImplementorPayload) {
		let displayed = self.displayed.read();
		let mut traits = self.traits.write();
		let merged = traits.entry(payload.trait_key().clone()).or_default();
		let outcome = merged.merge(payload);
		tracing::debug!(
			trait_key = %payload.trait_key(),
			added = outcome.added,
			replaced = outcome.replaced,
			entries = merged.entry_count(),
			"page.merged"
		);

		if displayed.as_ref() == Some(payload.trait_key()) {
			let section = section_of(Some(&*merged));
			self.publish(payload.trait_key().clone(), &section);
		}
	}

	fn publish(&self, trait_key: TraitKey, section: &Section) -> Arc<RenderedSection> {
		let html = render_section(section, &self.options);
		let revision = self.rendered.load().revision + 1;
		let rendered = Arc::new(RenderedSection {
			trait_key: Some(trait_key),
			html,
			revision,
		});
		self.rendered.store(Arc::clone(&rendered));
		tracing::trace!(revision, "page.rendered");
		rendered
	}
}

impl ImplementorConsumer for Page {
	fn accept(&self, payload: Arc<ImplementorPayload>) {
		self.merge(&payload);
	}
}

fn section_of(merged: Option<&TraitImplementors>) -> Section {
	let Some(merged) = merged else {
		return Section::NotLoaded;
	};
	if merged.entry_count() == 0 {
		return Section::Empty;
	}
	Section::Populated(
		merged
			.groups()
			.map(|(namespace, entries)| NamespaceGroup {
				namespace: namespace.clone(),
				entries: Arc::clone(entries),
			})
			.collect(),
	)
}
