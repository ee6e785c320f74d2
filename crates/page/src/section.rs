//! The "Implementors" section of a trait page.

use std::fmt::Write;
use std::sync::Arc;

use implidx_registry::{ImplementorEntry, Namespace};
use serde::Deserialize;

/// Display state of one trait's implementor list.
///
/// None of the variants is an error: `NotLoaded` and `Empty` are ordinary
/// states the page renders explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Section {
	/// No payload for this trait has reached the page.
	NotLoaded,
	/// Payloads arrived but carry zero implementors.
	Empty,
	/// Merged groups in first-seen namespace order.
	Populated(Vec<NamespaceGroup>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceGroup {
	pub namespace: Namespace,
	pub entries: Arc<[ImplementorEntry]>,
}

impl Section {
	pub fn entries(&self) -> impl Iterator<Item = &ImplementorEntry> {
		let groups: &[NamespaceGroup] = match self {
			Section::Populated(groups) => groups,
			Section::NotLoaded | Section::Empty => &[],
		};
		groups.iter().flat_map(|group| group.entries.iter())
	}

	pub fn is_loaded(&self) -> bool {
		!matches!(self, Section::NotLoaded)
	}
}

/// Presentation knobs for [`render_section`].
///
/// Text fields are inserted verbatim, like entry markup.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderOptions {
	/// Section heading.
	pub heading: String,
	/// Shown when the trait is loaded with zero implementors.
	pub empty_text: String,
	/// Shown while no payload for the trait has arrived.
	pub not_loaded_text: String,
	/// Namespace omitted from the list, usually the documented crate whose
	/// own implementors are already rendered statically on the page.
	pub skip_namespace: Option<String>,
}

impl Default for RenderOptions {
	fn default() -> Self {
		Self {
			heading: "Implementors".to_string(),
			empty_text: "No implementors.".to_string(),
			not_loaded_text: "Implementors not loaded.".to_string(),
			skip_namespace: None,
		}
	}
}

/// Renders a section to HTML.
///
/// Entry markup and source labels are copied through untouched; the producer
/// guarantees they are safe for direct display.
pub fn render_section(section: &Section, options: &RenderOptions) -> String {
	let mut out = String::new();
	let _ = writeln!(out, r#"<h2 id="implementors" class="small-section-header">{}</h2>"#, options.heading);

	let groups: &[NamespaceGroup] = match section {
		Section::NotLoaded => {
			let _ = write!(out, r#"<p class="implementors-not-loaded">{}</p>"#, options.not_loaded_text);
			return out;
		}
		Section::Empty => &[],
		Section::Populated(groups) => groups.as_slice(),
	};

	let visible: Vec<&ImplementorEntry> = groups
		.iter()
		.filter(|group| options.skip_namespace.as_deref() != Some(group.namespace.as_str()))
		.flat_map(|group| group.entries.iter())
		.collect();

	if visible.is_empty() {
		let _ = write!(out, r#"<p class="implementors-empty">{}</p>"#, options.empty_text);
		return out;
	}

	out.push_str(r#"<ul class="item-list" id="implementors-list">"#);
	out.push('\n');
	for entry in visible {
		out.push_str("<li><code>");
		out.push_str(entry.markup());
		out.push_str("</code>");
		if let Some(label) = entry.source_label() {
			let _ = write!(out, r#"<span class="out-of-band">{label}</span>"#);
		}
		out.push_str("</li>\n");
	}
	out.push_str("</ul>");
	out
}

#[cfg(test)]
mod tests;
