use pretty_assertions::assert_eq;
use rstest::rstest;

use super::*;

fn group(namespace: &str, markups: &[&str]) -> NamespaceGroup {
	NamespaceGroup {
		namespace: Namespace::new(namespace),
		entries: markups.iter().map(|m| ImplementorEntry::new(*m)).collect(),
	}
}

#[test]
fn populated_section_inserts_markup_verbatim() {
	let markup = r#"impl <a class="trait" href="core/fmt/trait.Debug.html">Debug</a> for <a class="enum" href="minivm/enum.Instruction.html">Instruction</a>"#;
	let section = Section::Populated(vec![group("minivm", &[markup])]);

	let html = render_section(&section, &RenderOptions::default());
	let expected = format!(
		"<h2 id=\"implementors\" class=\"small-section-header\">Implementors</h2>\n\
		 <ul class=\"item-list\" id=\"implementors-list\">\n\
		 <li><code>{markup}</code></li>\n\
		 </ul>"
	);
	assert_eq!(html, expected);
}

#[rstest]
#[case::not_loaded(Section::NotLoaded, "implementors-not-loaded", "Implementors not loaded.")]
#[case::empty(Section::Empty, "implementors-empty", "No implementors.")]
fn placeholder_states_are_distinct(#[case] section: Section, #[case] class: &str, #[case] text: &str) {
	let html = render_section(&section, &RenderOptions::default());
	assert!(html.ends_with(&format!(r#"<p class="{class}">{text}</p>"#)), "{html}");
	assert!(!html.contains("implementors-list"));
}

#[test]
fn skipped_namespace_is_omitted_from_list() {
	let section = Section::Populated(vec![group("minivm", &["impl A"]), group("other", &["impl B"])]);
	let options = RenderOptions {
		skip_namespace: Some("minivm".to_string()),
		..RenderOptions::default()
	};

	let html = render_section(&section, &options);
	assert!(!html.contains("impl A"));
	assert!(html.contains("<li><code>impl B</code></li>"));
}

#[test]
fn skipping_the_only_namespace_renders_empty_state() {
	let section = Section::Populated(vec![group("minivm", &["impl A"])]);
	let options = RenderOptions {
		skip_namespace: Some("minivm".to_string()),
		..RenderOptions::default()
	};
	assert!(render_section(&section, &options).contains("implementors-empty"));
}

#[test]
fn source_label_follows_the_code_block() {
	let section = Section::Populated(vec![NamespaceGroup {
		namespace: Namespace::new("minivm"),
		entries: Arc::from(vec![ImplementorEntry::new("impl A").with_source_label("src/a.rs:3")]),
	}]);
	let html = render_section(&section, &RenderOptions::default());
	assert!(html.contains(r#"<li><code>impl A</code><span class="out-of-band">src/a.rs:3</span></li>"#));
}

#[test]
fn section_entries_flatten_groups() {
	let section = Section::Populated(vec![group("a", &["1", "2"]), group("b", &["3"])]);
	let all: Vec<_> = section.entries().map(ImplementorEntry::markup).collect();
	assert_eq!(all, vec!["1", "2", "3"]);
	assert!(section.is_loaded());
	assert_eq!(Section::NotLoaded.entries().count(), 0);
	assert!(!Section::NotLoaded.is_loaded());
	assert!(Section::Empty.is_loaded());
}

#[test]
fn options_deserialize_with_defaults() {
	let options: RenderOptions = toml::from_str(r#"skip_namespace = "minivm""#).unwrap();
	assert_eq!(options.skip_namespace.as_deref(), Some("minivm"));
	assert_eq!(options.heading, "Implementors");
}
