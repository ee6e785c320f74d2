use std::fs;

use implidx_registry::RegistryPhase;
use pretty_assertions::assert_eq;

use super::*;
use crate::encode::encode;

fn write(root: &Path, relative: &str, text: &str) {
	let path = root.join(relative);
	fs::create_dir_all(path.parent().unwrap()).unwrap();
	fs::write(path, text).unwrap();
}

fn fragment(trait_key: &str, namespace: &str, markup: &str) -> String {
	encode(&ImplementorPayload::new(trait_key).with_group(namespace, [markup]))
}

#[test]
fn scan_finds_trait_fragments_sorted() {
	let dir = tempfile::tempdir().unwrap();
	write(dir.path(), "std/io/trait.Read.js", &fragment("std::io::Read", "a", "impl Read"));
	write(dir.path(), "core/fmt/trait.Debug.js", &fragment("core::fmt::Debug", "a", "impl Debug"));
	write(dir.path(), "core/fmt/struct.Formatter.js", "ignored");
	write(dir.path(), "README.md", "ignored");

	let tree = FragmentTree::scan(dir.path()).unwrap();
	let keys: Vec<_> = tree.files().iter().map(|f| f.trait_key.to_string()).collect();
	assert_eq!(keys, vec!["core::fmt::Debug", "std::io::Read"]);
	assert_eq!(tree.len(), 2);
	assert_eq!(tree.root(), dir.path());
}

#[test]
fn scan_of_root_without_fragments_is_empty() {
	let dir = tempfile::tempdir().unwrap();
	write(dir.path(), "core/fmt/struct.Formatter.js", "ignored");

	let tree = FragmentTree::scan(dir.path()).unwrap();
	assert!(tree.is_empty());
	assert!(tree.load().payloads.is_empty());
}

#[test]
fn scan_rejects_missing_root() {
	let dir = tempfile::tempdir().unwrap();
	let err = FragmentTree::scan(dir.path().join("nope")).unwrap_err();
	assert!(matches!(err, FragmentError::MissingRoot { .. }));
}

#[test]
fn load_collects_failures_without_stopping() {
	let dir = tempfile::tempdir().unwrap();
	write(dir.path(), "a/trait.Good.js", &fragment("a::Good", "a", "impl Good"));
	write(dir.path(), "a/trait.Bad.js", r#"var implementors = {}; implementors["a"] = 42;"#);
	write(dir.path(), "b/trait.AlsoGood.js", &fragment("b::AlsoGood", "b", "impl AlsoGood"));

	let report = FragmentTree::scan(dir.path()).unwrap().load();
	assert!(!report.is_clean());
	assert_eq!(report.payloads.len(), 2);
	assert_eq!(report.failures.len(), 1);
	assert!(report.failures[0].0.ends_with("a/trait.Bad.js"));
	assert!(report.failures[0].1.is_malformed());
}

#[test]
fn loaded_payload_trait_key_comes_from_path() {
	let dir = tempfile::tempdir().unwrap();
	write(dir.path(), "core/fmt/trait.Debug.js", r#"{"minivm": ["impl Debug for Token"]}"#);

	let report = FragmentTree::scan(dir.path()).unwrap().load();
	assert!(report.is_clean());
	assert_eq!(report.payloads[0].trait_key().as_str(), "core::fmt::Debug");
}

#[test]
fn malformed_fragment_never_reaches_registry() {
	let registry = Registry::new();
	let err = register_fragment(&registry, "T", r#"var implementors = {}; implementors["a"] = [1];"#).unwrap_err();

	assert!(err.is_malformed());
	assert_eq!(registry.pending_len(), 0);
	assert_eq!(registry.stats().registered, 0);
	assert_eq!(registry.phase(), RegistryPhase::AwaitingConsumer);
}

#[test]
fn well_formed_fragment_is_buffered() {
	let registry = Registry::new();
	let outcome = register_fragment(&registry, "T", &fragment("T", "crateA", "impl T for X")).unwrap();
	assert_eq!(outcome, Registration::Buffered { position: 0 });
	assert_eq!(registry.pending_len(), 1);
}
