//! Fragment encoding in script form.

use std::fmt::Write;

use implidx_registry::{ImplementorEntry, ImplementorPayload};
use serde_json::{Value, json};

/// Encodes `payload` as a self-registering viewer script.
///
/// The script hands its table to `window.register_implementors` when the page
/// is ready, and parks it in `window.pending_implementors` otherwise.
pub fn encode(payload: &ImplementorPayload) -> String {
	let mut out = String::from("(function() {var implementors = {};\n");
	for (namespace, entries) in payload.groups() {
		let items: Vec<Value> = entries.iter().map(entry_value).collect();
		let _ = writeln!(
			out,
			"implementors[{}] = {};",
			Value::String(namespace.to_string()),
			Value::Array(items)
		);
	}
	out.push_str(concat!(
		"if (window.register_implementors) {\n",
		"    window.register_implementors(implementors);\n",
		"} else {\n",
		"    window.pending_implementors = implementors;\n",
		"}\n",
		"})()\n",
	));
	out
}

fn entry_value(entry: &ImplementorEntry) -> Value {
	match entry.source_label() {
		None => Value::String(entry.markup().to_string()),
		Some(label) => json!({ "markup": entry.markup(), "source_label": label }),
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;
	use crate::decode;

	#[test]
	fn encodes_script_form() {
		let payload = ImplementorPayload::new("core::fmt::Debug").with_group("minivm", ["impl Debug for \"Q\""]);
		let script = encode(&payload);
		assert!(script.starts_with("(function() {var implementors = {};\n"));
		assert!(script.contains(r#"implementors["minivm"] = ["impl Debug for \"Q\""];"#), "{script}");
		assert!(script.contains("window.pending_implementors = implementors;"));
	}

	#[test]
	fn labelled_entries_survive_decode() {
		let payload = ImplementorPayload::new("T")
			.with_group("a", [ImplementorEntry::new("impl T for X").with_source_label("src/x.rs:1")])
			.with_group("b", Vec::<ImplementorEntry>::new());

		let decoded = decode("T", &encode(&payload)).unwrap();
		assert_eq!(decoded, payload);
	}
}
