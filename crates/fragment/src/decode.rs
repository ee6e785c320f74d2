//! Fragment decoding.
//!
//! Two source forms are accepted:
//!
//! - **Script form**, as emitted for the viewer: one
//!   `implementors[<json string>] = <array>;` assignment per namespace inside
//!   a self-invoking function. Array literals may end with a trailing comma.
//! - **JSON form**: a single object mapping namespace to array.
//!
//! Array elements are either snippet strings or
//! `{"markup": "...", "source_label": "..."}` records.
//!
//! Decoding is all-or-nothing. Any shape error rejects the whole fragment so
//! a malformed file never contributes a partial payload.

use implidx_registry::{ImplementorEntry, ImplementorPayload, TraitKey};
use serde_json::Value;

use crate::error::FragmentError;

const ASSIGN_PREFIX: &str = "implementors[";
const TABLE_NAME: &str = "implementors";

type Groups = Vec<(String, Vec<ImplementorEntry>)>;

/// Decodes fragment `text` into a payload for `trait_key`.
pub fn decode(trait_key: impl Into<TraitKey>, text: &str) -> Result<ImplementorPayload, FragmentError> {
	let text = text.strip_prefix('\u{feff}').unwrap_or(text);
	let groups = if text.trim_start().starts_with('{') {
		decode_json(text)?
	} else {
		decode_script(text)?
	};

	let mut payload = ImplementorPayload::new(trait_key);
	for (namespace, entries) in groups {
		payload = payload.with_group(namespace, entries);
	}
	Ok(payload)
}

fn decode_json(text: &str) -> Result<Groups, FragmentError> {
	let value: Value =
		serde_json::from_str(text).map_err(|e| FragmentError::malformed(format!("invalid JSON fragment: {e}")))?;
	let Value::Object(map) = value else {
		return Err(FragmentError::malformed("top-level JSON value is not an object"));
	};
	map.into_iter()
		.map(|(namespace, value)| {
			let entries = entries_of(&namespace, value)?;
			Ok((namespace, entries))
		})
		.collect()
}

fn decode_script(text: &str) -> Result<Groups, FragmentError> {
	if !text.contains(TABLE_NAME) {
		return Err(FragmentError::malformed("no implementors table in fragment"));
	}

	let mut groups = Vec::new();
	let mut rest = text;
	while let Some(after) = next_assignment(rest) {
		let (literal, after) = scan_string_literal(after)?;
		let namespace: String = serde_json::from_str(literal)
			.map_err(|e| FragmentError::malformed(format!("bad namespace literal {literal}: {e}")))?;

		let after = after
			.trim_start()
			.strip_prefix(']')
			.and_then(|s| s.trim_start().strip_prefix('='))
			.ok_or_else(|| FragmentError::malformed(format!("expected `] =` after namespace {namespace:?}")))?;

		let (expr, after) = scan_expression(after)?;
		let value = parse_array_literal(&namespace, expr)?;
		let entries = entries_of(&namespace, value)?;
		groups.push((namespace, entries));
		rest = after;
	}
	Ok(groups)
}

/// Finds the next `implementors[` that starts a statement-level reference to
/// the table and returns the text after it.
///
/// Comments and string literals are skipped, and a match preceded by an
/// identifier character or `.` (`window.pending_implementors[`) is not the
/// table.
fn next_assignment(src: &str) -> Option<&str> {
	let bytes = src.as_bytes();
	let mut i = 0;
	while i < bytes.len() {
		match bytes[i] {
			b'/' if bytes.get(i + 1) == Some(&b'/') => {
				i += src[i..].find('\n')?;
			}
			b'/' if bytes.get(i + 1) == Some(&b'*') => {
				i += 2 + src[i + 2..].find("*/")? + 2;
			}
			quote @ (b'"' | b'\'') => {
				i += 1;
				while i < bytes.len() && bytes[i] != quote {
					i += if bytes[i] == b'\\' { 2 } else { 1 };
				}
				i += 1;
			}
			_ if bytes[i..].starts_with(ASSIGN_PREFIX.as_bytes()) && starts_identifier(bytes, i) => {
				return Some(&src[i + ASSIGN_PREFIX.len()..]);
			}
			_ => i += 1,
		}
	}
	None
}

fn starts_identifier(bytes: &[u8], at: usize) -> bool {
	match at.checked_sub(1).map(|prev| bytes[prev]) {
		None => true,
		Some(b) => !(b.is_ascii_alphanumeric() || matches!(b, b'_' | b'$' | b'.')),
	}
}

/// Splits a leading JSON string literal off `src`.
fn scan_string_literal(src: &str) -> Result<(&str, &str), FragmentError> {
	let src = src.trim_start();
	if !src.starts_with('"') {
		return Err(FragmentError::malformed("namespace key is not a string literal"));
	}
	let mut escaped = false;
	for (i, b) in src.bytes().enumerate().skip(1) {
		match b {
			_ if escaped => escaped = false,
			b'\\' => escaped = true,
			b'"' => return Ok((&src[..=i], &src[i + 1..])),
			_ => {}
		}
	}
	Err(FragmentError::malformed("unterminated namespace literal"))
}

/// Splits the right-hand side of an assignment off `src`.
///
/// The expression ends at the first `;` outside strings and brackets, or where
/// an unmatched closing bracket begins (the end of the enclosing function).
fn scan_expression(src: &str) -> Result<(&str, &str), FragmentError> {
	let mut depth = 0usize;
	let mut in_string = false;
	let mut escaped = false;
	for (i, b) in src.bytes().enumerate() {
		if in_string {
			match b {
				_ if escaped => escaped = false,
				b'\\' => escaped = true,
				b'"' => in_string = false,
				_ => {}
			}
			continue;
		}
		match b {
			b'"' => in_string = true,
			b'[' | b'{' | b'(' => depth += 1,
			b']' | b'}' | b')' if depth == 0 => return Ok((&src[..i], &src[i..])),
			b']' | b'}' | b')' => depth -= 1,
			b';' if depth == 0 => return Ok((&src[..i], &src[i + 1..])),
			_ => {}
		}
	}
	if in_string || depth > 0 {
		return Err(FragmentError::malformed("unterminated implementor list"));
	}
	Ok((src, ""))
}

/// Parses an array literal, tolerating a trailing comma before `]`.
fn parse_array_literal(namespace: &str, expr: &str) -> Result<Value, FragmentError> {
	let expr = expr.trim();
	let Some(body) = expr.strip_prefix('[').and_then(|s| s.strip_suffix(']')) else {
		return Err(FragmentError::malformed(format!(
			"value for namespace {namespace:?} is not an array"
		)));
	};
	let body = body.trim_end();
	let body = match body.strip_suffix(',') {
		Some(rest) if rest.trim().is_empty() => {
			return Err(FragmentError::malformed(format!(
				"list for namespace {namespace:?} is a lone hole"
			)));
		}
		Some(rest) => rest,
		None => body,
	};
	serde_json::from_str(&format!("[{body}]"))
		.map_err(|e| FragmentError::malformed(format!("invalid list for namespace {namespace:?}: {e}")))
}

fn entries_of(namespace: &str, value: Value) -> Result<Vec<ImplementorEntry>, FragmentError> {
	let Value::Array(items) = value else {
		return Err(FragmentError::malformed(format!(
			"value for namespace {namespace:?} is not an array"
		)));
	};
	items
		.into_iter()
		.enumerate()
		.map(|(i, item)| entry_of(item).ok_or_else(|| {
			FragmentError::malformed(format!("entry {i} of namespace {namespace:?} is not a snippet"))
		}))
		.collect()
}

fn entry_of(item: Value) -> Option<ImplementorEntry> {
	match item {
		Value::String(markup) => Some(ImplementorEntry::new(markup)),
		Value::Object(mut record) => {
			let Value::String(markup) = record.remove("markup")? else {
				return None;
			};
			let entry = ImplementorEntry::new(markup);
			match record.remove("source_label") {
				None | Some(Value::Null) => Some(entry),
				Some(Value::String(label)) => Some(entry.with_source_label(label)),
				Some(_) => None,
			}
		}
		_ => None,
	}
}
