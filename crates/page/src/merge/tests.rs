use pretty_assertions::assert_eq;

use super::*;

fn markups(merged: &TraitImplementors) -> Vec<&str> {
	merged.entries().map(ImplementorEntry::markup).collect()
}

#[test]
fn reregistered_namespace_replaces_its_list() {
	let mut merged = TraitImplementors::new();
	let first = ImplementorPayload::new("T").with_group("crateA", ["impl T for X"]);
	let second = ImplementorPayload::new("T").with_group("crateA", ["impl T for X", "impl T for Y"]);

	assert_eq!(merged.merge(&first), MergeOutcome { added: 1, replaced: 0 });
	assert_eq!(merged.merge(&second), MergeOutcome { added: 0, replaced: 1 });

	assert_eq!(markups(&merged), vec!["impl T for X", "impl T for Y"]);
	assert_eq!(merged.entry_count(), 2);
}

#[test]
fn namespaces_concatenate_in_first_seen_order() {
	let mut merged = TraitImplementors::new();
	merged.merge(&ImplementorPayload::new("T").with_group("crateA", ["impl T for A"]));
	merged.merge(&ImplementorPayload::new("T").with_group("crateB", ["impl T for B"]));
	// A later correction of crateA keeps crateA's original slot.
	merged.merge(&ImplementorPayload::new("T").with_group("crateA", ["impl T for A2"]));

	assert_eq!(markups(&merged), vec!["impl T for A2", "impl T for B"]);
	let order: Vec<_> = merged.groups().map(|(ns, _)| ns.as_str()).collect();
	assert_eq!(order, vec!["crateA", "crateB"]);
}

#[test]
fn group_internal_order_is_preserved() {
	let mut merged = TraitImplementors::new();
	merged.merge(&ImplementorPayload::new("T").with_group("crateA", ["c", "a", "b"]));
	assert_eq!(markups(&merged), vec!["c", "a", "b"]);
}

#[test]
fn replacing_with_empty_list_keeps_namespace_slot() {
	let mut merged = TraitImplementors::new();
	merged.merge(&ImplementorPayload::new("T").with_group("crateA", ["impl T for X"]));
	merged.merge(&ImplementorPayload::new("T").with_group("crateA", Vec::<&str>::new()));

	assert_eq!(merged.namespace_count(), 1);
	assert_eq!(merged.entry_count(), 0);
}
