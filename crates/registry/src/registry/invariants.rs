#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, mpsc};
use std::thread;
use std::time::Duration;

use parking_lot::Mutex;

use super::{Registration, Registry};
use crate::{ConsumerRef, ImplementorPayload};

fn payload(trait_key: &str, namespace: &str, entries: &[&str]) -> Arc<ImplementorPayload> {
	Arc::new(ImplementorPayload::new(trait_key).with_group(namespace, entries.iter().copied()))
}

fn collector() -> (ConsumerRef, Arc<Mutex<Vec<Arc<ImplementorPayload>>>>) {
	let seen = Arc::new(Mutex::new(Vec::new()));
	let sink = Arc::clone(&seen);
	let consumer: ConsumerRef = Arc::new(move |p: Arc<ImplementorPayload>| sink.lock().push(p));
	(consumer, seen)
}

/// Invariant: no payload is lost or duplicated, wherever the install lands.
///
/// For `total` registrations with the consumer installed after `install_at`
/// of them, the consumer observes each payload allocation exactly once.
pub(crate) fn inv_no_loss(total: usize, install_at: usize) {
	let registry = Registry::new();
	let (consumer, seen) = collector();
	let sent: Vec<_> = (0..total)
		.map(|i| payload("core::fmt::Debug", &format!("crate{i}"), &["impl Debug for X"]))
		.collect();

	for (i, p) in sent.iter().enumerate() {
		if i == install_at {
			registry.install_consumer(Arc::clone(&consumer)).expect("first install");
		}
		registry.register(Arc::clone(p));
	}
	if install_at >= total {
		registry.install_consumer(Arc::clone(&consumer)).expect("first install");
	}

	let seen = seen.lock();
	assert_eq!(seen.len(), total, "consumer must see every payload once");
	for p in &sent {
		let hits = seen.iter().filter(|q| Arc::ptr_eq(p, *q)).count();
		assert_eq!(hits, 1, "payload {:?} delivered {hits} times", p.trait_key());
	}
	assert_eq!(registry.pending_len(), 0);
}

/// Invariant: delivery order equals arrival order across the install cut.
pub(crate) fn inv_order_preserved(total: usize, install_at: usize) {
	let registry = Registry::new();
	let (consumer, seen) = collector();

	for i in 0..total {
		if i == install_at {
			registry.install_consumer(Arc::clone(&consumer)).expect("first install");
		}
		registry.register(payload("core::fmt::Debug", &format!("crate{i}"), &[]));
	}
	if install_at >= total {
		registry.install_consumer(Arc::clone(&consumer)).expect("first install");
	}

	let order: Vec<String> = seen
		.lock()
		.iter()
		.map(|p| p.groups().next().map(|(ns, _)| ns.to_string()).unwrap_or_default())
		.collect();
	let expected: Vec<String> = (0..total).map(|i| format!("crate{i}")).collect();
	assert_eq!(order, expected);
}

/// Invariant: registrations from many threads racing the install are each
/// delivered exactly once, and every thread's own payloads stay in order.
pub(crate) fn inv_concurrent_install_race(threads: usize, per_thread: usize) {
	let registry = Arc::new(Registry::new());
	let (consumer, seen) = collector();

	let handles: Vec<_> = (0..threads)
		.map(|t| {
			let registry = Arc::clone(&registry);
			thread::spawn(move || {
				for i in 0..per_thread {
					let marker = i.to_string();
					let outcome = registry.register(payload("core::fmt::Debug", &format!("t{t}"), &[marker.as_str()]));
					assert_ne!(outcome, Registration::Queued, "only re-entrant calls may queue");
				}
			})
		})
		.collect();

	registry.install_consumer(consumer).expect("first install");
	for handle in handles {
		handle.join().expect("registering thread panicked");
	}

	let seen = seen.lock();
	assert_eq!(seen.len(), threads * per_thread);
	for t in 0..threads {
		let ns = format!("t{t}");
		let own: Vec<String> = seen
			.iter()
			.filter_map(|p| p.group(&ns))
			.map(|entries| entries[0].markup().to_string())
			.collect();
		let expected: Vec<String> = (0..per_thread).map(|i| i.to_string()).collect();
		assert_eq!(own, expected, "thread {t} payloads reordered");
	}
	assert_eq!(registry.stats().delivered, (threads * per_thread) as u64);
}

/// Invariant: a registration from another thread while a delivery is running
/// returns only after the consumer has seen its payload.
pub(crate) fn inv_cross_thread_register_waits(hold: Duration) {
	let registry = Arc::new(Registry::new());
	let seen = Arc::new(Mutex::new(Vec::<String>::new()));
	let (started_tx, started_rx) = mpsc::channel();
	let started_tx = Mutex::new(Some(started_tx));

	let consumer: ConsumerRef = {
		let seen = Arc::clone(&seen);
		Arc::new(move |p: Arc<ImplementorPayload>| {
			if p.trait_key().as_str() == "slow::Trait" {
				if let Some(tx) = started_tx.lock().take() {
					let _ = tx.send(());
				}
				thread::sleep(hold);
			}
			seen.lock().push(p.trait_key().to_string());
		})
	};
	registry.install_consumer(consumer).expect("first install");

	let slow = {
		let registry = Arc::clone(&registry);
		thread::spawn(move || registry.register(payload("slow::Trait", "a", &[])))
	};
	started_rx.recv().expect("slow delivery started");

	let outcome = registry.register(payload("fast::Trait", "b", &[]));
	let seen_at_return = seen.lock().clone();
	assert_eq!(outcome, Registration::Delivered);
	assert_eq!(seen_at_return, vec!["slow::Trait", "fast::Trait"]);

	assert_eq!(slow.join().expect("slow thread panicked"), Registration::Delivered);
	assert_eq!(registry.stats().delivered, 2);
}

/// Invariant: a consumer registering from inside `accept` sees the nested
/// payload after the current one, without deadlock.
pub(crate) fn inv_reentrant_fifo() {
	let registry = Arc::new(Registry::new());
	let order = Arc::new(Mutex::new(Vec::new()));
	let calls = Arc::new(AtomicUsize::new(0));
	let nested = Arc::new(Mutex::new(None));

	let consumer: ConsumerRef = {
		let registry = Arc::downgrade(&registry);
		let order = Arc::clone(&order);
		let calls = Arc::clone(&calls);
		let nested = Arc::clone(&nested);
		Arc::new(move |p: Arc<ImplementorPayload>| {
			order.lock().push(p.trait_key().to_string());
			if calls.fetch_add(1, Ordering::SeqCst) == 0
				&& let Some(registry) = registry.upgrade()
			{
				*nested.lock() = Some(registry.register(payload("nested::Trait", "inner", &[])));
			}
		})
	};

	registry.register(payload("first::Trait", "a", &[]));
	registry.register(payload("second::Trait", "b", &[]));
	registry.install_consumer(consumer).expect("first install");

	assert_eq!(
		*order.lock(),
		vec!["first::Trait", "second::Trait", "nested::Trait"],
		"nested registration must queue behind already-flushed payloads"
	);
	assert_eq!(*nested.lock(), Some(Registration::Queued));
}
