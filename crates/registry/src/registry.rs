#![cfg_attr(doc, allow(rustdoc::private_intra_doc_links))]
//! Implementor registry with pending-payload buffering.
//!
//! # Role
//!
//! Fragments and the page that consumes their payloads start up in no
//! particular order. The registry accepts payloads at any time, buffers the
//! ones that arrive before a consumer exists, and flushes them exactly once
//! when the consumer is installed.
//!
//! # State machine
//!
//! | Phase | Holds | Leaves via |
//! |-------|-------|------------|
//! | [`RegistryPhase::AwaitingConsumer`] | pending payloads (FIFO) | [`Registry::install_consumer`] |
//! | [`RegistryPhase::Attached`] | the consumer, an in-flight delivery queue | never |
//!
//! Installation is the only transition. It moves every pending payload to the
//! in-flight queue under the state lock, so a registration racing the install
//! lands on exactly one side of the cut.
//!
//! # Delivery
//!
//! The consumer is never called with the state lock held. Whichever call finds
//! the in-flight queue idle becomes the deliverer and drains it. Calls from
//! other threads that arrive meanwhile enqueue behind it and block on a
//! condvar until their own payload has been delivered, so they still return
//! [`Registration::Delivered`]. Re-entrant calls from inside the consumer run
//! on the deliverer thread and cannot wait; they enqueue and return
//! [`Registration::Queued`].
//!
//! A consumer must not block on another thread that registers into the same
//! registry: that thread waits for the deliverer, which waits for it.
//!
//! # Invariants
//!
//! - Must deliver every payload exactly once after installation.
//!   - Enforced in: [`Registry::install_consumer`], [`Registry::pump`].
//!   - Tested by: `invariants::inv_no_loss`, `invariants::inv_concurrent_install_race`.
//!   - Failure symptom: implementors missing from, or doubled in, the page.
//!
//! - Must deliver in arrival order across the install cut.
//!   - Enforced in: [`Registry::register`] (append-only queues).
//!   - Tested by: `invariants::inv_order_preserved`.
//!   - Failure symptom: namespace groups render in load-completion order.
//!
//! - Attached state never holds pending payloads.
//!   - Enforced in: [`Registry::install_consumer`] (`mem::take` of pending).
//!   - Tested by: `tests::buffered_then_installed_flushes_once`.
//!   - Failure symptom: payloads stuck in the buffer after attach.
//!
//! - Idle delivery means an empty in-flight queue.
//!   - Enforced in: [`Registry::pump`] (deliverer cleared only on empty pop).
//!   - Tested by: `tests::reentrant_register_is_queued_behind_current`.
//!   - Failure symptom: payloads stranded in the in-flight queue.
//!
//! - Outside the deliverer thread, [`Registration::Delivered`] means the
//!   consumer has already seen the payload.
//!   - Enforced in: [`Registry::register`] (ticket wait on `progress`).
//!   - Tested by: `invariants::inv_cross_thread_register_waits`.
//!   - Failure symptom: a loader reports success before the page merged it.

use std::collections::VecDeque;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::thread::{self, ThreadId};

use parking_lot::{Condvar, Mutex};

use crate::consumer::{ConsumerRef, same_consumer};
use crate::error::RegistryError;
use crate::payload::ImplementorPayload;

/// Default label used in diagnostics.
pub const DEFAULT_LABEL: &str = "implementors";

/// Externally observable registry phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryPhase {
	/// No consumer yet; payloads are buffered.
	AwaitingConsumer,
	/// Consumer installed; payloads are forwarded.
	Attached,
}

/// Outcome of [`Registry::register`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
	/// No consumer yet. `position` is the payload's index in the pending buffer.
	Buffered { position: usize },
	/// Forwarded to the consumer before the call returned.
	Delivered,
	/// Registered from inside the consumer; delivered right after the current payload.
	Queued,
}

/// Outcome of a successful [`Registry::install_consumer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallOutcome {
	/// Consumer attached; `flushed` buffered payloads were handed to it.
	Installed { flushed: usize },
	/// The same consumer was already attached; nothing changed.
	AlreadyInstalled,
}

/// Counters for instrumentation.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RegistryStats {
	/// Registration calls accepted.
	pub registered: u64,
	/// Registrations that landed in the pending buffer.
	pub buffered: u64,
	/// Consumer invocations that returned normally.
	pub delivered: u64,
	/// Consumer invocations that panicked.
	pub consumer_panics: u64,
	/// Distinct-consumer installs that were rejected.
	pub rejected_installs: u64,
}

struct Attached {
	consumer: ConsumerRef,
	inflight: VecDeque<Arc<ImplementorPayload>>,
	/// Thread draining `inflight`, `None` when idle.
	deliverer: Option<ThreadId>,
	/// Payloads ever pushed to `inflight`.
	enqueued: u64,
	/// Payloads handed to the consumer, panicked or not.
	completed: u64,
}

enum Step {
	Deliver(ConsumerRef),
	Queued,
	Wait(u64),
}

fn completed_through(state: &State, ticket: u64) -> bool {
	match state {
		State::Attached(attached) => attached.completed >= ticket,
		State::AwaitingConsumer { .. } => true,
	}
}

enum State {
	AwaitingConsumer { pending: Vec<Arc<ImplementorPayload>> },
	Attached(Attached),
}

struct Inner {
	state: State,
	stats: RegistryStats,
}

/// Document-scoped registry of implementor payloads.
///
/// Create one per document and share it (usually as `Arc<Registry>`) between
/// the fragment loader and the page. Dropping it discards everything,
/// including payloads that never found a consumer.
pub struct Registry {
	label: &'static str,
	inner: Mutex<Inner>,
	/// Signalled each time a payload completes delivery.
	progress: Condvar,
}

impl Default for Registry {
	fn default() -> Self {
		Self::new()
	}
}

impl std::fmt::Debug for Registry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let inner = self.inner.lock();
		let (phase, queued) = match &inner.state {
			State::AwaitingConsumer { pending } => (RegistryPhase::AwaitingConsumer, pending.len()),
			State::Attached(attached) => (RegistryPhase::Attached, attached.inflight.len()),
		};
		f.debug_struct("Registry")
			.field("label", &self.label)
			.field("phase", &phase)
			.field("queued", &queued)
			.field("stats", &inner.stats)
			.finish()
	}
}

impl Registry {
	/// Creates an empty registry awaiting its consumer.
	pub fn new() -> Self {
		Self::with_label(DEFAULT_LABEL)
	}

	/// Creates an empty registry with a diagnostic label.
	pub fn with_label(label: &'static str) -> Self {
		Self {
			label,
			inner: Mutex::new(Inner {
				state: State::AwaitingConsumer { pending: Vec::new() },
				stats: RegistryStats::default(),
			}),
			progress: Condvar::new(),
		}
	}

	pub fn label(&self) -> &'static str {
		self.label
	}

	pub fn phase(&self) -> RegistryPhase {
		match self.inner.lock().state {
			State::AwaitingConsumer { .. } => RegistryPhase::AwaitingConsumer,
			State::Attached(_) => RegistryPhase::Attached,
		}
	}

	pub fn is_attached(&self) -> bool {
		self.phase() == RegistryPhase::Attached
	}

	/// Number of payloads waiting for a consumer. Always zero once attached.
	pub fn pending_len(&self) -> usize {
		match &self.inner.lock().state {
			State::AwaitingConsumer { pending } => pending.len(),
			State::Attached(_) => 0,
		}
	}

	pub fn stats(&self) -> RegistryStats {
		self.inner.lock().stats
	}

	/// Accepts a payload from a fragment.
	///
	/// Buffers it when no consumer is installed, otherwise forwards it and
	/// returns once the consumer has seen it. A call from another thread while
	/// a delivery is running waits for its own payload. A re-entrant call from
	/// inside the consumer cannot wait, so it queues and returns
	/// [`Registration::Queued`]. Consumer panics never escape.
	pub fn register(&self, payload: impl Into<Arc<ImplementorPayload>>) -> Registration {
		let payload = payload.into();
		let me = thread::current().id();
		let mut guard = self.inner.lock();
		let step = {
			let Inner { state, stats } = &mut *guard;
			stats.registered += 1;
			match state {
				State::AwaitingConsumer { pending } => {
					tracing::trace!(
						registry = self.label,
						trait_key = %payload.trait_key(),
						namespaces = payload.namespace_count(),
						position = pending.len(),
						"implementors.buffered"
					);
					pending.push(payload);
					stats.buffered += 1;
					return Registration::Buffered {
						position: pending.len() - 1,
					};
				}
				State::Attached(attached) => {
					attached.inflight.push_back(payload);
					attached.enqueued += 1;
					match attached.deliverer {
						None => {
							attached.deliverer = Some(me);
							Step::Deliver(Arc::clone(&attached.consumer))
						}
						Some(deliverer) if deliverer == me => Step::Queued,
						Some(_) => Step::Wait(attached.enqueued),
					}
				}
			}
		};

		match step {
			Step::Deliver(consumer) => {
				drop(guard);
				self.pump(&consumer);
				Registration::Delivered
			}
			Step::Queued => Registration::Queued,
			Step::Wait(ticket) => {
				while !completed_through(&guard.state, ticket) {
					self.progress.wait(&mut guard);
				}
				Registration::Delivered
			}
		}
	}

	/// Installs the page's consumer and flushes buffered payloads into it.
	///
	/// Offering the consumer that is already attached is a no-op. Offering a
	/// different one is rejected with [`RegistryError::DuplicateConsumer`].
	pub fn install_consumer(&self, consumer: ConsumerRef) -> Result<InstallOutcome, RegistryError> {
		let flushed = {
			let mut guard = self.inner.lock();
			let Inner { state, stats } = &mut *guard;
			let pending = match state {
				State::Attached(attached) => {
					if same_consumer(&attached.consumer, &consumer) {
						tracing::debug!(registry = self.label, "implementor consumer already installed");
						return Ok(InstallOutcome::AlreadyInstalled);
					}
					stats.rejected_installs += 1;
					tracing::warn!(
						registry = self.label,
						"rejected second implementor consumer; keeping the first"
					);
					return Err(RegistryError::DuplicateConsumer { label: self.label });
				}
				State::AwaitingConsumer { pending } => std::mem::take(pending),
			};
			let flushed = pending.len();
			*state = State::Attached(Attached {
				consumer: Arc::clone(&consumer),
				inflight: pending.into(),
				deliverer: Some(thread::current().id()),
				enqueued: flushed as u64,
				completed: 0,
			});
			flushed
		};

		tracing::debug!(registry = self.label, flushed, "implementor consumer attached");
		self.pump(&consumer);
		Ok(InstallOutcome::Installed { flushed })
	}

	/// Drains the in-flight queue. Only the thread recorded as deliverer runs this.
	fn pump(&self, consumer: &ConsumerRef) {
		let mut last: Option<bool> = None;
		loop {
			let payload = {
				let mut guard = self.inner.lock();
				let Inner { state, stats } = &mut *guard;
				let State::Attached(attached) = state else {
					return;
				};
				if let Some(ok) = last.take() {
					if ok {
						stats.delivered += 1;
					} else {
						stats.consumer_panics += 1;
					}
					attached.completed += 1;
					self.progress.notify_all();
				}
				match attached.inflight.pop_front() {
					Some(payload) => payload,
					None => {
						attached.deliverer = None;
						return;
					}
				}
			};

			last = Some(self.deliver(consumer, payload));
		}
	}

	fn deliver(&self, consumer: &ConsumerRef, payload: Arc<ImplementorPayload>) -> bool {
		let trait_key = payload.trait_key().clone();
		match catch_unwind(AssertUnwindSafe(|| consumer.accept(payload))) {
			Ok(()) => {
				tracing::trace!(registry = self.label, %trait_key, "implementors.delivered");
				true
			}
			Err(panic) => {
				let message = panic
					.downcast_ref::<&str>()
					.map(|s| s.to_string())
					.or_else(|| panic.downcast_ref::<String>().cloned())
					.unwrap_or_else(|| "<non-string panic>".to_string());
				tracing::error!(registry = self.label, %trait_key, %message, "implementor consumer panicked");
				false
			}
		}
	}
}

impl Drop for Registry {
	fn drop(&mut self) {
		if let State::AwaitingConsumer { pending } = &self.inner.get_mut().state
			&& !pending.is_empty()
		{
			tracing::debug!(
				registry = self.label,
				pending = pending.len(),
				"registry dropped before a consumer was installed"
			);
		}
	}
}

#[cfg(any(test, doc))]
pub(crate) mod invariants;
