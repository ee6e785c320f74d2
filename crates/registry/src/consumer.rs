use std::sync::Arc;

use crate::payload::ImplementorPayload;

/// Receiver of implementor payloads, installed once the page is ready.
///
/// Implementations must not block on the registry that feeds them. Calling
/// [`Registry::register`](crate::Registry::register) from inside `accept` is
/// allowed; the nested payload is queued and delivered right after the
/// current one returns.
pub trait ImplementorConsumer: Send + Sync + 'static {
	fn accept(&self, payload: Arc<ImplementorPayload>);
}

impl<F> ImplementorConsumer for F
where
	F: Fn(Arc<ImplementorPayload>) + Send + Sync + 'static,
{
	fn accept(&self, payload: Arc<ImplementorPayload>) {
		self(payload)
	}
}

/// Shared handle to an installed consumer.
pub type ConsumerRef = Arc<dyn ImplementorConsumer>;

/// Identity comparison on the consumer allocation, ignoring vtable pointers.
pub(crate) fn same_consumer(a: &ConsumerRef, b: &ConsumerRef) -> bool {
	std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}
