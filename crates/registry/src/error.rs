/// Registry errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
	/// A second, distinct consumer was offered after one was attached.
	///
	/// The first consumer stays authoritative.
	#[error("registry {label}: a different implementor consumer is already installed")]
	DuplicateConsumer { label: &'static str },
}
