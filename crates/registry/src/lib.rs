//! Implementor registry for a documentation viewer.
//!
//! Trait pages load their "Implementors" data as small per-trait fragments.
//! Fragments may finish loading before or after the page itself is ready, so
//! every payload goes through a [`Registry`] that buffers until the page
//! installs its [`ImplementorConsumer`] and forwards afterwards.
//!
//! # Key Types
//!
//! | Type | Role |
//! |------|------|
//! | [`Registry`] | Two-phase state machine: awaiting consumer, then attached. |
//! | [`ImplementorPayload`] | One fragment's entries for a trait, grouped by namespace. |
//! | [`ImplementorEntry`] | Opaque pre-rendered snippet plus optional source label. |
//! | [`TraitKey`] / [`Namespace`] | Lookup and grouping keys. |
//! | [`ImplementorConsumer`] | The page-side hook receiving payloads. |
//!
//! Merging and rendering live in the page crate; this crate only moves
//! payloads, exactly once and in arrival order.

mod consumer;
mod entry;
mod error;
mod payload;
mod registry;

pub use consumer::{ConsumerRef, ImplementorConsumer};
pub use entry::{ImplementorEntry, Namespace, TraitKey};
pub use error::RegistryError;
pub use payload::ImplementorPayload;
pub use registry::{DEFAULT_LABEL, InstallOutcome, Registration, Registry, RegistryPhase, RegistryStats};
