//! Page side of the implementor index.
//!
//! The page owns the merged view of every payload the registry hands it:
//!
//! - [`TraitImplementors`] applies the merge rule (re-registered namespaces
//!   replace in place, groups stay in first-seen order).
//! - [`Page`] is the registry consumer and answers
//!   [`Page::get_implementors`] / [`Page::section`].
//! - [`render_section`] turns a [`Section`] into the "Implementors" HTML,
//!   copying entry markup verbatim.

mod merge;
mod page;
mod section;

pub use merge::{MergeOutcome, TraitImplementors};
pub use page::{Page, RenderedSection, TraitSummary};
pub use section::{NamespaceGroup, RenderOptions, Section, render_section};
