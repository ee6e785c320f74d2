//! Implementor fragments: the per-trait files a documentation build emits.
//!
//! - [`decode`] / [`encode`] convert between fragment text and
//!   [`ImplementorPayload`](implidx_registry::ImplementorPayload).
//! - [`trait_key_from_path`] / [`fragment_path`] map trait keys to the
//!   `a/b/trait.Name.js` layout.
//! - [`FragmentTree`] discovers and loads a whole fragment directory.
//! - [`register_fragment`] is the checked registration boundary: malformed
//!   text is rejected before the registry sees it.

mod decode;
mod encode;
mod error;
mod path;
mod tree;

pub use decode::decode;
pub use encode::encode;
pub use error::FragmentError;
pub use path::{fragment_path, trait_key_from_path};
pub use tree::{FragmentFile, FragmentTree, LoadReport, register_fragment};
