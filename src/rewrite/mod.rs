//! Table reference resolution and text-preserving rewrite
//!
//! - [`collector`] walks parsed statements and records table names and spans
//! - [`policy`] decides how each kind of reference is located
//! - [`offsets`] maps parser locations to byte offsets
//! - [`engine`] applies a mapping to the recorded spans
//! - [`fallback`] anchored regex replacement for unreliable spans

pub mod collector;
pub mod engine;
pub mod fallback;
pub mod offsets;
pub mod policy;

pub use collector::collect_references;
pub use engine::apply_replacements;
pub use fallback::{AnchoredFallback, DEFAULT_ANCHORS};
pub use offsets::{adjust_for_quotes, LineIndex};
pub use policy::{LocationPolicy, Placement, ReferenceKind};
