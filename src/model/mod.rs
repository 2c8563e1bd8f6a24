//! Data model shared by the collector, the rewrite engine and the API layer

mod mapping;
mod references;

pub use mapping::{RewriteInfo, RewriteMapping};
pub use references::{AliasSet, CollectedReferences, OccurrenceToken, TableNameSet};
