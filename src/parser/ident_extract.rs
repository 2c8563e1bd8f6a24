//! Location helpers for sqlparser identifiers.
//!
//! Identifiers carry the span of the token they were parsed from. A span with
//! line 0 means the parser did not record a location (synthesized nodes).

use sqlparser::ast::{Ident, ObjectName};

/// 1-based `(line, column)` where the parser saw this identifier, if recorded.
pub fn ident_location(ident: &Ident) -> Option<(u64, u64)> {
    let start = &ident.span.start;
    if start.line == 0 || start.column == 0 {
        return None;
    }
    Some((start.line, start.column))
}

/// First identifier of an ObjectName (`catalog` in `catalog.schema.table`).
pub fn first_ident(name: &ObjectName) -> Option<&Ident> {
    name.0.first()
}

/// Last identifier of an ObjectName (`table` in `catalog.schema.table`).
pub fn last_ident(name: &ObjectName) -> Option<&Ident> {
    name.0.last()
}
