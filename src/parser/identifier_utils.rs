//! Centralized identifier handling utilities.
//!
//! Table names are compared in a canonical form: the unquoted value of every
//! identifier part, ASCII-lowercased, joined with `.`. ASCII folding keeps the
//! byte length of each part equal to its length in the source text, which the
//! span arithmetic in the collector relies on.
//!
//! # Examples
//!
//! ```ignore
//! use crate::parser::identifier_utils::*;
//!
//! // Strip one pair of quotes/brackets
//! assert_eq!(strip_quotes("\"Orders\""), "Orders");
//! assert_eq!(strip_quotes("[Orders]"), "Orders");
//! assert_eq!(strip_quotes("orders"), "orders");
//!
//! // Canonical qualified names
//! // Catalog.Sales."Orders" -> "catalog.sales.orders"
//! ```

use sqlparser::ast::{Ident, ObjectName};

/// Returns true for characters that open a delimited identifier.
pub fn is_quote_char(c: char) -> bool {
    matches!(c, '"' | '`' | '[')
}

fn closing_quote(open: char) -> Option<char> {
    match open {
        '"' => Some('"'),
        '`' => Some('`'),
        '[' => Some(']'),
        _ => None,
    }
}

/// Strips one matching pair of quote characters (`"`, `` ` ``, `[]`) from `text`.
///
/// Text that is not wrapped in a matching pair is returned unchanged.
pub fn strip_quotes(text: &str) -> &str {
    let mut chars = text.chars();
    let (Some(first), Some(last)) = (chars.next(), chars.next_back()) else {
        return text;
    };
    match closing_quote(first) {
        Some(close) if close == last => &text[first.len_utf8()..text.len() - last.len_utf8()],
        _ => text,
    }
}

/// Canonical form of a single identifier part.
pub fn canonical_part(ident: &Ident) -> String {
    ident.value.to_ascii_lowercase()
}

/// Canonical dotted form of a sequence of identifier parts.
pub fn canonical_idents(parts: &[Ident]) -> String {
    parts
        .iter()
        .map(canonical_part)
        .collect::<Vec<_>>()
        .join(".")
}

/// Canonical dotted form of an object name (`Sales.Orders` -> `sales.orders`).
pub fn canonical_name(name: &ObjectName) -> String {
    canonical_idents(&name.0)
}

/// Dotted form of identifier parts exactly as the parser reported their values.
pub fn raw_idents(parts: &[Ident]) -> String {
    parts
        .iter()
        .map(|ident| ident.value.as_str())
        .collect::<Vec<_>>()
        .join(".")
}
