//! SQL parsing boundary

mod ident_extract;
mod identifier_utils;
mod sql_parser;

pub use ident_extract::{first_ident, ident_location, last_ident};
pub use identifier_utils::{
    canonical_idents, canonical_name, canonical_part, is_quote_char, raw_idents, strip_quotes,
};
pub use sql_parser::{parse_statements, resolve_dialect, DEFAULT_DIALECT};
