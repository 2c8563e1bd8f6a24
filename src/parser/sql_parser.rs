//! Thin wrapper around sqlparser that maps its failures into [`RewriteError`].

use sqlparser::ast::Statement;
use sqlparser::dialect::{dialect_from_str, Dialect};
use sqlparser::parser::Parser;
use tracing::trace;

use crate::error::{Result, RewriteError};

/// Dialect used when none is configured. Accepts `"..."` and `` `...` ``
/// quoted identifiers as well as `?` placeholders.
pub const DEFAULT_DIALECT: &str = "generic";

/// Look up a sqlparser dialect by name (`generic`, `ansi`, `postgresql`, `mysql`, ...).
pub fn resolve_dialect(name: &str) -> Result<Box<dyn Dialect>> {
    dialect_from_str(name).ok_or_else(|| RewriteError::UnknownDialect {
        name: name.to_string(),
    })
}

/// Parse SQL text into statements.
///
/// Every statement in the input is returned; spans on the resulting identifiers
/// are relative to the full input text. Input without any statement is an error.
pub fn parse_statements(dialect: &dyn Dialect, sql: &str) -> Result<Vec<Statement>> {
    let statements = Parser::parse_sql(dialect, sql)?;
    if statements.is_empty() {
        return Err(RewriteError::EmptyInput);
    }
    trace!(count = statements.len(), "Parsed SQL statements");
    Ok(statements)
}
