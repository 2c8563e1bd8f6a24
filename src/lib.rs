//! sql-table-rewrite: locate table references in SQL and rename them in place
//!
//! The input text is parsed with sqlparser, every table reference is located
//! to an exact byte span, and mapped names are substituted into those spans
//! only. Whitespace, comments, literals, quoting, column names and aliases are
//! left byte-for-byte unchanged.
//!
//! ```
//! use sql_table_rewrite::{extract_table_names, replace_table_names, RewriteMapping};
//!
//! # fn main() -> sql_table_rewrite::Result<()> {
//! let sql = "SELECT * FROM users /* users */ WHERE users.name = 'users'";
//! assert_eq!(extract_table_names(sql)?.into_vec(), vec!["users"]);
//!
//! let mapping = RewriteMapping::from([("users", "user_accounts")]);
//! let rewritten = replace_table_names(sql, &mapping)?;
//! assert_eq!(
//!     rewritten,
//!     "SELECT * FROM user_accounts /* users */ WHERE user_accounts.name = 'users'"
//! );
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod error;
pub mod model;
pub mod parser;
pub mod rewrite;
pub mod service;

use std::sync::LazyLock;

pub use error::{Result, RewriteError};
pub use model::{
    AliasSet, CollectedReferences, OccurrenceToken, RewriteInfo, RewriteMapping, TableNameSet,
};
pub use rewrite::{AnchoredFallback, ReferenceKind};
pub use service::{RewriterConfig, SqlRewriter};

static DEFAULT_REWRITER: LazyLock<SqlRewriter> = LazyLock::new(SqlRewriter::default);

/// Distinct table names referenced by `sql` (generic dialect).
pub fn extract_table_names(sql: &str) -> Result<TableNameSet> {
    DEFAULT_REWRITER.extract_table_names(sql)
}

/// Rename tables in `sql` according to `mapping` (generic dialect).
pub fn replace_table_names(sql: &str, mapping: &RewriteMapping) -> Result<String> {
    DEFAULT_REWRITER.replace_table_names(sql, mapping)
}

/// Tables referenced by `sql` and which of them `mapping` would rename.
pub fn analyze_rewrite(sql: &str, mapping: &RewriteMapping) -> Result<RewriteInfo> {
    DEFAULT_REWRITER.analyze_rewrite(sql, mapping)
}

/// True when `sql` parses (generic dialect).
pub fn validate(sql: &str) -> bool {
    DEFAULT_REWRITER.validate(sql)
}

/// Table names, aliases and rewritable spans in `sql` (generic dialect).
pub fn collect_references(sql: &str) -> Result<CollectedReferences> {
    DEFAULT_REWRITER.collect_references(sql)
}
