//! Entry points: extraction, rewrite, analysis and validation

use sqlparser::ast::Statement;
use sqlparser::dialect::Dialect;
use tracing::debug;

use crate::error::{Result, RewriteError};
use crate::model::{CollectedReferences, RewriteInfo, RewriteMapping, TableNameSet};
use crate::parser::{parse_statements, resolve_dialect, DEFAULT_DIALECT};
use crate::rewrite::{apply_replacements, collect_references, AnchoredFallback, DEFAULT_ANCHORS};

/// Options for building a [`SqlRewriter`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriterConfig {
    /// sqlparser dialect name (`generic`, `ansi`, `postgresql`, `mysql`, ...)
    pub dialect: String,
    /// Anchor phrases for the fallback matcher, tried in order
    pub anchors: Vec<String>,
}

impl Default for RewriterConfig {
    fn default() -> Self {
        Self {
            dialect: DEFAULT_DIALECT.to_string(),
            anchors: DEFAULT_ANCHORS.iter().map(|a| a.to_string()).collect(),
        }
    }
}

/// Table name extraction and rewriting over one SQL dialect.
///
/// Holds only immutable configuration; every call builds its own collection
/// state, so a shared `&SqlRewriter` can serve concurrent callers.
#[derive(Debug, Clone)]
pub struct SqlRewriter {
    dialect: String,
    fallback: AnchoredFallback,
}

impl Default for SqlRewriter {
    fn default() -> Self {
        Self {
            dialect: DEFAULT_DIALECT.to_string(),
            fallback: AnchoredFallback::default(),
        }
    }
}

impl SqlRewriter {
    /// Rewriter for the named dialect with the default fallback anchors.
    pub fn new(dialect: &str) -> Result<Self> {
        resolve_dialect(dialect)?;
        Ok(Self {
            dialect: dialect.to_string(),
            fallback: AnchoredFallback::default(),
        })
    }

    pub fn from_config(config: &RewriterConfig) -> Result<Self> {
        resolve_dialect(&config.dialect)?;
        Ok(Self {
            dialect: config.dialect.clone(),
            fallback: AnchoredFallback::new(&config.anchors)?,
        })
    }

    pub fn dialect_name(&self) -> &str {
        &self.dialect
    }

    fn dialect(&self) -> Result<Box<dyn Dialect>> {
        resolve_dialect(&self.dialect)
    }

    /// Parse `sql` with this rewriter's dialect.
    pub fn parse(&self, sql: &str) -> Result<Vec<Statement>> {
        let dialect = self.dialect()?;
        parse_statements(dialect.as_ref(), sql)
    }

    /// Table names, aliases and rewritable spans in `sql`.
    pub fn collect_references(&self, sql: &str) -> Result<CollectedReferences> {
        let statements = self.parse(sql)?;
        Ok(collect_references(&statements, sql))
    }

    /// Distinct canonical table names referenced by `sql`, in discovery order.
    pub fn extract_table_names(&self, sql: &str) -> Result<TableNameSet> {
        Ok(self.collect_references(sql)?.tables)
    }

    /// Rename tables in `sql` according to `mapping`, leaving all other text as is.
    ///
    /// Fails when `sql` does not parse or when the rewritten text no longer
    /// parses; no partial result is returned.
    pub fn replace_table_names(&self, sql: &str, mapping: &RewriteMapping) -> Result<String> {
        // Step 1: Parse and collect references
        let dialect = self.dialect()?;
        let statements = parse_statements(dialect.as_ref(), sql)?;
        let refs = collect_references(&statements, sql);
        debug!(
            tables = refs.tables.len(),
            tokens = refs.tokens.len(),
            mappings = mapping.len(),
            "Rewriting table names"
        );

        // Step 2: Substitute spans right to left
        let rewritten = apply_replacements(sql, &refs.tokens, mapping, &self.fallback);

        // Step 3: The result must still parse
        parse_statements(dialect.as_ref(), &rewritten).map_err(|err| {
            RewriteError::ReparseError {
                sql: rewritten.clone(),
                message: err.to_string(),
            }
        })?;

        Ok(rewritten)
    }

    /// Which referenced tables `mapping` would rename, without rewriting.
    pub fn analyze_rewrite(&self, sql: &str, mapping: &RewriteMapping) -> Result<RewriteInfo> {
        let tables = self.extract_table_names(sql)?;
        Ok(RewriteInfo::new(tables.into_vec(), mapping.clone()))
    }

    /// True when `sql` parses with this rewriter's dialect.
    pub fn validate(&self, sql: &str) -> bool {
        match self.parse(sql) {
            Ok(_) => true,
            Err(err) => {
                debug!(error = %err, "SQL failed validation");
                false
            }
        }
    }
}
