//! Error types for sql-table-rewrite

use sqlparser::parser::ParserError;
use thiserror::Error;

/// Errors that can occur while extracting or rewriting table references
#[derive(Error, Debug)]
pub enum RewriteError {
    #[error("SQL parse error: {message}")]
    SqlParseError {
        message: String,
        #[source]
        source: ParserError,
    },

    #[error("No SQL statement found in input")]
    EmptyInput,

    #[error("Rewritten SQL failed to parse: {message}")]
    ReparseError { sql: String, message: String },

    #[error("Unknown SQL dialect: {name}")]
    UnknownDialect { name: String },

    #[error("Invalid fallback anchor phrase: {phrase}")]
    InvalidAnchor {
        phrase: String,
        #[source]
        source: regex::Error,
    },

    #[error("Invalid table mapping entry: {entry} (expected old=new)")]
    InvalidMapping { entry: String },
}

impl From<ParserError> for RewriteError {
    fn from(err: ParserError) -> Self {
        RewriteError::SqlParseError {
            message: err.to_string(),
            source: err,
        }
    }
}

pub type Result<T> = std::result::Result<T, RewriteError>;
