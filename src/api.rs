//! JSON request/response models and their handlers.
//!
//! Handlers never fail: validation problems and rewrite errors are reported as
//! `success: false` with a message, the way a request layer would return them.

use serde::{Deserialize, Serialize};
use tracing::error;

use crate::model::RewriteMapping;
use crate::service::SqlRewriter;

pub const SUCCESS_MESSAGE: &str = "Success";
pub const EMPTY_SQL_MESSAGE: &str = "SQL cannot be empty";
pub const EMPTY_MAPPING_MESSAGE: &str = "Table mapping cannot be empty";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractTablesRequest {
    #[serde(default)]
    pub sql: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractTablesResponse {
    pub table_names: Option<Vec<String>>,
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplaceTablesRequest {
    #[serde(default)]
    pub sql: Option<String>,
    pub table_mapping: RewriteMapping,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplaceTablesResponse {
    pub sql: Option<String>,
    pub success: bool,
    pub message: String,
}

/// Either request shape; a body with `tableMapping` is a replace request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ApiRequest {
    Replace(ReplaceTablesRequest),
    Extract(ExtractTablesRequest),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ApiResponse {
    Replace(ReplaceTablesResponse),
    Extract(ExtractTablesResponse),
}

impl ApiResponse {
    pub fn success(&self) -> bool {
        match self {
            ApiResponse::Replace(response) => response.success,
            ApiResponse::Extract(response) => response.success,
        }
    }
}

fn non_blank(sql: &Option<String>) -> Option<&str> {
    sql.as_deref().filter(|sql| !sql.trim().is_empty())
}

pub fn handle_extract(rewriter: &SqlRewriter, request: &ExtractTablesRequest) -> ExtractTablesResponse {
    let Some(sql) = non_blank(&request.sql) else {
        return ExtractTablesResponse {
            table_names: None,
            success: false,
            message: EMPTY_SQL_MESSAGE.to_string(),
        };
    };

    match rewriter.extract_table_names(sql) {
        Ok(tables) => ExtractTablesResponse {
            table_names: Some(tables.into_vec()),
            success: true,
            message: SUCCESS_MESSAGE.to_string(),
        },
        Err(err) => {
            error!(error = %err, "Error extracting table names");
            ExtractTablesResponse {
                table_names: None,
                success: false,
                message: format!("Error parsing SQL: {err}"),
            }
        }
    }
}

pub fn handle_replace(rewriter: &SqlRewriter, request: &ReplaceTablesRequest) -> ReplaceTablesResponse {
    let failure = |message: String| ReplaceTablesResponse {
        sql: None,
        success: false,
        message,
    };

    let Some(sql) = non_blank(&request.sql) else {
        return failure(EMPTY_SQL_MESSAGE.to_string());
    };
    if request.table_mapping.is_empty() {
        return failure(EMPTY_MAPPING_MESSAGE.to_string());
    }

    match rewriter.replace_table_names(sql, &request.table_mapping) {
        Ok(rewritten) => ReplaceTablesResponse {
            sql: Some(rewritten),
            success: true,
            message: SUCCESS_MESSAGE.to_string(),
        },
        Err(err) => {
            error!(error = %err, "Error replacing table names");
            failure(format!("Error processing SQL: {err}"))
        }
    }
}

pub fn handle(rewriter: &SqlRewriter, request: &ApiRequest) -> ApiResponse {
    match request {
        ApiRequest::Replace(request) => ApiResponse::Replace(handle_replace(rewriter, request)),
        ApiRequest::Extract(request) => ApiResponse::Extract(handle_extract(rewriter, request)),
    }
}
