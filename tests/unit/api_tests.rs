//! JSON request/response handling
//!
//! Requests are built from raw JSON bodies, the way a caller would send them,
//! and responses are checked in their serialized camelCase form.

use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use sql_table_rewrite::api::{self, ApiRequest, ApiResponse};
use sql_table_rewrite::SqlRewriter;

fn respond(body: Value) -> Value {
    let request: ApiRequest = serde_json::from_value(body).expect("Request should deserialize");
    let response = api::handle(&SqlRewriter::default(), &request);
    serde_json::to_value(&response).expect("Response should serialize")
}

// ============================================================================
// Extract
// ============================================================================

#[test]
fn test_extract_request() {
    let response = respond(json!({
        "sql": "SELECT * FROM users u JOIN sales.orders o ON u.id = o.user_id"
    }));
    assert_eq!(
        response,
        json!({
            "tableNames": ["users", "sales.orders"],
            "success": true,
            "message": "Success"
        })
    );
}

#[test]
fn test_extract_missing_sql() {
    let response = respond(json!({}));
    assert_eq!(response["success"], false);
    assert_eq!(response["message"], "SQL cannot be empty");
    assert_eq!(response["tableNames"], Value::Null);
}

#[test]
fn test_extract_parse_failure_message() {
    let response = respond(json!({ "sql": "SELECT * FORM users" }));
    assert_eq!(response["success"], false);
    let message = response["message"].as_str().unwrap();
    assert!(message.starts_with("Error parsing SQL: "), "{message}");
}

// ============================================================================
// Replace
// ============================================================================

#[test]
fn test_replace_request() {
    let response = respond(json!({
        "sql": "SELECT users.name FROM users /* users */ WHERE users.id = 1",
        "tableMapping": { "users": "user_accounts" }
    }));
    assert_eq!(
        response,
        json!({
            "sql": "SELECT user_accounts.name FROM user_accounts /* users */ WHERE user_accounts.id = 1",
            "success": true,
            "message": "Success"
        })
    );
}

#[test]
fn test_replace_blank_sql() {
    let response = respond(json!({ "sql": "  \n", "tableMapping": { "a": "b" } }));
    assert_eq!(response["success"], false);
    assert_eq!(response["message"], "SQL cannot be empty");
    assert_eq!(response["sql"], Value::Null);
}

#[test]
fn test_replace_empty_mapping() {
    let response = respond(json!({ "sql": "SELECT * FROM a", "tableMapping": {} }));
    assert_eq!(response["success"], false);
    assert_eq!(response["message"], "Table mapping cannot be empty");
}

#[test]
fn test_replace_processing_failure_message() {
    let response = respond(json!({
        "sql": "SELECT * FROM users",
        "tableMapping": { "users": "accounts WHERE" }
    }));
    assert_eq!(response["success"], false);
    let message = response["message"].as_str().unwrap();
    assert!(message.starts_with("Error processing SQL: "), "{message}");
}

// ============================================================================
// Dispatch
// ============================================================================

#[test]
fn test_request_shape_selects_handler() {
    let request: ApiRequest =
        serde_json::from_value(json!({ "sql": "SELECT 1", "tableMapping": { "a": "b" } }))
            .unwrap();
    let response = api::handle(&SqlRewriter::default(), &request);
    assert!(matches!(response, ApiResponse::Replace(_)));
    assert!(response.success());

    let request: ApiRequest = serde_json::from_value(json!({ "sql": "SELECT 1" })).unwrap();
    let response = api::handle(&SqlRewriter::default(), &request);
    assert!(matches!(response, ApiResponse::Extract(_)));
    assert!(response.success());
}

#[test]
fn test_dialect_specific_request() {
    let rewriter = SqlRewriter::new("mysql").unwrap();
    let request: ApiRequest = serde_json::from_value(json!({
        "sql": "DELETE FROM `orders` WHERE id = 1",
        "tableMapping": { "orders": "orders_archive" }
    }))
    .unwrap();
    let response = serde_json::to_value(api::handle(&rewriter, &request)).unwrap();
    assert_eq!(response["sql"], "DELETE FROM orders_archive WHERE id = 1");
}
