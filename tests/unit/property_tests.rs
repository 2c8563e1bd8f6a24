//! Properties that hold across a corpus of statements
//!
//! Each property is checked against every statement in `CORPUS`, so a new
//! statement shape only needs to be added once.

use pretty_assertions::assert_eq;
use sql_table_rewrite::{RewriteMapping, SqlRewriter};

use crate::common::{mapping, tables};

/// Lowercase, unquoted statements whose every table reference is rewritable
const CORPUS: &[&str] = &[
    "SELECT * FROM users",
    "SELECT u.id, u.name FROM users u WHERE u.active = true",
    "SELECT users.id FROM users WHERE users.active = 1 ORDER BY users.id",
    "SELECT * FROM users JOIN orders ON users.id = orders.user_id",
    "SELECT o.total FROM sales.orders o LEFT JOIN sales.refunds r ON o.id = r.order_id",
    "SELECT * FROM cat.sch.events WHERE cat.sch.events.kind = 'click'",
    "SELECT id FROM current_orders UNION SELECT id FROM archived_orders",
    "SELECT * FROM users WHERE id IN (SELECT user_id FROM orders WHERE orders.total > 100)",
    "SELECT d.n FROM (SELECT COUNT(*) AS n FROM payments) d",
    "SELECT *\n  FROM users -- trailing comment\n WHERE name = 'users'",
    "UPDATE users SET name = 'x' WHERE users.id = 1",
    "DELETE FROM sessions WHERE expired",
];

/// Map every table in `sql` to `<name>_renamed`
fn rename_all(sql: &str) -> RewriteMapping {
    tables(sql)
        .into_iter()
        .map(|t| {
            let renamed = format!("{t}_renamed");
            (t, renamed)
        })
        .collect()
}

fn invert(mapping: &RewriteMapping) -> RewriteMapping {
    mapping
        .iter()
        .map(|(old, new)| (new, old))
        .collect()
}

#[test]
fn test_empty_effect_mapping_is_identity() {
    let rewriter = SqlRewriter::default();
    let unrelated = mapping(&[("no_such_table", "other")]);
    for sql in CORPUS {
        assert_eq!(&rewriter.replace_table_names(sql, &unrelated).unwrap(), sql);
    }
}

#[test]
fn test_rewrite_is_idempotent() {
    let rewriter = SqlRewriter::default();
    for sql in CORPUS {
        let mapping = rename_all(sql);
        let once = rewriter.replace_table_names(sql, &mapping).unwrap();
        let twice = rewriter.replace_table_names(&once, &mapping).unwrap();
        assert_eq!(once, twice, "not idempotent for {sql:?}");
    }
}

#[test]
fn test_reapplying_new_names_onto_themselves_is_a_no_op() {
    let rewriter = SqlRewriter::default();
    for sql in CORPUS {
        let forward = rename_all(sql);
        let once = rewriter.replace_table_names(sql, &forward).unwrap();
        let identity: RewriteMapping = forward.iter().map(|(_, new)| (new, new)).collect();
        let again = rewriter.replace_table_names(&once, &identity).unwrap();
        assert_eq!(again, once, "for {sql:?}");
    }
}

#[test]
fn test_rewrite_then_inverse_restores_text() {
    let rewriter = SqlRewriter::default();
    for sql in CORPUS {
        let forward = rename_all(sql);
        let rewritten = rewriter.replace_table_names(sql, &forward).unwrap();
        let restored = rewriter
            .replace_table_names(&rewritten, &invert(&forward))
            .unwrap();
        assert_eq!(&restored, sql);
    }
}

#[test]
fn test_rewritten_tables_are_exactly_the_renamed_set() {
    for sql in CORPUS {
        let forward = rename_all(sql);
        let rewritten = SqlRewriter::default()
            .replace_table_names(sql, &forward)
            .unwrap();
        let expected: Vec<String> = tables(sql)
            .into_iter()
            .map(|t| format!("{t}_renamed"))
            .collect();
        assert_eq!(tables(&rewritten), expected, "for {sql:?}");
    }
}

#[test]
fn test_rewrite_changes_only_token_spans() {
    let rewriter = SqlRewriter::default();
    for sql in CORPUS {
        let refs = rewriter.collect_references(sql).unwrap();
        let forward = rename_all(sql);

        // Splice by hand, left to right, from the collected spans
        let mut spans: Vec<_> = refs.tokens.iter().collect();
        spans.sort_by_key(|t| t.start);
        spans.dedup_by_key(|t| t.start);
        let mut expected = String::new();
        let mut cursor = 0;
        for token in spans {
            expected.push_str(&sql[cursor..token.start]);
            expected.push_str(forward.get(&token.text).unwrap());
            cursor = token.end;
        }
        expected.push_str(&sql[cursor..]);

        let rewritten = rewriter.replace_table_names(sql, &forward).unwrap();
        assert_eq!(rewritten, expected, "for {sql:?}");
    }
}

#[test]
fn test_extraction_is_stable_under_case_changes() {
    for sql in CORPUS {
        let upper = sql.to_uppercase();
        assert_eq!(tables(&upper), tables(sql), "for {upper:?}");
    }
}

#[test]
fn test_quoted_names_are_replaceable_by_their_extracted_form() {
    let rewriter = SqlRewriter::default();
    for sql in [
        r#"SELECT * FROM "chaintable.token.eth" WHERE x = 1"#,
        r#"DELETE FROM "Orders" WHERE id = 1"#,
        "SELECT * FROM `events` e WHERE e.kind = 'click'",
    ] {
        let forward = rename_all(sql);
        let rewritten = rewriter.replace_table_names(sql, &forward).unwrap();
        let renamed: Vec<String> = forward.iter().map(|(_, new)| new.to_string()).collect();
        assert_eq!(tables(&rewritten), renamed, "for {sql:?}");
    }
}
