//! Concurrent use of a shared rewriter
//!
//! Every call builds its own collection state, so threads sharing one
//! `&SqlRewriter` must see exactly the results a single thread sees.

use std::thread;

use pretty_assertions::assert_eq;
use sql_table_rewrite::{RewriteMapping, SqlRewriter};

const WORKLOAD: &[&str] = &[
    "SELECT * FROM users u JOIN orders o ON u.id = o.user_id",
    "SELECT users.id FROM users WHERE users.id IN (SELECT user_id FROM orders)",
    "UPDATE orders SET status = 'shipped' WHERE orders.id = 7",
    "DELETE FROM sales.orders WHERE id = 1",
    "WITH r AS (SELECT * FROM orders) SELECT * FROM r JOIN users ON r.uid = users.id",
    "INSERT INTO archive SELECT * FROM orders",
];

fn mapping() -> RewriteMapping {
    RewriteMapping::from([
        ("users", "accounts"),
        ("orders", "purchases"),
        ("sales.orders", "sales.purchases"),
    ])
}

#[test]
fn test_shared_rewriter_matches_sequential_results() {
    let rewriter = SqlRewriter::default();
    let mapping = mapping();

    let expected: Vec<(Vec<String>, String)> = WORKLOAD
        .iter()
        .map(|sql| {
            (
                rewriter.extract_table_names(sql).unwrap().into_vec(),
                rewriter.replace_table_names(sql, &mapping).unwrap(),
            )
        })
        .collect();

    thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|worker| {
                let rewriter = &rewriter;
                let mapping = &mapping;
                scope.spawn(move || {
                    let mut results = Vec::new();
                    for round in 0..25 {
                        // Each worker walks the workload from a different offset
                        let index = (worker + round) % WORKLOAD.len();
                        let sql = WORKLOAD[index];
                        let tables = rewriter.extract_table_names(sql).unwrap().into_vec();
                        let rewritten = rewriter.replace_table_names(sql, mapping).unwrap();
                        results.push((index, tables, rewritten));
                    }
                    results
                })
            })
            .collect();

        for handle in handles {
            for (index, tables, rewritten) in handle.join().unwrap() {
                assert_eq!(tables, expected[index].0);
                assert_eq!(rewritten, expected[index].1);
            }
        }
    });
}

#[test]
fn test_free_functions_are_thread_safe() {
    let sql = "SELECT * FROM users JOIN orders ON users.id = orders.user_id";
    let expected = "SELECT * FROM accounts JOIN purchases ON accounts.id = purchases.user_id";

    thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                for _ in 0..20 {
                    let out = sql_table_rewrite::replace_table_names(sql, &mapping()).unwrap();
                    assert_eq!(out, expected);
                }
            });
        }
    });
}
