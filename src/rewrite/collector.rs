//! Table reference collector.
//!
//! Walks parsed statements and records every table name, every relation alias
//! and every rewritable occurrence with its byte span in the source text.
//! Collection is a fold: [`collect_references`] builds its own state, walks the
//! tree and returns the result by value.
//!
//! The walk is hand-written for relations and statement shapes. Expressions are
//! scanned with a sqlparser [`Visitor`] that captures qualifier identifiers and
//! hands nested queries back to the collector.

use std::ops::ControlFlow;

use sqlparser::ast::{
    AlterTableOperation, CommentObject, Expr, FromTable, GrantObjects, Ident, ObjectName,
    ObjectType, Query, Select, SetExpr, ShowCreateObject, Statement, TableAlias, TableFactor,
    TableObject, TableWithJoins, UpdateTableFromKind, Visit, Visitor,
};
use tracing::trace;

use crate::model::{CollectedReferences, OccurrenceToken};
use crate::parser::{
    canonical_idents, canonical_name, canonical_part, first_ident, ident_location, last_ident,
    raw_idents,
};

use super::offsets::{adjust_for_quotes, LineIndex};
use super::policy::{Placement, ReferenceKind};

/// Collect table references from parsed `statements` of `source`.
///
/// Spans are global to `source`, so multi-statement input yields tokens for
/// every statement.
pub fn collect_references(statements: &[Statement], source: &str) -> CollectedReferences {
    let mut collector = Collector::new(source);
    for statement in statements {
        collector.visit_statement(statement);
    }
    trace!(
        tables = collector.refs.tables.len(),
        tokens = collector.refs.tokens.len(),
        "Collected table references"
    );
    collector.refs
}

/// Relations listed in `UPDATE ... FROM`, a single join tree or a list of them.
trait UpdateSources {
    fn tables(&self) -> &[TableWithJoins];
}

impl UpdateSources for TableWithJoins {
    fn tables(&self) -> &[TableWithJoins] {
        std::slice::from_ref(self)
    }
}

impl UpdateSources for Vec<TableWithJoins> {
    fn tables(&self) -> &[TableWithJoins] {
        self
    }
}

struct Collector<'a> {
    source: &'a str,
    lines: LineIndex<'a>,
    refs: CollectedReferences,
}

impl<'a> Collector<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            lines: LineIndex::new(source),
            refs: CollectedReferences::default(),
        }
    }

    // =========================================================================
    // Recording
    // =========================================================================

    /// Record `name` under `kind`, emitting a token when the kind's policy places one.
    fn record_name(&mut self, name: &ObjectName, kind: ReferenceKind) {
        let canonical = canonical_name(name);
        if canonical.is_empty() {
            return;
        }
        self.refs.tables.insert(canonical.clone());

        let start = match kind.policy().placement {
            Placement::NameOnly => return,
            Placement::NodeLocation => first_ident(name).and_then(|ident| self.ident_offset(ident)),
            Placement::LastIdentifier => last_ident(name).and_then(|last| {
                let last_offset = self.ident_offset(last)?;
                // Walk back over the qualifiers and their dots
                let qualifier_len = canonical.len() - canonical_part(last).len();
                last_offset.checked_sub(qualifier_len)
            }),
        };
        match start {
            Some(start) => self.push_token(canonical, start, kind),
            None => trace!(table = %canonical, ?kind, "No location for table reference"),
        }
    }

    fn record_alias(&mut self, alias: &Option<TableAlias>) {
        if let Some(alias) = alias {
            self.refs.aliases.insert(&alias.name.value);
        }
    }

    fn ident_offset(&self, ident: &Ident) -> Option<usize> {
        let (line, column) = ident_location(ident)?;
        Some(self.lines.offset(line, column))
    }

    fn push_token(&mut self, text: String, start: usize, kind: ReferenceKind) {
        let Some((start, end)) = adjust_for_quotes(self.source, start, &text) else {
            trace!(table = %text, start, "Token start outside source");
            return;
        };
        trace!(table = %text, start, end, ?kind, "Table token");
        self.refs.tokens.push(OccurrenceToken {
            text,
            start,
            end,
            kind,
        });
    }

    /// Qualifier capture for a compound identifier such as `orders.id` or
    /// `cat.sch.orders.id`.
    fn record_qualifier(&mut self, parts: &[Ident]) {
        let Some((_field, qualifier)) = parts.split_last() else {
            return;
        };
        let Some(base) = qualifier.first() else {
            return;
        };

        if qualifier.len() == 1 {
            if self.refs.aliases.contains(&base.value) {
                return;
            }
            if let Some(start) = self.ident_offset(base) {
                self.push_token(canonical_part(base), start, ReferenceKind::Qualifier);
            }
            return;
        }

        // Multi-part qualifiers must not be an alias and must name a table
        // already seen in FROM
        if self.refs.aliases.contains(&raw_idents(qualifier)) {
            return;
        }
        let canonical = canonical_idents(qualifier);
        if !self.refs.tables.contains(&canonical) {
            return;
        }
        if let Some(start) = self.ident_offset(base) {
            self.push_token(canonical, start, ReferenceKind::Qualifier);
        }
    }

    /// Scan a node for qualifier expressions and nested queries.
    fn scan<V: Visit + ?Sized>(&mut self, node: &V) {
        let mut scanner = ExprScanner {
            collector: self,
            depth: 0,
        };
        let _ = node.visit(&mut scanner);
    }

    // =========================================================================
    // Statements
    // =========================================================================

    fn visit_statement(&mut self, statement: &Statement) {
        match statement {
            Statement::Query(query) => self.visit_query(query),

            Statement::Insert(insert) => {
                if let TableObject::TableName(name) = &insert.table {
                    self.record_name(name, ReferenceKind::InsertTarget);
                }
                if let Some(source) = &insert.source {
                    self.visit_query(source);
                }
            }

            Statement::Update {
                table,
                assignments,
                from,
                selection,
                ..
            } => {
                self.visit_mutation_target(table, ReferenceKind::UpdateTarget);
                // FROM sources and their aliases before any qualifier is examined
                if let Some(
                    UpdateTableFromKind::BeforeSet(source) | UpdateTableFromKind::AfterSet(source),
                ) = from
                {
                    for relation in source.tables() {
                        self.visit_table_with_joins(relation);
                    }
                }
                self.scan(assignments);
                self.scan(selection);
            }

            Statement::Delete(delete) => {
                let (FromTable::WithFromKeyword(tables) | FromTable::WithoutKeyword(tables)) =
                    &delete.from;
                for table in tables {
                    self.visit_mutation_target(table, ReferenceKind::DeleteTarget);
                }
                if let Some(using) = &delete.using {
                    for table in using {
                        self.visit_table_with_joins(table);
                    }
                }
                self.scan(&delete.selection);
            }

            Statement::Merge {
                table,
                source,
                on,
                clauses,
                ..
            } => {
                self.visit_target_factor(table, ReferenceKind::MergeTarget);
                self.visit_table_factor(source);
                self.scan(on);
                self.scan(clauses);
            }

            Statement::CreateTable(create) => match &create.query {
                Some(query) => {
                    self.record_name(&create.name, ReferenceKind::CreateAsSelectTarget);
                    self.visit_query(query);
                }
                None => self.record_name(&create.name, ReferenceKind::CreateTableTarget),
            },

            Statement::CreateView { name, query, .. } | Statement::AlterView { name, query, .. } => {
                self.record_name(name, ReferenceKind::ViewDefinition);
                self.visit_query(query);
            }

            Statement::AlterTable {
                name, operations, ..
            } => {
                let adds_column = operations
                    .iter()
                    .any(|op| matches!(op, AlterTableOperation::AddColumn { .. }));
                let kind = if adds_column {
                    ReferenceKind::AddColumnTarget
                } else {
                    ReferenceKind::AlterTarget
                };
                self.record_name(name, kind);
                for op in operations {
                    if let AlterTableOperation::RenameTable { table_name } = op {
                        self.record_name(table_name, ReferenceKind::RenameTarget);
                    }
                }
            }

            Statement::Drop {
                object_type: ObjectType::Table | ObjectType::View,
                names,
                ..
            } => {
                for name in names {
                    self.record_name(name, ReferenceKind::DropTarget);
                }
            }

            Statement::Truncate { table_names, .. } => {
                for target in table_names {
                    self.record_name(&target.name, ReferenceKind::TruncateTarget);
                }
            }

            Statement::Comment {
                object_type: CommentObject::Table,
                object_name,
                ..
            } => self.record_name(object_name, ReferenceKind::Administrative),

            Statement::Grant {
                objects: GrantObjects::Tables(names),
                ..
            }
            | Statement::Revoke {
                objects: GrantObjects::Tables(names),
                ..
            } => {
                for name in names {
                    self.record_name(name, ReferenceKind::Administrative);
                }
            }

            Statement::ShowColumns { show_options, .. } => {
                if let Some(name) = show_options
                    .show_in
                    .as_ref()
                    .and_then(|show_in| show_in.parent_name.as_ref())
                {
                    self.record_name(name, ReferenceKind::Administrative);
                }
            }

            Statement::ShowCreate {
                obj_type: ShowCreateObject::Table | ShowCreateObject::View,
                obj_name,
                ..
            } => self.record_name(obj_name, ReferenceKind::Administrative),

            Statement::Analyze { table_name, .. } => {
                self.record_name(table_name, ReferenceKind::Administrative)
            }

            Statement::Explain { statement, .. } => self.visit_statement(statement),

            _ => trace!("Statement kind has no table references to collect"),
        }
    }

    /// UPDATE / DELETE target: a plain table gets a last-identifier token,
    /// anything else is walked as an ordinary relation.
    fn visit_mutation_target(&mut self, table: &TableWithJoins, kind: ReferenceKind) {
        self.visit_target_factor(&table.relation, kind);
        for join in &table.joins {
            self.visit_table_factor(&join.relation);
            self.scan(&join.join_operator);
        }
    }

    fn visit_target_factor(&mut self, factor: &TableFactor, kind: ReferenceKind) {
        match factor {
            TableFactor::Table { name, alias, .. } => {
                self.record_alias(alias);
                self.record_name(name, kind);
            }
            other => self.visit_table_factor(other),
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// CTE definitions in `query.with` are deliberately not walked.
    fn visit_query(&mut self, query: &Query) {
        self.visit_set_expr(&query.body);
        self.scan(&query.order_by);
        self.scan(&query.limit);
        self.scan(&query.offset);
    }

    fn visit_set_expr(&mut self, body: &SetExpr) {
        match body {
            SetExpr::Select(select) => self.visit_select(select),
            SetExpr::Query(query) => self.visit_query(query),
            SetExpr::SetOperation { left, right, .. } => {
                self.visit_set_expr(left);
                self.visit_set_expr(right);
            }
            SetExpr::Values(values) => self.scan(values),
            SetExpr::Insert(statement) | SetExpr::Update(statement) => {
                self.visit_statement(statement)
            }
            _ => {}
        }
    }

    /// FROM first, so aliases and table names are known before qualifiers
    /// in the projection and predicates are examined.
    fn visit_select(&mut self, select: &Select) {
        for table in &select.from {
            self.visit_table_with_joins(table);
        }
        self.scan(&select.projection);
        self.scan(&select.prewhere);
        self.scan(&select.selection);
        self.scan(&select.group_by);
        self.scan(&select.having);
        self.scan(&select.qualify);
        self.scan(&select.sort_by);
    }

    fn visit_table_with_joins(&mut self, table: &TableWithJoins) {
        self.visit_table_factor(&table.relation);
        for join in &table.joins {
            self.visit_table_factor(&join.relation);
            // ON predicates hold qualifiers; USING lists are bare column names
            self.scan(&join.join_operator);
        }
    }

    fn visit_table_factor(&mut self, factor: &TableFactor) {
        match factor {
            // Table-valued function call, not a table
            TableFactor::Table {
                alias,
                args: Some(args),
                ..
            } => {
                self.record_alias(alias);
                self.scan(args);
            }
            TableFactor::Table { name, alias, .. } => {
                self.record_alias(alias);
                self.record_name(name, ReferenceKind::Relation);
            }
            TableFactor::Derived {
                subquery, alias, ..
            } => {
                self.record_alias(alias);
                self.visit_query(subquery);
            }
            TableFactor::NestedJoin {
                table_with_joins,
                alias,
            } => {
                self.record_alias(alias);
                self.visit_table_with_joins(table_with_joins);
            }
            TableFactor::Pivot { table, alias, .. } | TableFactor::Unpivot { table, alias, .. } => {
                self.record_alias(alias);
                self.visit_table_factor(table);
            }
            // Table functions, UNNEST and the like: only their arguments
            other => self.scan(other),
        }
    }
}

// =============================================================================
// Expression scanning
// =============================================================================

/// Captures compound identifiers at the current query level and hands nested
/// queries (subquery expressions, derived tables inside functions) back to
/// the collector, which walks them FROM-first.
struct ExprScanner<'c, 'a> {
    collector: &'c mut Collector<'a>,
    /// Nesting below the first query met during this scan
    depth: usize,
}

impl Visitor for ExprScanner<'_, '_> {
    type Break = ();

    fn pre_visit_query(&mut self, query: &Query) -> ControlFlow<Self::Break> {
        if self.depth == 0 {
            self.collector.visit_query(query);
        }
        self.depth += 1;
        ControlFlow::Continue(())
    }

    fn post_visit_query(&mut self, _query: &Query) -> ControlFlow<Self::Break> {
        self.depth -= 1;
        ControlFlow::Continue(())
    }

    fn pre_visit_expr(&mut self, expr: &Expr) -> ControlFlow<Self::Break> {
        if self.depth == 0 {
            if let Expr::CompoundIdentifier(parts) = expr {
                self.collector.record_qualifier(parts);
            }
        }
        ControlFlow::Continue(())
    }
}
