//! Location policy table.
//!
//! Each traversal rule in the collector tags what it found with a
//! [`ReferenceKind`]. The kind decides how the reference is located in the
//! source text and whether the anchored fallback may step in when the located
//! span turns out to be wrong. Parser location quirks are recorded here and
//! nowhere else.

use serde::Serialize;

/// How a reference's span is derived from parser locations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Placement {
    /// Start at the first identifier's location and span the whole name.
    NodeLocation,
    /// Start at the last identifier's location and walk back over the qualifiers.
    LastIdentifier,
    /// The name is recorded but never rewritten.
    NameOnly,
}

/// Placement plus whether a failed span may be retried with the anchored fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LocationPolicy {
    pub placement: Placement,
    pub anchored_fallback: bool,
}

/// Where in a statement a table reference was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceKind {
    /// `FROM` / `JOIN` operand
    Relation,
    /// Qualifier of a column reference (`orders` in `orders.id`)
    Qualifier,
    /// `UPDATE <table>`
    UpdateTarget,
    /// `DELETE FROM <table>`
    DeleteTarget,
    /// `MERGE INTO <table>`
    MergeTarget,
    /// `CREATE TABLE <table> (...)`
    CreateTableTarget,
    /// `ALTER TABLE <table> ADD COLUMN ...`
    AddColumnTarget,
    /// `INSERT INTO <table>`
    InsertTarget,
    /// `CREATE TABLE <table> AS SELECT ...`
    CreateAsSelectTarget,
    /// `CREATE [MATERIALIZED] VIEW <name> AS ...`
    ViewDefinition,
    /// `DROP TABLE` / `DROP VIEW`
    DropTarget,
    /// `TRUNCATE [TABLE] <table>`
    TruncateTarget,
    /// `ALTER TABLE <table>` with anything other than `ADD COLUMN`
    AlterTarget,
    /// New name in `ALTER TABLE ... RENAME TO <table>`
    RenameTarget,
    /// `COMMENT ON`, `GRANT`, `REVOKE`, `SHOW COLUMNS`, `SHOW CREATE`, `ANALYZE`
    Administrative,
}

impl ReferenceKind {
    /// Policy table keyed by reference kind.
    pub const fn policy(self) -> LocationPolicy {
        use Placement::*;
        let (placement, anchored_fallback) = match self {
            ReferenceKind::Relation | ReferenceKind::Qualifier => (NodeLocation, false),
            // The table node's own location is unreliable for mutation targets;
            // the last identifier is always located correctly.
            ReferenceKind::UpdateTarget
            | ReferenceKind::DeleteTarget
            | ReferenceKind::MergeTarget => (LastIdentifier, true),
            ReferenceKind::CreateTableTarget | ReferenceKind::AddColumnTarget => {
                (LastIdentifier, false)
            }
            ReferenceKind::InsertTarget
            | ReferenceKind::CreateAsSelectTarget
            | ReferenceKind::ViewDefinition
            | ReferenceKind::DropTarget
            | ReferenceKind::TruncateTarget
            | ReferenceKind::AlterTarget
            | ReferenceKind::RenameTarget
            | ReferenceKind::Administrative => (NameOnly, false),
        };
        LocationPolicy {
            placement,
            anchored_fallback,
        }
    }
}
