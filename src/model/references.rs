//! Table references found in a statement

use std::collections::HashSet;

use serde::Serialize;

use crate::rewrite::ReferenceKind;

/// One span of source text that is a candidate for replacement.
///
/// `text` is the canonical name (unquoted, ASCII-lowercased). `start..end` is a
/// byte range into the source with `end` exclusive; when the reference is a
/// delimited identifier the range includes both quote characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OccurrenceToken {
    pub text: String,
    pub start: usize,
    pub end: usize,
    pub kind: ReferenceKind,
}

/// Distinct canonical table names in the order they were first discovered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TableNameSet {
    names: Vec<String>,
}

impl TableNameSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a name; returns false if it was already present.
    pub fn insert(&mut self, name: impl Into<String>) -> bool {
        let name = name.into();
        if self.contains(&name) {
            return false;
        }
        self.names.push(name);
        true
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn into_vec(self) -> Vec<String> {
        self.names
    }
}

impl IntoIterator for TableNameSet {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.names.into_iter()
    }
}

impl<'a> IntoIterator for &'a TableNameSet {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.names.iter()
    }
}

impl<S: Into<String>> FromIterator<S> for TableNameSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = TableNameSet::new();
        for name in iter {
            set.insert(name);
        }
        set
    }
}

/// Relation aliases, compared case-insensitively.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasSet {
    aliases: HashSet<String>,
}

impl AliasSet {
    pub fn insert(&mut self, alias: &str) {
        self.aliases.insert(alias.to_ascii_lowercase());
    }

    pub fn contains(&self, name: &str) -> bool {
        self.aliases.contains(&name.to_ascii_lowercase())
    }
}

/// Result of one collection pass over a statement.
#[derive(Debug, Clone, Default)]
pub struct CollectedReferences {
    pub tables: TableNameSet,
    pub aliases: AliasSet,
    pub tokens: Vec<OccurrenceToken>,
}
