//! Old-name to new-name mapping and the read-only rewrite analysis

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::error::{Result, RewriteError};

/// Ordered `old -> new` table name mapping.
///
/// Keys and values are stored verbatim. Values may themselves be quoted or
/// qualified (`"\"Sales\".orders"`, `` "`123`" ``); the engine splices them in
/// as written.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RewriteMapping(BTreeMap<String, String>);

impl RewriteMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, old: impl Into<String>, new: impl Into<String>) -> Option<String> {
        self.0.insert(old.into(), new.into())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// First entry whose key equals `name` ignoring ASCII case, in key order.
    pub fn find_ignore_case(&self, name: &str) -> Option<(&str, &str)> {
        self.0
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    /// True when `name` is a key, exactly or ignoring ASCII case.
    pub fn matches(&self, name: &str) -> bool {
        self.contains_key(name) || self.find_ignore_case(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Build a mapping from `old=new` entries. The first `=` splits the entry;
    /// both sides are trimmed and must be non-empty.
    pub fn parse_entries<S: AsRef<str>>(entries: &[S]) -> Result<Self> {
        entries
            .iter()
            .map(|entry| {
                let entry = entry.as_ref();
                let invalid = || RewriteError::InvalidMapping {
                    entry: entry.to_string(),
                };
                let (old, new) = entry.split_once('=').ok_or_else(invalid)?;
                let (old, new) = (old.trim(), new.trim());
                if old.is_empty() || new.is_empty() {
                    return Err(invalid());
                }
                Ok((old.to_string(), new.to_string()))
            })
            .collect()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RewriteMapping {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        RewriteMapping(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl<K: Into<String>, V: Into<String>, const N: usize> From<[(K, V); N]> for RewriteMapping {
    fn from(entries: [(K, V); N]) -> Self {
        entries.into_iter().collect()
    }
}

impl From<HashMap<String, String>> for RewriteMapping {
    fn from(map: HashMap<String, String>) -> Self {
        RewriteMapping(map.into_iter().collect())
    }
}

impl From<BTreeMap<String, String>> for RewriteMapping {
    fn from(map: BTreeMap<String, String>) -> Self {
        RewriteMapping(map)
    }
}

/// Which tables a mapping would touch, computed without rewriting anything.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RewriteInfo {
    /// Every table referenced by the statement, in discovery order
    pub all_tables: Vec<String>,
    /// Tables that appear in the mapping, in discovery order
    pub affected_tables: Vec<String>,
    pub mapping: RewriteMapping,
}

impl RewriteInfo {
    pub fn new(all_tables: Vec<String>, mapping: RewriteMapping) -> Self {
        let affected_tables = all_tables
            .iter()
            .filter(|table| mapping.matches(table))
            .cloned()
            .collect();
        Self {
            all_tables,
            affected_tables,
            mapping,
        }
    }

    pub fn has_changes(&self) -> bool {
        !self.affected_tables.is_empty()
    }
}
