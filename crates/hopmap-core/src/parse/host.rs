//! Host entries and the insertion-ordered host table.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// One `Host` declaration (or a jump target synthesized from a `ProxyJump` chain).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostEntry {
    /// The host pattern exactly as written; may contain `*`.
    pub name: String,
    /// Extra names from the same `Host` line. Informational only: they are
    /// never turned into entries of their own.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub additional_hosts: Vec<String>,
    /// Identifier of the host this one is reached through.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy_jump: Option<String>,
}

impl HostEntry {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            additional_hosts: Vec::new(),
            proxy_jump: None,
        }
    }

    #[must_use]
    pub fn with_additional_hosts(mut self, aliases: Vec<String>) -> Self {
        self.additional_hosts = aliases;
        self
    }

    #[must_use]
    pub fn with_proxy_jump(mut self, jump: impl Into<String>) -> Self {
        self.proxy_jump = Some(jump.into());
        self
    }
}

/// Mapping host identifier → [`HostEntry`], iterated in first-insertion order.
///
/// Inserting an existing key replaces its value but keeps its position, so a
/// host re-declared in a later file still sorts where it first appeared.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostTable {
    entries: Vec<HostEntry>,
    index: HashMap<String, usize>,
}

impl HostTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&HostEntry> {
        self.index.get(name).map(|&i| &self.entries[i])
    }

    /// Insert or replace the entry keyed by `entry.name` (last write wins).
    pub fn insert(&mut self, entry: HostEntry) {
        if let Some(&i) = self.index.get(&entry.name) {
            self.entries[i] = entry;
        } else {
            self.index.insert(entry.name.clone(), self.entries.len());
            self.entries.push(entry);
        }
    }

    /// Fetch the entry for `name`, creating a bare one if absent.
    pub fn entry_or_insert(&mut self, name: &str) -> &mut HostEntry {
        let i = if let Some(&i) = self.index.get(name) {
            i
        } else {
            self.index.insert(name.to_string(), self.entries.len());
            self.entries.push(HostEntry::new(name));
            self.entries.len() - 1
        };
        &mut self.entries[i]
    }

    /// Right-biased union: every entry of `other` overwrites a same-named one here.
    pub fn merge(&mut self, other: Self) {
        for entry in other.entries {
            self.insert(entry);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &HostEntry> {
        self.entries.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }
}

impl<'a> IntoIterator for &'a HostTable {
    type Item = &'a HostEntry;
    type IntoIter = std::slice::Iter<'a, HostEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl FromIterator<HostEntry> for HostTable {
    fn from_iter<T: IntoIterator<Item = HostEntry>>(iter: T) -> Self {
        let mut table = Self::new();
        for entry in iter {
            table.insert(entry);
        }
        table
    }
}

impl Serialize for HostTable {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.entries.iter())
    }
}
