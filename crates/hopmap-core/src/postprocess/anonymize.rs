//! Host name anonymization.
//!
//! An identifier `s1_s2_..._sN` becomes `hex8(sha256(s1))_s2_..._sN` with
//! trailing underscores stripped. Only the first `_`-separated segment is
//! hashed, so environment suffixes such as `_prod` stay readable.

use std::collections::BTreeMap;

use sha2::{Digest, Sha256};

use crate::graph::TopologyGraph;
use crate::parse::HostEntry;

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

/// Anonymize a single identifier.
#[must_use]
pub fn anonymize_identifier(id: &str) -> String {
    let (head, rest) = id.split_once('_').unwrap_or((id, ""));
    let digest = sha256_hex(head.as_bytes());
    let joined = format!("{}_{rest}", &digest[..8]);
    joined.trim_end_matches('_').to_string()
}

/// Anonymizes identifiers and remembers where each one came from.
#[derive(Debug, Clone, Default)]
pub struct Anonymizer {
    aliases: BTreeMap<String, String>,
}

impl Anonymizer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Anonymize `id`, recording the reverse mapping.
    pub fn anonymize(&mut self, id: &str) -> String {
        let anon = anonymize_identifier(id);
        self.aliases
            .entry(anon.clone())
            .or_insert_with(|| id.trim_end_matches('_').to_string());
        anon
    }

    /// The original identifier behind `anon`, if this anonymizer produced it.
    #[must_use]
    pub fn disclose(&self, anon: &str) -> Option<&str> {
        self.aliases.get(anon).map(String::as_str)
    }

    /// Reverse lookup, anonymized → original.
    #[must_use]
    pub const fn aliases(&self) -> &BTreeMap<String, String> {
        &self.aliases
    }

    #[must_use]
    pub fn into_aliases(self) -> BTreeMap<String, String> {
        self.aliases
    }

    fn entry(&mut self, entry: &HostEntry) -> HostEntry {
        HostEntry {
            name: self.anonymize(&entry.name),
            additional_hosts: entry
                .additional_hosts
                .iter()
                .map(|h| self.anonymize(h))
                .collect(),
            proxy_jump: entry.proxy_jump.as_deref().map(|j| self.anonymize(j)),
        }
    }
}

/// Copy of `graph` with every identifier anonymized.
///
/// Node order, edge order, edge direction and edge kinds carry over, so the
/// result is isomorphic to the input as long as no two identifiers anonymize
/// to the same value.
pub fn anonymize_graph(graph: &TopologyGraph, anonymizer: &mut Anonymizer) -> TopologyGraph {
    let mut out = TopologyGraph::new();
    for node in graph.nodes() {
        let id = anonymizer.anonymize(&node.id);
        match &node.host {
            Some(entry) => {
                let entry = anonymizer.entry(entry);
                out.set_host(&id, entry);
            }
            None => {
                out.ensure_node(&id);
            }
        }
    }
    for edge in graph.edges() {
        let from = anonymizer.anonymize(&edge.from);
        let to = anonymizer.anonymize(&edge.to);
        out.add_edge(&from, &to, edge.kind);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::EdgeKind;
    use proptest::prelude::*;

    #[test]
    fn hashes_first_segment_only() {
        assert_eq!(anonymize_identifier("prod_web_1"), "6754af96_web_1");
        assert_eq!(anonymize_identifier("web"), "4b5e57f6");
    }

    #[test]
    fn strips_trailing_underscores() {
        assert_eq!(anonymize_identifier("db__"), "7bdc25d1");
        assert_eq!(anonymize_identifier("_x"), "e3b0c442_x");
    }

    #[test]
    fn reverse_lookup_strips_trailing_underscores() {
        let mut anon = Anonymizer::new();
        let id = anon.anonymize("db_");
        assert_eq!(id, "7bdc25d1");
        assert_eq!(anon.disclose(&id), Some("db"));
        assert_eq!(anon.disclose("nope"), None);
    }

    #[test]
    fn graph_keeps_structure_and_entries() {
        let mut g = TopologyGraph::new();
        g.set_host(
            "db",
            HostEntry::new("db")
                .with_additional_hosts(vec!["db_alt".into()])
                .with_proxy_jump("gw"),
        );
        g.add_edge("gw", "db", EdgeKind::Jump);
        g.add_edge("localhost", "gw", EdgeKind::Root);

        let mut anon = Anonymizer::new();
        let out = anonymize_graph(&g, &mut anon);

        assert_eq!(out.node_ids(), vec!["7bdc25d1", "9716536f", "49960de5"]);
        let db = out.node("7bdc25d1").and_then(|n| n.host.as_ref()).expect("entry");
        assert_eq!(db.name, "7bdc25d1");
        assert_eq!(db.proxy_jump.as_deref(), Some("9716536f"));
        assert_eq!(db.additional_hosts, vec!["7bdc25d1_alt".to_string()]);

        assert_eq!(out.edge_label("7bdc25d1", "9716536f"), Some("9716536f"));
        let root = out.edge_between("49960de5", "9716536f").expect("root edge");
        assert_eq!(root.kind, EdgeKind::Root);
        assert_eq!(anon.disclose("9716536f"), Some("gw"));
    }

    proptest! {
        #[test]
        fn anonymized_graph_is_isomorphic(
            edges in proptest::collection::vec(("[a-e]{1,2}", "[a-e]{1,2}"), 0..16)
        ) {
            let mut g = TopologyGraph::new();
            for (a, b) in &edges {
                g.add_edge(a, b, EdgeKind::Jump);
            }
            let mut anon = Anonymizer::new();
            let out = anonymize_graph(&g, &mut anon);

            prop_assert_eq!(out.node_count(), g.node_count());
            prop_assert_eq!(out.edge_count(), g.edge_count());
            for (a, b) in g.edge_pairs() {
                prop_assert!(out.has_edge(&anonymize_identifier(&a), &anonymize_identifier(&b)));
            }
            for id in g.node_ids() {
                let mapped = anonymize_identifier(id);
                prop_assert_eq!(anon.disclose(&mapped), Some(id));
                prop_assert_eq!(out.degree(&mapped), g.degree(id));
            }
        }
    }
}
