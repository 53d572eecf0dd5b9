//! Renderer-facing exports of a [`TopologyGraph`].
//!
//! Two formats: a JSON [`GraphSnapshot`] and Graphviz DOT text. Neither does
//! layout.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::graph::{EdgeKind, TopologyGraph};
use crate::parse::HostEntry;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotNode {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<HostEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotEdge {
    pub from: String,
    pub to: String,
    pub kind: SnapshotEdgeKind,
    /// Jump host label; only set on jump edges.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub via: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapshotEdgeKind {
    Jump,
    Root,
}

impl From<EdgeKind> for SnapshotEdgeKind {
    fn from(kind: EdgeKind) -> Self {
        match kind {
            EdgeKind::Jump => Self::Jump,
            EdgeKind::Root => Self::Root,
        }
    }
}

/// Serializable view of a graph, in insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    pub nodes: Vec<SnapshotNode>,
    pub edges: Vec<SnapshotEdge>,
    pub content_hash: String,
    /// Anonymized → original identifiers, only when disclosure is requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aliases: Option<BTreeMap<String, String>>,
}

impl GraphSnapshot {
    #[must_use]
    pub fn from_graph(graph: &TopologyGraph) -> Self {
        let nodes = graph
            .nodes()
            .into_iter()
            .map(|n| SnapshotNode {
                id: n.id.clone(),
                host: n.host.clone(),
            })
            .collect();
        let edges = graph
            .edges()
            .into_iter()
            .map(|e| SnapshotEdge {
                from: e.from.clone(),
                to: e.to.clone(),
                kind: e.kind.into(),
                via: e.label().map(str::to_string),
            })
            .collect();
        Self {
            nodes,
            edges,
            content_hash: graph.content_hash(),
            aliases: None,
        }
    }

    #[must_use]
    pub fn with_aliases(mut self, aliases: BTreeMap<String, String>) -> Self {
        self.aliases = Some(aliases);
        self
    }

    /// Rebuild a graph from the snapshot.
    #[must_use]
    pub fn to_graph(&self) -> TopologyGraph {
        let mut graph = TopologyGraph::new();
        for node in &self.nodes {
            match &node.host {
                Some(entry) => graph.set_host(&node.id, entry.clone()),
                None => {
                    graph.ensure_node(&node.id);
                }
            }
        }
        for edge in &self.edges {
            let kind = match edge.kind {
                SnapshotEdgeKind::Jump => EdgeKind::Jump,
                SnapshotEdgeKind::Root => EdgeKind::Root,
            };
            graph.add_edge(&edge.from, &edge.to, kind);
        }
        graph
    }
}

/// Serialize `graph` as a pretty-printed JSON snapshot.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn to_json(
    graph: &TopologyGraph,
    aliases: Option<&BTreeMap<String, String>>,
) -> serde_json::Result<String> {
    let mut snapshot = GraphSnapshot::from_graph(graph);
    if let Some(aliases) = aliases {
        snapshot = snapshot.with_aliases(aliases.clone());
    }
    serde_json::to_string_pretty(&snapshot)
}

fn quote(id: &str) -> String {
    let mut out = String::with_capacity(id.len() + 2);
    out.push('"');
    for c in id.chars() {
        if matches!(c, '"' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}

/// Render `graph` as an undirected Graphviz document.
#[must_use]
pub fn to_dot(graph: &TopologyGraph) -> String {
    let mut out = String::from("graph hopmap {\n");
    for node in graph.nodes() {
        let _ = writeln!(out, "    {};", quote(&node.id));
    }
    for edge in graph.edges() {
        let _ = match edge.label() {
            Some(label) => writeln!(
                out,
                "    {} -- {} [label={}];",
                quote(&edge.from),
                quote(&edge.to),
                quote(label)
            ),
            None => writeln!(out, "    {} -- {};", quote(&edge.from), quote(&edge.to)),
        };
    }
    out.push_str("}\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TopologyGraph {
        let mut g = TopologyGraph::new();
        g.set_host("db", HostEntry::new("db").with_proxy_jump("gw"));
        g.add_edge("gw", "db", EdgeKind::Jump);
        g.add_edge("localhost", "gw", EdgeKind::Root);
        g
    }

    #[test]
    fn snapshot_lists_nodes_and_edges_in_order() {
        let snap = GraphSnapshot::from_graph(&sample());
        let ids: Vec<&str> = snap.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["db", "gw", "localhost"]);
        assert_eq!(snap.edges.len(), 2);
        assert_eq!(snap.edges[0].via.as_deref(), Some("gw"));
        assert_eq!(snap.edges[1].kind, SnapshotEdgeKind::Root);
        assert_eq!(snap.edges[1].via, None);
        assert!(snap.content_hash.starts_with("blake3:"));
    }

    #[test]
    fn json_omits_empty_optionals() {
        let json = to_json(&sample(), None).expect("json");
        let value: serde_json::Value = serde_json::from_str(&json).expect("parse");
        assert!(value.get("aliases").is_none());
        assert!(value["nodes"][1].get("host").is_none());
        assert_eq!(value["nodes"][0]["host"]["proxy_jump"], "gw");
        assert_eq!(value["edges"][0]["kind"], "jump");
    }

    #[test]
    fn json_includes_aliases_when_given() {
        let mut aliases = BTreeMap::new();
        aliases.insert("9716536f".to_string(), "gw".to_string());
        let json = to_json(&sample(), Some(&aliases)).expect("json");
        let value: serde_json::Value = serde_json::from_str(&json).expect("parse");
        assert_eq!(value["aliases"]["9716536f"], "gw");
    }

    #[test]
    fn snapshot_rebuilds_same_graph() {
        let g = sample();
        let json = to_json(&g, None).expect("json");
        let snap: GraphSnapshot = serde_json::from_str(&json).expect("parse");
        let rebuilt = snap.to_graph();
        assert_eq!(rebuilt.content_hash(), g.content_hash());
        assert_eq!(rebuilt.edge_label("db", "gw"), Some("gw"));
    }

    #[test]
    fn dot_quotes_ids_and_labels_jump_edges() {
        let dot = to_dot(&sample());
        assert!(dot.starts_with("graph hopmap {\n"));
        assert!(dot.contains("    \"gw\" -- \"db\" [label=\"gw\"];\n"));
        assert!(dot.contains("    \"localhost\" -- \"gw\";\n"));
        assert!(dot.ends_with("}\n"));
    }

    #[test]
    fn dot_escapes_quotes() {
        assert_eq!(quote("we\"ird"), "\"we\\\"ird\"");
    }
}
