//! The jump-host topology graph handed to renderers.
//!
//! # Shape
//!
//! Undirected: a renderer draws `gw -- web` without arrowheads. Every edge is
//! still *created* in a fixed direction (jump host → reached host, or root →
//! host) and the edge weight remembers it, so direction can be recovered.
//!
//! Removal is common during wildcard pruning, so the backing store is a
//! [`StableUnGraph`] keyed through `node_map`; indices of surviving nodes stay
//! valid. Enumeration follows insertion order (tracked by sequence numbers,
//! since stable graphs reuse vacant slots).

#![allow(clippy::module_name_repetitions)]

use std::collections::HashMap;

use petgraph::stable_graph::{NodeIndex, StableUnGraph};
use petgraph::visit::EdgeRef;
use serde::Serialize;

use crate::parse::HostEntry;

/// A node: one host identifier plus, when known, the entry it was built from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HostNode {
    pub id: String,
    /// `None` for nodes that only exist as somebody's jump host, and for the
    /// synthetic root.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<HostEntry>,
    #[serde(skip)]
    seq: u64,
}

impl HostNode {
    /// The jump host recorded on this node's entry, if any.
    #[must_use]
    pub fn proxy_jump(&self) -> Option<&str> {
        self.host.as_ref().and_then(|h| h.proxy_jump.as_deref())
    }
}

/// Why an edge exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    /// `from` is the `ProxyJump` of `to`.
    Jump,
    /// `from` is the synthetic root and `to` had no jump host.
    Root,
}

/// An edge, with the direction it was created in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopologyEdge {
    pub from: String,
    pub to: String,
    pub kind: EdgeKind,
    #[serde(skip)]
    seq: u64,
}

impl TopologyEdge {
    /// Label for the jump relationship: the jump host's identifier.
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        match self.kind {
            EdgeKind::Jump => Some(self.from.as_str()),
            EdgeKind::Root => None,
        }
    }
}

/// Undirected host graph with insertion-ordered enumeration.
#[derive(Debug, Clone, Default)]
pub struct TopologyGraph {
    graph: StableUnGraph<HostNode, TopologyEdge>,
    node_map: HashMap<String, NodeIndex>,
    next_seq: u64,
}

impl TopologyGraph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.node_map.contains_key(id)
    }

    #[must_use]
    pub fn node(&self, id: &str) -> Option<&HostNode> {
        self.node_map.get(id).and_then(|&idx| self.graph.node_weight(idx))
    }

    fn bump(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }

    fn index_or_insert(&mut self, id: &str) -> (NodeIndex, bool) {
        if let Some(&idx) = self.node_map.get(id) {
            return (idx, false);
        }
        let seq = self.bump();
        let idx = self.graph.add_node(HostNode {
            id: id.to_string(),
            host: None,
            seq,
        });
        self.node_map.insert(id.to_string(), idx);
        (idx, true)
    }

    /// Add a bare node unless present. Returns `true` if it was created.
    pub fn ensure_node(&mut self, id: &str) -> bool {
        self.index_or_insert(id).1
    }

    /// Attach (or replace) the host entry carried by node `id`, creating the node if needed.
    pub fn set_host(&mut self, id: &str, entry: HostEntry) {
        let (idx, _) = self.index_or_insert(id);
        if let Some(node) = self.graph.node_weight_mut(idx) {
            node.host = Some(entry);
        }
    }

    /// Add an edge created in direction `from → to`, adding missing endpoints.
    ///
    /// The pair is unordered: if any edge already joins the two nodes nothing
    /// changes. Returns `true` if an edge was added.
    pub fn add_edge(&mut self, from: &str, to: &str, kind: EdgeKind) -> bool {
        let (a, _) = self.index_or_insert(from);
        let (b, _) = self.index_or_insert(to);
        if self.graph.find_edge(a, b).is_some() {
            return false;
        }
        let seq = self.bump();
        self.graph.add_edge(
            a,
            b,
            TopologyEdge {
                from: from.to_string(),
                to: to.to_string(),
                kind,
                seq,
            },
        );
        true
    }

    /// Remove node `id` with its incident edges. Returns `true` if it existed.
    pub fn remove_node(&mut self, id: &str) -> bool {
        match self.node_map.remove(id) {
            Some(idx) => self.graph.remove_node(idx).is_some(),
            None => false,
        }
    }

    /// Nodes in insertion order.
    #[must_use]
    pub fn nodes(&self) -> Vec<&HostNode> {
        let mut nodes: Vec<&HostNode> = self
            .graph
            .node_indices()
            .filter_map(|idx| self.graph.node_weight(idx))
            .collect();
        nodes.sort_by_key(|n| n.seq);
        nodes
    }

    /// Node identifiers in insertion order.
    #[must_use]
    pub fn node_ids(&self) -> Vec<&str> {
        self.nodes().into_iter().map(|n| n.id.as_str()).collect()
    }

    /// Edges in insertion order.
    #[must_use]
    pub fn edges(&self) -> Vec<&TopologyEdge> {
        let mut edges: Vec<&TopologyEdge> = self
            .graph
            .edge_indices()
            .filter_map(|idx| self.graph.edge_weight(idx))
            .collect();
        edges.sort_by_key(|e| e.seq);
        edges
    }

    /// The edge joining `a` and `b`, in either direction.
    #[must_use]
    pub fn edge_between(&self, a: &str, b: &str) -> Option<&TopologyEdge> {
        let a = *self.node_map.get(a)?;
        let b = *self.node_map.get(b)?;
        let edge = self.graph.find_edge(a, b)?;
        self.graph.edge_weight(edge)
    }

    #[must_use]
    pub fn has_edge(&self, a: &str, b: &str) -> bool {
        self.edge_between(a, b).is_some()
    }

    /// Jump label of the edge joining `a` and `b` (see [`TopologyEdge::label`]).
    #[must_use]
    pub fn edge_label(&self, a: &str, b: &str) -> Option<&str> {
        self.edge_between(a, b).and_then(TopologyEdge::label)
    }

    /// Neighbour identifiers of `id`, sorted.
    #[must_use]
    pub fn neighbors(&self, id: &str) -> Vec<&str> {
        let Some(&idx) = self.node_map.get(id) else {
            return Vec::new();
        };
        let mut out: Vec<&str> = self
            .graph
            .edges(idx)
            .filter_map(|e| {
                let other = if e.source() == idx { e.target() } else { e.source() };
                self.graph.node_weight(other).map(|n| n.id.as_str())
            })
            .collect();
        out.sort_unstable();
        out
    }

    /// Number of incident edges (a self-loop counts once).
    #[must_use]
    pub fn degree(&self, id: &str) -> usize {
        self.node_map
            .get(id)
            .map_or(0, |&idx| self.graph.edges(idx).count())
    }

    /// Unordered edge pairs, each pair sorted, the list sorted.
    #[must_use]
    pub fn edge_pairs(&self) -> Vec<(String, String)> {
        let mut pairs: Vec<(String, String)> = self
            .edges()
            .into_iter()
            .map(|e| {
                if e.from <= e.to {
                    (e.from.clone(), e.to.clone())
                } else {
                    (e.to.clone(), e.from.clone())
                }
            })
            .collect();
        pairs.sort();
        pairs
    }

    /// BLAKE3 hash of the node set and unordered edge set.
    ///
    /// Renderers can compare it against a stored value to skip redraws.
    #[must_use]
    pub fn content_hash(&self) -> String {
        let mut ids: Vec<&str> = self.node_map.keys().map(String::as_str).collect();
        ids.sort_unstable();

        let mut hasher = blake3::Hasher::new();
        for id in ids {
            hasher.update(b"n\x00");
            hasher.update(id.as_bytes());
            hasher.update(b"\x00");
        }
        for (a, b) in self.edge_pairs() {
            hasher.update(b"e\x00");
            hasher.update(a.as_bytes());
            hasher.update(b"\x00");
            hasher.update(b.as_bytes());
            hasher.update(b"\x00");
        }
        format!("blake3:{}", hasher.finalize())
    }
}
