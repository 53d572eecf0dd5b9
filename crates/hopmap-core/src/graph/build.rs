//! [`HostTable`] → [`TopologyGraph`].
//!
//! # Algorithm
//!
//! Hosts are visited in table order.
//!
//! - **Concrete host**: ensure a node carrying the entry; if the entry has a
//!   jump host, add `jump → host`.
//! - **Wildcard host** (`web*`, not bare `*`): collect the table identifiers
//!   it matches, skipping itself, its own jump host and `*`. If anything is
//!   left, the wildcard gets a node (plus `jump → wildcard`), and the *last*
//!   of those matches is dropped from the graph if it is there yet. Only that
//!   one match is dropped; earlier matches and hosts declared after the
//!   wildcard survive. A wildcard that matches nothing gets no node.
//! - **`remove_wildcards`**: afterwards, every node covered by a wildcard
//!   node is removed (see [`crate::postprocess::prune_wildcard_matches`]).
//!
//! Isolated nodes are kept.

use tracing::{info, instrument};

use super::events::{EventSink, GraphEvent, TracingSink};
use super::topology::{EdgeKind, TopologyGraph};
use crate::parse::{HostEntry, HostTable};
use crate::postprocess::prune_wildcard_matches;
use crate::wildcard;

/// Builds a [`TopologyGraph`] from a [`HostTable`].
#[derive(Debug, Clone, Copy, Default)]
pub struct GraphBuilder {
    remove_wildcards: bool,
}

impl GraphBuilder {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            remove_wildcards: false,
        }
    }

    /// Remove every node a wildcard node covers once the graph is built.
    #[must_use]
    pub const fn remove_wildcards(mut self, enabled: bool) -> Self {
        self.remove_wildcards = enabled;
        self
    }

    /// Build, reporting structural changes to `sink`.
    #[instrument(skip_all, fields(hosts = table.len(), remove_wildcards = self.remove_wildcards))]
    pub fn build_with(&self, table: &HostTable, sink: &mut dyn EventSink) -> TopologyGraph {
        let mut graph = TopologyGraph::new();

        for entry in table {
            if wildcard::is_wildcard(&entry.name) {
                add_wildcard_host(&mut graph, table, entry, sink);
            } else {
                add_concrete_host(&mut graph, entry, sink);
            }
        }

        if self.remove_wildcards {
            prune_wildcard_matches(&mut graph, sink);
        }

        info!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "built topology graph"
        );
        graph
    }

    /// Build, logging structural changes through `tracing`.
    #[must_use]
    pub fn build(&self, table: &HostTable) -> TopologyGraph {
        self.build_with(table, &mut TracingSink)
    }
}

/// Build a graph from `table`; see the module docs.
#[must_use]
pub fn build(table: &HostTable, remove_wildcards: bool) -> TopologyGraph {
    GraphBuilder::new()
        .remove_wildcards(remove_wildcards)
        .build(table)
}

fn ensure_node(graph: &mut TopologyGraph, id: &str, sink: &mut dyn EventSink) {
    if graph.ensure_node(id) {
        sink.record(GraphEvent::NodeAdded { id: id.to_string() });
    }
}

fn add_jump_edge(graph: &mut TopologyGraph, jump: &str, host: &str, sink: &mut dyn EventSink) {
    ensure_node(graph, jump, sink);
    if graph.add_edge(jump, host, EdgeKind::Jump) {
        sink.record(GraphEvent::EdgeAdded {
            from: jump.to_string(),
            to: host.to_string(),
        });
    }
}

fn add_concrete_host(graph: &mut TopologyGraph, entry: &HostEntry, sink: &mut dyn EventSink) {
    ensure_node(graph, &entry.name, sink);
    graph.set_host(&entry.name, entry.clone());
    if let Some(jump) = entry.proxy_jump.as_deref() {
        add_jump_edge(graph, jump, &entry.name, sink);
    }
}

fn add_wildcard_host(
    graph: &mut TopologyGraph,
    table: &HostTable,
    entry: &HostEntry,
    sink: &mut dyn EventSink,
) {
    let pattern = entry.name.as_str();
    let jump = entry.proxy_jump.as_deref();

    let eligible: Vec<&str> = wildcard::matches(pattern, table.names())
        .into_iter()
        .filter(|&h| h != pattern && Some(h) != jump && h != "*")
        .collect();

    let Some(&last) = eligible.last() else {
        return;
    };

    ensure_node(graph, pattern, sink);
    graph.set_host(pattern, entry.clone());
    if let Some(jump) = jump {
        add_jump_edge(graph, jump, pattern, sink);
    }

    if graph.remove_node(last) {
        sink.record(GraphEvent::NodeRemoved {
            id: last.to_string(),
            by: pattern.to_string(),
        });
    }
}
