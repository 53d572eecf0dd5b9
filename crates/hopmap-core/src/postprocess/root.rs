//! Synthetic root attachment.

use tracing::debug;

use crate::graph::{EdgeKind, EventSink, GraphEvent, TopologyGraph};

/// Default identifier of the synthetic root node.
pub const DEFAULT_ROOT: &str = "localhost";

/// Add node `root` and connect it to every other node that has no jump host.
///
/// Nodes without an entry count as jump-less. Nodes with a jump are left
/// alone, and the root never gets an edge to itself. If a node named `root`
/// already exists it is reused. Returns the number of root edges added.
pub fn attach_root(graph: &mut TopologyGraph, root: &str, sink: &mut dyn EventSink) -> usize {
    let targets: Vec<String> = graph
        .nodes()
        .into_iter()
        .filter(|n| n.id != root && n.proxy_jump().is_none())
        .map(|n| n.id.clone())
        .collect();

    if graph.ensure_node(root) {
        sink.record(GraphEvent::NodeAdded {
            id: root.to_string(),
        });
    }

    let mut added = 0;
    for target in targets {
        if graph.add_edge(root, &target, EdgeKind::Root) {
            sink.record(GraphEvent::EdgeAdded {
                from: root.to_string(),
                to: target,
            });
            added += 1;
        }
    }
    debug!(root, added, "attached root");
    added
}
