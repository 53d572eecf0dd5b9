//! Removal of nodes covered by a wildcard node.

use crate::graph::{EventSink, GraphEvent, TopologyGraph};
use crate::wildcard;

/// Remove every node that some wildcard node matches, except the wildcard itself.
///
/// The removal set is computed from a snapshot of the node identifiers before
/// anything is removed, so a wildcard that is itself covered by another
/// wildcard still prunes its own matches. Jump hosts get no exemption.
///
/// Returns the removed identifiers in removal order. Running the pass on its
/// own output removes nothing.
pub fn prune_wildcard_matches(graph: &mut TopologyGraph, sink: &mut dyn EventSink) -> Vec<String> {
    let snapshot: Vec<String> = graph.node_ids().into_iter().map(str::to_string).collect();

    let mut doomed: Vec<(String, String)> = Vec::new();
    for pattern in snapshot.iter().filter(|id| wildcard::is_wildcard(id)) {
        for hit in wildcard::matches(pattern, snapshot.iter().map(String::as_str)) {
            if hit != pattern && !doomed.iter().any(|(id, _)| id == hit) {
                doomed.push((hit.to_string(), pattern.clone()));
            }
        }
    }

    let mut removed = Vec::with_capacity(doomed.len());
    for (id, by) in doomed {
        if graph.remove_node(&id) {
            sink.record(GraphEvent::NodeRemoved {
                id: id.clone(),
                by,
            });
            removed.push(id);
        }
    }
    removed
}
