//! Jump-host topology graph.
//!
//! # Pipeline
//!
//! ```text
//! HostTable
//!        ↓  build::GraphBuilder::build()
//! TopologyGraph (undirected, insertion-ordered)
//!        ↓  postprocess::{anonymize_graph, attach_root, prune_wildcard_matches}
//! TopologyGraph
//!        ↓  export::{GraphSnapshot, to_dot}
//! renderer
//! ```
//!
//! Builders and passes report each change to an [`EventSink`].

pub mod build;
pub mod events;
pub mod topology;

pub use build::{GraphBuilder, build};
pub use events::{EventLog, EventSink, GraphEvent, NullSink, TracingSink};
pub use topology::{EdgeKind, HostNode, TopologyEdge, TopologyGraph};
