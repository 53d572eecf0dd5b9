//! Passes over a built [`crate::graph::TopologyGraph`].
//!
//! The pipeline applies them in this order when enabled: wildcard pruning
//! (as part of the build), anonymization, root attachment.

pub mod anonymize;
pub mod prune;
pub mod root;

pub use anonymize::{Anonymizer, anonymize_graph, anonymize_identifier};
pub use prune::prune_wildcard_matches;
pub use root::{DEFAULT_ROOT, attach_root};
