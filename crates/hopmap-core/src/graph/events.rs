//! Structural change notifications.
//!
//! Graph construction and the post-processing passes report every node and
//! edge they add or remove to an [`EventSink`]. The default [`TracingSink`]
//! turns them into `tracing` debug events; [`EventLog`] keeps them for
//! inspection.

use serde::Serialize;
use tracing::debug;

/// One structural change to a [`super::TopologyGraph`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GraphEvent {
    NodeAdded { id: String },
    EdgeAdded { from: String, to: String },
    /// `by` is the wildcard pattern whose match caused the removal.
    NodeRemoved { id: String, by: String },
}

/// Receiver of [`GraphEvent`]s.
pub trait EventSink {
    fn record(&mut self, event: GraphEvent);
}

/// Logs each event at debug level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn record(&mut self, event: GraphEvent) {
        match event {
            GraphEvent::NodeAdded { id } => debug!(node = %id, "node added"),
            GraphEvent::EdgeAdded { from, to } => debug!(%from, %to, "edge added"),
            GraphEvent::NodeRemoved { id, by } => {
                debug!(node = %id, wildcard = %by, "node removed");
            }
        }
    }
}

/// Drops every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn record(&mut self, _event: GraphEvent) {}
}

/// Keeps events in arrival order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventLog {
    pub events: Vec<GraphEvent>,
}

impl EventLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Identifiers of removed nodes, in removal order.
    #[must_use]
    pub fn removed(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                GraphEvent::NodeRemoved { id, .. } => Some(id.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl EventSink for EventLog {
    fn record(&mut self, event: GraphEvent) {
        self.events.push(event);
    }
}
