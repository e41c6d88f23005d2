//! Read-only topology boundary consumed by the routing core

use wisenet_protocol::NodeId;

use crate::graph::{Link, SensorNode};

/// Read-only view of the live topology.
///
/// The routing core never mutates the topology; it only reads nodes, link
/// weights and the modification counter. Whoever owns discovery bumps the
/// counter on every change, which is what invalidates cached shortest-path
/// trees.
pub trait TopologyView {
    /// Look up a node by identity
    fn node(&self, id: &NodeId) -> Option<&SensorNode>;

    /// Outgoing links of a node (empty when the node is unknown)
    fn neighbors(&self, id: &NodeId) -> &[Link];

    /// Monotonically increasing counter, bumped on every topology change
    fn last_modification(&self) -> u64;

    /// Check whether a node is present
    fn contains(&self, id: &NodeId) -> bool {
        self.node(id).is_some()
    }
}
