//! In-memory topology graph

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use wisenet_protocol::{NodeAddress, NodeId, FULL_BATTERY};

use crate::view::TopologyView;

/// A sensor node as seen by the controller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensorNode {
    /// Node identity (`<netId>.<address>`)
    id: NodeId,

    /// Remaining battery (0-255, lower = more depleted)
    battery: u8,
}

impl SensorNode {
    /// Create a node at full charge
    pub fn new(id: NodeId) -> Self {
        SensorNode {
            id,
            battery: FULL_BATTERY,
        }
    }

    /// Create a node with a known battery level
    pub fn with_battery(id: NodeId, battery: u8) -> Self {
        SensorNode { id, battery }
    }

    /// Get the node identity
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Get the physical address
    pub fn address(&self) -> NodeAddress {
        self.id.address()
    }

    /// Get the remaining battery level
    pub fn battery(&self) -> u8 {
        self.battery
    }
}

/// A weighted link to a neighboring node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    /// Neighbor identity
    pub to: NodeId,

    /// Link weight ("length"), the shortest-path cost
    pub length: u32,
}

/// The live topology graph.
///
/// Every mutation (node, link or battery update) advances the modification
/// counter, so cached per-source shortest-path trees can detect staleness
/// without diffing the graph.
#[derive(Debug, Default)]
pub struct TopologyGraph {
    nodes: HashMap<NodeId, SensorNode>,
    adjacency: HashMap<NodeId, Vec<Link>>,
    modification: u64,
}

impl TopologyGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        TopologyGraph::default()
    }

    /// Insert or replace a node
    pub fn add_node(&mut self, node: SensorNode) {
        self.adjacency.entry(node.id()).or_default();
        self.nodes.insert(node.id(), node);
        self.modification += 1;
    }

    /// Remove a node and every link touching it
    pub fn remove_node(&mut self, id: &NodeId) {
        if self.nodes.remove(id).is_none() {
            return;
        }
        self.adjacency.remove(id);
        for links in self.adjacency.values_mut() {
            links.retain(|link| link.to != *id);
        }
        self.modification += 1;
    }

    /// Add an undirected link between two known nodes.
    ///
    /// Returns `false` (and leaves the graph untouched) when either endpoint
    /// is unknown.
    pub fn add_link(&mut self, a: NodeId, b: NodeId, length: u32) -> bool {
        if !self.nodes.contains_key(&a) || !self.nodes.contains_key(&b) {
            return false;
        }
        self.insert_link(a, b, length);
        self.insert_link(b, a, length);
        self.modification += 1;
        true
    }

    fn insert_link(&mut self, from: NodeId, to: NodeId, length: u32) {
        let links = self.adjacency.entry(from).or_default();
        match links.iter_mut().find(|link| link.to == to) {
            Some(link) => link.length = length,
            None => links.push(Link { to, length }),
        }
    }

    /// Update a node's battery level.
    ///
    /// Battery changes advance the modification counter like any other
    /// change: the weakest-node tie-break depends on battery, so cached
    /// selections made against the old level are stale.
    pub fn set_battery(&mut self, id: &NodeId, battery: u8) -> bool {
        match self.nodes.get_mut(id) {
            Some(node) => {
                node.battery = battery;
                self.modification += 1;
                true
            }
            None => false,
        }
    }

    /// Number of nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the graph has no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate over all nodes
    pub fn nodes(&self) -> impl Iterator<Item = &SensorNode> {
        self.nodes.values()
    }
}

impl TopologyView for TopologyGraph {
    fn node(&self, id: &NodeId) -> Option<&SensorNode> {
        self.nodes.get(id)
    }

    fn neighbors(&self, id: &NodeId) -> &[Link] {
        self.adjacency.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    fn last_modification(&self) -> u64 {
        self.modification
    }
}
