//! Single-source shortest paths over the topology
//!
//! The tie-break in [`crate::selector`] compares the battery bottleneck of
//! *every* cost-optimal route, so the tree keeps all optimal predecessors of
//! each node (not just one) and enumerates the full set of equal-cost paths
//! by backtracking over them.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use wisenet_protocol::NodeId;
use wisenet_topology::TopologyView;

/// Shortest-path tree rooted at one source node.
///
/// Distances use the link `length` as cost; weights are non-negative by
/// construction (`u32`).
#[derive(Debug)]
pub struct ShortestPathTree {
    source: NodeId,
    distances: HashMap<NodeId, u64>,
    predecessors: HashMap<NodeId, Vec<NodeId>>,
}

impl ShortestPathTree {
    /// Compute the full tree from `source` over the current snapshot
    pub fn compute(view: &impl TopologyView, source: NodeId) -> Self {
        let mut distances: HashMap<NodeId, u64> = HashMap::new();
        let mut predecessors: HashMap<NodeId, Vec<NodeId>> = HashMap::new();
        let mut heap: BinaryHeap<Reverse<(u64, NodeId)>> = BinaryHeap::new();

        if view.contains(&source) {
            distances.insert(source, 0);
            heap.push(Reverse((0, source)));
        }

        while let Some(Reverse((cost, node))) = heap.pop() {
            if cost > distances[&node] {
                continue; // superseded heap entry
            }
            for link in view.neighbors(&node) {
                let next_cost = cost + link.length as u64;
                match distances.get(&link.to) {
                    None => {
                        distances.insert(link.to, next_cost);
                        predecessors.insert(link.to, vec![node]);
                        heap.push(Reverse((next_cost, link.to)));
                    }
                    Some(&known) if next_cost < known => {
                        distances.insert(link.to, next_cost);
                        predecessors.insert(link.to, vec![node]);
                        heap.push(Reverse((next_cost, link.to)));
                    }
                    Some(&known) if next_cost == known => {
                        let preds = predecessors.entry(link.to).or_default();
                        if !preds.contains(&node) {
                            preds.push(node);
                        }
                    }
                    _ => {}
                }
            }
        }

        // Sorted predecessor lists make path enumeration order deterministic,
        // which in turn makes the first-wins tie-break deterministic.
        for preds in predecessors.values_mut() {
            preds.sort();
        }

        ShortestPathTree {
            source,
            distances,
            predecessors,
        }
    }

    /// The source this tree was computed from
    pub fn source(&self) -> NodeId {
        self.source
    }

    /// Shortest distance to a destination, if reachable
    pub fn distance(&self, destination: &NodeId) -> Option<u64> {
        self.distances.get(destination).copied()
    }

    /// Check whether a destination is reachable from the source
    pub fn is_reachable(&self, destination: &NodeId) -> bool {
        self.distances.contains_key(destination)
    }

    /// Every equal-cost shortest path from the source to `destination`,
    /// each ordered source-first. Empty when the destination is unreachable.
    pub fn all_paths(&self, destination: &NodeId) -> Vec<Vec<NodeId>> {
        if !self.is_reachable(destination) {
            return Vec::new();
        }

        let mut paths = Vec::new();
        let mut suffix = Vec::new();
        self.backtrack(destination, &mut suffix, &mut paths);
        paths
    }

    fn backtrack(&self, node: &NodeId, suffix: &mut Vec<NodeId>, paths: &mut Vec<Vec<NodeId>>) {
        suffix.push(*node);

        if *node == self.source {
            paths.push(suffix.iter().rev().copied().collect());
        } else if let Some(preds) = self.predecessors.get(node) {
            for pred in preds {
                // Zero-weight links make equal-distance nodes mutual
                // predecessors; stepping back onto the suffix would loop.
                if suffix.contains(pred) {
                    continue;
                }
                self.backtrack(pred, suffix, paths);
            }
        }

        suffix.pop();
    }
}
