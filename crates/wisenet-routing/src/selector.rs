//! Battery-aware selection among equal-cost paths
//!
//! Every candidate path has a "bottleneck battery": the minimum battery level
//! among its nodes. The selector picks the candidate whose bottleneck is the
//! largest (max-min), so the weakest node on the chosen route is the least
//! depleted one available. This extends the lifetime of the most
//! energy-constrained node.
//!
//! Ex:
//!   P1: batteries [10, 5, 20], bottleneck 5
//!   P2: batteries [10, 2, 25], bottleneck 2
//! P1 wins, and its weakest node (battery 5) is recorded.

use serde::{Deserialize, Serialize};

use wisenet_protocol::{NodeAddress, NodeId};
use wisenet_topology::TopologyView;

/// A selected path plus its weakest-node metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChosenPath {
    /// Ordered node sequence, source to destination inclusive
    pub hops: Vec<NodeId>,

    /// Node with the lowest battery on the path
    pub weakest_node: NodeId,

    /// That node's battery level (0-255)
    pub weakest_battery: u8,
}

impl ChosenPath {
    /// Number of nodes on the path
    pub fn len(&self) -> usize {
        self.hops.len()
    }

    /// Check whether the path is empty
    pub fn is_empty(&self) -> bool {
        self.hops.is_empty()
    }

    /// A path of fewer than two nodes has no forwarding state to install
    pub fn is_degenerate(&self) -> bool {
        self.hops.len() < 2
    }

    /// First node of the path (where the installation message is addressed)
    pub fn first_hop(&self) -> Option<NodeId> {
        self.hops.first().copied()
    }

    /// The path as physical addresses, in order
    pub fn addresses(&self) -> Vec<NodeAddress> {
        self.hops.iter().map(|id| id.address()).collect()
    }
}

/// Pick one path among all equal-cost candidates by max-min bottleneck
/// battery.
///
/// Candidates with equal maximal bottlenecks are resolved first-wins: the
/// comparison is strict, so the earliest candidate in enumeration order keeps
/// the slot. Enumeration order is deterministic (see
/// [`crate::dijkstra::ShortestPathTree`]), so the overall selection is too.
///
/// Returns `None` when the candidate set is empty. A node missing from the
/// view mid-selection counts as fully depleted rather than failing the whole
/// selection.
pub fn choose_path(view: &impl TopologyView, candidates: &[Vec<NodeId>]) -> Option<ChosenPath> {
    let mut best: Option<ChosenPath> = None;

    for hops in candidates {
        let mut weakest: Option<(NodeId, u8)> = None;

        for id in hops {
            let battery = view.node(id).map(|n| n.battery()).unwrap_or(0);
            match weakest {
                Some((_, lowest)) if battery >= lowest => {}
                _ => weakest = Some((*id, battery)),
            }
        }

        let Some((weakest_node, weakest_battery)) = weakest else {
            continue; // empty candidate, nothing to score
        };

        let wins = match &best {
            None => true,
            Some(current) => weakest_battery > current.weakest_battery,
        };
        if wins {
            best = Some(ChosenPath {
                hops: hops.clone(),
                weakest_node,
                weakest_battery,
            });
        }
    }

    best
}
