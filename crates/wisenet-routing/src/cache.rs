//! Single-slot shortest-path cache
//!
//! Holds one source's shortest-path tree and the paths already chosen from
//! it, keyed to the topology modification counter. Switching sources or
//! observing a topology change evicts everything, even entries that would
//! still be valid: requests arrive in bursts from one source querying many
//! destinations, so single-slot locality is the dominant access pattern and a
//! richer cache buys nothing here.

use std::collections::HashMap;

use tracing::{debug, trace};
use wisenet_protocol::NodeId;
use wisenet_topology::TopologyView;

use crate::dijkstra::ShortestPathTree;
use crate::selector::{choose_path, ChosenPath};

/// Cache counters.
///
/// `selections` counts how often the battery-aware selector actually ran;
/// between two invalidations it must rise at most once per destination.
#[derive(Debug, Default, Clone)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub invalidations: u64,
    pub selections: u64,
}

/// A resolved path plus whether it was selected on this call.
///
/// Only freshly selected paths are written to the metadata store; cache hits
/// re-disseminate without touching it.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub path: ChosenPath,
    pub fresh: bool,
}

/// Per-source route cache (single resident slot)
#[derive(Debug, Default)]
pub struct RouteCache {
    last_source: Option<NodeId>,
    last_modification: u64,
    tree: Option<ShortestPathTree>,
    routes: HashMap<NodeId, ChosenPath>,
    stats: CacheStats,
}

impl RouteCache {
    /// Create an empty cache
    pub fn new() -> Self {
        RouteCache::default()
    }

    /// Resolve a path from `source` to `destination` over the current
    /// topology snapshot.
    ///
    /// Returns `None` when the endpoints coincide (self-routing is
    /// meaningless) or when no route exists. Endpoint existence is the
    /// caller's check; an unknown source simply yields an empty tree here.
    pub fn resolve(
        &mut self,
        view: &impl TopologyView,
        source: NodeId,
        destination: NodeId,
    ) -> Option<Resolution> {
        if source == destination {
            trace!(%source, "self-route, nothing to resolve");
            return None;
        }

        let modification = view.last_modification();
        if self.last_source != Some(source) || self.last_modification != modification {
            debug!(
                %source,
                modification,
                "cache slot stale, recomputing shortest-path tree"
            );
            self.routes.clear();
            self.tree = Some(ShortestPathTree::compute(view, source));
            self.last_source = Some(source);
            self.last_modification = modification;
            self.stats.invalidations += 1;
        }

        if let Some(path) = self.routes.get(&destination) {
            self.stats.hits += 1;
            return Some(Resolution {
                path: path.clone(),
                fresh: false,
            });
        }
        self.stats.misses += 1;

        let tree = self.tree.as_ref()?;
        let candidates = tree.all_paths(&destination);
        if candidates.is_empty() {
            return None;
        }

        self.stats.selections += 1;
        let chosen = choose_path(view, &candidates)?;
        trace!(
            %source,
            %destination,
            weakest = %chosen.weakest_node,
            battery = chosen.weakest_battery,
            "path selected"
        );
        self.routes.insert(destination, chosen.clone());

        Some(Resolution {
            path: chosen,
            fresh: true,
        })
    }

    /// Cache counters
    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// Drop the resident slot (next resolve recomputes)
    pub fn clear(&mut self) {
        self.last_source = None;
        self.tree = None;
        self.routes.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wisenet_topology::{SensorNode, TopologyGraph};

    fn node(id: &str) -> NodeId {
        id.parse().unwrap()
    }

    fn diamond_graph() -> TopologyGraph {
        // 1.0.1 -> 1.0.4 via 1.0.2 (battery 5) or 1.0.3 (battery 200)
        let mut graph = TopologyGraph::new();
        graph.add_node(SensorNode::with_battery(node("1.0.1"), 255));
        graph.add_node(SensorNode::with_battery(node("1.0.2"), 5));
        graph.add_node(SensorNode::with_battery(node("1.0.3"), 200));
        graph.add_node(SensorNode::with_battery(node("1.0.4"), 255));
        graph.add_link(node("1.0.1"), node("1.0.2"), 1);
        graph.add_link(node("1.0.1"), node("1.0.3"), 1);
        graph.add_link(node("1.0.2"), node("1.0.4"), 1);
        graph.add_link(node("1.0.3"), node("1.0.4"), 1);
        graph
    }

    #[test]
    fn test_hit_returns_identical_path_without_reselection() {
        let graph = diamond_graph();
        let mut cache = RouteCache::new();

        let first = cache.resolve(&graph, node("1.0.1"), node("1.0.4")).unwrap();
        let second = cache.resolve(&graph, node("1.0.1"), node("1.0.4")).unwrap();

        assert!(first.fresh);
        assert!(!second.fresh);
        assert_eq!(first.path, second.path);
        assert_eq!(cache.stats().selections, 1);
        assert_eq!(cache.stats().hits, 1);
    }

    #[test]
    fn test_battery_aware_choice_survives_caching() {
        let graph = diamond_graph();
        let mut cache = RouteCache::new();

        let resolved = cache.resolve(&graph, node("1.0.1"), node("1.0.4")).unwrap();
        assert!(resolved.path.hops.contains(&node("1.0.3")));
        assert_eq!(resolved.path.weakest_battery, 200);
    }

    #[test]
    fn test_modification_invalidates_even_when_path_unchanged() {
        let mut graph = diamond_graph();
        let mut cache = RouteCache::new();

        cache.resolve(&graph, node("1.0.1"), node("1.0.4")).unwrap();

        // Battery tweak on an unrelated node bumps the counter; the cached
        // path itself would still be correct, but the slot must go anyway.
        graph.set_battery(&node("1.0.4"), 254);

        let resolved = cache.resolve(&graph, node("1.0.1"), node("1.0.4")).unwrap();
        assert!(resolved.fresh);
        assert_eq!(cache.stats().invalidations, 2);
        assert_eq!(cache.stats().selections, 2);
    }

    #[test]
    fn test_source_change_evicts_everything() {
        let graph = diamond_graph();
        let mut cache = RouteCache::new();

        cache.resolve(&graph, node("1.0.1"), node("1.0.4")).unwrap();
        cache.resolve(&graph, node("1.0.4"), node("1.0.1")).unwrap();

        // Back to the first source: its entries are gone too.
        let again = cache.resolve(&graph, node("1.0.1"), node("1.0.4")).unwrap();
        assert!(again.fresh);
        assert_eq!(cache.stats().invalidations, 3);
    }

    #[test]
    fn test_self_route_resolves_to_nothing() {
        let graph = diamond_graph();
        let mut cache = RouteCache::new();

        assert!(cache
            .resolve(&graph, node("1.0.1"), node("1.0.1"))
            .is_none());
        assert_eq!(cache.stats().invalidations, 0);
        assert_eq!(cache.stats().misses, 0);
    }

    #[test]
    fn test_unreachable_destination() {
        let mut graph = diamond_graph();
        graph.add_node(SensorNode::new(node("1.0.9"))); // isolated
        let mut cache = RouteCache::new();

        assert!(cache
            .resolve(&graph, node("1.0.1"), node("1.0.9"))
            .is_none());
        assert_eq!(cache.stats().selections, 0);
    }

    #[test]
    fn test_clear_forces_recompute() {
        let graph = diamond_graph();
        let mut cache = RouteCache::new();

        cache.resolve(&graph, node("1.0.1"), node("1.0.4")).unwrap();
        cache.clear();

        let resolved = cache.resolve(&graph, node("1.0.1"), node("1.0.4")).unwrap();
        assert!(resolved.fresh);
    }
}
