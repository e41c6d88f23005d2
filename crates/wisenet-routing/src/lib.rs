//! WiseNet Route Computation
//!
//! This module implements the route-computation core of the controller:
//! - Single-source shortest-path trees over the topology (Dijkstra)
//! - Enumeration of *all* equal-cost shortest paths to a destination
//! - Battery-aware selection among them (max-min bottleneck tie-break)
//! - A single-slot per-source cache keyed to the topology's modification
//!   counter
//!
//! Requests arrive in bursts from one source querying many destinations, so
//! the cache deliberately holds a single source's tree at a time; switching
//! sources or observing a topology change evicts everything.

pub mod cache;
pub mod dijkstra;
pub mod error;
pub mod selector;

pub use cache::{CacheStats, Resolution, RouteCache};
pub use dijkstra::ShortestPathTree;
pub use error::{Result, RoutingError};
pub use selector::{choose_path, ChosenPath};
