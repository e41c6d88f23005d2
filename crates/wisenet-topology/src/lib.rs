//! WiseNet Topology View
//!
//! The routing core consumes the network topology through the read-only
//! [`TopologyView`] trait: nodes (with battery levels), weighted links, and a
//! monotonically increasing modification counter used to detect stale cached
//! computations. [`TopologyGraph`] is the in-memory implementation the
//! discovery layer mutates; discovery itself lives outside this crate.

pub mod graph;
pub mod view;

pub use graph::{Link, SensorNode, TopologyGraph};
pub use view::TopologyView;
