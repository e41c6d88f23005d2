//! Aggregation-rate convention
//!
//! The downstream data-aggregation setter derives its ratio from the weakest
//! battery recorded in the path table: `rate = 1 - battery/255`, clamped to
//! [0.0, 1.0], so a fully charged weakest node aggregates nothing and a dead
//! one aggregates everything. The routing core only supplies the records;
//! these helpers exist for the consumer side of the file.

use wisenet_protocol::NodeId;

use crate::store::{PathStore, Result};

/// Prefix of the textual aggregation payload
pub const AGG_PREFIX: &str = "Agg:";

/// Depletion ratio for a weakest-node battery level
pub fn aggregation_rate(weakest_battery: u8) -> f64 {
    (1.0 - weakest_battery as f64 / 255.0).clamp(0.0, 1.0)
}

/// Render the `Agg:<rate>` payload carried by data packets
pub fn agg_payload(rate: f64) -> Vec<u8> {
    format!("{}{:.3}", AGG_PREFIX, rate).into_bytes()
}

/// Aggregation rate for a flow, read from the path table by exact key.
///
/// `None` until a path has actually been computed for the pair (absent key or
/// cold-start placeholder row).
pub fn rate_for(store: &PathStore, source: &NodeId, destination: &NodeId) -> Result<Option<f64>> {
    Ok(store
        .lookup(source, destination)?
        .map(|record| aggregation_rate(record.weakest_battery)))
}
