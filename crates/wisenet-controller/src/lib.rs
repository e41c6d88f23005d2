//! WiseNet Controller
//!
//! The routing-decision side of the controller:
//! - [`RoutingController`] serves routing requests: resolve a path through
//!   the cache, install it along the network, re-inject the request toward
//!   its destination
//! - [`PathStore`] persists the chosen path and weakest-node metadata per
//!   (source, destination) pair for the downstream aggregation-rate setter
//! - [`PacketTransmitter`] is the boundary to the link-layer adapter that
//!   physically transmits frames
//!
//! Everything here is best-effort: unknown endpoints, unreachable
//! destinations, store failures and transmission failures are logged and
//! absorbed, never surfaced back to the requesting node.

pub mod aggregation;
pub mod config;
pub mod error;
pub mod handler;
pub mod store;
pub mod transmit;

pub use aggregation::{agg_payload, aggregation_rate, rate_for};
pub use config::ControllerConfig;
pub use error::{ControllerError, Result};
pub use handler::RoutingController;
pub use store::{PathRecord, PathStore, StoreError};
pub use transmit::{PacketTransmitter, TransmitError};
