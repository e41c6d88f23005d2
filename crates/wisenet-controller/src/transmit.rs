//! Transmission boundary
//!
//! The controller never talks to radios directly; it hands frames to a
//! [`PacketTransmitter`] (the link-layer adapter). Both sends are
//! fire-and-forget: no acknowledgement is observed here, and reliability, if
//! any, belongs to the adapter.

use async_trait::async_trait;
use thiserror::Error;

use wisenet_protocol::{NetworkPacket, NodeAddress};

/// Transmission errors, opaque to the routing core
#[derive(Error, Debug)]
pub enum TransmitError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("link layer unavailable: {0}")]
    Unavailable(String),
}

/// Outbound boundary toward the sensor network
#[async_trait]
pub trait PacketTransmitter: Send + Sync {
    /// Install forwarding state: send the path-installation control message
    /// for `hops` (ordered, source to destination) addressed to `first_hop`.
    async fn send_path(
        &self,
        net_id: u8,
        first_hop: NodeAddress,
        hops: &[NodeAddress],
    ) -> Result<(), TransmitError>;

    /// Send a packet through the normal data path
    async fn send_packet(&self, packet: NetworkPacket) -> Result<(), TransmitError>;
}
