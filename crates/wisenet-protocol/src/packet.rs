//! Network packet shapes
//!
//! Only the fields the controller consumes are modeled here: network id,
//! endpoints, next hop, packet type, the flags bitfield (including the
//! "needs a route" request bit) and the mutable payload. The full on-air
//! frame layout belongs to the link-layer adapter.

use serde::{Deserialize, Serialize};

use crate::error::{ProtocolError, Result};
use crate::types::{NodeAddress, NodeId};

/// Maximum packet payload size in bytes
pub const MAX_PAYLOAD_SIZE: usize = 116;

/// Packet type enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum PacketType {
    /// Application data (0x00)
    Data = 0x00,
    /// Node status report (0x02)
    Report = 0x02,
    /// Path-installation control message (0x05)
    OpenPath = 0x05,
}

impl PacketType {
    /// Create from u8
    pub fn from_u8(value: u8) -> Result<Self> {
        match value {
            0x00 => Ok(PacketType::Data),
            0x02 => Ok(PacketType::Report),
            0x05 => Ok(PacketType::OpenPath),
            _ => Err(ProtocolError::InvalidPacketType(value)),
        }
    }

    /// Convert to u8
    pub fn to_u8(self) -> u8 {
        self as u8
    }
}

/// Packet flags bitfield
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PacketFlags(u8);

impl PacketFlags {
    /// Sender has no forwarding rule and needs a route (Bit 0)
    pub const REQUEST: u8 = 0b0000_0001;

    /// Packet may be aggregated en route (Bit 1)
    pub const AGGREGATABLE: u8 = 0b0000_0010;

    /// Create new packet flags
    pub fn new(flags: u8) -> Self {
        PacketFlags(flags)
    }

    /// Check if flag is set
    pub fn contains(&self, flag: u8) -> bool {
        (self.0 & flag) != 0
    }

    /// Set a flag
    pub fn set(&mut self, flag: u8) {
        self.0 |= flag;
    }

    /// Clear a flag
    pub fn clear(&mut self, flag: u8) {
        self.0 &= !flag;
    }

    /// Get raw value
    pub fn as_u8(&self) -> u8 {
        self.0
    }
}

impl Default for PacketFlags {
    fn default() -> Self {
        PacketFlags(0)
    }
}

/// A packet exchanged between the controller and the sensor network
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkPacket {
    /// Network id
    net_id: u8,

    /// Source address
    src: NodeAddress,

    /// Destination address
    dst: NodeAddress,

    /// Next hop address
    next_hop: NodeAddress,

    /// Packet type
    packet_type: PacketType,

    /// Packet flags
    flags: PacketFlags,

    /// Packet payload
    payload: Vec<u8>,
}

impl NetworkPacket {
    /// Create a new packet
    pub fn new(net_id: u8, src: NodeAddress, dst: NodeAddress, packet_type: PacketType) -> Self {
        NetworkPacket {
            net_id,
            src,
            dst,
            next_hop: dst,
            packet_type,
            flags: PacketFlags::default(),
            payload: Vec::new(),
        }
    }

    /// Build the path-installation control message for an ordered hop list.
    ///
    /// The packet is addressed to the first node of the path; intermediate
    /// nodes install forwarding state for the flow as it travels.
    pub fn open_path(net_id: u8, first_hop: NodeAddress, hops: &[NodeAddress]) -> Result<Self> {
        let payload = bincode::serialize(hops)
            .map_err(|e| ProtocolError::SerializationFailed(e.to_string()))?;

        let mut packet = NetworkPacket::new(net_id, first_hop, first_hop, PacketType::OpenPath);
        packet.set_payload(payload)?;
        Ok(packet)
    }

    /// Decode the hop list carried by a path-installation message
    pub fn path_payload(&self) -> Result<Vec<NodeAddress>> {
        bincode::deserialize(&self.payload)
            .map_err(|e| ProtocolError::DeserializationFailed(e.to_string()))
    }

    /// Get the network id
    pub fn net_id(&self) -> u8 {
        self.net_id
    }

    /// Get the source address
    pub fn src(&self) -> NodeAddress {
        self.src
    }

    /// Rewrite the source address
    pub fn set_src(&mut self, src: NodeAddress) {
        self.src = src;
    }

    /// Get the destination address
    pub fn dst(&self) -> NodeAddress {
        self.dst
    }

    /// Get the next hop address
    pub fn next_hop(&self) -> NodeAddress {
        self.next_hop
    }

    /// Set the next hop address
    pub fn set_next_hop(&mut self, next_hop: NodeAddress) {
        self.next_hop = next_hop;
    }

    /// Get the packet type
    pub fn packet_type(&self) -> PacketType {
        self.packet_type
    }

    /// Source identity in the topology (`<netId>.<src>`)
    pub fn source_id(&self) -> NodeId {
        NodeId::new(self.net_id, self.src)
    }

    /// Destination identity in the topology (`<netId>.<dst>`)
    pub fn destination_id(&self) -> NodeId {
        NodeId::new(self.net_id, self.dst)
    }

    /// Check whether the sender is asking for a route
    pub fn is_request(&self) -> bool {
        self.flags.contains(PacketFlags::REQUEST)
    }

    /// Mark the packet as a routing request
    pub fn set_request_flag(&mut self) {
        self.flags.set(PacketFlags::REQUEST);
    }

    /// Clear the routing-request mark
    pub fn unset_request_flag(&mut self) {
        self.flags.clear(PacketFlags::REQUEST);
    }

    /// Get the payload
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Replace the payload
    pub fn set_payload(&mut self, payload: Vec<u8>) -> Result<()> {
        if payload.len() > MAX_PAYLOAD_SIZE {
            return Err(ProtocolError::PayloadTooLarge {
                size: payload.len(),
                max: MAX_PAYLOAD_SIZE,
            });
        }
        self.payload = payload;
        Ok(())
    }

    /// Serialize the packet for transmission
    pub fn encode(&self) -> Result<Vec<u8>> {
        bincode::serialize(self).map_err(|e| ProtocolError::SerializationFailed(e.to_string()))
    }

    /// Deserialize a packet received from the network
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let packet: NetworkPacket = bincode::deserialize(bytes)
            .map_err(|e| ProtocolError::DeserializationFailed(e.to_string()))?;

        if packet.payload.len() > MAX_PAYLOAD_SIZE {
            return Err(ProtocolError::PayloadTooLarge {
                size: packet.payload.len(),
                max: MAX_PAYLOAD_SIZE,
            });
        }

        Ok(packet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request_packet() -> NetworkPacket {
        let mut packet = NetworkPacket::new(
            1,
            NodeAddress::new(0, 3),
            NodeAddress::new(0, 1),
            PacketType::Data,
        );
        packet.set_request_flag();
        packet
    }

    #[test]
    fn test_request_flag() {
        let mut packet = request_packet();
        assert!(packet.is_request());

        packet.unset_request_flag();
        assert!(!packet.is_request());
    }

    #[test]
    fn test_endpoint_identities() {
        let packet = request_packet();
        assert_eq!(packet.source_id().to_string(), "1.0.3");
        assert_eq!(packet.destination_id().to_string(), "1.0.1");
    }

    #[test]
    fn test_encode_decode() {
        let mut packet = request_packet();
        packet.set_payload(b"temp:21".to_vec()).unwrap();

        let bytes = packet.encode().unwrap();
        let decoded = NetworkPacket::decode(&bytes).unwrap();

        assert_eq!(decoded, packet);
        assert!(decoded.is_request());
        assert_eq!(decoded.payload(), b"temp:21");
    }

    #[test]
    fn test_payload_limit() {
        let mut packet = request_packet();
        let oversized = vec![0u8; MAX_PAYLOAD_SIZE + 1];
        assert!(packet.set_payload(oversized).is_err());
    }

    #[test]
    fn test_open_path_carries_hops() {
        let hops = vec![
            NodeAddress::new(0, 3),
            NodeAddress::new(0, 2),
            NodeAddress::new(0, 1),
        ];

        let packet = NetworkPacket::open_path(1, hops[0], &hops).unwrap();

        assert_eq!(packet.packet_type(), PacketType::OpenPath);
        assert_eq!(packet.dst(), hops[0]);
        assert_eq!(packet.path_payload().unwrap(), hops);
    }

    #[test]
    fn test_packet_type_conversion() {
        assert_eq!(PacketType::from_u8(0x05).unwrap(), PacketType::OpenPath);
        assert_eq!(PacketType::OpenPath.to_u8(), 0x05);
        assert!(PacketType::from_u8(0x99).is_err());
    }
}
