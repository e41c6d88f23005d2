//! Core protocol types

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ProtocolError;

/// Battery level of a node at full charge (levels run 0-255, lower = more depleted)
pub const FULL_BATTERY: u8 = 255;

/// The two-byte physical address of a sensor node, rendered `"high.low"`
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeAddress {
    high: u8,
    low: u8,
}

impl NodeAddress {
    /// Create an address from its two bytes
    pub fn new(high: u8, low: u8) -> Self {
        NodeAddress { high, low }
    }

    /// Create an address from a 16-bit integer (big-endian byte order)
    pub fn from_int(value: u16) -> Self {
        NodeAddress {
            high: (value >> 8) as u8,
            low: (value & 0xFF) as u8,
        }
    }

    /// Get the address as a 16-bit integer
    pub fn as_int(&self) -> u16 {
        ((self.high as u16) << 8) | self.low as u16
    }

    /// Get the high byte
    pub fn high(&self) -> u8 {
        self.high
    }

    /// Get the low byte
    pub fn low(&self) -> u8 {
        self.low
    }
}

impl fmt::Debug for NodeAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeAddress({}.{})", self.high, self.low)
    }
}

impl fmt::Display for NodeAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.high, self.low)
    }
}

impl FromStr for NodeAddress {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (high, low) = s
            .split_once('.')
            .ok_or_else(|| ProtocolError::InvalidAddress(s.to_string()))?;
        let high = high
            .parse::<u8>()
            .map_err(|_| ProtocolError::InvalidAddress(s.to_string()))?;
        let low = low
            .parse::<u8>()
            .map_err(|_| ProtocolError::InvalidAddress(s.to_string()))?;
        Ok(NodeAddress::new(high, low))
    }
}

/// A node's identity in the topology: network id plus physical address,
/// rendered `"<netId>.<address>"` (e.g. `1.0.3`)
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId {
    net_id: u8,
    address: NodeAddress,
}

impl NodeId {
    /// Create a node identifier
    pub fn new(net_id: u8, address: NodeAddress) -> Self {
        NodeId { net_id, address }
    }

    /// Get the network id
    pub fn net_id(&self) -> u8 {
        self.net_id
    }

    /// Get the physical address
    pub fn address(&self) -> NodeAddress {
        self.address
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.net_id, self.address)
    }
}

impl FromStr for NodeId {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (net, addr) = s
            .split_once('.')
            .ok_or_else(|| ProtocolError::InvalidNodeId(s.to_string()))?;
        let net_id = net
            .parse::<u8>()
            .map_err(|_| ProtocolError::InvalidNodeId(s.to_string()))?;
        let address = addr
            .parse::<NodeAddress>()
            .map_err(|_| ProtocolError::InvalidNodeId(s.to_string()))?;
        Ok(NodeId::new(net_id, address))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_display() {
        let addr = NodeAddress::new(0, 3);
        assert_eq!(addr.to_string(), "0.3");
    }

    #[test]
    fn test_address_int_roundtrip() {
        let addr = NodeAddress::from_int(0x0103);
        assert_eq!(addr.high(), 1);
        assert_eq!(addr.low(), 3);
        assert_eq!(addr.as_int(), 0x0103);
    }

    #[test]
    fn test_address_parse() {
        let addr = "0.7".parse::<NodeAddress>().unwrap();
        assert_eq!(addr, NodeAddress::new(0, 7));

        assert!("7".parse::<NodeAddress>().is_err());
        assert!("0.999".parse::<NodeAddress>().is_err());
        assert!("a.b".parse::<NodeAddress>().is_err());
    }

    #[test]
    fn test_node_id_roundtrip() {
        let id = NodeId::new(1, NodeAddress::new(0, 3));
        assert_eq!(id.to_string(), "1.0.3");

        let parsed = "1.0.3".parse::<NodeId>().unwrap();
        assert_eq!(parsed, id);
        assert_eq!(parsed.net_id(), 1);
        assert_eq!(parsed.address(), NodeAddress::new(0, 3));
    }

    #[test]
    fn test_node_id_parse_invalid() {
        assert!("1".parse::<NodeId>().is_err());
        assert!("1.0".parse::<NodeId>().is_err());
        assert!("x.0.1".parse::<NodeId>().is_err());
    }

    #[test]
    fn test_node_id_ordering() {
        // Ordering is (net_id, address); used to keep path enumeration deterministic
        let a = "1.0.1".parse::<NodeId>().unwrap();
        let b = "1.0.2".parse::<NodeId>().unwrap();
        let c = "2.0.1".parse::<NodeId>().unwrap();

        assert!(a < b);
        assert!(b < c);
    }
}
