//! WiseNet Protocol Module
//!
//! This module defines the core protocol data structures for the WiseNet
//! controller: node addressing, packet shapes, and the request/path-setup
//! flag conventions spoken between sensor nodes and the controller.

pub mod error;
pub mod packet;
pub mod types;

pub use error::{ProtocolError, Result};
pub use packet::{NetworkPacket, PacketFlags, PacketType};
pub use types::{NodeAddress, NodeId, FULL_BATTERY};
