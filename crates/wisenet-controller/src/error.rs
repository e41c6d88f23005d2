//! Controller error types

use thiserror::Error;

use crate::store::StoreError;
use crate::transmit::TransmitError;

/// Controller-level errors
#[derive(Error, Debug)]
pub enum ControllerError {
    #[error("Routing error: {0}")]
    Routing(#[from] wisenet_routing::RoutingError),

    #[error("Protocol error: {0}")]
    Protocol(#[from] wisenet_protocol::ProtocolError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Transmit error: {0}")]
    Transmit(#[from] TransmitError),
}

/// Result type for controller operations
pub type Result<T> = std::result::Result<T, ControllerError>;
