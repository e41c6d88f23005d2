//! Routing error types

use thiserror::Error;
use wisenet_protocol::NodeId;

/// Why a routing request could not be served.
///
/// None of these abort the controller; they are logged and the request is
/// dropped, favoring availability over strict error signaling.
#[derive(Error, Debug)]
pub enum RoutingError {
    #[error("source and destination coincide: {0}")]
    SelfRoute(NodeId),

    #[error("endpoint not in topology: {0}")]
    UnknownEndpoint(NodeId),

    // Field is not named `source`: thiserror would wire it up as the
    // error's source(), and NodeId is not an Error.
    #[error("no route from {from} to {destination}")]
    NoRoute { from: NodeId, destination: NodeId },

    #[error("path to {0} has no hops to install")]
    DegeneratePath(NodeId),
}

/// Result type for routing operations
pub type Result<T> = std::result::Result<T, RoutingError>;
