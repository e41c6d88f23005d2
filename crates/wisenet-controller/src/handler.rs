//! Routing-request handling
//!
//! One worker serves routing requests to completion, in arrival order: check
//! the endpoints, resolve a path through the cache, install it with a
//! path-setup message, re-inject the original request toward its destination,
//! and record the path metadata for the aggregation consumer. Every failure
//! mode is absorbed here: a sensor network control plane prefers best-effort
//! routing over strict error signaling.

use tracing::{debug, trace, warn};

use wisenet_protocol::{NetworkPacket, NodeAddress};
use wisenet_routing::{CacheStats, RouteCache, RoutingError};
use wisenet_topology::TopologyView;

use crate::error::{ControllerError, Result};
use crate::store::{PathRecord, PathStore};
use crate::transmit::PacketTransmitter;

/// Serves routing requests over a live topology view
pub struct RoutingController<T: PacketTransmitter> {
    /// The controller's own sink address, written as the source of
    /// re-injected requests
    sink: NodeAddress,
    cache: RouteCache,
    transmitter: T,
    store: PathStore,
}

impl<T: PacketTransmitter> RoutingController<T> {
    /// Create a controller
    pub fn new(sink: NodeAddress, transmitter: T, store: PathStore) -> Self {
        RoutingController {
            sink,
            cache: RouteCache::new(),
            transmitter,
            store,
        }
    }

    /// The controller's sink address
    pub fn sink(&self) -> NodeAddress {
        self.sink
    }

    /// Cache counters, for observability and tests
    pub fn cache_stats(&self) -> &CacheStats {
        self.cache.stats()
    }

    /// The metadata store in use
    pub fn store(&self) -> &PathStore {
        &self.store
    }

    /// Handle one routing request to completion.
    ///
    /// Never fails toward the caller: requests that cannot be served are
    /// dropped and logged.
    pub async fn handle_request(&mut self, view: &impl TopologyView, packet: NetworkPacket) {
        match self.route(view, packet).await {
            Ok(()) => {}
            Err(ControllerError::Routing(reason)) => match reason {
                RoutingError::SelfRoute(_) => trace!(%reason, "request dropped"),
                RoutingError::UnknownEndpoint(_) => debug!(%reason, "request dropped"),
                // No "unreachable" notice goes back to the requester; the
                // node keeps resending until the topology heals.
                RoutingError::NoRoute { .. } | RoutingError::DegeneratePath(_) => {
                    warn!(%reason, "request dropped")
                }
            },
            Err(e) => warn!(error = %e, "routing request failed"),
        }
    }

    async fn route(&mut self, view: &impl TopologyView, packet: NetworkPacket) -> Result<()> {
        let source = packet.source_id();
        let destination = packet.destination_id();

        if source == destination {
            return Err(RoutingError::SelfRoute(source).into());
        }
        if !view.contains(&source) {
            return Err(RoutingError::UnknownEndpoint(source).into());
        }
        if !view.contains(&destination) {
            return Err(RoutingError::UnknownEndpoint(destination).into());
        }

        let resolution = self
            .cache
            .resolve(view, source, destination)
            .ok_or(RoutingError::NoRoute {
                from: source,
                destination,
            })?;
        let chosen = resolution.path;

        if chosen.is_degenerate() {
            return Err(RoutingError::DegeneratePath(destination).into());
        }

        debug!(%source, %destination, hops = chosen.len(), "installing path");

        // Fire-and-forget installation toward the first node of the path.
        let hops = chosen.addresses();
        if let Err(e) = self
            .transmitter
            .send_path(packet.net_id(), hops[0], &hops)
            .await
        {
            warn!(error = %e, "path installation send failed");
        }

        // Re-inject a copy of the request so it rides the fresh rule instead
        // of being treated as a new routing request.
        let mut reinjected = packet.clone();
        reinjected.unset_request_flag();
        reinjected.set_src(self.sink);
        if let Err(e) = self.transmitter.send_packet(reinjected).await {
            warn!(error = %e, "request re-injection failed");
        }

        // Metadata is best-effort: losing an aggregation record is less
        // severe than losing connectivity.
        if resolution.fresh {
            let record = PathRecord::from_chosen(source, destination, &chosen);
            if let Err(e) = self.store.upsert(&record) {
                warn!(error = %e, "path metadata write failed");
            }
        }

        Ok(())
    }
}
