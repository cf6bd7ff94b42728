// Copyright (C) 2025-2026 The Cinder Developers.
// This file is part of the cinder library.

// The cinder library is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

// The cinder library is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU General Public License for more details.

// You should have received a copy of the GNU General Public License
// along with the cinder library. If not, see <https://www.gnu.org/licenses/>.

use crate::{Environment, Outbound, Payload, HEALTH_CHECK_TIMEOUT};

use cinder_storage::PeerAddress;

use std::{sync::Arc, time::Duration};

/// How long the directory waits before re-checking an underfull registry.
const RETRY_DELAY: Duration = Duration::from_secs(5);

/// The message handler and background loop of the bootstrap directory.
///
/// The directory is a stripped-down peer: it shares the transport and the
/// registry with regular nodes, but it only answers peer requests, and its
/// health sweep marks peers offline instead of forgetting them.
#[derive(Clone)]
pub struct Bootstrap {
    /// The parameters and shared state of this node.
    environment: Environment,
    /// The one-shot dialer of this node.
    outbound: Arc<Outbound>,
}

impl Bootstrap {
    /// Creates a new instance of `Bootstrap`.
    pub fn new(environment: Environment) -> Self {
        let outbound = Arc::new(Outbound::new(
            environment.peer_book().clone(),
            environment.local_address().clone(),
        ));
        Self {
            environment,
            outbound,
        }
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    /// Dispatches one inbound message, returning the response to write
    /// back on the same connection, if any.
    pub async fn process_message(&self, payload: Payload) -> Option<Payload> {
        match payload {
            Payload::RequestPeers { address } => Some(self.received_request_peers(address).await),
            other => {
                debug!("Ignoring an unexpected '{}' message", other);
                None
            }
        }
    }

    /// A joining node has asked for peers.
    ///
    /// The caller is registered first, then the response blocks until the
    /// registry can hand out enough online candidates; a lone first node
    /// simply waits here until others join.
    async fn received_request_peers(&self, peer_address: PeerAddress) -> Payload {
        self.environment.peer_book().add_peer(&peer_address, None);

        let count = self.environment.bootstrap_gossip_count();
        loop {
            let peers = self.environment.peer_book().peers(count, Some(&peer_address));
            if peers.len() >= count {
                debug!("Sending {} peers to {}", peers.len(), peer_address);
                return Payload::FromGenesis { peers };
            }

            warn!("Insufficient peers in the registry, {} candidates so far", peers.len());
            tokio::time::sleep(RETRY_DELAY).await;
        }
    }

    /// The health-check loop: periodically probes every registered peer.
    pub async fn start_health_check(self) {
        debug!("Starting the health check loop");
        loop {
            self.perform_health_check().await;
            tokio::time::sleep(self.environment.health_check_interval()).await;
        }
    }

    /// Probes every registered peer once.
    ///
    /// Unlike a regular node, the directory never forgets peers; it flags
    /// the unreachable ones offline so they are withheld from responses
    /// until a later probe sees them again.
    pub async fn perform_health_check(&self) {
        debug!("Performing a health check");

        for remote_address in self.environment.peer_book().all_peers() {
            match self
                .outbound
                .request(&remote_address, &Payload::GenesisHealthCheck, HEALTH_CHECK_TIMEOUT)
                .await
            {
                Ok(Payload::GenesisHealthCheckResponse { ref status }) if status == "healthy" => {
                    debug!("Received a healthy status from {}", remote_address);
                    self.environment.peer_book().set_online(&remote_address);
                }
                Ok(other) => {
                    warn!(
                        "Didn't receive a healthy response from {} (got '{}'), setting it offline",
                        remote_address, other
                    );
                    self.environment.peer_book().set_offline(&remote_address);
                }
                Err(error) => {
                    warn!("The peer {} is offline, setting it offline: {}", remote_address, error);
                    self.environment.peer_book().set_offline(&remote_address);
                }
            }
        }
    }
}
