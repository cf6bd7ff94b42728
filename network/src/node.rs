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

use crate::{Environment, Outbound, Payload, BOOTSTRAP_DIAL_TIMEOUT, HEALTH_CHECK_TIMEOUT};

use cinder_consensus::Miner;
use cinder_objects::{Block, Transaction};
use cinder_storage::PeerAddress;

use std::sync::Arc;

/// The message handler and background loops of a regular node.
///
/// A regular node gossips for peers, probes their health, relays valid
/// blocks and transactions, and optionally mines.
#[derive(Clone)]
pub struct Node {
    /// The parameters and shared state of this node.
    environment: Environment,
    /// The one-shot dialer of this node.
    outbound: Arc<Outbound>,
}

impl Node {
    /// Creates a new instance of `Node`.
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
            Payload::SendPeers { address, peers } => {
                self.received_peers(Some(address), peers);
                None
            }
            Payload::FromGenesis { peers } => {
                self.received_peers(None, peers);
                None
            }
            Payload::HealthCheck { address } => {
                debug!("Received a health check from {}", address);
                self.received_peers(Some(address), vec![]);
                Some(Payload::healthy_response())
            }
            Payload::GenesisHealthCheck => {
                debug!("Received a health check from the bootstrap directory");
                Some(Payload::genesis_healthy_response())
            }
            Payload::NewBlockMined { block, address } => {
                self.received_block(block, address).await;
                None
            }
            Payload::NewTransaction { transaction, address } => {
                self.received_transaction(transaction, address).await;
                None
            }
            other => {
                debug!("Ignoring an unexpected '{}' message", other);
                None
            }
        }
    }

    /// Registers the sender and the gossiped peers, under the peer cap.
    fn received_peers(&self, sender: Option<PeerAddress>, peers: Vec<PeerAddress>) {
        let peer_book = self.environment.peer_book();
        let max_peers = Some(self.environment.max_peers());

        if let Some(sender) = sender {
            if sender != *self.environment.local_address() {
                peer_book.add_peer(&sender, max_peers);
            }
        }
        for address in peers {
            if address != *self.environment.local_address() {
                peer_book.add_peer(&address, max_peers);
            }
        }
    }

    /// A peer has sent us a new block to process.
    ///
    /// The block is reconstructed from its raw parts - the peer-claimed
    /// hash is recomputed - and relayed to all known peers if the local
    /// chain accepts it.
    async fn received_block(&self, block: Block, _source: PeerAddress) {
        let block = Block::from_parts(
            block.index,
            block.previous_hash,
            block.transactions,
            block.timestamp,
            block.nonce,
        );
        info!("Received the block {} at height {}", block.hash, block.index);

        let is_new_block = self.environment.blockchain().write().add_block(block.clone());
        if is_new_block {
            info!("Broadcasting the received block {}", block.hash);
            self.broadcast_block(&block).await;
        }
    }

    /// A peer has sent us a new transaction to process.
    ///
    /// The transaction is re-admitted through the regular mempool path and
    /// relayed if it was accepted.
    async fn received_transaction(&self, transaction: Transaction, _source: PeerAddress) {
        let is_new_transaction = self
            .environment
            .blockchain()
            .write()
            .add_transaction(transaction.clone());
        if is_new_transaction {
            debug!("Added the transaction {} and broadcasting it", transaction.tx_hash);
            self.broadcast_transaction(&transaction).await;
        }
    }

    /// Admits a locally-created transaction and broadcasts it on success.
    pub async fn submit_transaction(&self, transaction: Transaction) -> bool {
        let is_new_transaction = self
            .environment
            .blockchain()
            .write()
            .add_transaction(transaction.clone());
        if is_new_transaction {
            debug!("Added the transaction {} from the operator and broadcasting it", transaction.tx_hash);
            self.broadcast_transaction(&transaction).await;
        }
        is_new_transaction
    }

    /// Announces a block to every known peer.
    pub async fn broadcast_block(&self, block: &Block) {
        let payload = Payload::NewBlockMined {
            block: block.clone(),
            address: self.environment.local_address().clone(),
        };
        self.outbound.broadcast(&payload).await;
    }

    /// Announces a transaction to every known peer.
    pub async fn broadcast_transaction(&self, transaction: &Transaction) {
        let payload = Payload::NewTransaction {
            transaction: transaction.clone(),
            address: self.environment.local_address().clone(),
        };
        self.outbound.broadcast(&payload).await;
    }

    /// The gossip loop: periodically exchanges peer addresses, falling
    /// back to the bootstrap directory while the registry is empty.
    pub async fn start_gossip(self) {
        debug!("Starting the gossip loop");
        loop {
            let peers = self
                .environment
                .peer_book()
                .peers(self.environment.gossip_count(), Some(self.environment.local_address()));

            if peers.is_empty() {
                debug!("No online peers in the registry, contacting the bootstrap directory");
                self.connect_to_bootstrap().await;
            } else {
                for remote_address in peers {
                    self.gossip_with_peer(&remote_address).await;
                }
            }

            tokio::time::sleep(self.environment.gossip_interval()).await;
        }
    }

    /// Requests an initial peer set from the bootstrap directory.
    async fn connect_to_bootstrap(&self) {
        let request = Payload::RequestPeers {
            address: self.environment.local_address().clone(),
        };

        match self
            .outbound
            .request(self.environment.bootstrap_address(), &request, BOOTSTRAP_DIAL_TIMEOUT)
            .await
        {
            Ok(Payload::FromGenesis { peers }) => self.received_peers(None, peers),
            Ok(other) => warn!("The bootstrap directory answered with a '{}' message", other),
            Err(error) => error!("Failed to connect to the bootstrap directory: {}", error),
        }
    }

    /// Pushes a small peer sample to the given peer.
    async fn gossip_with_peer(&self, remote_address: &PeerAddress) {
        debug!("Started gossiping with the peer {}", remote_address);

        let peers = self.environment.peer_book().peers(2, Some(remote_address));
        let message = Payload::SendPeers {
            address: self.environment.local_address().clone(),
            peers,
        };

        if let Err(error) = self.outbound.send_to(remote_address, &message).await {
            warn!("Error gossiping with the peer {}: {}", remote_address, error);
            self.environment.peer_book().remove_peer(remote_address);
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

    /// Probes every registered peer once, removing the unreachable ones.
    pub async fn perform_health_check(&self) {
        debug!("Performing a health check");

        for remote_address in self.environment.peer_book().all_peers() {
            if remote_address == *self.environment.local_address() {
                continue;
            }

            let probe = Payload::HealthCheck {
                address: self.environment.local_address().clone(),
            };

            match self
                .outbound
                .request(&remote_address, &probe, HEALTH_CHECK_TIMEOUT)
                .await
            {
                Ok(Payload::HealthCheckResponse { ref status }) if status == "healthy" => {
                    debug!("Received a healthy status from {}", remote_address);
                    self.environment.peer_book().set_online(&remote_address);
                }
                Ok(other) => {
                    warn!(
                        "Didn't receive a healthy response from {} (got '{}'), removing it",
                        remote_address, other
                    );
                    self.environment.peer_book().remove_peer(&remote_address);
                }
                Err(error) => {
                    warn!(
                        "The peer {} is offline, removing it from the registry: {}",
                        remote_address, error
                    );
                    self.environment.peer_book().remove_peer(&remote_address);
                }
            }
        }
    }

    /// The mining loop: drains the mempool into blocks and announces the
    /// accepted ones.
    pub async fn start_miner(self, miner: Miner) {
        debug!("Starting the mining loop");
        loop {
            if let Some(block) = miner.mine_pending_transactions(self.environment.blockchain()).await {
                info!("Successfully mined a block, broadcasting it: {}", block.hash);
                self.broadcast_block(&block).await;
            }
        }
    }
}
