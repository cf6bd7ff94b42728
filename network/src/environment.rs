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

use crate::{NetworkError, BOOTSTRAP_GOSSIP_COUNT};

use cinder_consensus::Blockchain;
use cinder_storage::{PeerAddress, PeerBook};

use parking_lot::RwLock;
use std::{sync::Arc, time::Duration};

/// A core data structure containing the shared state and the networking
/// parameters for this node.
///
/// The chain, the mempool and the ledger move as one unit behind the
/// single `blockchain` lock; message dispatch, the mining loop and the
/// operator surface all mutate state exclusively through it.
#[derive(Clone)]
pub struct Environment {
    /// The chain + mempool + ledger triad of this node.
    blockchain: Arc<RwLock<Blockchain>>,
    /// The persistent registry of known peers.
    peer_book: Arc<PeerBook>,

    /// The address this node listens on and advertises to peers.
    local_address: PeerAddress,
    /// The well-known address of the bootstrap directory.
    bootstrap_address: PeerAddress,
    /// The address mining rewards of this node are assigned to.
    miner_address: String,

    /// The cap on registered peers.
    max_peers: usize,
    /// The number of peers contacted per gossip round.
    gossip_count: usize,
    /// The pause between gossip rounds.
    gossip_interval: Duration,
    /// The pause between health-check sweeps.
    health_check_interval: Duration,

    /// If `true`, this node answers peer requests instead of gossiping,
    /// and never mines.
    is_bootstrap: bool,
    /// If `true`, this node runs a mining loop.
    is_miner: bool,
}

impl Environment {
    /// Creates a new instance of `Environment`.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        blockchain: Arc<RwLock<Blockchain>>,
        peer_book: Arc<PeerBook>,
        local_address: PeerAddress,
        bootstrap_address: PeerAddress,
        miner_address: String,
        max_peers: usize,
        gossip_count: usize,
        gossip_interval: Duration,
        health_check_interval: Duration,
        is_bootstrap: bool,
        is_miner: bool,
    ) -> Result<Self, NetworkError> {
        // Check that the peer counts are sensible.
        if max_peers == 0 || gossip_count == 0 {
            return Err(NetworkError::PeerCountInvalid);
        }

        Ok(Self {
            blockchain,
            peer_book,
            local_address,
            bootstrap_address,
            miner_address,
            max_peers,
            gossip_count,
            gossip_interval,
            health_check_interval,
            is_bootstrap,
            is_miner,
        })
    }

    /// Returns a reference to the shared chain state of this node.
    pub fn blockchain(&self) -> &Arc<RwLock<Blockchain>> {
        &self.blockchain
    }

    /// Returns a reference to the peer registry of this node.
    pub fn peer_book(&self) -> &Arc<PeerBook> {
        &self.peer_book
    }

    /// Returns the local address of this node.
    pub fn local_address(&self) -> &PeerAddress {
        &self.local_address
    }

    /// Returns the address of the bootstrap directory.
    pub fn bootstrap_address(&self) -> &PeerAddress {
        &self.bootstrap_address
    }

    /// Returns the coinbase address of this node.
    pub fn miner_address(&self) -> &str {
        &self.miner_address
    }

    /// Returns the maximum number of peers this node registers.
    pub fn max_peers(&self) -> usize {
        self.max_peers
    }

    /// Returns the number of peers contacted per gossip round.
    pub fn gossip_count(&self) -> usize {
        self.gossip_count
    }

    /// Returns the number of peers the bootstrap directory hands out.
    pub fn bootstrap_gossip_count(&self) -> usize {
        BOOTSTRAP_GOSSIP_COUNT
    }

    /// Returns the pause between gossip rounds.
    pub fn gossip_interval(&self) -> Duration {
        self.gossip_interval
    }

    /// Returns the pause between health-check sweeps.
    pub fn health_check_interval(&self) -> Duration {
        self.health_check_interval
    }

    /// Returns `true` if this node is the bootstrap directory.
    pub fn is_bootstrap(&self) -> bool {
        self.is_bootstrap
    }

    /// Returns `true` if this node is a mining node.
    pub fn is_miner(&self) -> bool {
        self.is_miner
    }
}
