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

use std::time::Duration;

/// The consensus parameters of the network this node participates in.
///
/// The block reward is deliberately not a parameter: the protocol fixes it
/// at `cinder_objects::BLOCK_REWARD` and transaction validation depends on
/// the exact value.
#[derive(Debug, Clone)]
pub struct ConsensusParameters {
    /// The number of leading zero hex characters a block hash must carry.
    pub difficulty: u32,
    /// The number of pending transactions required before a block is assembled.
    pub min_block_transactions: usize,
    /// How long the miner waits between looks at an underfull mempool.
    pub mempool_poll_interval: Duration,
}

impl ConsensusParameters {
    pub fn new(difficulty: u32) -> Self {
        Self {
            difficulty,
            ..Default::default()
        }
    }
}

impl Default for ConsensusParameters {
    fn default() -> Self {
        Self {
            difficulty: 6,
            min_block_transactions: 3,
            mempool_poll_interval: Duration::from_secs(5),
        }
    }
}
