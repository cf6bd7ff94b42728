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

use crate::{Blockchain, ConsensusParameters};

use cinder_objects::{Block, Transaction};

use parking_lot::RwLock;
use std::sync::Arc;

/// Compiles pending transactions into blocks and searches for a valid
/// proof of work.
#[derive(Clone)]
pub struct Miner {
    /// The coinbase address that mining rewards are assigned to.
    address: String,
    /// The consensus parameters for the network of this miner.
    parameters: ConsensusParameters,
}

impl Miner {
    /// Creates a new instance of `Miner`.
    pub fn new(address: String, parameters: ConsensusParameters) -> Self {
        Self { address, parameters }
    }

    /// Assembles an unmined candidate block from the current chain state.
    ///
    /// The pending transactions are sorted by id so that any two miners
    /// working on the same mempool produce the same ordering, and the
    /// coinbase for this miner is prepended.
    pub fn establish_block(&self, blockchain: &Blockchain) -> Block {
        let coinbase = Transaction::coinbase(self.address.clone());

        let mut pending = blockchain.memory_pool().transactions().to_vec();
        pending.sort_by(|a, b| a.tx_hash.cmp(&b.tx_hash));

        let mut transactions = vec![coinbase];
        transactions.extend(pending);

        Block::new(
            blockchain.block_height() as u64,
            blockchain.latest_block().hash.clone(),
            transactions,
        )
    }

    /// Waits for enough pending transactions, mines a block over them and
    /// submits it to the local chain.
    ///
    /// Returns the accepted block for broadcast, or `None` if the chain
    /// rejected it - typically because a competing block moved the tip
    /// while the proof of work was running.
    pub async fn mine_pending_transactions(&self, blockchain: &Arc<RwLock<Blockchain>>) -> Option<Block> {
        loop {
            if blockchain.read().memory_pool().len() >= self.parameters.min_block_transactions {
                break;
            }
            tokio::time::sleep(self.parameters.mempool_poll_interval).await;
        }

        // Snapshot the candidate under the lock, then mine outside of it.
        let candidate = self.establish_block(&blockchain.read());
        debug!("The miner is creating a block on top of {}", candidate.previous_hash);

        let difficulty = self.parameters.difficulty;
        let mined = match tokio::task::spawn_blocking(move || {
            let mut block = candidate;
            block.mine(difficulty);
            block
        })
        .await
        {
            Ok(block) => block,
            Err(error) => {
                warn!("The mining task failed: {}", error);
                return None;
            }
        };

        debug!("Successfully mined the block {}, now validating and adding it", mined.hash);
        if blockchain.write().add_block(mined.clone()) {
            info!("The block {} got added successfully", mined.hash);
            Some(mined)
        } else {
            warn!("The block {} didn't get added successfully", mined.hash);
            None
        }
    }
}
