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

use crate::{crypto::sha256_hex, Transaction};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt;

/// The `previous_hash` of the genesis block.
pub const GENESIS_PREVIOUS_HASH: &str = "0";

/// The sentinel hash of the genesis block; genesis is never re-validated.
pub const GENESIS_HASH: &str = "00000000000000000000000000000000";

/// A proof-of-work block: an ordered batch of transactions linked to its
/// predecessor by hash.
///
/// The block hash commits to the transaction ids rather than the full
/// transaction bodies, so it is recomputed from `transactions` on the fly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// The position of this block in the chain; 0 for genesis.
    pub index: u64,
    /// The hash of the preceding block.
    pub previous_hash: String,
    /// The transactions in this block; element 0 is the single coinbase.
    pub transactions: Vec<Transaction>,
    /// The counter varied during mining.
    pub nonce: u64,
    /// Seconds since the Unix epoch at assembly time.
    pub timestamp: i64,
    /// The hex-encoded SHA-256 digest of the canonical pre-image.
    pub hash: String,
}

impl Block {
    /// Creates a new block stamped with the current time.
    pub fn new(index: u64, previous_hash: String, transactions: Vec<Transaction>) -> Self {
        Self::from_parts(index, previous_hash, transactions, Utc::now().timestamp(), 0)
    }

    /// Assembles a block from its raw parts, recomputing the hash.
    ///
    /// Network dispatch reconstructs received blocks through this
    /// constructor, so a peer-claimed hash is never trusted.
    pub fn from_parts(
        index: u64,
        previous_hash: String,
        transactions: Vec<Transaction>,
        timestamp: i64,
        nonce: u64,
    ) -> Self {
        let mut block = Self {
            index,
            previous_hash,
            transactions,
            nonce,
            timestamp,
            hash: String::new(),
        };
        block.hash = block.calculate_hash();
        block
    }

    /// Returns the genesis block.
    pub fn genesis() -> Self {
        Self {
            index: 0,
            previous_hash: GENESIS_PREVIOUS_HASH.to_owned(),
            transactions: vec![],
            nonce: 0,
            timestamp: 0,
            hash: GENESIS_HASH.to_owned(),
        }
    }

    /// Computes the block hash from the canonical pre-image.
    ///
    /// The pre-image is whitespace-free JSON with lexicographically sorted
    /// keys, committing to the ordered list of transaction ids.
    pub fn calculate_hash(&self) -> String {
        let tx_hashes: Vec<&str> = self
            .transactions
            .iter()
            .map(|transaction| transaction.tx_hash.as_str())
            .collect();
        let preimage = json!({
            "index": self.index,
            "previous_hash": self.previous_hash,
            "transactions": tx_hashes,
            "nonce": self.nonce,
            "timestamp": self.timestamp,
        });
        sha256_hex(preimage.to_string().as_bytes())
    }

    /// Searches for a nonce whose hash meets the difficulty target.
    ///
    /// Runs to completion on the calling thread; drive it from a blocking
    /// task when invoked inside the async runtime.
    pub fn mine(&mut self, difficulty: u32) {
        let target = "0".repeat(difficulty as usize);
        while !self.hash.starts_with(&target) {
            self.nonce += 1;
            self.hash = self.calculate_hash();
        }
    }

    /// Checks the validity of this block as the successor of `previous_block`.
    pub fn is_valid(&self, difficulty: u32, previous_block: &Block) -> bool {
        trace!("Validating the block {}", self.hash);

        if self.previous_hash != previous_block.hash {
            debug!(
                "The previous hash of the block {} doesn't match with the local chain tip",
                self.hash
            );
            return false;
        }

        if !self.hash.starts_with(&"0".repeat(difficulty as usize)) {
            debug!("The hash of the block {} doesn't start with enough zeros", self.hash);
            return false;
        }

        if self.hash != self.calculate_hash() {
            warn!("The hash of the block doesn't match with the calculated hash");
            return false;
        }

        for transaction in &self.transactions {
            if !transaction.is_valid() {
                debug!(
                    "The block {} contains the invalid transaction {}",
                    self.hash, transaction.tx_hash
                );
                return false;
            }
        }

        true
    }

    /// Renders the block as indented JSON with sorted keys.
    pub fn to_json(&self) -> String {
        let value = serde_json::to_value(self).unwrap_or_default();
        serde_json::to_string_pretty(&value).unwrap_or_default()
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "block {} at height {}", self.hash, self.index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{generate_signing_key, public_key_hex};

    fn mock_transaction(amount: f64, valid_signature: bool) -> Transaction {
        let key = generate_signing_key();
        let mut transaction = Transaction::new(
            public_key_hex(&key),
            "receiver_address".to_owned(),
            amount,
            0,
        );
        transaction.sign(&key);

        if !valid_signature {
            transaction.signature = Some("a".repeat(128));
        }
        transaction
    }

    fn block_on_genesis(transactions: Vec<Transaction>) -> Block {
        let genesis = Block::genesis();
        Block::new(1, genesis.hash, transactions)
    }

    #[test]
    fn test_genesis_block() {
        let genesis = Block::genesis();

        assert_eq!(genesis.index, 0);
        assert_eq!(genesis.previous_hash, GENESIS_PREVIOUS_HASH);
        assert!(genesis.transactions.is_empty());
        assert_eq!(genesis.timestamp, 0);
        assert_eq!(genesis.hash, GENESIS_HASH);
    }

    #[test]
    fn test_block_hash_changes_with_nonce() {
        let mut block = block_on_genesis(vec![mock_transaction(10.0, true)]);

        let initial_hash = block.hash.clone();
        block.nonce += 1;
        block.hash = block.calculate_hash();

        assert_ne!(initial_hash, block.hash);
    }

    #[test]
    fn test_block_mining_meets_difficulty() {
        let mut block = block_on_genesis(vec![mock_transaction(10.0, true)]);

        block.mine(3);

        assert!(block.hash.starts_with("000"));
        assert_eq!(block.hash, block.calculate_hash());
    }

    #[test]
    fn test_block_is_valid_with_valid_transactions() {
        let genesis = Block::genesis();
        let mut block = Block::new(1, genesis.hash.clone(), vec![mock_transaction(10.0, true)]);
        block.mine(2);

        assert!(block.is_valid(2, &genesis));
    }

    #[test]
    fn test_block_is_invalid_with_invalid_transactions() {
        let genesis = Block::genesis();
        let transactions = vec![mock_transaction(10.0, true), mock_transaction(5.0, false)];
        let mut block = Block::new(1, genesis.hash.clone(), transactions);
        block.mine(2);

        assert!(!block.is_valid(2, &genesis));
    }

    #[test]
    fn test_block_is_invalid_with_wrong_hash() {
        let genesis = Block::genesis();
        let mut block = Block::new(1, genesis.hash.clone(), vec![mock_transaction(10.0, true)]);
        block.mine(2);

        block.hash = "0".repeat(64);

        assert!(!block.is_valid(2, &genesis));
    }

    #[test]
    fn test_block_is_invalid_with_wrong_previous_hash() {
        let genesis = Block::genesis();
        let mut block = Block::new(1, "1234567890abcdef".to_owned(), vec![]);
        block.mine(2);

        assert!(!block.is_valid(2, &genesis));
    }

    #[test]
    fn test_from_parts_ignores_claimed_hashes() {
        let mut block = block_on_genesis(vec![mock_transaction(10.0, true)]);
        block.mine(2);

        let reconstructed = Block::from_parts(
            block.index,
            block.previous_hash.clone(),
            block.transactions.clone(),
            block.timestamp,
            block.nonce,
        );

        assert_eq!(block, reconstructed);
    }

    #[test]
    fn test_block_timestamp_is_set() {
        let block = block_on_genesis(vec![]);
        assert!(Utc::now().timestamp() >= block.timestamp);
        assert!(block.timestamp > 0);
    }

    #[test]
    fn test_serde_round_trip_is_identity() {
        let mut block = block_on_genesis(vec![mock_transaction(10.0, true)]);
        block.mine(1);

        let encoded = serde_json::to_string(&block).unwrap();
        let decoded: Block = serde_json::from_str(&encoded).unwrap();

        assert_eq!(block, decoded);
    }
}
