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

//! Consensus fixtures: funded keys, signed transactions and chains with a
//! low test difficulty over in-memory storage.

use cinder_consensus::{Blockchain, ConsensusParameters, Miner};
use cinder_objects::{generate_signing_key, public_key_hex, Transaction};
use cinder_storage::{AccountLedger, MemDb};

use k256::ecdsa::SigningKey;
use std::{sync::Arc, time::Duration};

/// The difficulty used by test chains; low enough to mine instantly.
pub const TEST_DIFFICULTY: u32 = 2;

/// Returns a fresh keypair as `(signing key, public key hex)`.
pub fn test_keypair() -> (SigningKey, String) {
    let key = generate_signing_key();
    let public_key = public_key_hex(&key);
    (key, public_key)
}

/// Returns the consensus parameters used by tests: low difficulty and a
/// fast mempool poll.
pub fn test_consensus_parameters() -> ConsensusParameters {
    ConsensusParameters {
        difficulty: TEST_DIFFICULTY,
        min_block_transactions: 3,
        mempool_poll_interval: Duration::from_millis(10),
    }
}

/// Returns a ledger over in-memory storage.
pub fn test_ledger() -> AccountLedger {
    AccountLedger::new(Arc::new(MemDb::new())).expect("in-memory storage cannot fail")
}

/// Returns a chain over in-memory storage with the test difficulty.
pub fn test_blockchain() -> Blockchain {
    Blockchain::new(test_consensus_parameters(), test_ledger())
}

/// Funds the given account with `coins` whole coins.
pub fn fund_account(blockchain: &Blockchain, public_key: &str, coins: u64) {
    blockchain.ledger().upsert_balance(public_key, coins * 1_000_000);
}

/// Returns a signed transaction from `key` to `receiver`.
pub fn signed_transaction(key: &SigningKey, receiver: &str, amount: f64, nonce: u64) -> Transaction {
    let mut transaction = Transaction::new(public_key_hex(key), receiver.to_owned(), amount, nonce);
    transaction.sign(key);
    transaction
}

/// Returns a miner paying rewards to the given address, configured with
/// the test parameters.
pub fn test_miner(address: String) -> Miner {
    Miner::new(address, test_consensus_parameters())
}
