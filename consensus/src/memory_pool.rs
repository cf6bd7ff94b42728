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

use cinder_objects::{coins_to_micro, Transaction};

use std::collections::HashSet;

/// The set of admitted but unmined transactions, in admission order.
///
/// Admission control itself lives in `Blockchain::add_transaction`; the
/// pool only answers the questions admission and block assembly ask of it.
#[derive(Debug, Default)]
pub struct MemoryPool {
    transactions: Vec<Transaction>,
}

impl MemoryPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if a transaction with the given id is pending.
    pub fn contains(&self, tx_hash: &str) -> bool {
        self.transactions
            .iter()
            .any(|transaction| transaction.tx_hash == tx_hash)
    }

    /// Appends an already-validated transaction to the pool.
    pub fn insert(&mut self, transaction: Transaction) {
        self.transactions.push(transaction);
    }

    /// Removes every pending transaction whose id is in `tx_hashes`.
    pub fn remove_committed(&mut self, tx_hashes: &HashSet<String>) {
        self.transactions
            .retain(|transaction| !tx_hashes.contains(&transaction.tx_hash));
    }

    /// Returns the number of pending transactions sent by `sender`.
    pub fn pending_count(&self, sender: &str) -> u64 {
        self.transactions
            .iter()
            .filter(|transaction| transaction.sender == sender)
            .count() as u64
    }

    /// Returns the summed micro-coin amount of the pending transactions
    /// sent by `sender`, saturating on overflow.
    pub fn pending_amount(&self, sender: &str) -> u64 {
        self.transactions
            .iter()
            .filter(|transaction| transaction.sender == sender)
            .fold(0u64, |sum, transaction| {
                sum.saturating_add(coins_to_micro(transaction.amount))
            })
    }

    /// Returns the pending transactions in admission order.
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unsigned_transaction(sender: &str, amount: f64, nonce: u64) -> Transaction {
        Transaction::new(sender.to_owned(), "receiver_address".to_owned(), amount, nonce)
    }

    #[test]
    fn test_contains_by_tx_hash() {
        let mut pool = MemoryPool::new();
        let transaction = unsigned_transaction("sender", 1.0, 0);
        let tx_hash = transaction.tx_hash.clone();

        assert!(!pool.contains(&tx_hash));
        pool.insert(transaction);
        assert!(pool.contains(&tx_hash));
    }

    #[test]
    fn test_per_sender_accounting() {
        let mut pool = MemoryPool::new();
        pool.insert(unsigned_transaction("alice", 1.5, 0));
        pool.insert(unsigned_transaction("alice", 2.0, 1));
        pool.insert(unsigned_transaction("bob", 4.0, 0));

        assert_eq!(pool.pending_count("alice"), 2);
        assert_eq!(pool.pending_amount("alice"), 3_500_000);
        assert_eq!(pool.pending_count("bob"), 1);
        assert_eq!(pool.pending_amount("bob"), 4_000_000);
        assert_eq!(pool.pending_count("carol"), 0);
        assert_eq!(pool.pending_amount("carol"), 0);
    }

    #[test]
    fn test_remove_committed() {
        let mut pool = MemoryPool::new();
        let kept = unsigned_transaction("alice", 1.0, 0);
        let committed = unsigned_transaction("bob", 2.0, 0);
        pool.insert(kept.clone());
        pool.insert(committed.clone());

        let mut tx_hashes = HashSet::new();
        tx_hashes.insert(committed.tx_hash);
        pool.remove_committed(&tx_hashes);

        assert_eq!(pool.len(), 1);
        assert!(pool.contains(&kept.tx_hash));
    }
}
