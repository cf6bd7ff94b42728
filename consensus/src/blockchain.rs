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

use crate::{ConsensusError, ConsensusParameters, MemoryPool};

use cinder_objects::{coins_to_micro, format_coins, Block, Transaction, BLOCK_REWARD};
use cinder_storage::{Account, AccountLedger};

use serde_json::json;
use std::collections::{BTreeMap, HashMap, HashSet};

/// The local replica of the chain, together with the mempool and the
/// account ledger it transitions.
///
/// All three move together: admission reads chain state, block application
/// mutates the ledger and drains the mempool. Callers therefore share one
/// `Blockchain` behind a single lock and never hold partial references.
pub struct Blockchain {
    /// The chain of blocks, starting with genesis; append-only.
    pub chain: Vec<Block>,
    memory_pool: MemoryPool,
    ledger: AccountLedger,
    parameters: ConsensusParameters,
}

impl Blockchain {
    /// Creates a chain holding only the genesis block.
    pub fn new(parameters: ConsensusParameters, ledger: AccountLedger) -> Self {
        Self {
            chain: vec![Block::genesis()],
            memory_pool: MemoryPool::new(),
            ledger,
            parameters,
        }
    }

    /// Returns the block at the tip of the chain.
    pub fn latest_block(&self) -> &Block {
        // The chain always holds at least genesis.
        self.chain.last().expect("the chain cannot be empty")
    }

    /// Returns the number of blocks in the chain, genesis included.
    pub fn block_height(&self) -> usize {
        self.chain.len()
    }

    pub fn memory_pool(&self) -> &MemoryPool {
        &self.memory_pool
    }

    pub fn ledger(&self) -> &AccountLedger {
        &self.ledger
    }

    pub fn parameters(&self) -> &ConsensusParameters {
        &self.parameters
    }

    /// Admits a transaction into the mempool.
    ///
    /// The checks run in order and any failure rejects without mutating
    /// state: shape and signature validity, dedup by id, sender funds
    /// covering all pending spends, and the next expected nonce. The
    /// ledger nonce itself only advances when a block commits, so the
    /// expected nonce is the committed nonce plus the sender's pending
    /// transaction count.
    pub fn add_transaction(&mut self, transaction: Transaction) -> bool {
        if transaction.is_coinbase {
            debug!("Rejecting the transaction {}: coinbase transactions are never relayed", transaction.tx_hash);
            return false;
        }

        if !transaction.amount.is_finite() || transaction.amount < 0.0 {
            debug!("Rejecting the transaction {}: invalid amount {}", transaction.tx_hash, transaction.amount);
            return false;
        }

        if !transaction.is_valid() {
            debug!("Rejecting the transaction {}: failed validation", transaction.tx_hash);
            return false;
        }

        if self.memory_pool.contains(&transaction.tx_hash) {
            debug!("Rejecting the transaction {}: already in the mempool", transaction.tx_hash);
            return false;
        }

        let sender_balance = match self.ledger.get_balance(&transaction.sender) {
            Some(balance) => balance,
            None => {
                debug!("Rejecting the transaction {}: unknown sender", transaction.tx_hash);
                return false;
            }
        };

        let required = match self
            .memory_pool
            .pending_amount(&transaction.sender)
            .checked_add(coins_to_micro(transaction.amount))
        {
            Some(required) => required,
            None => {
                debug!("Rejecting the transaction {}: amount overflow", transaction.tx_hash);
                return false;
            }
        };
        if sender_balance < required {
            debug!(
                "Rejecting the transaction {}: the sender balance {} doesn't cover {}",
                transaction.tx_hash, sender_balance, required
            );
            return false;
        }

        let expected_nonce = self.ledger.get_nonce(&transaction.sender).unwrap_or(0)
            + self.memory_pool.pending_count(&transaction.sender);
        if transaction.nonce != Some(expected_nonce) {
            debug!(
                "Rejecting the transaction {}: nonce {:?} while {} was expected",
                transaction.tx_hash, transaction.nonce, expected_nonce
            );
            return false;
        }

        debug!("The transaction {} got admitted into the mempool", transaction.tx_hash);
        self.memory_pool.insert(transaction);
        true
    }

    /// Validates a block against the tip, applies its transactions to the
    /// ledger and appends it to the chain.
    ///
    /// Returns `false` without mutating anything if the block or its state
    /// transition is invalid.
    pub fn add_block(&mut self, block: Block) -> bool {
        if !block.is_valid(self.parameters.difficulty, self.latest_block()) {
            return false;
        }

        if let Err(error) = self.apply_transactions(&block.transactions) {
            warn!("The block {} failed to apply: {}", block.hash, error);
            return false;
        }

        let included: HashSet<String> = block
            .transactions
            .iter()
            .map(|transaction| transaction.tx_hash.clone())
            .collect();
        self.memory_pool.remove_committed(&included);

        self.chain.push(block);
        true
    }

    /// Applies a block's transactions to the ledger, atomically.
    ///
    /// All checks run against the committed ledger state; only once every
    /// group passes are the balance and nonce changes staged in a scratch
    /// map and written out, so a rejected block leaves the ledger untouched.
    fn apply_transactions(&self, transactions: &[Transaction]) -> Result<(), ConsensusError> {
        let (coinbase, regular): (Vec<&Transaction>, Vec<&Transaction>) = transactions
            .iter()
            .partition(|transaction| transaction.is_coinbase);

        if coinbase.len() != 1 {
            return Err(ConsensusError::CoinbaseCountInvalid(coinbase.len()));
        }

        let mut groups: BTreeMap<&str, Vec<&Transaction>> = BTreeMap::new();
        for transaction in regular {
            groups.entry(&transaction.sender).or_default().push(transaction);
        }

        for (sender, group) in groups.iter_mut() {
            group.sort_by_key(|transaction| transaction.nonce);

            let account = self.ledger.account(sender).unwrap_or_default();
            let mut expected_nonce = account.nonce;
            let mut total = 0u64;

            for transaction in group.iter() {
                if transaction.nonce != Some(expected_nonce) {
                    return Err(ConsensusError::NonceMismatch(
                        transaction.tx_hash.clone(),
                        transaction.nonce,
                        expected_nonce,
                    ));
                }
                expected_nonce += 1;

                total = total
                    .checked_add(coins_to_micro(transaction.amount))
                    .ok_or_else(|| ConsensusError::AmountOverflow(sender.to_string()))?;
            }

            if total > account.balance {
                return Err(ConsensusError::InsufficientBalance(sender.to_string()));
            }
        }

        // Every group passed; stage the transition and commit it in one pass.
        let mut scratch: HashMap<String, Account> = HashMap::new();
        for transaction in transactions {
            let amount = coins_to_micro(transaction.amount);

            if transaction.is_coinbase {
                let reward = coins_to_micro(BLOCK_REWARD);
                let receiver = self.load_staged(&mut scratch, &transaction.receiver);
                receiver.balance = receiver
                    .balance
                    .checked_add(reward)
                    .ok_or_else(|| ConsensusError::AmountOverflow(transaction.receiver.clone()))?;
                debug!(
                    "Credited the coinbase reward of {} to {}",
                    format_coins(reward),
                    transaction.receiver
                );
                continue;
            }

            let sender = self.load_staged(&mut scratch, &transaction.sender);
            sender.balance = sender
                .balance
                .checked_sub(amount)
                .ok_or_else(|| ConsensusError::InsufficientBalance(transaction.sender.clone()))?;
            sender.nonce += 1;

            let receiver = self.load_staged(&mut scratch, &transaction.receiver);
            receiver.balance = receiver
                .balance
                .checked_add(amount)
                .ok_or_else(|| ConsensusError::AmountOverflow(transaction.receiver.clone()))?;
        }

        self.ledger.commit(&scratch);
        Ok(())
    }

    fn load_staged<'a>(
        &self,
        scratch: &'a mut HashMap<String, Account>,
        public_key: &str,
    ) -> &'a mut Account {
        if !scratch.contains_key(public_key) {
            let account = self.ledger.account(public_key).unwrap_or_default();
            scratch.insert(public_key.to_owned(), account);
        }
        scratch.get_mut(public_key).expect("the account was just staged")
    }

    /// Checks the hash links and per-block validity of the whole chain.
    ///
    /// Transactions are not re-applied; this is the structural check used
    /// after receiving or tampering with chain data.
    pub fn is_valid(&self) -> bool {
        trace!("Validating the chain");
        for i in 1..self.chain.len() {
            let current_block = &self.chain[i];
            let previous_block = &self.chain[i - 1];

            if current_block.previous_hash != previous_block.hash {
                debug!(
                    "The previous hash of {} doesn't match with the hash of the preceding block",
                    current_block
                );
                return false;
            }

            if !current_block.is_valid(self.parameters.difficulty, previous_block) {
                return false;
            }
        }
        trace!("The chain is valid");
        true
    }

    /// Renders the chain, the mempool and the difficulty as indented JSON
    /// with sorted keys, for the operator surface.
    pub fn to_json(&self) -> String {
        let value = json!({
            "chain": self.chain,
            "pending_transactions": self.memory_pool.transactions(),
            "difficulty": self.parameters.difficulty,
        });
        serde_json::to_string_pretty(&value).unwrap_or_default()
    }
}
