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

use crate::{KeyValueStorage, StorageError};

use serde::{Deserialize, Serialize};
use std::{collections::HashMap, sync::Arc};

/// The pre-seeded faucet account; it funds a fresh network.
pub const FAUCET_PUBLIC_KEY: &str = "043d6e6e30625810390706b4b529adb67fb9e4e2af685c4869b58bb2a7aa338d2b26eacdf40484c481616b426c7e64e641c73faebeda6a8d21ed27b0f21fbf27b4";

/// The faucet seed balance: 10,000,000 coins in micro-coins.
pub const FAUCET_BALANCE: u64 = 10_000_000 * 1_000_000;

/// The stored state of a single account.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// The number of committed transactions sent by this account.
    pub nonce: u64,
    /// The balance in micro-coins.
    pub balance: u64,
}

/// The persistent mapping from public-key hex to account state.
///
/// Store failures are logged and degrade to best-effort results; they never
/// escape to the consensus paths (a read failure reads as a missing
/// account, a write failure leaves the previous record in place).
#[derive(Clone)]
pub struct AccountLedger {
    db: Arc<dyn KeyValueStorage>,
}

impl AccountLedger {
    /// Creates a ledger over the given backend, seeding the faucet account
    /// on first use.
    pub fn new(db: Arc<dyn KeyValueStorage>) -> Result<Self, StorageError> {
        let ledger = Self { db };
        if ledger.account(FAUCET_PUBLIC_KEY).is_none() {
            debug!("Seeding the faucet account");
            ledger.write(
                FAUCET_PUBLIC_KEY,
                &Account {
                    nonce: 0,
                    balance: FAUCET_BALANCE,
                },
            )?;
        }
        Ok(ledger)
    }

    /// Returns the stored state of the given account, if any.
    pub fn account(&self, public_key: &str) -> Option<Account> {
        let bytes = match self.db.get(public_key.as_bytes()) {
            Ok(bytes) => bytes?,
            Err(error) => {
                error!("Failed to read the account {}: {}", public_key, error);
                return None;
            }
        };
        match bincode::deserialize(&bytes) {
            Ok(account) => Some(account),
            Err(error) => {
                error!("Failed to decode the account {}: {}", public_key, error);
                None
            }
        }
    }

    /// Returns the balance of the given account in micro-coins.
    pub fn get_balance(&self, public_key: &str) -> Option<u64> {
        self.account(public_key).map(|account| account.balance)
    }

    /// Returns the committed nonce of the given account.
    pub fn get_nonce(&self, public_key: &str) -> Option<u64> {
        self.account(public_key).map(|account| account.nonce)
    }

    /// Sets the balance of the given account, creating it if needed.
    pub fn upsert_balance(&self, public_key: &str, balance: u64) {
        let mut account = self.account(public_key).unwrap_or_default();
        account.balance = balance;
        let _ = self.write(public_key, &account);
    }

    /// Advances the committed nonce of the given account by one.
    pub fn increment_nonce(&self, public_key: &str) {
        let mut account = self.account(public_key).unwrap_or_default();
        account.nonce += 1;
        let _ = self.write(public_key, &account);
    }

    /// Writes a staged set of account states in one pass.
    ///
    /// This is the commit step of block application: the caller validates
    /// and stages every change first, then hands the complete scratch map
    /// over so the ledger is never left half-updated by a rejected block.
    pub fn commit(&self, accounts: &HashMap<String, Account>) {
        for (public_key, account) in accounts {
            let _ = self.write(public_key, account);
        }
    }

    fn write(&self, public_key: &str, account: &Account) -> Result<(), StorageError> {
        let bytes = bincode::serialize(account)?;
        if let Err(error) = self.db.put(public_key.as_bytes(), &bytes) {
            error!("Failed to write the account {}: {}", public_key, error);
            return Err(error);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemDb;

    fn test_ledger() -> AccountLedger {
        AccountLedger::new(Arc::new(MemDb::new())).unwrap()
    }

    #[test]
    fn test_faucet_account_is_seeded() {
        let ledger = test_ledger();

        assert_eq!(ledger.get_balance(FAUCET_PUBLIC_KEY), Some(FAUCET_BALANCE));
        assert_eq!(ledger.get_nonce(FAUCET_PUBLIC_KEY), Some(0));
    }

    #[test]
    fn test_seeding_does_not_reset_an_existing_faucet() {
        let db = Arc::new(MemDb::new());
        let ledger = AccountLedger::new(db.clone()).unwrap();
        ledger.upsert_balance(FAUCET_PUBLIC_KEY, 42);

        let reopened = AccountLedger::new(db).unwrap();
        assert_eq!(reopened.get_balance(FAUCET_PUBLIC_KEY), Some(42));
    }

    #[test]
    fn test_missing_account() {
        let ledger = test_ledger();

        assert_eq!(ledger.account("unknown"), None);
        assert_eq!(ledger.get_balance("unknown"), None);
        assert_eq!(ledger.get_nonce("unknown"), None);
    }

    #[test]
    fn test_upsert_balance_preserves_nonce() {
        let ledger = test_ledger();

        ledger.upsert_balance("key", 1_000_000);
        ledger.increment_nonce("key");
        ledger.upsert_balance("key", 2_000_000);

        assert_eq!(
            ledger.account("key"),
            Some(Account {
                nonce: 1,
                balance: 2_000_000
            })
        );
    }

    #[test]
    fn test_increment_nonce_creates_account() {
        let ledger = test_ledger();

        ledger.increment_nonce("key");
        assert_eq!(
            ledger.account("key"),
            Some(Account { nonce: 1, balance: 0 })
        );
    }

    #[test]
    fn test_commit_writes_all_staged_accounts() {
        let ledger = test_ledger();

        let mut scratch = HashMap::new();
        scratch.insert(
            "sender".to_owned(),
            Account {
                nonce: 3,
                balance: 500_000,
            },
        );
        scratch.insert(
            "receiver".to_owned(),
            Account {
                nonce: 0,
                balance: 1_500_000,
            },
        );
        ledger.commit(&scratch);

        assert_eq!(ledger.get_balance("sender"), Some(500_000));
        assert_eq!(ledger.get_nonce("sender"), Some(3));
        assert_eq!(ledger.get_balance("receiver"), Some(1_500_000));
    }
}
