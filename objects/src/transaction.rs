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

use crate::crypto::sha256_hex;

use k256::ecdsa::{
    signature::{Signer, Verifier},
    Signature,
    SigningKey,
    VerifyingKey,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt;

/// The reserved sender string of coinbase transactions.
pub const COINBASE_SENDER: &str = "COINBASE";

/// The fixed reward paid by the coinbase transaction of every block, in coin units.
pub const BLOCK_REWARD: f64 = 10.0;

/// A signed value transfer between two accounts.
///
/// The transaction id (`tx_hash`) is the SHA-256 digest of a canonical
/// JSON pre-image over the value-relevant fields; the signature covers the
/// hex bytes of that id. Serialization of the struct itself is the wire
/// and storage representation, so serde round-trips are the identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The hex-encoded public key of the sender, or `"COINBASE"`.
    pub sender: String,
    /// The address of the receiver.
    pub receiver: String,
    /// The transferred amount in coin units.
    pub amount: f64,
    /// The per-sender sequence number; `None` for coinbase transactions.
    pub nonce: Option<u64>,
    /// Whether this is the block reward transaction.
    pub is_coinbase: bool,
    /// The hex-encoded ECDSA signature over the `tx_hash` bytes.
    pub signature: Option<String>,
    /// The hex-encoded SHA-256 digest of the canonical pre-image.
    pub tx_hash: String,
}

impl Transaction {
    /// Creates a new unsigned transaction with its `tx_hash` populated.
    pub fn new(sender: String, receiver: String, amount: f64, nonce: u64) -> Self {
        let mut transaction = Self {
            sender,
            receiver,
            amount,
            nonce: Some(nonce),
            is_coinbase: false,
            signature: None,
            tx_hash: String::new(),
        };
        transaction.tx_hash = transaction.calculate_hash();
        transaction
    }

    /// Creates the reward transaction paying `BLOCK_REWARD` to the given receiver.
    pub fn coinbase(receiver: String) -> Self {
        let mut transaction = Self {
            sender: COINBASE_SENDER.to_owned(),
            receiver,
            amount: BLOCK_REWARD,
            nonce: None,
            is_coinbase: true,
            signature: None,
            tx_hash: String::new(),
        };
        transaction.tx_hash = transaction.calculate_hash();
        transaction
    }

    /// Computes the transaction id from the canonical pre-image.
    ///
    /// The pre-image is whitespace-free JSON with lexicographically sorted
    /// keys; coinbase transactions omit the `nonce` key. Two independently
    /// built transactions with the same fields always share an id.
    pub fn calculate_hash(&self) -> String {
        let mut preimage = json!({
            "is_coinbase": self.is_coinbase,
            "sender": self.sender,
            "receiver": self.receiver,
            "amount": self.amount,
        });
        if let Some(nonce) = self.nonce {
            preimage["nonce"] = json!(nonce);
        }
        sha256_hex(preimage.to_string().as_bytes())
    }

    /// Signs the transaction id with the given key. A no-op for coinbase.
    pub fn sign(&mut self, private_key: &SigningKey) {
        if self.is_coinbase {
            return;
        }
        let signature: Signature = private_key.sign(self.tx_hash.as_bytes());
        self.signature = Some(hex::encode(signature.to_bytes()));
    }

    /// Checks the self-contained validity of the transaction.
    ///
    /// Coinbase transactions must carry the exact block reward. All other
    /// transactions must have a sender, a nonce and a signature that
    /// verifies against the sender key over a matching `tx_hash`.
    pub fn is_valid(&self) -> bool {
        trace!("Validating the transaction {}", self.tx_hash);

        if self.is_coinbase {
            debug!("The transaction is a coinbase transaction with amount {}", self.amount);
            return self.sender == COINBASE_SENDER && self.amount == BLOCK_REWARD;
        }

        if self.sender.is_empty() || self.signature.is_none() || self.nonce.is_none() {
            debug!("The transaction is missing a sender, a nonce or a signature");
            return false;
        }

        if self.tx_hash != self.calculate_hash() {
            warn!("The transaction id doesn't match with the calculated hash");
            return false;
        }

        let public_key = match hex::decode(&self.sender)
            .ok()
            .and_then(|bytes| VerifyingKey::from_sec1_bytes(&bytes).ok())
        {
            Some(key) => key,
            None => {
                debug!("The sender of the transaction {} is not a valid public key", self.tx_hash);
                return false;
            }
        };

        let signature = match self
            .signature
            .as_deref()
            .and_then(|encoded| hex::decode(encoded).ok())
            .and_then(|bytes| Signature::from_slice(&bytes).ok())
        {
            Some(signature) => signature,
            None => {
                debug!("The signature of the transaction {} is malformed", self.tx_hash);
                return false;
            }
        };

        if public_key.verify(self.tx_hash.as_bytes(), &signature).is_err() {
            debug!("The signature isn't correct; the transaction {} is not valid", self.tx_hash);
            return false;
        }

        trace!("The transaction {} is valid", self.tx_hash);
        true
    }

    /// Renders the transaction as indented JSON with sorted keys.
    pub fn to_json(&self) -> String {
        let value = serde_json::to_value(self).unwrap_or_default();
        serde_json::to_string_pretty(&value).unwrap_or_default()
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tx_hash)
    }
}
