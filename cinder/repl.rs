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

//! The operator shell: a line-oriented command channel on stdin.
//!
//! Every command delegates to the same internal operations the network
//! dispatch uses, so operator actions and peer messages are
//! indistinguishable to the chain state.

use cinder_network::Node;
use cinder_objects::{public_key_hex, Transaction};
use cinder_storage::PeerAddress;

use k256::ecdsa::SigningKey;
use serde_json::json;
use tokio::io::{AsyncBufReadExt, BufReader};

const HELP: &str = "Available commands: peers, add_peer <ip:port>, health_check, show_blockchain, \
                    add_transaction <receiver> <amount>, show_pending_transactions, help, exit";

/// Runs the operator shell until `exit` or the end of stdin.
pub async fn start(node: Node, signing_key: SigningKey) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    println!("Type 'help' for the available commands.");

    while let Ok(Some(line)) = lines.next_line().await {
        let line = line.trim().to_lowercase();
        let mut words = line.split_whitespace();

        match words.next() {
            None => {}
            Some("exit") => {
                info!("Shutting down the node");
                std::process::exit(0);
            }
            Some("peers") => {
                let peers: Vec<String> = node
                    .environment()
                    .peer_book()
                    .all_peers()
                    .iter()
                    .map(PeerAddress::to_string)
                    .collect();
                println!("Current peers: {:?}", peers);
            }
            Some("add_peer") => match words.next().map(str::parse::<PeerAddress>) {
                Some(Ok(address)) => {
                    node.environment().peer_book().add_peer(&address, None);
                    println!("Added peer: {}", address);
                }
                _ => println!("Usage: add_peer <ip:port>"),
            },
            Some("health_check") => {
                info!("Manually starting a health check");
                node.perform_health_check().await;
            }
            Some("show_blockchain") => {
                println!("{}", node.environment().blockchain().read().to_json());
            }
            Some("add_transaction") => {
                let receiver = words.next();
                let amount = words.next().and_then(|amount| amount.parse::<f64>().ok());
                match (receiver, amount) {
                    (Some(receiver), Some(amount)) => {
                        submit_transaction(&node, &signing_key, receiver, amount).await;
                    }
                    _ => println!("Usage: add_transaction <receiver> <amount>"),
                }
            }
            Some("show_pending_transactions") => {
                let pending = json!(node.environment().blockchain().read().memory_pool().transactions());
                println!("{}", serde_json::to_string_pretty(&pending).unwrap_or_default());
            }
            Some("help") => println!("{}", HELP),
            Some(other) => {
                warn!("Unknown command '{}'. Type 'help' for the available commands.", other);
            }
        }
    }
}

/// Builds, signs and submits a transaction from the node key.
///
/// The nonce is derived under the chain lock as the committed nonce plus
/// the sender's pending count, matching what admission will expect.
async fn submit_transaction(node: &Node, signing_key: &SigningKey, receiver: &str, amount: f64) {
    let sender = public_key_hex(signing_key);

    let mut transaction = {
        let blockchain = node.environment().blockchain().read();
        let nonce = blockchain.ledger().get_nonce(&sender).unwrap_or(0)
            + blockchain.memory_pool().pending_count(&sender);
        Transaction::new(sender, receiver.to_owned(), amount, nonce)
    };
    transaction.sign(signing_key);

    if node.submit_transaction(transaction.clone()).await {
        println!("Added and broadcast the transaction {}", transaction.tx_hash);
    } else {
        println!("The transaction was rejected");
    }
}
