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

#[macro_use]
extern crate tracing;

use cinder::{cli, config::Config, repl};
use cinder_consensus::{Blockchain, ConsensusParameters};
use cinder_network::{Environment, Server};
use cinder_objects::{generate_signing_key, public_key_hex, signing_key_from_hex, signing_key_to_hex};
use cinder_storage::{open_storage, AccountLedger, KeyValueStorage, MemDb, PeerBook};

use anyhow::Result;
use colored::Colorize;
use k256::ecdsa::SigningKey;
use parking_lot::RwLock;
use std::{fs, path::Path, sync::Arc, time::Duration};

fn initialize_logger(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(level.parse().expect("a valid log level"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn print_welcome(config: &Config) {
    let role = if config.is_bootstrap {
        "bootstrap directory"
    } else if config.miner {
        "mining node"
    } else {
        "relay node"
    };
    println!("{} {}", "cinder".bold().cyan(), env!("CARGO_PKG_VERSION"));
    println!("Starting a {} on {}", role, config.local_address());
}

/// Opens the persistent stores, degrading to in-memory operation when the
/// data directory is unusable.
fn initialize_storage(path: &Path) -> (Arc<dyn KeyValueStorage>, Arc<dyn KeyValueStorage>) {
    match open_storage(path.join("storage")) {
        Ok((accounts, peers)) => (Arc::new(accounts), Arc::new(peers)),
        Err(error) => {
            error!(
                "Failed to open the storage under {}: {}. Continuing in memory",
                path.display(),
                error
            );
            (Arc::new(MemDb::new()), Arc::new(MemDb::new()))
        }
    }
}

/// Loads the node key from the data directory, generating one on first run.
///
/// The corresponding public key is the node's account: the coinbase address
/// of mined blocks and the sender of operator-submitted transactions.
fn load_or_create_key(path: &Path) -> Result<SigningKey> {
    let key_path = path.join("node.key");
    if key_path.exists() {
        let encoded = fs::read_to_string(&key_path)?;
        Ok(signing_key_from_hex(&encoded)?)
    } else {
        let key = generate_signing_key();
        fs::write(&key_path, signing_key_to_hex(&key))?;
        info!("Generated a new node key at {}", key_path.display());
        Ok(key)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let matches = cli::app().get_matches();
    let config = Config::load(&matches)?;

    initialize_logger(config.verbose);
    print_welcome(&config);

    let data_dir = config.data_dir();
    fs::create_dir_all(&data_dir)?;

    let (accounts, peers) = initialize_storage(&data_dir);
    let ledger = AccountLedger::new(accounts)?;
    let peer_book = Arc::new(PeerBook::new(peers));

    let signing_key = load_or_create_key(&data_dir)?;
    let miner_address = public_key_hex(&signing_key);
    info!("The node account is {}", miner_address);

    let parameters = ConsensusParameters {
        difficulty: config.difficulty,
        ..Default::default()
    };
    let blockchain = Arc::new(RwLock::new(Blockchain::new(parameters, ledger)));

    let environment = Environment::new(
        blockchain,
        peer_book,
        config.local_address(),
        config.bootstrap_address(),
        miner_address,
        config.max_peers,
        config.gossip_count,
        Duration::from_secs(config.gossip_interval_secs),
        Duration::from_secs(config.health_check_interval_secs),
        config.is_bootstrap,
        config.miner && !config.is_bootstrap,
    )?;

    let server = Server::new(environment);
    if let Some(node) = server.node() {
        tokio::spawn(repl::start(node.clone(), signing_key));
    }

    server.start().await?;
    Ok(())
}
