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

use cinder_network::{GOSSIP_COUNT, GOSSIP_RATE, HEALTH_CHECK_RATE, MAX_PEERS};
use cinder_storage::PeerAddress;

use anyhow::{anyhow, Context, Result};
use clap::ArgMatches;
use serde::Deserialize;
use std::{fs, path::PathBuf};

/// The node configuration: the defaults, overridden by `cinder.toml` in the
/// data directory (or `--config`), overridden by command-line flags.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// The ip this node listens on and advertises.
    pub ip: String,
    /// The port this node listens on.
    pub port: u16,
    /// The ip of the bootstrap directory.
    pub bootstrap_ip: String,
    /// The port of the bootstrap directory.
    pub bootstrap_port: u16,
    /// The number of leading zero hex characters a block hash must carry.
    pub difficulty: u32,
    /// The cap on registered peers.
    pub max_peers: usize,
    /// The number of peers contacted per gossip round.
    pub gossip_count: usize,
    /// The pause between gossip rounds, in seconds.
    pub gossip_interval_secs: u64,
    /// The pause between health-check sweeps, in seconds.
    pub health_check_interval_secs: u64,
    /// Whether this node runs as the bootstrap directory.
    pub is_bootstrap: bool,
    /// Whether this node runs the mining loop.
    pub miner: bool,
    /// The storage path; defaults to `~/.cinder`.
    pub path: Option<PathBuf>,
    /// The log verbosity: 0 for warnings, 1 for info, 2 for debug, 3+ for trace.
    pub verbose: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ip: "localhost".to_owned(),
            port: 8082,
            bootstrap_ip: "localhost".to_owned(),
            bootstrap_port: 3070,
            difficulty: 6,
            max_peers: MAX_PEERS,
            gossip_count: GOSSIP_COUNT,
            gossip_interval_secs: GOSSIP_RATE.as_secs(),
            health_check_interval_secs: HEALTH_CHECK_RATE.as_secs(),
            is_bootstrap: false,
            miner: true,
            path: None,
            verbose: 1,
        }
    }
}

impl Config {
    /// Resolves the configuration from the file layer and the given
    /// command-line matches.
    pub fn load(matches: &ArgMatches<'_>) -> Result<Self> {
        let config_path = matches
            .value_of("config")
            .map(PathBuf::from)
            .unwrap_or_else(|| Self::default_data_dir().join("cinder.toml"));

        let mut config = if config_path.exists() {
            let contents = fs::read_to_string(&config_path)
                .with_context(|| format!("failed to read {}", config_path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("failed to parse {}", config_path.display()))?
        } else {
            Self::default()
        };

        config.apply_matches(matches)?;
        Ok(config)
    }

    fn apply_matches(&mut self, matches: &ArgMatches<'_>) -> Result<()> {
        if let Some(ip) = matches.value_of("ip") {
            self.ip = ip.to_owned();
        }
        if let Some(port) = matches.value_of("port") {
            self.port = port.parse().context("--port expects a number")?;
        }
        if let Some(bootstrap) = matches.value_of("bootstrap") {
            let address: PeerAddress = bootstrap
                .parse()
                .map_err(|_| anyhow!("--bootstrap expects an ip:port pair"))?;
            self.bootstrap_ip = address.ip().to_owned();
            self.bootstrap_port = address.port();
        }
        if let Some(difficulty) = matches.value_of("difficulty") {
            self.difficulty = difficulty.parse().context("--difficulty expects a number")?;
        }
        if let Some(max_peers) = matches.value_of("max-peers") {
            self.max_peers = max_peers.parse().context("--max-peers expects a number")?;
        }
        if let Some(path) = matches.value_of("path") {
            self.path = Some(PathBuf::from(path));
        }
        if matches.is_present("is-bootstrap") {
            self.is_bootstrap = true;
        }
        if matches.is_present("no-mine") {
            self.miner = false;
        }
        if matches.occurrences_of("verbose") > 0 {
            self.verbose = matches.occurrences_of("verbose") as u8;
        }
        Ok(())
    }

    /// Returns the storage path of this node.
    pub fn data_dir(&self) -> PathBuf {
        self.path.clone().unwrap_or_else(Self::default_data_dir)
    }

    fn default_data_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".cinder")
    }

    /// Returns the address this node listens on and advertises.
    pub fn local_address(&self) -> PeerAddress {
        PeerAddress::new(self.ip.clone(), self.port)
    }

    /// Returns the address of the bootstrap directory.
    pub fn bootstrap_address(&self) -> PeerAddress {
        PeerAddress::new(self.bootstrap_ip.clone(), self.bootstrap_port)
    }
}
