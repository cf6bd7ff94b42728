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

use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr, sync::Arc};

/// The endpoint of a peer; serialized on the wire as an `[ip, port]` pair.
///
/// The ip component is kept as a string so hostnames resolve at dial time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PeerAddress(pub String, pub u16);

impl PeerAddress {
    pub fn new(ip: impl Into<String>, port: u16) -> Self {
        Self(ip.into(), port)
    }

    pub fn ip(&self) -> &str {
        &self.0
    }

    pub fn port(&self) -> u16 {
        self.1
    }
}

impl fmt::Display for PeerAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.0, self.1)
    }
}

impl FromStr for PeerAddress {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.rsplitn(2, ':');
        let port = parts
            .next()
            .and_then(|port| port.parse().ok())
            .ok_or_else(|| StorageError::Message(format!("invalid peer address '{}'", s)))?;
        let ip = parts
            .next()
            .filter(|ip| !ip.is_empty())
            .ok_or_else(|| StorageError::Message(format!("invalid peer address '{}'", s)))?;
        Ok(Self(ip.to_owned(), port))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct PeerRecord {
    is_offline: bool,
}

/// The persistent registry of known peer endpoints and their liveness.
///
/// Entries are unique by `(ip, port)`; every operation is a single backend
/// statement, so concurrent callers only need the backend's atomicity.
#[derive(Clone)]
pub struct PeerBook {
    db: Arc<dyn KeyValueStorage>,
}

impl PeerBook {
    pub fn new(db: Arc<dyn KeyValueStorage>) -> Self {
        Self { db }
    }

    /// Registers a peer, preserving the liveness flag of an existing entry.
    ///
    /// A no-op when `max_peers` is given and the registry already holds at
    /// least that many entries.
    pub fn add_peer(&self, address: &PeerAddress, max_peers: Option<usize>) {
        if let Some(max_peers) = max_peers {
            if self.count() >= max_peers {
                debug!("Already {} peers in the registry, not inserting {}", max_peers, address);
                return;
            }
        }

        let key = match bincode::serialize(address) {
            Ok(key) => key,
            Err(error) => {
                error!("Failed to encode the peer {}: {}", address, error);
                return;
            }
        };

        match self.db.get(&key) {
            Ok(Some(_)) => {} // already registered
            Ok(None) => {
                if self.write(&key, &PeerRecord::default()).is_ok() {
                    debug!("The peer {} got inserted into the registry", address);
                }
            }
            Err(error) => error!("Failed to read the peer {}: {}", address, error),
        }
    }

    /// Marks a registered peer as online.
    pub fn set_online(&self, address: &PeerAddress) {
        self.set_offline_flag(address, false);
    }

    /// Marks a registered peer as offline.
    pub fn set_offline(&self, address: &PeerAddress) {
        self.set_offline_flag(address, true);
    }

    /// Removes a peer from the registry.
    pub fn remove_peer(&self, address: &PeerAddress) {
        let key = match bincode::serialize(address) {
            Ok(key) => key,
            Err(error) => {
                error!("Failed to encode the peer {}: {}", address, error);
                return;
            }
        };
        match self.db.remove(&key) {
            Ok(()) => debug!("The peer {} got removed from the registry", address),
            Err(error) => error!("Failed to remove the peer {}: {}", address, error),
        }
    }

    /// Returns up to `count` online peers chosen uniformly at random,
    /// excluding the given address.
    pub fn peers(&self, count: usize, exclude: Option<&PeerAddress>) -> Vec<PeerAddress> {
        let mut candidates: Vec<PeerAddress> = self
            .records()
            .into_iter()
            .filter(|(address, record)| !record.is_offline && Some(address) != exclude)
            .map(|(address, _)| address)
            .collect();

        candidates.shuffle(&mut rand::thread_rng());
        candidates.truncate(count);
        candidates
    }

    /// Returns every registered peer, online or not.
    pub fn all_peers(&self) -> Vec<PeerAddress> {
        self.records().into_iter().map(|(address, _)| address).collect()
    }

    /// Returns the number of registered peers.
    pub fn count(&self) -> usize {
        match self.db.count() {
            Ok(count) => count,
            Err(error) => {
                error!("Failed to count the registered peers: {}", error);
                0
            }
        }
    }

    fn records(&self) -> Vec<(PeerAddress, PeerRecord)> {
        let entries = match self.db.entries() {
            Ok(entries) => entries,
            Err(error) => {
                error!("Failed to list the registered peers: {}", error);
                return vec![];
            }
        };

        entries
            .into_iter()
            .filter_map(|(key, value)| {
                let address = bincode::deserialize(&key).ok()?;
                let record = bincode::deserialize(&value).ok()?;
                Some((address, record))
            })
            .collect()
    }

    fn set_offline_flag(&self, address: &PeerAddress, is_offline: bool) {
        let key = match bincode::serialize(address) {
            Ok(key) => key,
            Err(error) => {
                error!("Failed to encode the peer {}: {}", address, error);
                return;
            }
        };
        match self.db.get(&key) {
            Ok(Some(_)) => {
                if self.write(&key, &PeerRecord { is_offline }).is_ok() {
                    debug!("The peer {} was set to {}", address, if is_offline { "offline" } else { "online" });
                }
            }
            Ok(None) => debug!("The peer {} is not in the registry", address),
            Err(error) => error!("Failed to read the peer {}: {}", address, error),
        }
    }

    fn write(&self, key: &[u8], record: &PeerRecord) -> Result<(), StorageError> {
        let bytes = bincode::serialize(record)?;
        if let Err(error) = self.db.put(key, &bytes) {
            error!("Failed to write a peer record: {}", error);
            return Err(error);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemDb;

    fn test_book() -> PeerBook {
        PeerBook::new(Arc::new(MemDb::new()))
    }

    fn address(port: u16) -> PeerAddress {
        PeerAddress::new("127.0.0.1", port)
    }

    #[test]
    fn test_peer_address_round_trip() {
        let parsed: PeerAddress = "localhost:3070".parse().unwrap();
        assert_eq!(parsed, PeerAddress::new("localhost", 3070));
        assert_eq!(parsed.to_string(), "localhost:3070");

        assert!("localhost".parse::<PeerAddress>().is_err());
        assert!(":3070".parse::<PeerAddress>().is_err());
        assert!("localhost:port".parse::<PeerAddress>().is_err());
    }

    #[test]
    fn test_add_peer_is_idempotent() {
        let book = test_book();

        book.add_peer(&address(4130), None);
        book.add_peer(&address(4130), None);

        assert_eq!(book.count(), 1);
    }

    #[test]
    fn test_add_peer_respects_the_capacity_bound() {
        let book = test_book();

        book.add_peer(&address(1), Some(2));
        book.add_peer(&address(2), Some(2));
        book.add_peer(&address(3), Some(2));

        assert_eq!(book.count(), 2);

        // An unbounded insert still goes through.
        book.add_peer(&address(3), None);
        assert_eq!(book.count(), 3);
    }

    #[test]
    fn test_add_peer_preserves_the_offline_flag() {
        let book = test_book();

        book.add_peer(&address(1), None);
        book.set_offline(&address(1));
        book.add_peer(&address(1), None);

        assert!(book.peers(10, None).is_empty());
    }

    #[test]
    fn test_peers_excludes_offline_and_requested_peers() {
        let book = test_book();
        for port in 1..=4 {
            book.add_peer(&address(port), None);
        }
        book.set_offline(&address(4));

        let peers = book.peers(10, Some(&address(1)));

        assert_eq!(peers.len(), 2);
        assert!(!peers.contains(&address(1)));
        assert!(!peers.contains(&address(4)));
    }

    #[test]
    fn test_peers_is_bounded_by_count() {
        let book = test_book();
        for port in 1..=10 {
            book.add_peer(&address(port), None);
        }

        assert_eq!(book.peers(3, None).len(), 3);
    }

    #[test]
    fn test_set_online_restores_a_peer() {
        let book = test_book();

        book.add_peer(&address(1), None);
        book.set_offline(&address(1));
        assert!(book.peers(10, None).is_empty());

        book.set_online(&address(1));
        assert_eq!(book.peers(10, None), vec![address(1)]);
    }

    #[test]
    fn test_set_offline_on_an_unknown_peer_does_not_register_it() {
        let book = test_book();

        book.set_offline(&address(9));
        assert_eq!(book.count(), 0);
    }

    #[test]
    fn test_remove_peer() {
        let book = test_book();

        book.add_peer(&address(1), None);
        book.remove_peer(&address(1));

        assert_eq!(book.count(), 0);
        assert!(book.all_peers().is_empty());
    }
}
