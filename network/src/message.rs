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

use crate::NetworkError;

use cinder_objects::{Block, Transaction};
use cinder_storage::PeerAddress;

use serde::{Deserialize, Serialize};
use std::{fmt, net::SocketAddr};

/// The cap on the byte length of a single framed message.
pub const MAX_MESSAGE_SIZE: usize = 1024 * 1024;

/// The frame header: a big-endian u32 byte length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageHeader {
    pub len: u32,
}

impl MessageHeader {
    pub fn as_bytes(&self) -> [u8; 4] {
        self.len.to_be_bytes()
    }

    pub fn len(&self) -> usize {
        self.len as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl From<[u8; 4]> for MessageHeader {
    fn from(bytes: [u8; 4]) -> Self {
        Self {
            len: u32::from_be_bytes(bytes),
        }
    }
}

/// The set of protocol messages, JSON-encoded on the wire and tagged by
/// their `type` field.
///
/// Peer addresses travel as `[ip, port]` pairs. Blocks and transactions
/// travel as their full serde representation; received blocks are still
/// reconstructed hash-first on dispatch, so the embedded hashes are never
/// trusted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Payload {
    /// A request for peers, answered by the bootstrap directory.
    RequestPeers { address: PeerAddress },
    /// A gossip push of known peers.
    SendPeers {
        address: PeerAddress,
        peers: Vec<PeerAddress>,
    },
    /// The bootstrap directory's answer to `RequestPeers`.
    FromGenesis { peers: Vec<PeerAddress> },
    /// A liveness probe between regular nodes.
    HealthCheck { address: PeerAddress },
    HealthCheckResponse { status: String },
    /// A liveness probe sent by the bootstrap directory.
    GenesisHealthCheck,
    GenesisHealthCheckResponse { status: String },
    /// A block announcement.
    NewBlockMined { block: Block, address: PeerAddress },
    /// A transaction announcement.
    NewTransaction {
        transaction: Transaction,
        address: PeerAddress,
    },
}

impl Payload {
    /// Returns the wire name of this message.
    pub fn name(&self) -> &'static str {
        match self {
            Payload::RequestPeers { .. } => "request_peers",
            Payload::SendPeers { .. } => "send_peers",
            Payload::FromGenesis { .. } => "from_genesis",
            Payload::HealthCheck { .. } => "health_check",
            Payload::HealthCheckResponse { .. } => "health_check_response",
            Payload::GenesisHealthCheck => "genesis_health_check",
            Payload::GenesisHealthCheckResponse { .. } => "genesis_health_check_response",
            Payload::NewBlockMined { .. } => "new_block_mined",
            Payload::NewTransaction { .. } => "new_transaction",
        }
    }

    /// Returns the canned healthy reply to a node health check.
    pub fn healthy_response() -> Self {
        Payload::HealthCheckResponse {
            status: "healthy".to_owned(),
        }
    }

    /// Returns the canned healthy reply to a bootstrap health check.
    pub fn genesis_healthy_response() -> Self {
        Payload::GenesisHealthCheckResponse {
            status: "healthy".to_owned(),
        }
    }
}

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Serializes a payload into its wire bytes.
pub fn serialize_payload(payload: &Payload) -> Result<Vec<u8>, NetworkError> {
    serde_json::to_vec(payload).map_err(|error| NetworkError::InvalidMessage(error.to_string()))
}

/// Deserializes a payload from its wire bytes.
pub fn deserialize_payload(bytes: &[u8]) -> Result<Payload, NetworkError> {
    serde_json::from_slice(bytes).map_err(|error| NetworkError::InvalidMessage(error.to_string()))
}

/// The origin or destination of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Inbound(SocketAddr),
    Outbound(SocketAddr),
}

/// A payload tagged with the connection it belongs to.
#[derive(Debug)]
pub struct Message {
    pub direction: Direction,
    pub payload: Payload,
}

impl Message {
    pub fn new(direction: Direction, payload: Payload) -> Self {
        Self { direction, payload }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_header_round_trip() {
        let header = MessageHeader { len: 4130 };
        assert_eq!(MessageHeader::from(header.as_bytes()), header);
    }

    #[test]
    fn test_header_bytes_are_big_endian() {
        let header = MessageHeader { len: 1 };
        assert_eq!(header.as_bytes(), [0, 0, 0, 1]);
    }

    #[test]
    fn test_payload_wire_shape() {
        let payload = Payload::SendPeers {
            address: PeerAddress::new("localhost", 8082),
            peers: vec![PeerAddress::new("localhost", 8083)],
        };
        let encoded = serde_json::to_value(&payload).unwrap();

        assert_eq!(encoded["type"], "send_peers");
        assert_eq!(encoded["address"], serde_json::json!(["localhost", 8082]));
        assert_eq!(encoded["peers"], serde_json::json!([["localhost", 8083]]));
    }

    #[test]
    fn test_unit_variants_only_carry_the_tag() {
        let encoded = serde_json::to_value(&Payload::GenesisHealthCheck).unwrap();
        assert_eq!(encoded, serde_json::json!({ "type": "genesis_health_check" }));
    }

    #[test]
    fn test_payload_round_trip() {
        let payloads = vec![
            Payload::RequestPeers {
                address: PeerAddress::new("localhost", 3070),
            },
            Payload::FromGenesis {
                peers: vec![PeerAddress::new("localhost", 8082)],
            },
            Payload::HealthCheck {
                address: PeerAddress::new("localhost", 8082),
            },
            Payload::healthy_response(),
            Payload::GenesisHealthCheck,
            Payload::genesis_healthy_response(),
        ];

        for payload in payloads {
            let bytes = serialize_payload(&payload).unwrap();
            assert_eq!(deserialize_payload(&bytes).unwrap(), payload);
        }
    }

    #[test]
    fn test_unknown_message_types_fail_to_parse() {
        assert!(deserialize_payload(br#"{"type":"mystery"}"#).is_err());
        assert!(deserialize_payload(b"not json at all").is_err());
    }
}
