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

use crate::{ConnReader, ConnWriter, NetworkError, Payload, DIAL_TIMEOUT};

use cinder_storage::{PeerAddress, PeerBook};

use std::{sync::Arc, time::Duration};
use tokio::net::TcpStream;

/// A core data structure for handling outbound network traffic.
///
/// All outbound requests are one-shot: dial, write one frame, optionally
/// read one framed response, close. A dial or write failure against a
/// broadcast target removes that peer from the registry.
#[derive(Clone)]
pub struct Outbound {
    /// The registry shared with the rest of the node.
    peer_book: Arc<PeerBook>,
    /// The local address, excluded from broadcast fan-outs.
    local_address: PeerAddress,
}

impl Outbound {
    pub fn new(peer_book: Arc<PeerBook>, local_address: PeerAddress) -> Self {
        Self {
            peer_book,
            local_address,
        }
    }

    /// Dials the given peer within the timeout.
    async fn connect(&self, address: &PeerAddress, timeout: Duration) -> Result<TcpStream, NetworkError> {
        match tokio::time::timeout(timeout, TcpStream::connect((address.ip(), address.port()))).await {
            Ok(Ok(stream)) => Ok(stream),
            Ok(Err(error)) => Err(error.into()),
            Err(_) => Err(NetworkError::ConnectTimeout(address.clone())),
        }
    }

    /// Sends one framed message to the given peer and closes the connection.
    pub async fn send_to(&self, address: &PeerAddress, payload: &Payload) -> Result<(), NetworkError> {
        let stream = self.connect(address, DIAL_TIMEOUT).await?;
        let peer_addr = stream.peer_addr()?;
        let (_reader, writer) = stream.into_split();

        let mut writer = ConnWriter::new(peer_addr, writer);
        writer.write_message(payload).await
    }

    /// Sends one framed message and waits for one framed response.
    pub async fn request(
        &self,
        address: &PeerAddress,
        payload: &Payload,
        timeout: Duration,
    ) -> Result<Payload, NetworkError> {
        let stream = self.connect(address, timeout).await?;
        let peer_addr = stream.peer_addr()?;
        let (reader, writer) = stream.into_split();

        let mut writer = ConnWriter::new(peer_addr, writer);
        writer.write_message(payload).await?;

        let mut reader = ConnReader::new(peer_addr, reader);
        match tokio::time::timeout(timeout, reader.read_message()).await {
            Ok(Ok(message)) => Ok(message.payload),
            Ok(Err(error)) => Err(error),
            Err(_) => Err(NetworkError::ReadTimeout(address.clone())),
        }
    }

    /// Sends the given message to every registered peer in parallel.
    ///
    /// Peers that cannot be reached are removed from the registry.
    pub async fn broadcast(&self, payload: &Payload) {
        debug!("Broadcasting a '{}' message", payload);

        let mut handles = vec![];
        for remote_address in self.peer_book.all_peers() {
            if remote_address == self.local_address {
                continue;
            }

            let outbound = self.clone();
            let payload = payload.clone();
            handles.push(tokio::spawn(async move {
                if let Err(error) = outbound.send_to(&remote_address, &payload).await {
                    warn!("Error notifying the peer {}: {}", remote_address, error);
                    outbound.peer_book.remove_peer(&remote_address);
                }
            }));
        }

        for handle in handles {
            let _ = handle.await;
        }

        debug!("Broadcasting completed");
    }
}
