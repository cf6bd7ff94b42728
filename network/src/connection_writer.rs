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

use crate::{serialize_payload, MessageHeader, NetworkError, Payload, MAX_MESSAGE_SIZE};

use std::net::SocketAddr;
use tokio::{io::AsyncWriteExt, net::tcp::OwnedWriteHalf};

/// The writing half of a connection, emitting one length-prefixed frame per
/// message.
pub struct ConnWriter {
    pub addr: SocketAddr,
    writer: OwnedWriteHalf,
}

impl ConnWriter {
    pub fn new(addr: SocketAddr, writer: OwnedWriteHalf) -> Self {
        Self { addr, writer }
    }

    /// Writes a single framed message to the stream.
    pub async fn write_message(&mut self, payload: &Payload) -> Result<(), NetworkError> {
        let body = serialize_payload(payload)?;
        if body.len() > MAX_MESSAGE_SIZE {
            return Err(NetworkError::MessageTooBig(body.len(), MAX_MESSAGE_SIZE));
        }

        let header = MessageHeader { len: body.len() as u32 };
        self.writer.write_all(&header.as_bytes()).await?;
        self.writer.write_all(&body).await?;
        self.writer.flush().await?;

        debug!("Sent a '{}' message to {}", payload, self.addr);
        Ok(())
    }
}
