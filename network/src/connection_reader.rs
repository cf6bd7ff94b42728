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

use crate::{deserialize_payload, Direction, Message, MessageHeader, NetworkError, MAX_MESSAGE_SIZE};

use std::net::SocketAddr;
use tokio::{io::AsyncReadExt, net::tcp::OwnedReadHalf};

/// The reading half of a connection, yielding one message per length-prefixed
/// frame.
///
/// Partial reads are buffered by `read_exact`, and back-to-back frames on
/// the same connection are handled by calling `read_message` in a loop.
pub struct ConnReader {
    pub addr: SocketAddr,
    reader: OwnedReadHalf,
    buffer: Box<[u8]>,
}

impl ConnReader {
    pub fn new(addr: SocketAddr, reader: OwnedReadHalf) -> Self {
        Self {
            addr,
            reader,
            buffer: vec![0; MAX_MESSAGE_SIZE].into_boxed_slice(),
        }
    }

    /// Returns a message header read from the stream.
    pub async fn read_header(&mut self) -> Result<MessageHeader, NetworkError> {
        let mut header_arr = [0u8; 4];
        self.reader.read_exact(&mut header_arr).await?;
        let header = MessageHeader::from(header_arr);

        if header.len() > MAX_MESSAGE_SIZE {
            Err(NetworkError::MessageTooBig(header.len(), MAX_MESSAGE_SIZE))
        } else {
            Ok(header)
        }
    }

    /// Reads a message header and payload.
    pub async fn read_message(&mut self) -> Result<Message, NetworkError> {
        let header = self.read_header().await?;
        self.reader.read_exact(&mut self.buffer[..header.len()]).await?;
        let payload = deserialize_payload(&self.buffer[..header.len()])?;

        debug!("Received a '{}' message from {}", payload, self.addr);

        Ok(Message::new(Direction::Inbound(self.addr), payload))
    }
}
