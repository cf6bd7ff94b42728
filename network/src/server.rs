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

use crate::{Bootstrap, ConnReader, ConnWriter, Environment, NetworkError, Node, Payload};

use cinder_consensus::Miner;

use std::net::SocketAddr;
use tokio::net::{TcpListener, TcpStream};
use tracing_futures::Instrument;

/// The role-specific message handler behind the shared listener.
#[derive(Clone)]
pub enum Role {
    Node(Node),
    Bootstrap(Bootstrap),
}

impl Role {
    async fn process_message(&self, payload: Payload) -> Option<Payload> {
        match self {
            Role::Node(node) => node.process_message(payload).await,
            Role::Bootstrap(bootstrap) => bootstrap.process_message(payload).await,
        }
    }
}

/// A core data structure for operating the networking stack of this node.
pub struct Server {
    environment: Environment,
    role: Role,
}

impl Server {
    /// Creates a new instance of `Server` with the role the environment
    /// calls for.
    pub fn new(environment: Environment) -> Self {
        let role = if environment.is_bootstrap() {
            Role::Bootstrap(Bootstrap::new(environment.clone()))
        } else {
            Role::Node(Node::new(environment.clone()))
        };
        Self { environment, role }
    }

    /// Returns the node handler, if this server runs as a regular node.
    pub fn node(&self) -> Option<&Node> {
        match &self.role {
            Role::Node(node) => Some(node),
            Role::Bootstrap(_) => None,
        }
    }

    ///
    /// Starts the server event loop.
    ///
    /// 1. Initialize the TCP listener at the local address.
    /// 2. Spawn the role-specific background loops.
    /// 3. Accept connections, one reader task per connection.
    ///
    pub async fn start(&self) -> Result<(), NetworkError> {
        let local_address = self.environment.local_address();
        let listener = TcpListener::bind((local_address.ip(), local_address.port())).await?;
        info!("The node is listening on {}", local_address);

        match &self.role {
            Role::Node(node) => {
                tokio::spawn(node.clone().start_gossip().instrument(debug_span!("gossip")));
                tokio::spawn(
                    node.clone()
                        .start_health_check()
                        .instrument(debug_span!("health_check")),
                );

                if self.environment.is_miner() {
                    let miner = Miner::new(
                        self.environment.miner_address().to_owned(),
                        self.environment.blockchain().read().parameters().clone(),
                    );
                    tokio::spawn(node.clone().start_miner(miner).instrument(debug_span!("miner")));
                }
            }
            Role::Bootstrap(bootstrap) => {
                tokio::spawn(
                    bootstrap
                        .clone()
                        .start_health_check()
                        .instrument(debug_span!("health_check")),
                );
            }
        }

        self.listen(listener).await
    }

    /// Accepts inbound connections forever.
    async fn listen(&self, listener: TcpListener) -> Result<(), NetworkError> {
        loop {
            match listener.accept().await {
                Ok((stream, remote_address)) => {
                    trace!("Accepted a connection from {}", remote_address);
                    let role = self.role.clone();
                    tokio::spawn(
                        async move {
                            Self::handle_connection(role, stream, remote_address).await;
                        }
                        .instrument(debug_span!("connection", addr = %remote_address)),
                    );
                }
                Err(error) => warn!("Failed to accept a connection: {}", error),
            }
        }
    }

    /// Reads framed messages off one connection until it closes.
    ///
    /// A malformed payload only drops that frame; the connection stays
    /// open and framing stays intact because the frame length was already
    /// consumed. Header-level violations and I/O errors close the
    /// connection.
    async fn handle_connection(role: Role, stream: TcpStream, remote_address: SocketAddr) {
        let (reader, writer) = stream.into_split();
        let mut reader = ConnReader::new(remote_address, reader);
        let mut writer = ConnWriter::new(remote_address, writer);

        loop {
            match reader.read_message().await {
                Ok(message) => {
                    if let Some(response) = role.process_message(message.payload).await {
                        if let Err(error) = writer.write_message(&response).await {
                            warn!("Failed to respond to {}: {}", remote_address, error);
                            break;
                        }
                    }
                }
                Err(NetworkError::InvalidMessage(error)) => {
                    warn!("Received a malformed message from {}: {}", remote_address, error);
                }
                Err(NetworkError::MessageTooBig(size, limit)) => {
                    warn!(
                        "Dropping the connection with {}: a {} byte frame exceeds the {} byte limit",
                        remote_address, size, limit
                    );
                    break;
                }
                Err(_) => break, // disconnected
            }
        }

        trace!("The connection with {} was closed", remote_address);
    }
}
