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

pub mod bootstrap;
pub use bootstrap::*;

pub mod connection_reader;
pub use connection_reader::*;

pub mod connection_writer;
pub use connection_writer::*;

pub mod environment;
pub use environment::*;

pub mod errors;
pub use errors::*;

pub mod message;
pub use message::*;

pub mod node;
pub use node::*;

pub mod outbound;
pub use outbound::*;

pub mod server;
pub use server::*;

use std::time::Duration;

/// The number of peers a node gossips with per round.
pub const GOSSIP_COUNT: usize = 2;

/// The number of peers the bootstrap directory hands out per request.
pub const BOOTSTRAP_GOSSIP_COUNT: usize = 3;

/// How long a node waits between gossip rounds.
pub const GOSSIP_RATE: Duration = Duration::from_secs(15);

/// How long a node waits between health-check sweeps.
pub const HEALTH_CHECK_RATE: Duration = Duration::from_secs(30);

/// The dial and read timeout of a health-check probe.
pub const HEALTH_CHECK_TIMEOUT: Duration = Duration::from_secs(20);

/// The dial timeout of ordinary outbound messages.
pub const DIAL_TIMEOUT: Duration = Duration::from_secs(10);

/// The dial and read timeout of a bootstrap request; generous because the
/// directory blocks until it has enough peers to hand out.
pub const BOOTSTRAP_DIAL_TIMEOUT: Duration = Duration::from_secs(60);

/// The cap on registered peers of a regular node.
pub const MAX_PEERS: usize = 10;
