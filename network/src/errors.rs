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

use cinder_storage::PeerAddress;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("connecting to {} timed out", _0)]
    ConnectTimeout(PeerAddress),

    #[error("{}", _0)]
    InvalidMessage(String),

    #[error("{}", _0)]
    IoError(#[from] std::io::Error),

    #[error("the message is too big: {} bytes with a limit of {}", _0, _1)]
    MessageTooBig(usize, usize),

    #[error("the peer counts are invalid")]
    PeerCountInvalid,

    #[error("reading from {} timed out", _0)]
    ReadTimeout(PeerAddress),
}
