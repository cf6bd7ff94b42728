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

use cinder_storage::StorageError;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConsensusError {
    #[error("the block contains {} coinbase transactions instead of 1", _0)]
    CoinbaseCountInvalid(usize),

    #[error("the transaction amounts of {} overflow", _0)]
    AmountOverflow(String),

    #[error("the sender {} has an insufficient balance", _0)]
    InsufficientBalance(String),

    #[error("the transaction {} carries the nonce {:?} while {} was expected", _0, _1, _2)]
    NonceMismatch(String, Option<u64>, u64),

    #[error("{}", _0)]
    StorageError(#[from] StorageError),
}
