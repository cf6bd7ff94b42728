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

use crate::StorageError;

/// The backend contract shared by the account ledger and the peer book.
///
/// Every operation is atomic on its own; cross-operation atomicity (e.g.
/// applying a whole block against the ledger) is the responsibility of the
/// caller, which serializes mutations behind the node state lock.
pub trait KeyValueStorage: Send + Sync {
    /// Returns the value stored under `key`, if any.
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StorageError>;

    /// Stores `value` under `key`, replacing any previous value.
    fn put(&self, key: &[u8], value: &[u8]) -> Result<(), StorageError>;

    /// Removes the value stored under `key`, if any.
    fn remove(&self, key: &[u8]) -> Result<(), StorageError>;

    /// Returns a snapshot of all key/value pairs.
    fn entries(&self) -> Result<Vec<(Vec<u8>, Vec<u8>)>, StorageError>;

    /// Returns the number of stored entries.
    fn count(&self) -> Result<usize, StorageError>;
}
