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

use parking_lot::RwLock;
use std::collections::BTreeMap;

/// An in-memory storage backend, used by tests and as a fallback when no
/// data directory is available.
#[derive(Debug, Default)]
pub struct MemDb {
    inner: RwLock<BTreeMap<Vec<u8>, Vec<u8>>>,
}

impl MemDb {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStorage for MemDb {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StorageError> {
        Ok(self.inner.read().get(key).cloned())
    }

    fn put(&self, key: &[u8], value: &[u8]) -> Result<(), StorageError> {
        self.inner.write().insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn remove(&self, key: &[u8]) -> Result<(), StorageError> {
        self.inner.write().remove(key);
        Ok(())
    }

    fn entries(&self) -> Result<Vec<(Vec<u8>, Vec<u8>)>, StorageError> {
        Ok(self
            .inner
            .read()
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect())
    }

    fn count(&self) -> Result<usize, StorageError> {
        Ok(self.inner.read().len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_get_remove() {
        let db = MemDb::new();

        assert_eq!(db.get(b"key").unwrap(), None);

        db.put(b"key", b"value").unwrap();
        assert_eq!(db.get(b"key").unwrap(), Some(b"value".to_vec()));
        assert_eq!(db.count().unwrap(), 1);

        db.put(b"key", b"other").unwrap();
        assert_eq!(db.get(b"key").unwrap(), Some(b"other".to_vec()));
        assert_eq!(db.count().unwrap(), 1);

        db.remove(b"key").unwrap();
        assert_eq!(db.get(b"key").unwrap(), None);
        assert_eq!(db.count().unwrap(), 0);
    }

    #[test]
    fn test_entries_snapshot() {
        let db = MemDb::new();
        db.put(b"a", b"1").unwrap();
        db.put(b"b", b"2").unwrap();

        let entries = db.entries().unwrap();
        assert_eq!(entries.len(), 2);
        assert!(entries.contains(&(b"a".to_vec(), b"1".to_vec())));
        assert!(entries.contains(&(b"b".to_vec(), b"2".to_vec())));
    }
}
