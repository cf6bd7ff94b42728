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

use std::path::Path;

/// A sled-backed storage backend; one tree per logical store.
#[derive(Debug, Clone)]
pub struct SledDb {
    tree: sled::Tree,
}

impl SledDb {
    /// Opens the named tree inside an already-opened sled database.
    pub fn open_tree(db: &sled::Db, name: &str) -> Result<Self, StorageError> {
        let tree = db.open_tree(name)?;
        trace!("Opened the storage tree '{}' with {} entries", name, tree.len());
        Ok(Self { tree })
    }

    /// Opens a standalone sled database at the given path and returns its
    /// default tree.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let db = sled::open(path)?;
        Ok(Self {
            tree: (&*db).clone(),
        })
    }
}

/// Opens the node's data directory and returns the account and peer trees.
pub fn open_storage<P: AsRef<Path>>(path: P) -> Result<(SledDb, SledDb), StorageError> {
    let db = sled::open(path)?;
    let accounts = SledDb::open_tree(&db, "accounts")?;
    let peers = SledDb::open_tree(&db, "peers")?;
    Ok((accounts, peers))
}

impl KeyValueStorage for SledDb {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StorageError> {
        Ok(self.tree.get(key)?.map(|value| value.to_vec()))
    }

    fn put(&self, key: &[u8], value: &[u8]) -> Result<(), StorageError> {
        self.tree.insert(key, value)?;
        Ok(())
    }

    fn remove(&self, key: &[u8]) -> Result<(), StorageError> {
        self.tree.remove(key)?;
        Ok(())
    }

    fn entries(&self) -> Result<Vec<(Vec<u8>, Vec<u8>)>, StorageError> {
        let mut entries = vec![];
        for entry in self.tree.iter() {
            let (key, value) = entry?;
            entries.push((key.to_vec(), value.to_vec()));
        }
        Ok(entries)
    }

    fn count(&self) -> Result<usize, StorageError> {
        Ok(self.tree.len())
    }
}
