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

pub mod accounts;
pub use accounts::*;

pub mod errors;
pub use errors::*;

pub mod key_value;
pub use key_value::*;

pub mod mem;
pub use mem::*;

pub mod peer_book;
pub use peer_book::*;

#[cfg(feature = "sled_storage")]
pub mod sled_db;
#[cfg(feature = "sled_storage")]
pub use sled_db::*;
