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

//! Monetary amounts.
//!
//! Transactions carry amounts in whole coin units on the wire, but every
//! piece of ledger arithmetic is performed on integer micro-coins so that
//! balances never accumulate binary floating-point drift. Conversion to and
//! from coin units happens only at the network and operator edges.

/// The number of micro-coins in one coin.
pub const MICRO_PER_COIN: u64 = 1_000_000;

/// Converts a coin-unit amount into integer micro-coins.
///
/// The amount is rounded at the sixth decimal; negative or non-finite
/// inputs saturate to zero and are expected to be rejected upstream.
pub fn coins_to_micro(coins: f64) -> u64 {
    (coins * MICRO_PER_COIN as f64).round() as u64
}

/// Converts integer micro-coins into a coin-unit amount.
pub fn micro_to_coins(micro: u64) -> f64 {
    micro as f64 / MICRO_PER_COIN as f64
}

/// Renders micro-coins as an exact decimal string for display.
pub fn format_coins(micro: u64) -> String {
    format!("{}.{:06}", micro / MICRO_PER_COIN, micro % MICRO_PER_COIN)
}
