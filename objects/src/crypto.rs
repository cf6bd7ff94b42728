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

use crate::ObjectsError;

use k256::{
    ecdsa::{SigningKey, VerifyingKey},
    elliptic_curve::sec1::ToEncodedPoint,
};
use rand::rngs::OsRng;
use sha2::{Digest, Sha256};

/// Returns the hex-encoded SHA-256 digest of the given bytes.
///
/// Every hash in the protocol - transaction ids and block hashes alike -
/// is produced by this function over a canonical JSON pre-image.
pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// Generates a fresh secp256k1 signing key.
pub fn generate_signing_key() -> SigningKey {
    SigningKey::random(&mut OsRng)
}

/// Parses a signing key from its hex-encoded scalar bytes.
pub fn signing_key_from_hex(encoded: &str) -> Result<SigningKey, ObjectsError> {
    let bytes = hex::decode(encoded.trim())?;
    SigningKey::from_slice(&bytes).map_err(|error| ObjectsError::Crypto(error.to_string()))
}

/// Returns the hex-encoded scalar bytes of the given signing key.
pub fn signing_key_to_hex(key: &SigningKey) -> String {
    hex::encode(key.to_bytes())
}

/// Returns the hex-encoded SEC1 uncompressed public key of the given signing key.
///
/// This string doubles as the account address of the key holder.
pub fn public_key_hex(key: &SigningKey) -> String {
    let verifying_key = VerifyingKey::from(key);
    hex::encode(verifying_key.to_encoded_point(false).as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_hex() {
        // Well-known digest of the empty input.
        assert_eq!(
            sha256_hex(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_signing_key_hex_round_trip() {
        let key = generate_signing_key();
        let recovered = signing_key_from_hex(&signing_key_to_hex(&key)).unwrap();

        assert_eq!(key.to_bytes(), recovered.to_bytes());
        assert_eq!(public_key_hex(&key), public_key_hex(&recovered));
    }

    #[test]
    fn test_public_key_is_uncompressed_sec1() {
        let key = generate_signing_key();
        let public_key = public_key_hex(&key);

        // 65 bytes: the 0x04 tag followed by the x and y coordinates.
        assert_eq!(public_key.len(), 130);
        assert!(public_key.starts_with("04"));
    }
}
