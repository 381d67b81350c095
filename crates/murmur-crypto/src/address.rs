//! Identity addresses derived from public keys.
//!
//! An address names an identity without carrying its key. Directories look
//! grants and identity material up by member address.
//!
//! # Format
//!
//! ```text
//! mu:<base58(version || hash || checksum)>
//!
//! - Version: 1 byte (0x01)
//! - Hash: 20 bytes of BLAKE3(public_key)
//! - Checksum: 4 bytes of BLAKE3(version || hash)
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CryptoError, CryptoResult};
use crate::keys::PublicKey;

const ADDRESS_VERSION: u8 = 0x01;

const ADDRESS_PREFIX: &str = "mu:";

const HASH_LENGTH: usize = 20;

const CHECKSUM_LENGTH: usize = 4;

/// Checksummed identity address.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address(String);

fn checksum(version_and_hash: &[u8]) -> [u8; CHECKSUM_LENGTH] {
    let digest = blake3::hash(version_and_hash);
    let mut out = [0u8; CHECKSUM_LENGTH];
    out.copy_from_slice(&digest.as_bytes()[..CHECKSUM_LENGTH]);
    out
}

impl Address {
    /// Address of an identity's public key.
    pub fn from_public_key(public_key: &PublicKey) -> Self {
        let full_hash = blake3::hash(public_key.as_bytes());

        let mut payload = Vec::with_capacity(1 + HASH_LENGTH + CHECKSUM_LENGTH);
        payload.push(ADDRESS_VERSION);
        payload.extend_from_slice(&full_hash.as_bytes()[..HASH_LENGTH]);
        let sum = checksum(&payload);
        payload.extend_from_slice(&sum);

        Self(format!(
            "{}{}",
            ADDRESS_PREFIX,
            bs58::encode(&payload).into_string()
        ))
    }

    /// Parse an address string, validating prefix, version and checksum.
    pub fn parse(s: &str) -> CryptoResult<Self> {
        let encoded = s.strip_prefix(ADDRESS_PREFIX).ok_or_else(|| {
            CryptoError::InvalidAddress(format!("Address must start with '{}'", ADDRESS_PREFIX))
        })?;

        let payload = bs58::decode(encoded)
            .into_vec()
            .map_err(|e| CryptoError::InvalidAddress(format!("{} is not Base58: {}", s, e)))?;

        let expected_len = 1 + HASH_LENGTH + CHECKSUM_LENGTH;
        if payload.len() != expected_len {
            return Err(CryptoError::InvalidAddress(format!(
                "Address payload is {} bytes, expected {}",
                payload.len(),
                expected_len
            )));
        }

        if payload[0] != ADDRESS_VERSION {
            return Err(CryptoError::InvalidAddress(format!(
                "Unknown address version {:#04x}",
                payload[0]
            )));
        }

        let (body, sum) = payload.split_at(1 + HASH_LENGTH);
        if sum != checksum(body) {
            return Err(CryptoError::InvalidAddress(format!(
                "Checksum mismatch in {}",
                s
            )));
        }

        Ok(Self(s.to_string()))
    }

    /// The `mu:` string form.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this address belongs to the given public key.
    pub fn matches(&self, public_key: &PublicKey) -> bool {
        *self == Self::from_public_key(public_key)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Address").field(&self.0).finish()
    }
}

impl FromStr for Address {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Address {
    type Error = CryptoError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<Address> for String {
    fn from(address: Address) -> Self {
        address.0
    }
}
