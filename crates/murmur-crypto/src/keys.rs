//! X25519 identity keys.
//!
//! One curve is used for all key agreement in murmur. Public keys travel as
//! their raw 32-byte encoding; the canonical private key serialization (what
//! gets wrapped for storage) is the raw 32-byte scalar.
//!
//! # Security
//!
//! - Private keys are zeroized on drop
//! - Private keys only exist in clear inside process memory, after an unwrap
//! - New identities draw from the OS CSPRNG

use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use x25519_dalek::{PublicKey as X25519Public, StaticSecret};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::address::Address;
use crate::codec::{base64url_decode, base64url_encode, fixed_bytes};
use crate::defaults::{PRIVATE_KEY_LEN, PUBLIC_KEY_LEN};
use crate::error::{CryptoError, CryptoResult};

/// Published X25519 identity key.
///
/// Serializes as a Base64-URL string; ledger arguments use [`PublicKey::to_vec`].
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PublicKey([u8; PUBLIC_KEY_LEN]);

impl PublicKey {
    /// Wrap raw public key bytes.
    pub fn from_bytes(bytes: [u8; PUBLIC_KEY_LEN]) -> Self {
        Self(bytes)
    }

    /// Parse a public key from a ledger byte vector.
    pub fn from_slice(bytes: &[u8]) -> CryptoResult<Self> {
        fixed_bytes(bytes, "Public key").map(Self)
    }

    /// Raw 32-byte encoding.
    pub fn as_bytes(&self) -> &[u8; PUBLIC_KEY_LEN] {
        &self.0
    }

    /// Raw bytes as a ledger `vector<u8>` argument.
    pub fn to_vec(&self) -> Vec<u8> {
        self.0.to_vec()
    }

    /// Derive the identity address for this key.
    pub fn to_address(&self) -> Address {
        Address::from_public_key(self)
    }

    pub(crate) fn to_x25519(&self) -> X25519Public {
        X25519Public::from(self.0)
    }
}

impl TryFrom<String> for PublicKey {
    type Error = CryptoError;

    fn try_from(encoded: String) -> Result<Self, Self::Error> {
        Self::from_slice(&base64url_decode(&encoded)?)
    }
}

impl From<PublicKey> for String {
    fn from(key: PublicKey) -> Self {
        base64url_encode(key.as_bytes())
    }
}

impl std::fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Short fingerprint; full keys clutter logs.
        f.debug_tuple("PublicKey")
            .field(&hex::encode(&self.0[..6]))
            .finish()
    }
}

/// Unwrapped identity private key. Only ever held in process memory.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct PrivateKey([u8; PRIVATE_KEY_LEN]);

impl PrivateKey {
    /// Wrap a raw 32-byte scalar, e.g. one just unwrapped from storage.
    pub fn from_bytes(bytes: [u8; PRIVATE_KEY_LEN]) -> Self {
        Self(bytes)
    }

    /// Canonical serialization, the bytes that get wrapped for storage.
    pub fn as_bytes(&self) -> &[u8; PRIVATE_KEY_LEN] {
        &self.0
    }

    pub(crate) fn to_x25519(&self) -> StaticSecret {
        StaticSecret::from(self.0)
    }

    /// The public key published alongside this private key.
    pub fn public_key(&self) -> PublicKey {
        PublicKey::from_bytes(X25519Public::from(&self.to_x25519()).to_bytes())
    }
}

impl std::fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PrivateKey([REDACTED])")
    }
}

/// An identity's private key together with its public key.
#[derive(Clone, Debug)]
pub struct Keypair {
    /// Published half.
    pub public: PublicKey,
    /// Secret half.
    pub private: PrivateKey,
}

impl Keypair {
    /// Fresh identity from the OS CSPRNG.
    pub fn generate() -> Self {
        let secret = StaticSecret::random_from_rng(OsRng);
        Self::from_private(PrivateKey(secret.to_bytes()))
    }

    /// Rebuild a keypair from its private key.
    pub fn from_private(private: PrivateKey) -> Self {
        Self {
            public: private.public_key(),
            private,
        }
    }

    /// Address of this identity.
    pub fn address(&self) -> Address {
        self.public.to_address()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CryptoError;

    #[test]
    fn test_identities_are_distinct() {
        let alice = Keypair::generate();
        let bob = Keypair::generate();

        assert_ne!(alice.public, bob.public);
        assert_ne!(alice.address(), bob.address());
    }

    #[test]
    fn test_restored_identity_matches() {
        let alice = Keypair::generate();
        let restored = Keypair::from_private(PrivateKey::from_bytes(*alice.private.as_bytes()));

        assert_eq!(restored.public, alice.private.public_key());
        assert_eq!(restored.address(), alice.address());
    }

    #[test]
    fn test_public_key_from_slice() {
        let bob = Keypair::generate();
        let parsed = PublicKey::from_slice(&bob.public.to_vec()).unwrap();
        assert_eq!(parsed, bob.public);
    }

    #[test]
    fn test_public_key_from_slice_wrong_length() {
        let result = PublicKey::from_slice(&[4u8; 65]);
        assert!(matches!(result, Err(CryptoError::KeyMaterial(_))));

        let result = PublicKey::from_slice(&[]);
        assert!(matches!(result, Err(CryptoError::KeyMaterial(_))));
    }

    #[test]
    fn test_public_key_serialization() {
        let bob = Keypair::generate();
        let json = serde_json::to_string(&bob.public).unwrap();
        assert_eq!(json, format!("\"{}\"", base64url_encode(bob.public.as_bytes())));

        let parsed: PublicKey = serde_json::from_str(&json).unwrap();
        assert_eq!(bob.public, parsed);
    }

    #[test]
    fn test_public_key_rejects_bad_base64() {
        let result = serde_json::from_str::<PublicKey>("\"+/+/\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_debug_never_prints_private_bytes() {
        let identity = Keypair::generate();
        let private_hex = hex::encode(identity.private.as_bytes());

        let debug = format!("{:?}", identity);
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains(&private_hex));
        assert!(!debug.contains(&private_hex[..12]));
    }
}
